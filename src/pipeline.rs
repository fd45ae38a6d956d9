//! End-to-end processing of a fragment taken from a document.
//!
//! [`Pipeline::process_block`] turns a fragment into its own document and leaves an embed behind;
//! [`Pipeline::process_selection`] only runs the line processors over the fragment in place. In
//! both, each line processor makes a full pass over every line before the next one starts, so a
//! later pass sees the anchors an earlier one appended.

use tracing::instrument;

use crate::{
	block::{Block, map_lines},
	config::Settings,
	context::{ContextRouter, Destination},
	error::{Error, Result},
	processors::{AcronymProcessor, Invocation, LineProcessor, MeetingProcessor, ResourceProcessor, Services, TaskProcessor},
	section::file_to_header,
	store::DocumentHandle,
};

#[derive(Clone, Debug)]
pub struct BlockOutcome {
	pub new_document: DocumentHandle,
	pub block: Block,
	pub destinations: Vec<Destination>,
}

pub struct Pipeline {
	settings: Settings,
	services: Services,
	router: ContextRouter,
	task: TaskProcessor,
	resource: ResourceProcessor,
	acronym: AcronymProcessor,
	meeting: MeetingProcessor,
}

/// File name for a block titled `title`: letters, digits, whitespace and `-` only.
pub fn sanitize_title(title: &str) -> String {
	title.chars().filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-').collect::<String>().trim().to_string()
}

impl Pipeline {
	pub fn new(settings: Settings, services: Services) -> Self {
		Self {
			router: ContextRouter::new(services.store.clone()),
			task: TaskProcessor::new(settings.task.clone(), services.clone()),
			resource: ResourceProcessor::new(settings.resource.clone(), services.clone()),
			acronym: AcronymProcessor::new(settings.acronym.clone(), services.clone()),
			meeting: MeetingProcessor::new(settings.meeting.clone(), services.clone()),
			settings,
			services,
		}
	}

	fn line_processors(&self) -> [&dyn LineProcessor; 3] {
		[&self.task, &self.resource, &self.acronym]
	}

	async fn current_document(&self, path: &str) -> Result<DocumentHandle> {
		self.services.store.get(path).await.ok_or_else(|| Error::MissingDocument { path: path.to_string() })
	}

	async fn optional_document(&self, path: &str) -> Option<DocumentHandle> {
		let found = self.services.store.get(path).await;
		if found.is_none() {
			tracing::warn!("{path} does not exist; skipping what would be filed there");
		}
		found
	}

	async fn invocation(&self, current: DocumentHandle, new_document: DocumentHandle) -> Invocation {
		Invocation {
			current,
			new_document,
			block_context: Vec::new(),
			destinations: Vec::new(),
			resource_document: self.optional_document(&self.settings.resource.file).await,
			acronym_document: self.optional_document(&self.settings.acronym.file).await,
		}
	}

	async fn new_document(&self, block: &Block) -> Result<DocumentHandle> {
		let mut name = sanitize_title(&block.header().title);
		if name.is_empty() {
			name = block.id().to_string();
		}
		let path = match self.settings.block.note_folder.trim_matches('/') {
			"" => format!("{name}.md"),
			folder => format!("{folder}/{name}.md"),
		};
		match self.services.store.get(&path).await {
			Some(existing) => Ok(existing),
			None => self.services.store.create(&path, "").await,
		}
	}

	/// Move `fragment` out of the document at `current_path` into a document of its own.
	#[instrument(skip(self, fragment))]
	pub async fn process_block(&self, fragment: &str, current_path: &str) -> Result<BlockOutcome> {
		let store = self.services.store.as_ref();
		let mut block = Block::parse(fragment, self.services.ids.as_ref(), self.services.clock.as_ref());
		let current = self.current_document(current_path).await?;
		let new_document = self.new_document(&block).await?;

		let destinations = self.router.translate_all(block.context(), &current).await;
		let mut invocation = self.invocation(current.clone(), new_document.clone()).await;
		invocation.block_context = block.context().to_vec();
		invocation.destinations = destinations.clone();

		for processor in self.line_processors() {
			block.map_each_line(|line| processor.process(line, &invocation)).await;
		}
		self.meeting.process(&block, &invocation).await;

		let list_header = &self.settings.block.list_header;
		for (i, destination) in destinations.iter().enumerate() {
			let entry = match i {
				0 => format!("{}\n\n![[{}]]\n", block.header().raw, new_document.stem()),
				_ => format!("## [[{}]]\n", new_document.stem()),
			};
			if let Err(e) = file_to_header(store, &destination.document, list_header, &entry).await {
				tracing::warn!("block not listed in {}: {e}", destination.document);
			}
		}

		let embed = format!("{}\n\n![[{}]]", block.header().raw, new_document.path());
		store
			.modify(
				&current,
				Box::new(|text: &str| {
					if !text.contains(fragment) {
						tracing::warn!("fragment no longer present in the current document");
					}
					text.replacen(fragment, &embed, 1)
				}),
			)
			.await?;

		let contents = format!("{}\n\n{}\n\n{}", block.context().iter().map(|t| t.as_str()).collect::<Vec<_>>().join("\n"), block.other_tags().join("\n"), block.body());
		store.modify(&new_document, Box::new(move |_: &str| contents)).await?;

		tracing::info!(new_document = %new_document, destinations = destinations.len(), "processed block {}", block.id());
		Ok(BlockOutcome { new_document, block, destinations })
	}

	/// Run the line processors over `fragment` in place. Returns the processed text.
	#[instrument(skip(self, fragment))]
	pub async fn process_selection(&self, fragment: &str, current_path: &str) -> Result<String> {
		let current = self.current_document(current_path).await?;
		let invocation = self.invocation(current.clone(), current.clone()).await;

		let mut text = fragment.to_string();
		for processor in self.line_processors() {
			text = map_lines(&text, |line| processor.process(line, &invocation)).await;
		}

		if text != fragment {
			let processed = text.clone();
			self.services.store.modify(&current, Box::new(move |existing: &str| existing.replacen(fragment, &processed, 1))).await?;
		}
		Ok(text)
	}
}
