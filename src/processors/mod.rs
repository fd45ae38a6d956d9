//! Line and block processors.
//!
//! A line processor decides whether a line is meant for it (one of its alias tags is present and
//! the line carries no `^anchor` yet), files a derived entry somewhere, and hands back the line
//! with its aliases stripped and a fresh anchor appended. Nothing inside a processor is fatal:
//! on any error the line comes back unchanged.

pub mod acronym;
pub mod file;
pub mod meeting;
pub mod resource;
pub mod task;

use std::sync::Arc;

pub use acronym::AcronymProcessor;
use async_trait::async_trait;
pub use file::TaskFileProcessor;
pub use meeting::MeetingProcessor;
pub use resource::ResourceProcessor;
pub use task::TaskProcessor;

use crate::{
	clock::Clock,
	context::{ContextToken, Destination},
	dates::DateExtractor,
	error::Result,
	ids::{ANCHOR_LEN, IdGenerator},
	store::{DocumentHandle, DocumentStore},
	tags,
};

/// The collaborators every processor is built from.
#[derive(Clone)]
pub struct Services {
	pub store: Arc<dyn DocumentStore>,
	pub dates: Arc<dyn DateExtractor>,
	pub ids: Arc<dyn IdGenerator>,
	pub clock: Arc<dyn Clock>,
}

impl Services {
	pub fn new(store: Arc<dyn DocumentStore>, dates: Arc<dyn DateExtractor>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
		Self { store, dates, ids, clock }
	}

	pub fn anchor(&self) -> String {
		self.ids.generate(ANCHOR_LEN)
	}
}

/// Where one processing pass reads from and files to.
#[derive(Clone, Debug)]
pub struct Invocation {
	/// The document the text was taken from.
	pub current: DocumentHandle,
	/// What backlinks point at: the new block document, or `current` when processing a selection.
	pub new_document: DocumentHandle,
	pub block_context: Vec<ContextToken>,
	/// Routed block destinations, best first.
	pub destinations: Vec<Destination>,
	pub resource_document: Option<DocumentHandle>,
	pub acronym_document: Option<DocumentHandle>,
}

impl Invocation {
	/// A pass with no block around it.
	pub fn for_selection(current: DocumentHandle) -> Self {
		Self {
			new_document: current.clone(),
			current,
			block_context: Vec::new(),
			destinations: Vec::new(),
			resource_document: None,
			acronym_document: None,
		}
	}
}

/// `[[path#^anchor|🖇️]]`, the link a filed entry carries back to its source line.
pub fn backlink(doc: &DocumentHandle, anchor: &str) -> String {
	format!("[[{}#^{anchor}|🖇️]]", doc.path())
}

/// Remove every tag in `tags_to_strip` from `line`.
pub(crate) fn strip_tags<'a>(line: &str, tags_to_strip: impl IntoIterator<Item = &'a String>) -> String {
	tags_to_strip.into_iter().fold(line.to_string(), |acc, tag| tags::remove_tag(&acc, tag))
}

#[async_trait]
pub trait LineProcessor: Send + Sync {
	fn name(&self) -> &'static str;

	fn aliases(&self) -> &[String];

	/// File whatever `line` asks for and return its replacement. Only called for qualifying lines.
	async fn file(&self, line: &str, invocation: &Invocation) -> Result<String>;

	fn qualifies(&self, line: &str) -> bool {
		!tags::has_anchor(line) && self.aliases().iter().any(|alias| tags::contains_tag(line, alias))
	}

	async fn process(&self, line: String, invocation: &Invocation) -> String {
		if !self.qualifies(&line) {
			return line;
		}
		match self.file(&line, invocation).await {
			Ok(processed) => {
				tracing::debug!(processor = self.name(), "{line:?} -> {processed:?}");
				processed
			}
			Err(e) => {
				tracing::warn!(processor = self.name(), "leaving {line:?} unchanged: {e}");
				line
			}
		}
	}
}
