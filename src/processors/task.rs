//! Files action lines as tasks.
//!
//! Shorthand tags expand before the task is built: `#follow-up` becomes "Follow up" with
//! `#action #5m`, `#think-about` and `#read` become "Think about" / "Read" with `#action #30m`,
//! `#key-date` adds `#action #0m`, `#frog` becomes `#🐸`, and a date mentioned in the text becomes
//! a `📅` due date. Added tags go in front of any existing metadata; the due date goes last.

use async_trait::async_trait;
use tracing::instrument;

use super::{Invocation, LineProcessor, Services, backlink, strip_tags};
use crate::{
	config::TaskProcessorSettings,
	context::{ContextRouter, ContextToken},
	error::{Error, Result},
	section::file_to_header,
	store::DocumentHandle,
	tags,
	task::{MetadataGlyph, Task},
};

pub struct TaskProcessor {
	settings: TaskProcessorSettings,
	services: Services,
	router: ContextRouter,
}

/// Insert `added` before the metadata suffix, or at the end when there is none.
fn insert_before_metadata(text: &str, added: &str) -> String {
	match MetadataGlyph::boundary(text) {
		Some(at) => format!("{} {added} {}", text[..at].trim_end(), &text[at..]),
		None => format!("{} {added}", text.trim_end()),
	}
}

/// `(tag, replacement, appended tags)`, applied in this order.
const SHORTHANDS: [(&str, &str, &str); 3] = [("#think-about", "Think about", "#action #30m"), ("#follow-up", "Follow up", "#action #5m"), ("#read", "Read", "#action #30m")];

impl TaskProcessor {
	pub fn new(settings: TaskProcessorSettings, services: Services) -> Self {
		let router = ContextRouter::new(services.store.clone());
		Self { settings, services, router }
	}

	/// Expand shorthands and attach a due date.
	pub async fn preprocess(&self, line: &str) -> String {
		let mut text = line.to_string();
		if tags::contains_tag(&text, "#key-date") {
			text = insert_before_metadata(&text, "#action #0m");
		}
		if !text.contains(MetadataGlyph::Due.as_str())
			&& let Some(due) = self.services.dates.extract(&text, self.services.clock.today()).await
		{
			text = format!("{} {} {due}", text.trim_end(), MetadataGlyph::Due);
		}
		for (tag, phrase, added) in SHORTHANDS {
			if tags::contains_tag(&text, tag) {
				text = insert_before_metadata(&tags::replace_tag(&text, tag, phrase), added);
			}
		}
		if tags::contains_tag(&text, "#frog") {
			text = tags::replace_tag(&text, "#frog", "#🐸");
		}
		text
	}

	async fn destination(&self, line: &str, invocation: &Invocation) -> Result<DocumentHandle> {
		if tags::contains_tag(line, &self.settings.overwrite) {
			return Ok(invocation.current.clone());
		}
		let own: Vec<ContextToken> = tags::line_context(line).iter().filter_map(|raw| ContextToken::parse(raw)).collect();
		let routed = self.router.translate_all(&own, &invocation.current).await;
		routed
			.into_iter()
			.next()
			.or_else(|| invocation.destinations.first().cloned())
			.map(|d| d.document)
			.ok_or_else(|| Error::UnresolvedDestination { subject: line.trim().to_string() })
	}
}

#[async_trait]
impl LineProcessor for TaskProcessor {
	fn name(&self) -> &'static str {
		"task"
	}

	fn aliases(&self) -> &[String] {
		&self.settings.aliases
	}

	#[instrument(skip(self, invocation), fields(current = %invocation.current))]
	async fn file(&self, line: &str, invocation: &Invocation) -> Result<String> {
		let destination = self.destination(line, invocation).await?;

		let without_overwrite = tags::remove_tag(line, &self.settings.overwrite);
		let preprocessed = self.preprocess(&without_overwrite).await;
		let task_line = tags::collapse_spaces(&strip_tags(&preprocessed, &self.settings.aliases));

		let anchor = self.services.anchor();
		let mut task = Task::parse(&task_line);
		task.add_context(invocation.block_context.iter().cloned());
		task.set_backlink(backlink(&invocation.new_document, &anchor));

		file_to_header(self.services.store.as_ref(), &destination, &self.settings.header, &task.to_string()).await?;

		let stripped = strip_tags(line, self.settings.aliases.iter().chain([&self.settings.overwrite]));
		Ok(tags::append_anchor(&stripped, &anchor))
	}
}
