//! Logs a meeting block as a completed task in the current document.

use tracing::instrument;

use super::{Invocation, Services};
use crate::{
	block::Block,
	config::MeetingProcessorSettings,
	error::Result,
	section::file_to_header,
	tags,
	task::{DEFAULT_DURATION, Task},
};

pub struct MeetingProcessor {
	settings: MeetingProcessorSettings,
	services: Services,
}

impl MeetingProcessor {
	pub fn new(settings: MeetingProcessorSettings, services: Services) -> Self {
		Self { settings, services }
	}

	/// The completed task a meeting block is logged as.
	pub fn meeting_task(&self, block: &Block, invocation: &Invocation) -> Task {
		let duration = block.other_tags().iter().find_map(|tag| tags::find_duration(tag).map(|(_, minutes)| minutes)).unwrap_or(DEFAULT_DURATION);
		let mut task = Task::completed(block.header().title.clone(), duration);
		task.add_context(block.context().iter().cloned());
		task.set_backlink(format!("[[{}]]", invocation.new_document.path()));
		task
	}

	/// Files nothing unless the block is tagged with the meeting marker. The block itself is never changed.
	#[instrument(skip_all, fields(block = block.id()))]
	pub async fn process(&self, block: &Block, invocation: &Invocation) {
		if !block.contains_other_tag(&self.settings.marker) {
			return;
		}
		if let Err(e) = self.file(block, invocation).await {
			tracing::warn!("meeting not logged: {e}");
		}
	}

	async fn file(&self, block: &Block, invocation: &Invocation) -> Result<()> {
		let task = self.meeting_task(block, invocation);
		file_to_header(self.services.store.as_ref(), &invocation.current, &self.settings.header, &task.to_string()).await
	}
}
