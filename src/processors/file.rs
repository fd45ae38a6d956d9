//! Re-files existing checklist lines by their own context.

use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use tracing::instrument;

use super::Services;
use crate::{
	config::TaskProcessorSettings,
	context::ContextRouter,
	section::file_to_header,
	store::DocumentHandle,
	task::Task,
};

static CHECKLIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[.\]").unwrap());

pub struct TaskFileProcessor {
	header: String,
	services: Services,
	router: ContextRouter,
}

impl TaskFileProcessor {
	pub fn new(settings: &TaskProcessorSettings, services: Services) -> Self {
		let router = ContextRouter::new(services.store.clone());
		Self {
			header: settings.header.clone(),
			services,
			router,
		}
	}

	/// `None` when the task was filed away and the line should disappear.
	#[instrument(skip(self), fields(current = %current))]
	pub async fn process(&self, line: &str, current: &DocumentHandle) -> Option<String> {
		if !CHECKLIST.is_match(line) {
			return Some(line.to_string());
		}
		let task = Task::parse(line);
		let serialized = task.to_string();
		let Some(destination) = self.router.translate_all(task.context(), current).await.into_iter().next() else {
			return Some(serialized);
		};
		match file_to_header(self.services.store.as_ref(), &destination.document, &self.header, &serialized).await {
			Ok(()) => None,
			Err(e) => {
				tracing::warn!("keeping {line:?}: {e}");
				Some(serialized)
			}
		}
	}

	/// Every line of `text`, with filed tasks removed.
	pub async fn process_text(&self, text: &str, current: &DocumentHandle) -> String {
		let lines = join_all(text.split('\n').map(|line| self.process(line, current))).await;
		lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
	}
}
