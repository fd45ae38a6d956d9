//! Files acronym definitions into the current document and the acronym glossary.

use async_trait::async_trait;
use tracing::instrument;

use super::{Invocation, LineProcessor, Services, backlink, resource::filed_entry, strip_tags};
use crate::{config::AcronymProcessorSettings, error::Result, section::file_to_header, tags};

pub struct AcronymProcessor {
	settings: AcronymProcessorSettings,
	services: Services,
}

impl AcronymProcessor {
	pub fn new(settings: AcronymProcessorSettings, services: Services) -> Self {
		Self { settings, services }
	}
}

#[async_trait]
impl LineProcessor for AcronymProcessor {
	fn name(&self) -> &'static str {
		"acronym"
	}

	fn aliases(&self) -> &[String] {
		&self.settings.aliases
	}

	#[instrument(skip(self, invocation), fields(current = %invocation.current))]
	async fn file(&self, line: &str, invocation: &Invocation) -> Result<String> {
		let anchor = self.services.anchor();
		let entry = filed_entry(line, &self.settings.aliases, self.services.clock.today(), &backlink(&invocation.new_document, &anchor));
		let store = self.services.store.as_ref();

		file_to_header(store, &invocation.current, &self.settings.header, &entry).await?;
		match &invocation.acronym_document {
			Some(glossary) =>
				if let Err(e) = file_to_header(store, glossary, &self.settings.header, &entry).await {
					tracing::warn!("could not file into {glossary}: {e}");
				},
			None => tracing::warn!(file = %self.settings.file, "acronym document missing; filed into the current document only"),
		}

		Ok(tags::append_anchor(&strip_tags(line, &self.settings.aliases), &anchor))
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::{
		processors::test_support::{invocation, services},
		store::MemoryStore,
	};

	#[tokio::test]
	async fn test_files_into_both_documents() {
		let store = Arc::new(MemoryStore::with_documents([("Current.md", "# Sync\n\nnotes\n"), ("Acronyms.md", "# Acronyms\n\n- 2024-01-01 - OKR - objectives and key results\n")]));
		let p = AcronymProcessor::new(AcronymProcessorSettings::default(), services(store.clone()));

		let out = p.process("- SLO - service level objective #acronym".into(), &invocation()).await;
		assert_eq!(out, "- SLO - service level objective ^a00001");

		insta::assert_snapshot!(store.contents("Acronyms.md").unwrap(), @r"
		# Acronyms

		- 2024-05-29 - SLO - service level objective[[meetings/Sync.md#^a00001|🖇️]]
		- 2024-01-01 - OKR - objectives and key results
		");
		assert!(store.contents("Current.md").unwrap().ends_with("# Acronyms\n\n- 2024-05-29 - SLO - service level objective[[meetings/Sync.md#^a00001|🖇️]]\n\n"));
	}

	#[tokio::test]
	async fn test_glossary_failure_does_not_block_current() {
		let store = Arc::new(MemoryStore::with_documents([("Current.md", ""), ("Acronyms.md", "")]));
		store.fail_writes_to("Acronyms.md");
		let p = AcronymProcessor::new(AcronymProcessorSettings::default(), services(store.clone()));

		let out = p.process("- TLA #acronym".into(), &invocation()).await;
		assert_eq!(out, "- TLA ^a00001");
		assert!(store.contents("Current.md").unwrap().contains("- 2024-05-29 - TLA[["));
		assert_eq!(store.contents("Acronyms.md").as_deref(), Some(""));
	}
}
