//! Files links to documents, decks, pages and the like.
//!
//! A resource line goes into the current document under the resource header, and into the
//! resource document once per matching alias, under a header named after the alias
//! (`#resource-pdf` files under `# resource-pdf`).

use async_trait::async_trait;
use tracing::instrument;

use super::{Invocation, LineProcessor, Services, backlink, strip_tags};
use crate::{config::ResourceProcessorSettings, error::Result, section::file_to_header, tags};

pub struct ResourceProcessor {
	settings: ResourceProcessorSettings,
	services: Services,
}

/// `- {date} - {line without aliases}{backlink}`.
pub(crate) fn filed_entry(line: &str, aliases: &[String], date: impl std::fmt::Display, link: &str) -> String {
	let content = strip_tags(line.trim(), aliases);
	let content = content.strip_prefix("- ").unwrap_or(&content).trim();
	format!("- {date} - {content}{link}")
}

impl ResourceProcessor {
	pub fn new(settings: ResourceProcessorSettings, services: Services) -> Self {
		Self { settings, services }
	}
}

#[async_trait]
impl LineProcessor for ResourceProcessor {
	fn name(&self) -> &'static str {
		"resource"
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

		let Some(resources) = &invocation.resource_document else {
			tracing::warn!(file = %self.settings.file, "resource document missing; filed into the current document only");
			return Ok(tags::append_anchor(&strip_tags(line, &self.settings.aliases), &anchor));
		};
		for alias in self.settings.aliases.iter().filter(|alias| tags::contains_tag(line, alias)) {
			let header = alias.replacen('#', "# ", 1);
			if let Err(e) = file_to_header(store, resources, &header, &entry).await {
				tracing::warn!("could not file into {resources} under {header:?}: {e}");
			}
		}

		Ok(tags::append_anchor(&strip_tags(line, &self.settings.aliases), &anchor))
	}
}
