//! Header-scoped inserts into a document.
//!
//! New content always lands directly under its header, so the newest entry comes first. The header
//! is written once; merging under an existing header only replaces the header line and the blank
//! lines after it.

use regex::{NoExpand, Regex};
use tracing::instrument;

use crate::{
	error::Result,
	store::{DocumentHandle, DocumentStore},
};

/// Pure merge step: `existing` with `content` inserted under `header`.
pub fn merge(existing: &str, header: &str, content: &str) -> String {
	let header = header.trim();
	let content = format!("{}\n", content.trim_end_matches('\n'));

	let merged = if existing.trim().is_empty() {
		format!("{header}\n\n{content}")
	} else {
		// header line, then any run of whitespace-only lines
		let run = Regex::new(&format!(r"(?m)^{}[ \t]*(?:\r?\n[ \t]*)*(?:\r?\n|\z)", regex::escape(header)));
		match run {
			Ok(run) if run.is_match(existing) => run.replacen(existing, 1, NoExpand(&format!("{header}\n\n{content}"))).into_owned(),
			_ => format!("{}\n\n{header}\n\n{content}", existing.trim_end()),
		}
	};
	format!("{}\n\n", merged.trim_end())
}

/// Insert `content` under `header` in `doc` as one transaction on the freshest contents.
#[instrument(skip(store, content), fields(doc = %doc))]
pub async fn file_to_header(store: &dyn DocumentStore, doc: &DocumentHandle, header: &str, content: &str) -> Result<()> {
	store.modify(doc, Box::new(move |existing: &str| merge(existing, header, content))).await?;
	tracing::info!(target: "balderdash::filed", "filed under {header:?} in {doc}");
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::store::MemoryStore;

	#[test]
	fn test_merge_into_empty() {
		assert_eq!(merge("", "# Todo", "- [ ] a"), "# Todo\n\n- [ ] a\n\n");
		assert_eq!(merge("  \n\n", "# Todo", "- [ ] a"), "# Todo\n\n- [ ] a\n\n");
	}

	#[test]
	fn test_merge_newest_first() {
		let once = merge("", "# Todo", "- [ ] a");
		let twice = merge(&once, "# Todo", "- [ ] b");
		assert_eq!(twice, "# Todo\n\n- [ ] b\n- [ ] a\n\n");
		assert_eq!(twice.matches("# Todo").count(), 1);
	}

	#[test]
	fn test_merge_appends_missing_header() {
		let doc = "# Meeting\n\nSome notes\n";
		insta::assert_snapshot!(merge(doc, "# Todo", "- [ ] a"), @r"
		# Meeting

		Some notes

		# Todo

		- [ ] a
		");
	}

	#[test]
	fn test_merge_preserves_surrounding_content() {
		let doc = "intro\n\n# Todo\n\n\n- [ ] old\n\n# Other\n\nkeep me\n";
		insta::assert_snapshot!(merge(doc, "# Todo", "- [ ] new"), @r"
		intro

		# Todo

		- [ ] new
		- [ ] old

		# Other

		keep me
		");
	}

	#[test]
	fn test_merge_matches_whole_header_line() {
		let doc = "# Todo later\n\nx\n";
		let merged = merge(doc, "# Todo", "- [ ] a");
		assert!(merged.starts_with("# Todo later\n\nx\n\n# Todo\n\n- [ ] a"));

		// header at the very end, no trailing newline
		assert_eq!(merge("x\n\n# Todo", "# Todo", "- [ ] a"), "x\n\n# Todo\n\n- [ ] a\n\n");
		// indentation of the following line survives
		assert_eq!(merge("# Todo\n  - nested", "# Todo", "- a"), "# Todo\n\n- a\n  - nested\n\n");
	}

	#[test]
	fn test_merge_content_with_dollar_signs() {
		assert_eq!(merge("# Costs\n", "# Costs", "- $1 and $2"), "# Costs\n\n- $1 and $2\n\n");
	}

	#[tokio::test]
	async fn test_file_to_header_different_headers_same_document() {
		let store = Arc::new(MemoryStore::with_documents([("Notes.md", "# Notes\n")]));
		let doc = DocumentHandle::new("Notes.md");
		let (a, b) = tokio::join!(
			file_to_header(store.as_ref(), &doc, "# Todo", "- [ ] a"),
			file_to_header(store.as_ref(), &doc, "# Resources", "- r")
		);
		a.unwrap();
		b.unwrap();

		let text = store.contents("Notes.md").unwrap();
		assert!(text.contains("# Todo\n\n- [ ] a\n"));
		assert!(text.contains("# Resources\n\n- r\n"));
		assert!(text.ends_with("\n\n"));
	}
}
