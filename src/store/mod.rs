//! Document store abstraction.
//!
//! Everything the filing pipeline does to a vault goes through [`DocumentStore`], so the same
//! processors run against the filesystem ([`FsVault`]) and against memory in tests ([`MemoryStore`]).

mod fs;
mod memory;

use std::fmt;

use async_trait::async_trait;
pub use fs::FsVault;
pub use memory::MemoryStore;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A document in the vault, addressed by its vault-relative path (`folder/Name.md`).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DocumentHandle {
	path: String,
}

impl DocumentHandle {
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// File name without the `.md` extension, as used in `[[links]]`.
	pub fn stem(&self) -> &str {
		let name = self.path.rsplit('/').next().unwrap_or(&self.path);
		name.strip_suffix(".md").unwrap_or(name)
	}

	/// The containing folder, empty at the vault root.
	pub fn folder(&self) -> &str {
		self.path.rsplit_once('/').map_or("", |(folder, _)| folder)
	}
}

impl fmt::Display for DocumentHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path)
	}
}

/// The only two frontmatter fields routing looks at.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Frontmatter {
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub key: Option<String>,
}

/// A read-modify-write step, applied to the freshest contents inside the transaction.
pub type Edit<'a> = Box<dyn FnOnce(&str) -> String + Send + 'a>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn read(&self, doc: &DocumentHandle) -> Result<String>;

	/// Atomically replace the contents with `edit(current)`. Calls against the same document are serialized.
	async fn modify(&self, doc: &DocumentHandle, edit: Edit<'_>) -> Result<()>;

	/// Create a new document. Fails if it already exists.
	async fn create(&self, path: &str, contents: &str) -> Result<DocumentHandle>;

	async fn get(&self, path: &str) -> Option<DocumentHandle>;

	/// Resolve a link target (without `[[ ]]`) as written inside `source`.
	async fn resolve_link(&self, link: &str, source: &DocumentHandle) -> Option<DocumentHandle>;

	/// All documents, sorted by path.
	async fn documents(&self) -> Vec<DocumentHandle>;

	async fn frontmatter(&self, doc: &DocumentHandle) -> Result<Frontmatter>;
}

//==============================================================================
// Helpers shared by the implementations
//==============================================================================

/// Normalize a vault-relative path: forward slashes, no `.`/`..` segments, not escaping the root.
pub(crate) fn vault_path(path: &str) -> Result<String> {
	let mut parts: Vec<&str> = Vec::new();
	if path.starts_with('/') || path.starts_with('\\') {
		return Err(Error::InvalidPath(path.into()));
	}
	for segment in path.split(['/', '\\']) {
		match segment {
			"" | "." => {}
			".." =>
				if parts.pop().is_none() {
					return Err(Error::InvalidPath(path.into()));
				},
			s => parts.push(s),
		}
	}
	if parts.is_empty() {
		return Err(Error::InvalidPath(path.into()));
	}
	Ok(parts.join("/"))
}

/// Parse the leading `---` YAML block. Documents without one have empty frontmatter.
pub(crate) fn parse_frontmatter(text: &str, path: &str) -> Result<Frontmatter> {
	let Some(rest) = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n")) else {
		return Ok(Frontmatter::default());
	};
	let mut yaml = String::new();
	let mut closed = false;
	for line in rest.lines() {
		if line.trim_end() == "---" {
			closed = true;
			break;
		}
		yaml.push_str(line);
		yaml.push('\n');
	}
	if !closed || yaml.trim().is_empty() {
		return Ok(Frontmatter::default());
	}
	serde_yaml::from_str(&yaml).map_err(|source| Error::Frontmatter { path: path.to_string(), source })
}

/// Link resolution over a sorted document list: exact path, then relative to the source folder,
/// then the first document whose stem matches the last segment.
pub(crate) fn resolve_in(documents: &[DocumentHandle], link: &str, source: &DocumentHandle) -> Option<DocumentHandle> {
	let link = link.split('|').next().unwrap_or(link).trim();
	if link.is_empty() {
		return None;
	}
	let exists = |candidate: &str| documents.iter().find(|d| d.path() == candidate).cloned();

	let mut bases = vec![link.to_string()];
	if !source.folder().is_empty() {
		bases.push(format!("{}/{link}", source.folder()));
	}
	for base in &bases {
		let Ok(base) = vault_path(base) else { continue };
		if let Some(doc) = exists(&base).or_else(|| exists(&format!("{base}.md"))) {
			return Some(doc);
		}
	}

	let name = link.rsplit('/').next().unwrap_or(link);
	let name = name.strip_suffix(".md").unwrap_or(name);
	documents.iter().find(|d| d.stem() == name).cloned()
}
