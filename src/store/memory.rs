//! In-memory document store for tests.
//!
//! Stores every document in a map behind a mutex, so `modify` is trivially atomic. Writes to
//! selected documents can be made to fail to exercise the degrade-to-unchanged paths.

use std::{
	collections::{BTreeMap, HashSet},
	io,
	sync::Mutex,
};

use async_trait::async_trait;
use tracing::instrument;

use super::{DocumentHandle, DocumentStore, Edit, Frontmatter, parse_frontmatter, resolve_in, vault_path};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
	documents: Mutex<BTreeMap<String, String>>,
	failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed from `(path, contents)` pairs.
	pub fn with_documents<'a>(docs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
		let store = Self::new();
		{
			let mut map = store.documents.lock().unwrap();
			for (path, contents) in docs {
				map.insert(path.to_string(), contents.to_string());
			}
		}
		store
	}

	/// Current contents, bypassing the trait.
	pub fn contents(&self, path: &str) -> Option<String> {
		self.documents.lock().unwrap().get(path).cloned()
	}

	/// Make every subsequent `modify` of `path` fail.
	pub fn fail_writes_to(&self, path: &str) {
		self.failing.lock().unwrap().insert(path.to_string());
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn read(&self, doc: &DocumentHandle) -> Result<String> {
		self.contents(doc.path()).ok_or_else(|| Error::MissingDocument { path: doc.path().to_string() })
	}

	#[instrument(skip(self, edit), fields(path = %doc))]
	async fn modify(&self, doc: &DocumentHandle, edit: Edit<'_>) -> Result<()> {
		if self.failing.lock().unwrap().contains(doc.path()) {
			return Err(Error::transaction(doc.path(), io::Error::other("write refused")));
		}
		let mut map = self.documents.lock().unwrap();
		let current = map.get_mut(doc.path()).ok_or_else(|| Error::MissingDocument { path: doc.path().to_string() })?;
		*current = edit(current);
		tracing::debug!(target: "balderdash::store", "modified {doc}");
		Ok(())
	}

	async fn create(&self, path: &str, contents: &str) -> Result<DocumentHandle> {
		let path = vault_path(path)?;
		let mut map = self.documents.lock().unwrap();
		if map.contains_key(&path) {
			return Err(Error::transaction(&path, io::Error::from(io::ErrorKind::AlreadyExists)));
		}
		map.insert(path.clone(), contents.to_string());
		Ok(DocumentHandle::new(path))
	}

	async fn get(&self, path: &str) -> Option<DocumentHandle> {
		let path = vault_path(path).ok()?;
		self.documents.lock().unwrap().contains_key(&path).then(|| DocumentHandle::new(path))
	}

	async fn resolve_link(&self, link: &str, source: &DocumentHandle) -> Option<DocumentHandle> {
		resolve_in(&self.documents().await, link, source)
	}

	async fn documents(&self) -> Vec<DocumentHandle> {
		self.documents.lock().unwrap().keys().map(DocumentHandle::new).collect()
	}

	async fn frontmatter(&self, doc: &DocumentHandle) -> Result<Frontmatter> {
		let text = self.read(doc).await?;
		parse_frontmatter(&text, doc.path())
	}
}
