//! Filesystem-backed vault: every `.md` file under a root directory is a document.

use std::{
	collections::HashMap,
	io::{self, Write},
	path::{Path, PathBuf},
	sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use super::{DocumentHandle, DocumentStore, Edit, Frontmatter, parse_frontmatter, resolve_in, vault_path};
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct FsVault {
	root: PathBuf,
	/// One lock per document path, so concurrent `modify` calls on a document queue up.
	locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FsVault {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			locks: Mutex::new(HashMap::new()),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn absolute(&self, doc: &DocumentHandle) -> PathBuf {
		self.root.join(doc.path())
	}

	fn lock_for(&self, path: &str) -> Arc<tokio::sync::Mutex<()>> {
		let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		locks.entry(path.to_string()).or_default().clone()
	}
}

/// Write through a temp file in the same directory and rename over the target.
async fn write_atomic(path: PathBuf, contents: String) -> io::Result<()> {
	tokio::task::spawn_blocking(move || {
		let dir = path.parent().ok_or_else(|| io::Error::other("document has no parent directory"))?;
		let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
		tmp.write_all(contents.as_bytes())?;
		tmp.as_file().sync_all()?;
		tmp.persist(&path).map_err(|e| e.error)?;
		Ok::<_, io::Error>(())
	})
	.await
	.map_err(io::Error::other)?
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
	entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

#[async_trait]
impl DocumentStore for FsVault {
	async fn read(&self, doc: &DocumentHandle) -> Result<String> {
		match tokio::fs::read_to_string(self.absolute(doc)).await {
			Ok(text) => Ok(text),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::MissingDocument { path: doc.path().to_string() }),
			Err(e) => Err(Error::transaction(doc.path(), e)),
		}
	}

	#[instrument(skip(self, edit), fields(path = %doc))]
	async fn modify(&self, doc: &DocumentHandle, edit: Edit<'_>) -> Result<()> {
		let lock = self.lock_for(doc.path());
		let _guard = lock.lock().await;

		let current = self.read(doc).await?;
		let next = edit(&current);
		if next == current {
			tracing::debug!("no change");
			return Ok(());
		}
		write_atomic(self.absolute(doc), next).await.map_err(|e| Error::transaction(doc.path(), e))?;
		tracing::debug!(target: "balderdash::store", "wrote {doc}");
		Ok(())
	}

	#[instrument(skip(self, contents))]
	async fn create(&self, path: &str, contents: &str) -> Result<DocumentHandle> {
		let doc = DocumentHandle::new(vault_path(path)?);
		let absolute = self.absolute(&doc);
		if let Some(parent) = absolute.parent() {
			tokio::fs::create_dir_all(parent).await.map_err(|e| Error::transaction(doc.path(), e))?;
		}
		let mut file = tokio::fs::OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&absolute)
			.await
			.map_err(|e| Error::transaction(doc.path(), e))?;
		file.write_all(contents.as_bytes()).await.map_err(|e| Error::transaction(doc.path(), e))?;
		file.flush().await.map_err(|e| Error::transaction(doc.path(), e))?;
		tracing::info!(target: "balderdash::store", "created {doc}");
		Ok(doc)
	}

	async fn get(&self, path: &str) -> Option<DocumentHandle> {
		let doc = DocumentHandle::new(vault_path(path).ok()?);
		let meta = tokio::fs::metadata(self.absolute(&doc)).await.ok()?;
		meta.is_file().then_some(doc)
	}

	async fn resolve_link(&self, link: &str, source: &DocumentHandle) -> Option<DocumentHandle> {
		resolve_in(&self.documents().await, link, source)
	}

	async fn documents(&self) -> Vec<DocumentHandle> {
		let root = self.root.clone();
		let walked = tokio::task::spawn_blocking(move || {
			let mut docs: Vec<DocumentHandle> = walkdir::WalkDir::new(&root)
				.into_iter()
				.filter_entry(|e| !is_hidden(e))
				.filter_map(|e| e.ok())
				.filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "md"))
				.filter_map(|e| {
					let relative = e.path().strip_prefix(&root).ok()?;
					let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
					Some(DocumentHandle::new(parts.join("/")))
				})
				.collect();
			docs.sort();
			docs
		})
		.await;
		match walked {
			Ok(docs) => docs,
			Err(e) => {
				tracing::warn!("failed to enumerate {}: {e}", self.root.display());
				Vec::new()
			}
		}
	}

	async fn frontmatter(&self, doc: &DocumentHandle) -> Result<Frontmatter> {
		let text = self.read(doc).await?;
		parse_frontmatter(&text, doc.path())
	}
}
