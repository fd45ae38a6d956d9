//! Error types for the filing pipeline.
//!
//! Uses miette for diagnostics. None of these abort a processing pass: processors catch them at
//! their boundary, log them and leave the line or block unchanged.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use std::path::PathBuf;

use miette::Diagnostic;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
	/// An expected document (current, resource, acronym) does not exist in the store.
	#[error("document not found: {path}")]
	#[diagnostic(code(balderdash::store::missing_document), help("create the file or point the settings at an existing one"))]
	MissingDocument { path: String },

	/// None of the context tokens resolved to a document and there was no fallback.
	#[error("no destination resolved for {subject:?}")]
	#[diagnostic(code(balderdash::route::unresolved), help("add a context link or tag whose document declares a `type` in its frontmatter"))]
	UnresolvedDestination { subject: String },

	/// A read or write against a document failed.
	#[error("transaction on {path} failed")]
	#[diagnostic(code(balderdash::store::transaction))]
	Transaction {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid frontmatter in {path}")]
	#[diagnostic(code(balderdash::store::frontmatter), help("frontmatter must be a YAML mapping between `---` lines"))]
	Frontmatter {
		path: String,
		#[source]
		source: serde_yaml::Error,
	},

	/// A document path escapes the vault or is otherwise unusable.
	#[error("invalid document path: {0}")]
	#[diagnostic(code(balderdash::store::invalid_path))]
	InvalidPath(PathBuf),

	#[error("failed to load settings")]
	#[diagnostic(code(balderdash::config))]
	Config(#[from] config::ConfigError),
}

impl Error {
	pub fn transaction(path: impl Into<String>, source: std::io::Error) -> Self {
		Self::Transaction { path: path.into(), source }
	}
}
