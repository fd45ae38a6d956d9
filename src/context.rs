//! Context tokens and their routing to destination documents.
//!
//! A context token is a wikilink or a hashtag. Links resolve through the store's link resolution;
//! tags resolve to the first document whose frontmatter `key` names that tag. Either way, the
//! resolved document's frontmatter `type` decides its category, and categories decide the order
//! destinations are tried in.

use std::{fmt, sync::Arc};

use futures::future::join_all;
use tracing::instrument;

use crate::{
	store::{DocumentHandle, DocumentStore},
	tags,
};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ContextToken {
	/// `[[path]]`, `[[path#anchor]]` or `[[path|label]]`, kept verbatim.
	Link(String),
	/// `#name` or `#name/sub`.
	Tag(String),
}

impl ContextToken {
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();
		if raw.starts_with("[[") && raw.ends_with("]]") && raw.len() > 4 {
			Some(Self::Link(raw.to_string()))
		} else if raw.len() > 1 && raw.starts_with('#') && !raw.contains(char::is_whitespace) {
			Some(Self::Tag(raw.to_string()))
		} else {
			None
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Link(raw) | Self::Tag(raw) => raw,
		}
	}

	/// `#rel…` and `#role…` tags describe who or what a block relates to.
	pub fn is_relation_tag(&self) -> bool {
		matches!(self, Self::Tag(raw) if raw.starts_with("#rel") || raw.starts_with("#role"))
	}

	/// The bare target of a link: delimiters, `#anchor` and `|label` removed.
	pub fn linked_path(&self) -> Option<&str> {
		let Self::Link(raw) = self else { return None };
		let inner = &raw[2..raw.len() - 2];
		let inner = inner.split('|').next().unwrap_or(inner);
		Some(inner.split('#').next().unwrap_or(inner).trim())
	}
}

impl fmt::Display for ContextToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What a destination document is about, by the `type` in its frontmatter. Declaration order is priority.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, derive_more::Display)]
pub enum ContextCategory {
	#[display("#outcome")]
	Outcome,
	#[display("#community")]
	Community,
	#[display("#stakeholder")]
	Stakeholder,
	#[display("#role")]
	Role,
	/// No or unknown `type`; still routable, tried last.
	#[display("")]
	Unclassified,
}

impl ContextCategory {
	pub fn rank(self) -> u8 {
		match self {
			Self::Outcome => 1,
			Self::Community => 2,
			Self::Stakeholder => 3,
			Self::Role => 4,
			Self::Unclassified => 5,
		}
	}

	/// Accepts `outcome`, `#outcome`, `Outcome`; YAML needs the `#` form quoted.
	pub fn from_type(kind: Option<&str>) -> Self {
		let Some(kind) = kind else { return Self::Unclassified };
		match kind.trim().trim_start_matches('#').to_ascii_lowercase().as_str() {
			"outcome" => Self::Outcome,
			"community" => Self::Community,
			"stakeholder" => Self::Stakeholder,
			"role" => Self::Role,
			_ => Self::Unclassified,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Destination {
	pub document: DocumentHandle,
	pub category: ContextCategory,
	/// The token this destination was resolved from.
	pub token: ContextToken,
}

/// Control tags that never name a destination.
pub const NON_ROUTABLE_TAGS: &[&str] = &[
	"#meeting",
	"#action",
	"#action-here",
	"#deadline",
	"#follow-up",
	"#think-about",
	"#read",
	"#frog",
	"#🐸",
	"#key-date",
	"#here",
	"#recurring",
	"#habit",
];

pub struct ContextRouter {
	store: Arc<dyn DocumentStore>,
}

impl ContextRouter {
	pub fn new(store: Arc<dyn DocumentStore>) -> Self {
		Self { store }
	}

	fn is_routable(tag: &str) -> bool {
		!tags::is_duration_tag(tag) && !NON_ROUTABLE_TAGS.contains(&tag)
	}

	/// Resolve one token. `None` when nothing in the vault matches it.
	#[instrument(skip(self), fields(token = %token, source = %source))]
	pub async fn translate(&self, token: &ContextToken, source: &DocumentHandle) -> Option<Destination> {
		let document = match token {
			ContextToken::Link(_) => {
				let path = token.linked_path()?;
				self.store.resolve_link(path, source).await?
			}
			ContextToken::Tag(tag) => {
				if !Self::is_routable(tag) {
					return None;
				}
				self.find_by_key(tag).await?
			}
		};
		let frontmatter = match self.store.frontmatter(&document).await {
			Ok(fm) => fm,
			Err(e) => {
				tracing::warn!("skipping {document}: {e}");
				return None;
			}
		};
		let category = ContextCategory::from_type(frontmatter.kind.as_deref());
		tracing::debug!(%document, %category, "resolved");
		Some(Destination {
			document,
			category,
			token: token.clone(),
		})
	}

	async fn find_by_key(&self, tag: &str) -> Option<DocumentHandle> {
		let wanted = tag.trim_start_matches('#');
		for doc in self.store.documents().await {
			let Ok(frontmatter) = self.store.frontmatter(&doc).await else { continue };
			if frontmatter.key.as_deref().is_some_and(|key| key.trim().trim_start_matches('#') == wanted) {
				return Some(doc);
			}
		}
		None
	}

	/// Resolve every token, drop the unresolved ones, and order the rest by category (stable).
	pub async fn translate_all(&self, tokens: &[ContextToken], source: &DocumentHandle) -> Vec<Destination> {
		let resolved = join_all(tokens.iter().map(|t| self.translate(t, source))).await;
		let mut destinations: Vec<Destination> = resolved.into_iter().flatten().collect();
		destinations.sort_by_key(|d| d.category.rank());
		tracing::debug!(
			destinations = ?destinations.iter().map(|d| d.document.path()).collect::<Vec<_>>(),
			"routed {} of {} tokens",
			destinations.len(),
			tokens.len()
		);
		destinations
	}
}
