//! Ad hoc blocks of meeting or task notes.
//!
//! A block is split into a header (found anywhere in the text, or synthesized), a context window
//! made of the link and tag lines right after it, and the body. The context window is captured
//! once: as soon as a line of prose appears, every later line belongs to the body.

use std::future::Future;

use futures::future::join_all;
use jiff::civil::Date;

use crate::{
	Header,
	clock::Clock,
	context::ContextToken,
	ids::{BLOCK_ID_LEN, IdGenerator},
	tags,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockHeader {
	pub level: usize,
	pub title: String,
	/// The header line exactly as it appeared, or the synthesized one.
	pub raw: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
	id: String,
	header: BlockHeader,
	context: Vec<ContextToken>,
	other_tags: Vec<String>,
	body: String,
}

impl Block {
	pub fn parse(text: &str, ids: &dyn IdGenerator, clock: &dyn Clock) -> Self {
		let id = ids.generate(BLOCK_ID_LEN);
		let (header, rest) = extract_header(text, &id, clock.today());
		let (context, other_tags, body) = extract_context(&rest);
		tracing::debug!(%id, title = %header.title, context = context.len(), other_tags = ?other_tags, "parsed block");
		Self {
			id,
			header,
			context,
			other_tags,
			body,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn header(&self) -> &BlockHeader {
		&self.header
	}

	pub fn context(&self) -> &[ContextToken] {
		&self.context
	}

	pub fn other_tags(&self) -> &[String] {
		&self.other_tags
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn set_text(&mut self, body: impl Into<String>) {
		self.body = body.into();
	}

	pub fn contains_other_tag(&self, tag: &str) -> bool {
		self.other_tags.iter().any(|t| t == tag)
	}

	/// Replace every body line with `transform(line)`. Transforms run concurrently; the body is
	/// reassembled in the original line order.
	pub async fn map_each_line<F, Fut>(&mut self, transform: F)
	where
		F: FnMut(String) -> Fut,
		Fut: Future<Output = String>, {
		self.body = map_lines(&self.body, transform).await;
	}

	pub fn for_each_line(&self, mut callback: impl FnMut(usize, &str)) {
		for (index, line) in self.body.split('\n').enumerate() {
			callback(index, line);
		}
	}
}

/// Apply `transform` to every line of `text` concurrently and rejoin by index.
pub async fn map_lines<F, Fut>(text: &str, mut transform: F) -> String
where
	F: FnMut(String) -> Fut,
	Fut: Future<Output = String>, {
	let pending: Vec<Fut> = text.split('\n').map(|line| transform(line.to_string())).collect();
	join_all(pending).await.join("\n")
}

fn extract_header(text: &str, id: &str, today: Date) -> (BlockHeader, String) {
	let mut start = 0;
	for line in text.split('\n') {
		if let Some(header) = Header::decode(line) {
			let mut rest = text.to_string();
			rest.replace_range(start..start + line.len(), "");
			let header = BlockHeader {
				level: header.level,
				title: header.title,
				raw: line.trim_end_matches('\r').to_string(),
			};
			return (header, rest);
		}
		start += line.len() + 1;
	}
	let header = BlockHeader {
		level: 1,
		title: id.to_string(),
		raw: format!("# {today} - {id}"),
	};
	(header, text.to_string())
}

/// A line made only of links or tags. Headers start with `#` too but are prose: a sub-header
/// closes the context window, otherwise it would be taken for a tag and lost from the body.
fn is_context_line(trimmed: &str) -> bool {
	trimmed.starts_with("[[") || (trimmed.starts_with('#') && Header::decode(trimmed).is_none())
}

fn extract_context(text: &str) -> (Vec<ContextToken>, Vec<String>, String) {
	let mut context = Vec::new();
	let mut other_tags = Vec::new();
	let mut body = Vec::new();
	let mut capturing = true;

	for line in text.split('\n') {
		if capturing {
			let trimmed = line.trim();
			if trimmed.is_empty() {
				continue;
			}
			if is_context_line(trimmed) {
				context.extend(tags::wikilinks(trimmed).into_iter().filter_map(ContextToken::parse));
				for tag in tags::hashtags(trimmed) {
					match ContextToken::parse(&tag) {
						Some(token) if token.is_relation_tag() => context.push(token),
						_ => other_tags.push(tag),
					}
				}
				continue;
			}
			capturing = false;
		}
		body.push(line);
	}
	(context, other_tags, body.join("\n"))
}
