//! Inline token scanning shared by the parsers and the processors.
//!
//! Tags are matched on token boundaries: `#read` never matches inside `#ready` or
//! `#resource-read`, and a tag must be preceded by whitespace or the start of the text.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[[^\[\]]+?\]\]").unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?:^|\s)(#[^\s#\[\]()<>,;:!?"']+)"#).unwrap());
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s)\^[A-Za-z0-9]{6,10}(?:\s|$)").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(" {2,}").unwrap());
static DURATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s)(#([0-9]{1,3})m)(?:\s|$)").unwrap());

/// Characters that terminate a hashtag.
fn is_tag_char(c: char) -> bool {
	!(c.is_whitespace() || matches!(c, '#' | '[' | ']' | '(' | ')' | '<' | '>' | ',' | ';' | ':' | '!' | '?' | '"' | '\''))
}

/// All wikilinks (`[[path]]`, `[[path#anchor]]`, `[[path|label]]`) in order of appearance.
pub fn wikilinks(text: &str) -> Vec<&str> {
	WIKILINK.find_iter(text).map(|m| m.as_str()).collect()
}

/// All hashtags in order of appearance. Anchors inside wikilinks (`[[file#section]]`) are not tags.
pub fn hashtags(text: &str) -> Vec<String> {
	let masked = WIKILINK.replace_all(text, " ");
	HASHTAG.captures_iter(&masked).map(|c| c[1].to_string()).collect()
}

/// Every link followed by every tag, the way a line's own context is collected.
pub fn line_context(text: &str) -> Vec<String> {
	let mut context: Vec<String> = wikilinks(text).into_iter().map(str::to_string).collect();
	context.extend(hashtags(text));
	context
}

/// Byte ranges of `tag` occurrences that stand on token boundaries.
fn tag_spans(text: &str, tag: &str) -> Vec<Range<usize>> {
	if tag.is_empty() {
		return Vec::new();
	}
	text.match_indices(tag)
		.filter(|(start, _)| {
			let end = start + tag.len();
			let before = text[..*start].chars().next_back().is_none_or(char::is_whitespace);
			let after = text[end..].chars().next().is_none_or(|c| !is_tag_char(c));
			before && after
		})
		.map(|(start, _)| start..start + tag.len())
		.collect()
}

pub fn contains_tag(text: &str, tag: &str) -> bool {
	!tag_spans(text, tag).is_empty()
}

/// Remove every occurrence of `tag` together with one adjacent space, so no double spaces are left.
pub fn remove_tag(text: &str, tag: &str) -> String {
	let mut out = text.to_string();
	for span in tag_spans(text, tag).into_iter().rev() {
		let (start, end) = if out[span.end..].starts_with(' ') {
			(span.start, span.end + 1)
		} else if out[..span.start].ends_with(' ') {
			(span.start - 1, span.end)
		} else {
			(span.start, span.end)
		};
		out.replace_range(start..end, "");
	}
	out
}

/// Replace every occurrence of `tag` with `with`.
pub fn replace_tag(text: &str, tag: &str, with: &str) -> String {
	let mut out = text.to_string();
	for span in tag_spans(text, tag).into_iter().rev() {
		out.replace_range(span, with);
	}
	out
}

/// Whether the line already carries a `^<id>` block anchor, i.e. it has been filed before.
pub fn has_anchor(line: &str) -> bool {
	ANCHOR.is_match(line)
}

pub fn append_anchor(line: &str, anchor: &str) -> String {
	format!("{} ^{anchor}", line.trim_end())
}

/// The first `#<1-3 digits>m` duration tag: its byte range and the minutes it carries.
pub fn find_duration(text: &str) -> Option<(Range<usize>, u32)> {
	let caps = DURATION.captures(text)?;
	let tag = caps.get(1)?;
	let minutes = caps[2].parse().ok()?;
	Some((tag.range(), minutes))
}

pub fn is_duration_tag(tag: &str) -> bool {
	find_duration(tag).is_some_and(|(range, _)| range.len() == tag.len())
}

/// Collapse runs of spaces left behind after removing tokens.
pub fn collapse_spaces(text: &str) -> String {
	SPACE_RUN.replace_all(text, " ").into_owned()
}
