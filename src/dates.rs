//! Natural-language date extraction.
//!
//! The pipeline only depends on the [`DateExtractor`] seam. [`KeywordDates`] is the built-in
//! implementation: it understands ISO dates and a handful of relative phrases, which covers how
//! due dates are actually written in meeting notes.

use std::sync::LazyLock;

use async_trait::async_trait;
use jiff::{
	ToSpan,
	civil::{Date, Weekday},
};
use regex::{Captures, Regex};
use tracing::instrument;

use crate::{tags, task::MetadataGlyph};

#[async_trait]
pub trait DateExtractor: Send + Sync {
	/// The first date mentioned in `text`, resolved against `reference`. Relative phrases
	/// resolve forward (a bare weekday means the next one, today included).
	async fn extract(&self, text: &str, reference: Date) -> Option<Date>;
}

static PHRASE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?i)\b(?:(?P<iso>\d{4}-\d{2}-\d{2})|(?P<today>today)|(?P<tomorrow>tomorrow)|(?P<next_week>next week)|in (?P<n>\d{1,3}) (?P<unit>days?|weeks?)|(?P<weekday>monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b",
	)
	.unwrap()
});

#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordDates;

impl KeywordDates {
	fn resolve(caps: &Captures<'_>, reference: Date) -> Option<Date> {
		if let Some(iso) = caps.name("iso") {
			return iso.as_str().parse().ok();
		}
		if caps.name("today").is_some() {
			return Some(reference);
		}
		if caps.name("tomorrow").is_some() {
			return reference.checked_add(1.day()).ok();
		}
		if caps.name("next_week").is_some() {
			return reference.checked_add(1.week()).ok();
		}
		if let (Some(n), Some(unit)) = (caps.name("n"), caps.name("unit")) {
			let n: i64 = n.as_str().parse().ok()?;
			let days = if unit.as_str().to_ascii_lowercase().starts_with("week") { n * 7 } else { n };
			return reference.checked_add(days.days()).ok();
		}
		let weekday = match caps.name("weekday")?.as_str().to_ascii_lowercase().as_str() {
			"monday" => Weekday::Monday,
			"tuesday" => Weekday::Tuesday,
			"wednesday" => Weekday::Wednesday,
			"thursday" => Weekday::Thursday,
			"friday" => Weekday::Friday,
			"saturday" => Weekday::Saturday,
			_ => Weekday::Sunday,
		};
		let ahead = (weekday.to_monday_zero_offset() - reference.weekday().to_monday_zero_offset()).rem_euclid(7);
		reference.checked_add(i64::from(ahead).days()).ok()
	}
}

#[async_trait]
impl DateExtractor for KeywordDates {
	#[instrument(skip(self))]
	async fn extract(&self, text: &str, reference: Date) -> Option<Date> {
		// links to daily notes and existing metadata are not due dates
		let name = match MetadataGlyph::boundary(text) {
			Some(at) => &text[..at],
			None => text,
		};
		let mut cleaned = name.to_string();
		for link in tags::wikilinks(name) {
			cleaned = cleaned.replace(link, " ");
		}

		let found = PHRASE.captures_iter(&cleaned).find_map(|caps| Self::resolve(&caps, reference));
		tracing::debug!(?found, "date extraction");
		found
	}
}
