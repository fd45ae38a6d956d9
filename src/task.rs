//! Checklist task lines.
//!
//! A task line looks like
//! `- [ ] Call Bob [[project]] #30m [[meetings/Sync#^ab12cd|🖇️]] ⏫ 📅 2024-01-15`:
//! checkbox, name (which may carry context links and tags), an optional duration tag,
//! an optional backlink, and a metadata suffix that starts at the first metadata glyph.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use jiff::civil::Date;
use regex::Regex;

use crate::{context::ContextToken, tags};

pub const DEFAULT_DURATION: u32 = 15;

static CHECKBOX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]\s+)?(?:\[(.)\]\s*)?").unwrap());
static COMPLETE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+\[[xX]\]").unwrap());
static BACKLINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[[^\[\]]*?(?:\|\s?🖇\x{FE0F}?\]\]|\]\]\s?🖇\x{FE0F}?)").unwrap());

/// Glyphs that carry a value in the metadata suffix.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MetadataGlyph {
	Due,
	Start,
	Scheduled,
	Created,
	Done,
	Recurrence,
	Id,
	DependsOn,
	Cancelled,
}

impl MetadataGlyph {
	pub const ALL: [MetadataGlyph; 9] = [
		MetadataGlyph::Due,
		MetadataGlyph::Start,
		MetadataGlyph::Scheduled,
		MetadataGlyph::Created,
		MetadataGlyph::Done,
		MetadataGlyph::Recurrence,
		MetadataGlyph::Id,
		MetadataGlyph::DependsOn,
		MetadataGlyph::Cancelled,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			MetadataGlyph::Due => "📅",
			MetadataGlyph::Start => "🛫",
			MetadataGlyph::Scheduled => "⏳",
			MetadataGlyph::Created => "➕",
			MetadataGlyph::Done => "✅",
			MetadataGlyph::Recurrence => "🔁",
			MetadataGlyph::Id => "🆔",
			MetadataGlyph::DependsOn => "⛔",
			MetadataGlyph::Cancelled => "❌",
		}
	}

	/// Byte offset of the first metadata or priority glyph, i.e. where a task name ends.
	pub fn boundary(text: &str) -> Option<usize> {
		let glyphs = Self::ALL.iter().map(|g| g.as_str()).chain(TaskPriority::GLYPHS.iter().map(|(_, g)| *g));
		glyphs.filter_map(|g| text.find(g)).min()
	}

	/// The value following this glyph in `suffix`: the run of non-whitespace after it.
	fn value_in(self, suffix: &str) -> Option<String> {
		let at = suffix.find(self.as_str())?;
		let rest = suffix[at + self.as_str().len()..].trim_start_matches('\u{FE0F}').trim_start();
		let value: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
		(!value.is_empty()).then_some(value)
	}
}

impl fmt::Display for MetadataGlyph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, derive_more::Display)]
pub enum TaskPriority {
	#[display("🔺")]
	Highest,
	#[display("⏫")]
	High,
	#[default]
	#[display("")]
	Normal,
	#[display("🔽")]
	Low,
	#[display("🔼")]
	Medium,
	#[display("⏬")]
	Lowest,
}

impl TaskPriority {
	const GLYPHS: [(TaskPriority, &'static str); 5] = [
		(TaskPriority::Highest, "🔺"),
		(TaskPriority::High, "⏫"),
		(TaskPriority::Medium, "🔼"),
		(TaskPriority::Low, "🔽"),
		(TaskPriority::Lowest, "⏬"),
	];

	/// The first priority glyph anywhere in `line`.
	fn find(line: &str) -> Self {
		Self::GLYPHS
			.iter()
			.filter_map(|(p, g)| line.find(g).map(|at| (at, *p)))
			.min_by_key(|(at, _)| *at)
			.map(|(_, p)| p)
			.unwrap_or_default()
	}
}

/// A date stored in task metadata, parsed once when the task is built.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum DateField {
	#[default]
	Absent,
	Valid(Date),
	/// Present but not a `YYYY-MM-DD` date; keeps the raw value.
	Invalid(String),
}

impl DateField {
	fn from_value(value: Option<&String>) -> Self {
		match value {
			None => DateField::Absent,
			Some(raw) => match raw.parse::<Date>() {
				Ok(date) => DateField::Valid(date),
				Err(_) => DateField::Invalid(raw.clone()),
			},
		}
	}

	pub fn date(&self) -> Option<Date> {
		match self {
			DateField::Valid(date) => Some(*date),
			_ => None,
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, DateField::Valid(_))
	}
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TaskDates {
	pub due: DateField,
	pub start: DateField,
	pub scheduled: DateField,
	pub created: DateField,
	pub done: DateField,
	pub cancelled: DateField,
}

impl TaskDates {
	fn from_metadata(metadata: &BTreeMap<MetadataGlyph, String>) -> Self {
		let field = |glyph| DateField::from_value(metadata.get(&glyph));
		Self {
			due: field(MetadataGlyph::Due),
			start: field(MetadataGlyph::Start),
			scheduled: field(MetadataGlyph::Scheduled),
			created: field(MetadataGlyph::Created),
			done: field(MetadataGlyph::Done),
			cancelled: field(MetadataGlyph::Cancelled),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
	complete: bool,
	name: String,
	priority: TaskPriority,
	duration: u32,
	metadata: BTreeMap<MetadataGlyph, String>,
	/// The metadata suffix exactly as written, re-emitted on serialization.
	suffix: String,
	backlink: String,
	context: Vec<ContextToken>,
	dates: TaskDates,
}

impl Task {
	pub fn parse(line: &str) -> Self {
		let mut working = line.to_string();

		let backlink = BACKLINK.find(line).map(|m| m.as_str().to_string()).unwrap_or_default();
		if !backlink.is_empty() {
			working = working.replacen(&backlink, "", 1);
		}

		let duration = match tags::find_duration(&working) {
			Some((range, minutes)) => {
				working.replace_range(range, "");
				minutes
			}
			None => DEFAULT_DURATION,
		};
		let working = tags::collapse_spaces(&working);

		let prefix_len = CHECKBOX.find(&working).map_or(0, |m| m.end());
		let rest = &working[prefix_len..];
		let (name, suffix) = match MetadataGlyph::boundary(rest) {
			Some(at) => (rest[..at].trim(), rest[at..].trim()),
			None => (rest.trim(), ""),
		};
		let name = if name.is_empty() { "No name" } else { name };

		let metadata: BTreeMap<_, _> = MetadataGlyph::ALL.iter().filter_map(|g| g.value_in(suffix).map(|v| (*g, v))).collect();
		let mut task = Self {
			complete: COMPLETE.is_match(line),
			name: name.to_string(),
			priority: TaskPriority::find(line),
			duration,
			dates: TaskDates::from_metadata(&metadata),
			metadata,
			suffix: suffix.to_string(),
			backlink,
			context: Vec::new(),
		};
		task.add_context(tags::line_context(name).iter().filter_map(|raw| ContextToken::parse(raw)));
		task
	}

	/// A finished task with no metadata, as logged for a meeting.
	pub fn completed(name: impl Into<String>, duration: u32) -> Self {
		Self {
			complete: true,
			name: name.into(),
			priority: TaskPriority::Normal,
			duration,
			metadata: BTreeMap::new(),
			suffix: String::new(),
			backlink: String::new(),
			context: Vec::new(),
			dates: TaskDates::default(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_complete(&self) -> bool {
		self.complete
	}

	pub fn priority(&self) -> TaskPriority {
		self.priority
	}

	/// Minutes; 15 unless a `#<n>m` tag said otherwise.
	pub fn duration(&self) -> u32 {
		self.duration
	}

	pub fn metadata(&self) -> &BTreeMap<MetadataGlyph, String> {
		&self.metadata
	}

	pub fn backlink(&self) -> &str {
		&self.backlink
	}

	pub fn set_backlink(&mut self, link: impl Into<String>) {
		self.backlink = link.into();
	}

	pub fn context(&self) -> &[ContextToken] {
		&self.context
	}

	/// Union `tokens` into the context, keeping first-seen order.
	pub fn add_context<I>(&mut self, tokens: I)
	where
		I: IntoIterator<Item = ContextToken>, {
		for token in tokens {
			if !self.context.contains(&token) {
				self.context.push(token);
			}
		}
	}

	pub fn dates(&self) -> &TaskDates {
		&self.dates
	}

	/// Creation date, or `today` when the task does not record a valid one.
	pub fn created_on(&self, today: Date) -> Date {
		self.dates.created.date().unwrap_or(today)
	}

	/// Whether the task has a valid due date on or before `today`.
	pub fn is_due(&self, today: Date) -> bool {
		self.dates.due.date().is_some_and(|due| due <= today)
	}
}

impl fmt::Display for Task {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut line = format!("- [{}] {}", if self.complete { 'x' } else { ' ' }, self.name);
		for token in &self.context {
			if !line.contains(token.as_str()) {
				line.push(' ');
				line.push_str(token.as_str());
			}
		}
		line.push_str(&format!(" #{}m", self.duration));
		if !self.backlink.is_empty() {
			line.push(' ');
			line.push_str(&self.backlink);
		}
		if !self.suffix.is_empty() {
			line.push(' ');
			line.push_str(&self.suffix);
		}
		f.write_str(line.trim())
	}
}
