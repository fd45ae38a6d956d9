//! Parses ad hoc markdown blocks into structured records and files derived
//! entries (tasks, resources, acronyms, meeting logs) into other documents of
//! a vault, keeping every edit idempotent.

pub mod block;
pub mod cancel;
pub mod clock;
pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod ids;
pub mod pipeline;
pub mod processors;
pub mod section;
pub mod store;
pub mod tags;
pub mod task;

pub use block::{Block, BlockHeader};
pub use cancel::{CancelScope, cancel_tasks};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Settings;
pub use context::{ContextCategory, ContextRouter, ContextToken, Destination};
pub use dates::{DateExtractor, KeywordDates};
pub use error::{Error, Result};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use pipeline::{BlockOutcome, Pipeline};
pub use processors::{Invocation, LineProcessor, Services};
pub use section::file_to_header;
pub use store::{DocumentHandle, DocumentStore, Frontmatter, FsVault, MemoryStore};
pub use task::{DateField, MetadataGlyph, Task, TaskDates, TaskPriority};

/// An ATX markdown header: `# Title` through `###### Title`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
	pub level: usize,
	pub title: String,
}

impl Header {
	/// Create a new header with the given level and title.
	/// Level is clamped to 1..=6.
	pub fn new(level: usize, title: impl Into<String>) -> Self {
		debug_assert!((1..=6).contains(&level), "Header level must be within 1..=6");
		Self {
			level: level.clamp(1, 6),
			title: title.into(),
		}
	}

	/// Decode a header from a single line.
	///
	/// The line must start with 1-6 `#` characters followed by at least one space or tab and a
	/// non-empty title. Leading whitespace is not allowed, so indented text never counts.
	pub fn decode(line: &str) -> Option<Self> {
		let level = line.chars().take_while(|c| *c == '#').count();
		if !(1..=6).contains(&level) {
			return None;
		}
		let rest = &line[level..];
		if !rest.starts_with([' ', '\t']) {
			return None;
		}
		let title = rest.trim();
		if title.is_empty() {
			return None;
		}
		Some(Self { level, title: title.to_string() })
	}

	/// Encode the header back to a markdown line.
	pub fn encode(&self) -> String {
		format!("{} {}", "#".repeat(self.level), self.title)
	}
}
