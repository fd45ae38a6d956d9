//! Cancelling open tasks in bulk.

use jiff::civil::Date;

use crate::{tags, task::MetadataGlyph};

const OPEN: &str = "- [ ]";
const CANCELLED: &str = "- [-]";

/// Which open tasks to cancel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CancelScope {
	#[default]
	All,
	/// Only lines tagged `#habit`.
	Habits,
}

/// Mark every open task in `text` cancelled as of `today`. Other lines are untouched.
pub fn cancel_tasks(text: &str, scope: CancelScope, today: Date) -> String {
	let mut cancelled = 0usize;
	let out = text
		.split('\n')
		.map(|line| {
			let selected = line.contains(OPEN) && (scope == CancelScope::All || tags::contains_tag(line, "#habit"));
			if !selected {
				return line.to_string();
			}
			cancelled += 1;
			format!("{} {} {today}", line.replacen(OPEN, CANCELLED, 1).trim_end(), MetadataGlyph::Cancelled)
		})
		.collect::<Vec<_>>()
		.join("\n");
	tracing::info!(?scope, "cancelled {cancelled} task(s)");
	out
}
