//! Identifier generation for block ids and anchors.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::distr::{Alphanumeric, SampleString};

/// Length of the id a [`crate::Block`] is stamped with.
pub const BLOCK_ID_LEN: usize = 10;
/// Length of the `^<id>` anchor appended to filed lines.
pub const ANCHOR_LEN: usize = 6;

pub trait IdGenerator: Send + Sync {
	/// A fresh alphanumeric id of exactly `len` characters.
	fn generate(&self, len: usize) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
	fn generate(&self, len: usize) -> String {
		Alphanumeric.sample_string(&mut rand::rng(), len)
	}
}

/// Deterministic ids: `prefix` followed by a zero-padded counter, starting at 1.
///
/// `SequentialIds::new("id")` yields `id0001`, `id0002`, ... for `len == 6`.
#[derive(Debug)]
pub struct SequentialIds {
	prefix: String,
	next: AtomicU64,
}

impl SequentialIds {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			next: AtomicU64::new(1),
		}
	}
}

impl IdGenerator for SequentialIds {
	fn generate(&self, len: usize) -> String {
		let n = self.next.fetch_add(1, Ordering::Relaxed);
		let width = len.saturating_sub(self.prefix.len());
		let id = format!("{}{n:0width$}", self.prefix);
		// counter overflowed the width: keep the tail so the length stays exact
		id[id.len().saturating_sub(len)..].to_string()
	}
}
