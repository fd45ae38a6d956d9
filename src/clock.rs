//! Current-date provider.
//!
//! Everything that stamps a date onto a filed entry asks a [`Clock`] instead of reading the system
//! time directly, so tests can pin "today".

use jiff::{Zoned, civil::Date};
use tracing::instrument;

pub trait Clock: Send + Sync {
	fn today(&self) -> Date;
}

/// Local calendar date of the running system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn today(&self) -> Date {
		Zoned::now().date()
	}
}

/// A clock stuck on one date.
#[derive(Clone, Copy, Debug, derive_new::new)]
pub struct FixedClock {
	date: Date,
}

impl Clock for FixedClock {
	#[instrument(name = "FixedClock::today")]
	fn today(&self) -> Date {
		tracing::debug!(date = %self.date, "returning fixed date");
		self.date
	}
}
