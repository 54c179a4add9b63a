//! Retry scheduling for failed image loads

use std::time::Duration;

/// Linear backoff between load attempts.
///
/// After the `n`-th consecutive failure the next attempt waits `base_delay × n`,
/// so the default schedule is 1s, 2s, 3s, ...
///
/// ```
/// use grappelli_pages::lazy_load::LinearBackoff;
/// use std::time::Duration;
///
/// let backoff = LinearBackoff::default();
/// assert_eq!(backoff.delay_after(1), Duration::from_secs(1));
/// assert_eq!(backoff.delay_after(2), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
	/// Base delay that increases linearly
	pub base_delay: Duration,
}

impl LinearBackoff {
	pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

	pub fn new(base_delay: Duration) -> Self {
		Self { base_delay }
	}

	/// Delay before the next attempt, given the number of failures so far.
	pub fn delay_after(&self, failures: u32) -> Duration {
		self.base_delay.saturating_mul(failures)
	}
}

impl Default for LinearBackoff {
	fn default() -> Self {
		Self::new(Self::DEFAULT_BASE_DELAY)
	}
}
