//! Clock abstraction keeping expiry arithmetic deterministic under test.

// self
use crate::_prelude::*;

/// A source of the current instant.
///
/// The manager consults its clock for every expiry decision, and the endpoint client uses it to
/// anchor `expires_in` seconds to an absolute timestamp at response receipt. Tests substitute
/// [`ManualClock`] for the system clock.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant according to this clock.
	fn now(&self) -> OffsetDateTime;
}

/// The system clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// A clock whose current instant is set by hand.
///
/// Clones are handles onto the same underlying instant, so a clone held by a
/// [`TokenManager`](crate::manager::TokenManager) observes later [`set`](Self::set) and
/// [`advance`](Self::advance) calls.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a manual clock starting at the provided instant.
	pub fn new(start: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(start)))
	}

	/// Replaces the clock's current instant.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}

	/// Moves the clock forward by the provided duration.
	pub fn advance(&self, delta: Duration) {
		let mut guard = self.0.lock();

		*guard += delta;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_clones_share_state() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let handle = clock.clone();

		clock.advance(Duration::seconds(90));

		assert_eq!(handle.now(), macros::datetime!(2025-01-01 00:01:30 UTC));

		handle.set(macros::datetime!(2025-06-01 12:00 UTC));

		assert_eq!(clock.now(), macros::datetime!(2025-06-01 12:00 UTC));
	}
}
