//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use verity_types::Timestamp;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Each [`NullClock::tick`] returns
/// the current time and then advances by one second, which gives articles
/// created in sequence distinct, increasing creation times.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    /// Return the current time, then advance by one second.
    pub fn tick(&self) -> Timestamp {
        Timestamp::new(self.current.fetch_add(1, Ordering::SeqCst))
    }

    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }
}
