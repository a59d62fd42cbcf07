use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the chain's notion of "now", in unix seconds.
///
/// The engine reads time exactly once per transition, so a single
/// operation never observes two different clocks. Expiry and claim
/// staleness are the only time-dependent rules; both are testable by
/// swapping in a [`ManualTimeSource`].
pub trait TimeSource: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Wall-clock time source for production use.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs() as i64
    }
}

/// Settable time source for tests and embedding.
pub struct ManualTimeSource {
    now: AtomicI64,
}

impl ManualTimeSource {
    /// Create a manual clock starting at `start` unix seconds.
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Advance by a number of seconds.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
