//! Wall-clock time source, injected wherever durations are computed.

use std::time::{SystemTime, UNIX_EPOCH};

/// Provider of the current wall-clock time in epoch millis.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A hand-advanced clock for deterministic tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(now_millis: u64) -> Self {
        let clock = Self::default();
        clock.set(now_millis);
        clock
    }

    pub fn set(&self, now_millis: u64) {
        self.now
            .store(now_millis, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now
            .fetch_add(millis, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}
