//! Injectable time source.
//!
//! Production code holds a `SystemClock`; tests hold an `OffsetClock` they
//! can advance. No process-wide mock state.

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Nanoseconds since the Unix epoch.
    fn now_unix_nanos(&self) -> u64 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos() as u64
    }
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock offset from real time by a controllable amount.
#[derive(Debug, Default)]
pub struct OffsetClock {
    offset: Mutex<Duration>,
}

impl OffsetClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift this clock forward. Offsets accumulate.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }

    pub fn reset(&self) {
        *self.offset.lock().unwrap() = Duration::ZERO;
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> SystemTime {
        SystemTime::now() + *self.offset.lock().unwrap()
    }
}
