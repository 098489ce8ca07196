//! Injectable time source.
//!
//! The classifier and reaper never call `SystemTime::now()` directly — the
//! current epoch-seconds always comes through [`Clock`]. Tests inject
//! [`MockClock`] to drive reaper cycles deterministically.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock epoch in seconds, with fractional precision.
pub trait Clock: Send + Sync {
    /// Returns the current time as seconds since the Unix epoch.
    fn now_epoch(&self) -> f64;
}

/// The real clock, wrapping `SystemTime::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Test-only clock that the caller advances explicitly.
#[derive(Debug, Clone)]
pub struct MockClock(Arc<Mutex<f64>>);

impl MockClock {
    /// Creates a clock starting at `start`.
    pub fn new(start: f64) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    /// Pins the clock to `t`.
    pub fn set(&self, t: f64) {
        *self.0.lock().expect("mock clock mutex poisoned") = t;
    }

    /// Advances the clock by `delta`.
    pub fn advance(&self, delta: f64) {
        *self.0.lock().expect("mock clock mutex poisoned") += delta;
    }
}

impl Clock for MockClock {
    fn now_epoch(&self) -> f64 {
        *self.0.lock().expect("mock clock mutex poisoned")
    }
}
