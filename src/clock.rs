//! Host clocks.
//!
//! [`SystemClock`] counts milliseconds since it was created on the monotonic
//! `Instant` clock. [`ManualClock`] is advanced by hand; clones share the same
//! time, so a test can keep one handle while the panel owns another.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use gforce_common::{Clock, Millis};

/// Monotonic wall clock.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis { self.origin.elapsed().as_millis() as Millis }
}

/// Hand-driven clock for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(
        &self,
        now: Millis,
    ) {
        self.now.set(now);
    }

    pub fn advance(
        &self,
        by_ms: Millis,
    ) {
        self.now.set(self.now.get() + by_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis { self.now.get() }
}
