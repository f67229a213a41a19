//! Cooperative display-sync and interval scheduling.
//!
//! The host runs a single logical thread. It asks the scheduler which
//! registrations are due and dispatches the resulting [`Wakeup`]s itself:
//!
//! - [`Scheduler::vsync`] drains one-shot frame requests on each display
//!   refresh (the requestAnimationFrame model: a loop re-arms by requesting
//!   the next frame from its handler).
//! - [`Scheduler::due`] returns fixed-period intervals whose deadline passed.
//!   Missed periods collapse into a single firing.
//!
//! # Scoped Registrations
//!
//! Registrations are represented by [`FrameRequest`] and [`IntervalTimer`]
//! handles that cancel themselves when dropped. Whoever owns the handle owns
//! the registration, so a component that drops its handles on teardown can
//! never leave a callback registered behind it. Dropping a frame handle that
//! already fired cancels nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gforce_common::Millis;
use log::trace;

/// Identifier of a frame request or interval timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A registration that became due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wakeup {
    /// Display refresh for a pending frame request.
    Frame(TimerId),
    /// Period elapsed for an interval timer.
    Interval(TimerId),
}

impl Wakeup {
    pub const fn id(self) -> TimerId {
        match self {
            Self::Frame(id) | Self::Interval(id) => id,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

struct IntervalEntry {
    id: TimerId,
    period_ms: Millis,
    next_due_ms: Millis,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    frames: Vec<TimerId>,
    intervals: Vec<IntervalEntry>,
}

impl Registry {
    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    fn cancel_frame(
        &mut self,
        id: TimerId,
    ) -> bool {
        let before = self.frames.len();
        self.frames.retain(|f| *f != id);
        self.frames.len() != before
    }

    fn clear_interval(
        &mut self,
        id: TimerId,
    ) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        self.intervals.len() != before
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Shared handle to the host's registration table. Clones share the table.
#[derive(Clone, Default)]
pub struct Scheduler {
    registry: Rc<RefCell<Registry>>,
}

impl Scheduler {
    pub fn new() -> Self { Self::default() }

    /// Register a callback for the next display refresh.
    pub fn request_frame(&self) -> FrameRequest {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.allocate();
            registry.frames.push(id);
            id
        };
        FrameRequest {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Register a callback every `period_ms`, first due at `now + period_ms`.
    ///
    /// A zero period is treated as 1 ms.
    pub fn set_interval(
        &self,
        period_ms: Millis,
        now: Millis,
    ) -> IntervalTimer {
        let period_ms = period_ms.max(1);
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.allocate();
            registry.intervals.push(IntervalEntry {
                id,
                period_ms,
                next_due_ms: now + period_ms,
            });
            id
        };
        IntervalTimer {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Display refresh: drain and return all pending frame requests.
    pub fn vsync(&self) -> Vec<Wakeup> {
        let frames = std::mem::take(&mut self.registry.borrow_mut().frames);
        frames.into_iter().map(Wakeup::Frame).collect()
    }

    /// Interval timers due at `now`. Each fires at most once per call.
    pub fn due(
        &self,
        now: Millis,
    ) -> Vec<Wakeup> {
        let mut registry = self.registry.borrow_mut();
        let mut fired = Vec::new();
        for entry in &mut registry.intervals {
            if entry.next_due_ms <= now {
                let missed = (now - entry.next_due_ms) / entry.period_ms;
                entry.next_due_ms += (missed + 1) * entry.period_ms;
                fired.push(Wakeup::Interval(entry.id));
            }
        }
        fired
    }

    /// Earliest interval deadline, if any interval is registered.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.registry.borrow().intervals.iter().map(|i| i.next_due_ms).min()
    }

    /// Number of frame requests waiting for the next refresh.
    pub fn pending_frames(&self) -> usize { self.registry.borrow().frames.len() }

    /// Number of registered interval timers.
    pub fn active_intervals(&self) -> usize { self.registry.borrow().intervals.len() }

    /// Total live registrations. Zero once every owner has been torn down.
    pub fn pending(&self) -> usize { self.pending_frames() + self.active_intervals() }
}

// =============================================================================
// Registration Handles
// =============================================================================

/// One-shot display-sync registration. Cancelled on drop if still pending.
#[must_use = "dropping a frame request cancels it"]
pub struct FrameRequest {
    id: TimerId,
    registry: Weak<RefCell<Registry>>,
}

impl FrameRequest {
    #[inline]
    pub const fn id(&self) -> TimerId { self.id }

    /// Whether the request is still waiting for a refresh.
    pub fn is_pending(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().frames.contains(&self.id))
    }
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade()
            && registry.borrow_mut().cancel_frame(self.id)
        {
            trace!("cancelled frame request {:?}", self.id);
        }
    }
}

/// Fixed-period registration. Cleared on drop.
#[must_use = "dropping an interval timer clears it"]
pub struct IntervalTimer {
    id: TimerId,
    registry: Weak<RefCell<Registry>>,
}

impl IntervalTimer {
    #[inline]
    pub const fn id(&self) -> TimerId { self.id }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade()
            && registry.borrow_mut().clear_interval(self.id)
        {
            trace!("cleared interval {:?}", self.id);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
