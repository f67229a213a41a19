//! Mounted trajectory view.
//!
//! Binds a [`TraceCanvas`] to a draw surface, a clock and the host
//! [`Scheduler`]. While mounted the view owns exactly two registrations:
//!
//! - a display-sync frame request, re-armed every time it fires, that
//!   redraws the trace as of the moment the frame runs
//! - a [`PRUNE_INTERVAL_MS`] interval that runs a prune pass on the store
//!
//! Both are released by [`TrajectoryView::unmount`]. A frame that fires while
//! no surface is attached is skipped, but the loop keeps itself armed.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use gforce_common::config::PRUNE_INTERVAL_MS;
use gforce_common::{Clock, Sample, Trace, TraceCanvas, TraceConfig, TraceError, TraceStore};
use log::{debug, trace};

use crate::scheduler::{FrameRequest, IntervalTimer, Scheduler, Wakeup};

/// Render and prune counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
    pub prune_passes: u64,
    pub samples_pruned: u64,
    /// Markers drawn by the most recent frame.
    pub last_markers: usize,
}

pub struct TrajectoryView<S, C> {
    canvas: TraceCanvas,
    clock: C,
    scheduler: Scheduler,
    surface: Option<S>,
    frame: FrameRequest,
    prune: IntervalTimer,
    stats: ViewStats,
}

impl<S, C> TrajectoryView<S, C>
where
    S: DrawTarget<Color = Rgb565>,
    C: Clock,
{
    /// Attach to `surface` and start the frame loop and the prune interval.
    pub fn mount(
        config: TraceConfig,
        surface: S,
        clock: C,
        scheduler: &Scheduler,
    ) -> Self {
        let now = clock.now_ms();
        let frame = scheduler.request_frame();
        let prune = scheduler.set_interval(PRUNE_INTERVAL_MS, now);
        debug!(
            "trajectory mounted: size {} window {} ms at t={now}",
            config.size, config.duration_ms
        );

        Self {
            canvas: TraceCanvas::new(config),
            clock,
            scheduler: scheduler.clone(),
            surface: Some(surface),
            frame,
            prune,
            stats: ViewStats::default(),
        }
    }

    #[inline]
    pub const fn config(&self) -> &TraceConfig { self.canvas.config() }

    #[inline]
    pub const fn stats(&self) -> ViewStats { self.stats }

    #[inline]
    pub fn now_ms(&self) -> gforce_common::Millis { self.clock.now_ms() }

    pub fn set_duration(
        &mut self,
        duration_ms: u32,
    ) {
        self.canvas.set_duration(duration_ms);
    }

    pub fn set_point_color(
        &mut self,
        color: Rgb565,
    ) {
        self.canvas.set_point_color(color);
    }

    // =========================================================================
    // Control Surface
    // =========================================================================

    /// Append a sample stamped with the current clock reading.
    pub fn add_point<T: TraceStore>(
        &self,
        store: &mut T,
        x: f32,
        y: f32,
    ) -> Result<Sample, TraceError> {
        self.canvas.add_point(store, x, y, self.clock.now_ms())
    }

    pub fn clear_points<T: TraceStore>(
        &self,
        store: &mut T,
    ) {
        self.canvas.clear_points(store);
    }

    pub fn get_points<T: TraceStore>(
        &self,
        store: &T,
    ) -> Trace {
        self.canvas.get_points(store)
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Whether `wakeup` targets one of this view's registrations.
    pub fn owns(
        &self,
        wakeup: Wakeup,
    ) -> bool {
        match wakeup {
            Wakeup::Frame(id) => id == self.frame.id(),
            Wakeup::Interval(id) => id == self.prune.id(),
        }
    }

    /// Run the callback for `wakeup`. Returns `false` if it is not ours.
    pub fn handle<T: TraceStore>(
        &mut self,
        wakeup: Wakeup,
        store: &mut T,
    ) -> bool {
        if !self.owns(wakeup) {
            return false;
        }
        match wakeup {
            Wakeup::Frame(_) => self.on_frame(store),
            Wakeup::Interval(_) => self.on_prune(store),
        }
        true
    }

    fn on_frame<T: TraceStore>(
        &mut self,
        store: &T,
    ) {
        // Snapshot and clock are read when the frame runs, not when it was requested.
        let snapshot = self.canvas.get_points(store);
        let now = self.clock.now_ms();
        match self.surface.as_mut() {
            Some(surface) => {
                self.stats.last_markers = self.canvas.render(surface, &snapshot, now);
                self.stats.frames_drawn += 1;
            }
            None => {
                trace!("no draw surface, skipping frame");
                self.stats.frames_skipped += 1;
            }
        }
        self.frame = self.scheduler.request_frame();
    }

    fn on_prune<T: TraceStore>(
        &mut self,
        store: &mut T,
    ) {
        let removed = self.canvas.prune_pass(store, self.clock.now_ms());
        self.stats.prune_passes += 1;
        self.stats.samples_pruned += removed as u64;
    }

    // =========================================================================
    // Surface
    // =========================================================================

    #[inline]
    pub const fn surface(&self) -> Option<&S> { self.surface.as_ref() }

    #[inline]
    pub const fn surface_mut(&mut self) -> Option<&mut S> { self.surface.as_mut() }

    /// Take the surface away. Frames are skipped until one is attached.
    pub fn detach_surface(&mut self) -> Option<S> {
        debug!("trajectory surface detached");
        self.surface.take()
    }

    /// Attach `surface`, returning the previous one.
    pub fn attach_surface(
        &mut self,
        surface: S,
    ) -> Option<S> {
        debug!("trajectory surface attached");
        self.surface.replace(surface)
    }

    /// Release both registrations and hand back the surface.
    pub fn unmount(self) -> Option<S> {
        let Self {
            frame, prune, surface, stats, ..
        } = self;
        drop(frame);
        drop(prune);
        debug!(
            "trajectory unmounted after {} frames, {} prune passes",
            stats.frames_drawn, stats.prune_passes
        );
        surface
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
