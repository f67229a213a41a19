//! Imperative control surface of the trajectory canvas.
//!
//! The canvas never owns the authoritative trace. The host keeps it behind a
//! [`TraceStore`] and is the only writer of record; the canvas reads the
//! current sequence, computes the next one and hands it back through
//! [`TraceStore::publish`]. Nothing is mutated in place.
//!
//! | Operation | Publishes | Side channel |
//! |-----------|-----------|--------------|
//! | [`TraceCanvas::add_point`] (valid) | appended + pruned trace | [`TraceStore::point_added`], if the sample was retained |
//! | [`TraceCanvas::add_point`] (out of range) | nothing | none |
//! | [`TraceCanvas::clear_points`] | empty trace | [`TraceStore::points_cleared`] |
//! | [`TraceCanvas::prune_pass`] | pruned trace, only if it shrank | none |
//!
//! Side-channel notifications fire after the corresponding publish.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use log::{debug, warn};

use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::render::draw_trace;
use crate::trace::{self, Millis, Sample, Trace};

// =============================================================================
// Host Seams
// =============================================================================

/// Host-owned storage of the authoritative trace.
pub trait TraceStore {
    /// The most recently published trace.
    fn points(&self) -> &[Sample];

    /// Replace the authoritative trace. The single change channel.
    fn publish(
        &mut self,
        points: Trace,
    );

    /// Called after a sample was appended and published.
    fn point_added(
        &mut self,
        _sample: &Sample,
    ) {
    }

    /// Called after the trace was cleared and published.
    fn points_cleared(&mut self) {}
}

/// Monotonic millisecond clock supplied by the host.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

// =============================================================================
// Trace Canvas
// =============================================================================

/// Control surface over a host-owned trace.
///
/// All operations take the instant to act at explicitly; the host-side view
/// supplies it from its [`Clock`].
#[derive(Clone, Debug)]
pub struct TraceCanvas {
    config: TraceConfig,
}

impl TraceCanvas {
    pub const fn new(config: TraceConfig) -> Self { Self { config } }

    #[inline]
    pub const fn config(&self) -> &TraceConfig { &self.config }

    /// Change the retention window. The next prune pass uses the new value.
    pub fn set_duration(
        &mut self,
        duration_ms: u32,
    ) {
        debug!("trace window {} -> {} ms", self.config.duration_ms, duration_ms);
        self.config.duration_ms = duration_ms;
    }

    /// Change the highlight color of the most recent sample.
    pub fn set_point_color(
        &mut self,
        color: Rgb565,
    ) {
        self.config.point_color = color;
    }

    /// Append a sample at `(x, y)` stamped `now`, prune, and publish.
    ///
    /// Coordinates outside `0..=size` are rejected: a warning is logged, the
    /// store is left untouched and nothing is published.
    ///
    /// A zero-length window evicts the sample in the same pass. The pruned
    /// trace is still published and the sample returned, but
    /// [`TraceStore::point_added`] is not called.
    pub fn add_point<T: TraceStore>(
        &self,
        store: &mut T,
        x: f32,
        y: f32,
        now: Millis,
    ) -> Result<Sample, TraceError> {
        if !self.config.contains(x, y) {
            let size = self.config.size;
            warn!("rejected sample ({x}, {y}): coordinates must lie within 0-{size}");
            return Err(TraceError::OutOfRange { x, y, size });
        }

        let sample = Sample::new(x, y, now);
        let next = trace::append(store.points(), sample, self.config.duration_ms);
        let retained = next.last() == Some(&sample);
        store.publish(next);
        if retained {
            store.point_added(&sample);
        }
        Ok(sample)
    }

    /// Publish the empty trace.
    pub fn clear_points<T: TraceStore>(
        &self,
        store: &mut T,
    ) {
        store.publish(Trace::new());
        store.points_cleared();
    }

    /// Copy of the current trace. Holding it never affects the store.
    pub fn get_points<T: TraceStore>(
        &self,
        store: &T,
    ) -> Trace {
        store.points().to_vec()
    }

    /// Timer-driven prune. Publishes only when samples were removed.
    ///
    /// Returns the number of samples removed.
    pub fn prune_pass<T: TraceStore>(
        &self,
        store: &mut T,
        now: Millis,
    ) -> usize {
        let current = store.points();
        let next = trace::prune(current, now, self.config.duration_ms);
        let removed = current.len() - next.len();
        if removed > 0 {
            debug!("prune removed {removed} of {} samples", current.len());
            store.publish(next);
        }
        removed
    }

    /// Draw `points` as seen at `now`. Returns the number of markers drawn.
    pub fn render<D>(
        &self,
        display: &mut D,
        points: &[Sample],
        now: Millis,
    ) -> usize
    where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_trace(display, &self.config, points, now)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Store that records every notification it receives.
    #[derive(Default)]
    struct RecordingStore {
        points: Trace,
        published: std::vec::Vec<usize>,
        added: std::vec::Vec<Sample>,
        clears: usize,
    }

    impl TraceStore for RecordingStore {
        fn points(&self) -> &[Sample] { &self.points }

        fn publish(
            &mut self,
            points: Trace,
        ) {
            self.published.push(points.len());
            self.points = points;
        }

        fn point_added(
            &mut self,
            sample: &Sample,
        ) {
            // Side channel must observe the already-published trace.
            assert_eq!(self.points.last(), Some(sample));
            self.added.push(*sample);
        }

        fn points_cleared(&mut self) {
            assert!(self.points.is_empty());
            self.clears += 1;
        }
    }

    fn canvas() -> TraceCanvas { TraceCanvas::new(TraceConfig::new(800)) }

    // -------------------------------------------------------------------------
    // add_point
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_point_publishes_and_notifies() {
        let mut store = RecordingStore::default();
        let sample = canvas().add_point(&mut store, 10.0, 20.0, 1234).unwrap();

        assert_eq!(sample, Sample::new(10.0, 20.0, 1234));
        assert_eq!(store.points.as_slice(), &[sample]);
        assert_eq!(store.published, [1]);
        assert_eq!(store.added, [sample]);
    }

    #[test]
    fn test_add_point_rejects_out_of_range() {
        let mut store = RecordingStore::default();
        let canvas = canvas();
        canvas.add_point(&mut store, 5.0, 5.0, 0).unwrap();

        let low = canvas.add_point(&mut store, -1.0, 50.0, 10);
        let high = canvas.add_point(&mut store, 801.0, 50.0, 20);

        assert_eq!(low, Err(TraceError::OutOfRange { x: -1.0, y: 50.0, size: 800 }));
        assert!(high.is_err());
        assert_eq!(store.points.len(), 1, "Rejected samples must not change the trace");
        assert_eq!(store.published, [1], "Rejected samples must not publish");
        assert_eq!(store.added.len(), 1);
    }

    #[test]
    fn test_add_point_accepts_edges() {
        let mut store = RecordingStore::default();
        let canvas = canvas();
        assert!(canvas.add_point(&mut store, 0.0, 0.0, 0).is_ok());
        assert!(canvas.add_point(&mut store, 800.0, 800.0, 1).is_ok());
        assert_eq!(store.points.len(), 2);
    }

    #[test]
    fn test_add_point_prunes_synchronously() {
        let mut store = RecordingStore::default();
        let canvas = TraceCanvas::new(TraceConfig::new(200).with_duration(500));
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();
        canvas.add_point(&mut store, 2.0, 2.0, 300).unwrap();
        canvas.add_point(&mut store, 3.0, 3.0, 600).unwrap();

        let xs: std::vec::Vec<f32> = store.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0], "Sample from t=0 has aged out by t=600");
    }

    #[test]
    fn test_add_point_zero_duration_skips_notification() {
        let mut store = RecordingStore::default();
        let canvas = TraceCanvas::new(TraceConfig::new(200).with_duration(0));
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();

        let sample = canvas.add_point(&mut store, 5.0, 5.0, 10);

        assert_eq!(sample, Ok(Sample::new(5.0, 5.0, 10)));
        assert!(store.points.is_empty(), "Zero-length window retains nothing");
        assert_eq!(store.published, [0, 0], "Pruned trace is still published");
        assert!(store.added.is_empty(), "Evicted sample must not be announced");
    }

    #[test]
    fn test_add_point_burst_keeps_call_order() {
        let mut store = RecordingStore::default();
        let canvas = canvas();
        for i in 0..100u64 {
            canvas.add_point(&mut store, i as f32, 0.0, i).unwrap();
        }
        assert!(store.points.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(store.points.len(), 100);
    }

    // -------------------------------------------------------------------------
    // clear_points / get_points
    // -------------------------------------------------------------------------

    #[test]
    fn test_clear_points_publishes_empty() {
        let mut store = RecordingStore::default();
        let canvas = canvas();
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();
        canvas.add_point(&mut store, 2.0, 2.0, 1).unwrap();

        canvas.clear_points(&mut store);

        assert!(store.points.is_empty());
        assert_eq!(store.published.last(), Some(&0));
        assert_eq!(store.clears, 1);
    }

    #[test]
    fn test_clear_points_on_empty_store() {
        let mut store = RecordingStore::default();
        canvas().clear_points(&mut store);
        assert_eq!(store.published, [0]);
    }

    #[test]
    fn test_get_points_is_a_copy() {
        let mut store = RecordingStore::default();
        let canvas = canvas();
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();

        let mut copy = canvas.get_points(&store);
        copy.clear();

        assert_eq!(store.points.len(), 1, "Mutating the copy must not reach the store");
    }

    // -------------------------------------------------------------------------
    // prune_pass
    // -------------------------------------------------------------------------

    #[test]
    fn test_prune_pass_publishes_only_on_shrink() {
        let mut store = RecordingStore::default();
        let canvas = TraceCanvas::new(TraceConfig::new(200).with_duration(500));
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();
        canvas.add_point(&mut store, 2.0, 2.0, 100).unwrap();

        assert_eq!(canvas.prune_pass(&mut store, 200), 0);
        assert_eq!(store.published.len(), 2, "Nothing removed, nothing published");

        assert_eq!(canvas.prune_pass(&mut store, 550), 1);
        assert_eq!(store.published.len(), 3);
        assert_eq!(store.points.len(), 1);
    }

    #[test]
    fn test_prune_pass_uses_updated_duration() {
        let mut store = RecordingStore::default();
        let mut canvas = canvas();
        canvas.add_point(&mut store, 1.0, 1.0, 0).unwrap();
        assert_eq!(canvas.prune_pass(&mut store, 1000), 0);

        canvas.set_duration(800);
        assert_eq!(canvas.prune_pass(&mut store, 1000), 1, "Shorter window applies on the next pass");
    }

    #[test]
    fn test_end_to_end_window() {
        let mut store = RecordingStore::default();
        let canvas = TraceCanvas::new(TraceConfig::new(200).with_duration(500));
        canvas.add_point(&mut store, 50.0, 50.0, 0).unwrap();
        canvas.add_point(&mut store, 60.0, 60.0, 100).unwrap();

        assert_eq!(canvas.prune_pass(&mut store, 200), 0, "Ages 200 and 100 are inside the window");
        assert_eq!(store.points.len(), 2);

        assert_eq!(canvas.prune_pass(&mut store, 600), 2, "Ages 600 and 500 are evicted");
        assert!(store.points.is_empty());
    }
}
