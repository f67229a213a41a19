//! Time-windowed trace of 2D samples.
//!
//! A [`Trace`] is an ordered sequence of [`Sample`]s in insertion order, which
//! is also chronological order because every sample is stamped with the
//! instant it was appended. Traces are treated as immutable values: pruning
//! and appending build a new trace from a borrowed one and leave the input
//! untouched, so a reader holding an older copy never observes a change.
//!
//! # Retention
//!
//! A sample survives a prune pass while its age is strictly below the window:
//!
//! ```text
//! retained  <=>  now - timestamp < duration
//! ```
//!
//! A sample whose age equals the window is evicted.

use alloc::vec::Vec;

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

/// Chronologically ordered sample sequence, bounded only by its time window.
pub type Trace = Vec<Sample>;

// =============================================================================
// Sample
// =============================================================================

/// One trajectory observation in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    /// Instant the sample was accepted.
    pub timestamp: Millis,
}

impl Sample {
    pub const fn new(
        x: f32,
        y: f32,
        timestamp: Millis,
    ) -> Self {
        Self { x, y, timestamp }
    }

    /// Age at `now`. Samples stamped after `now` have age 0.
    #[inline]
    pub const fn age(
        &self,
        now: Millis,
    ) -> Millis {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the sample is still inside a window of `duration_ms` at `now`.
    #[inline]
    pub const fn is_live(
        &self,
        now: Millis,
        duration_ms: u32,
    ) -> bool {
        self.age(now) < duration_ms as Millis
    }
}

// =============================================================================
// Pruning Rule
// =============================================================================

/// Build the subsequence of `points` still inside the window at `now`.
///
/// Relative order is preserved.
pub fn prune(
    points: &[Sample],
    now: Millis,
    duration_ms: u32,
) -> Trace {
    filtered(points, |p| p.is_live(now, duration_ms))
}

/// Append `sample` to `points` and prune the result against the sample's
/// own timestamp.
///
/// With a zero-length window the new sample itself is evicted.
pub fn append(
    points: &[Sample],
    sample: Sample,
    duration_ms: u32,
) -> Trace {
    let mut next = Trace::with_capacity(points.len() + 1);
    next.extend_from_slice(points);
    next.push(sample);
    prune(&next, sample.timestamp, duration_ms)
}

/// Copy `points` into a trace, keeping only samples for which `keep` holds.
pub fn filtered<F>(
    points: &[Sample],
    mut keep: F,
) -> Trace
where
    F: FnMut(&Sample) -> bool,
{
    points.iter().filter(|p| keep(p)).copied().collect()
}

// =============================================================================
// Decay
// =============================================================================

/// Visual weight of a sample: `1 - age / duration`.
///
/// Not clamped; a sample at or past the window yields `<= 0`. A zero-length
/// window yields 0.
#[inline]
pub fn opacity(
    sample: &Sample,
    now: Millis,
    duration_ms: u32,
) -> f32 {
    if duration_ms == 0 {
        return 0.0;
    }
    1.0 - sample.age(now) as f32 / duration_ms as f32
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_of(samples: &[Sample]) -> Trace { samples.to_vec() }

    // -------------------------------------------------------------------------
    // Age and Retention
    // -------------------------------------------------------------------------

    #[test]
    fn test_age_saturates_for_future_samples() {
        let sample = Sample::new(1.0, 1.0, 500);
        assert_eq!(sample.age(400), 0, "Future sample should have age 0");
        assert_eq!(sample.age(700), 200);
    }

    #[test]
    fn test_boundary_sample_is_evicted() {
        let sample = Sample::new(0.0, 0.0, 100);
        assert!(sample.is_live(599, 500));
        assert!(!sample.is_live(600, 500), "Age equal to duration is evicted");
    }

    // -------------------------------------------------------------------------
    // Pruning
    // -------------------------------------------------------------------------

    #[test]
    fn test_prune_keeps_only_samples_inside_window() {
        let points: Vec<Sample> = (0..50).map(|i| Sample::new(i as f32, 0.0, i * 40)).collect();
        let now = 2000;
        let pruned = prune(&points, now, 700);

        assert!(!pruned.is_empty());
        for p in &pruned {
            assert!(now - p.timestamp < 700, "Sample at {} outlived the window", p.timestamp);
        }
        assert_eq!(pruned.len(), points.iter().filter(|p| now - p.timestamp < 700).count());
    }

    #[test]
    fn test_prune_preserves_order() {
        let points = [
            Sample::new(1.0, 0.0, 10),
            Sample::new(2.0, 0.0, 20),
            Sample::new(3.0, 0.0, 30),
            Sample::new(4.0, 0.0, 40),
        ];
        let pruned = prune(&points, 45, 30);
        let xs: Vec<f32> = pruned.iter().map(|p| p.x).collect();
        assert_eq!(xs, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_prune_does_not_touch_input() {
        let points = trace_of(&[Sample::new(1.0, 1.0, 0), Sample::new(2.0, 2.0, 900)]);
        let before = points.clone();
        let pruned = prune(&points, 1000, 500);
        assert_eq!(pruned.len(), 1);
        assert_eq!(points, before, "Input trace must be left as it was");
    }

    #[test]
    fn test_prune_zero_duration_keeps_nothing() {
        let points = [Sample::new(1.0, 1.0, 100)];
        assert!(prune(&points, 100, 0).is_empty());
    }

    #[test]
    fn test_prune_window_change_reevaluates() {
        let points = [Sample::new(1.0, 1.0, 0), Sample::new(2.0, 2.0, 300)];
        assert_eq!(prune(&points, 400, 500).len(), 2);
        assert_eq!(prune(&points, 400, 200).len(), 1, "Shorter window applies immediately");
    }

    // -------------------------------------------------------------------------
    // Append
    // -------------------------------------------------------------------------

    #[test]
    fn test_append_then_prune_is_idempotent() {
        let points = [Sample::new(1.0, 1.0, 0), Sample::new(2.0, 2.0, 250)];
        let appended = append(&points, Sample::new(3.0, 3.0, 520), 500);
        let again = prune(&appended, 520, 500);
        assert_eq!(appended, again, "Pruning an appended trace again must not change it");
        assert_eq!(appended.len(), 2, "Sample at t=0 is out of the window at t=520");
    }

    #[test]
    fn test_append_keeps_every_sample_inside_window() {
        let mut points = Trace::new();
        for i in 0..1100 {
            points = append(&points, Sample::new(10.0, 10.0, i), 5000);
        }

        assert_eq!(points.len(), 1100, "No sample younger than the window may be dropped");
        assert_eq!(points[0].timestamp, 0);
        assert_eq!(points[1099].timestamp, 1099);
    }

    #[test]
    fn test_append_high_rate_window_holds_all_live_samples() {
        // 250 Hz over a 5 s window
        let mut points = Trace::new();
        for i in 0..1500 {
            points = append(&points, Sample::new(0.0, 0.0, i * 4), 5000);
        }

        assert_eq!(points.len(), 1250);
        assert!(points.iter().all(|p| p.is_live(1499 * 4, 5000)));
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp), "Order preserved");
    }

    #[test]
    fn test_append_zero_duration_drops_new_sample() {
        let appended = append(&[], Sample::new(1.0, 1.0, 10), 0);
        assert!(appended.is_empty());
    }

    #[test]
    fn test_filtered_keeps_matching() {
        let points = [Sample::new(1.0, 1.0, 0), Sample::new(900.0, 1.0, 0)];
        let kept = filtered(&points, |p| p.x < 800.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].x, 1.0);
    }

    // -------------------------------------------------------------------------
    // Decay
    // -------------------------------------------------------------------------

    #[test]
    fn test_opacity_fresh_sample_is_opaque() {
        let sample = Sample::new(0.0, 0.0, 1000);
        assert_eq!(opacity(&sample, 1000, 500), 1.0);
    }

    #[test]
    fn test_opacity_halfway() {
        let sample = Sample::new(0.0, 0.0, 1000);
        assert!((opacity(&sample, 1250, 500) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opacity_monotonic_in_age() {
        let now = 3000;
        let mut previous = f32::MIN;
        for t in (0..=3000).step_by(100) {
            let value = opacity(&Sample::new(0.0, 0.0, t), now, 5000);
            assert!(value >= previous, "Newer sample at {t} must not be fainter");
            previous = value;
        }
    }

    #[test]
    fn test_opacity_zero_duration() {
        let sample = Sample::new(0.0, 0.0, 10);
        assert_eq!(opacity(&sample, 10, 0), 0.0);
    }
}
