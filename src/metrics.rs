//! Loop timing and ingest statistics.
//!
//! Collected by the host loop each frame and logged once per report interval.

use std::time::{Duration, Instant};

use log::info;

use crate::config::REPORT_INTERVAL;
use crate::panel::IngestSummary;
use crate::trajectory::ViewStats;

/// Frame timing and ingest counters.
pub struct LoopMetrics {
    // Frame timing (microseconds)
    pub frame_time_us: u32,
    pub render_time_us: u32,
    pub sleep_time_us: u32,

    // Statistics
    pub frame_time_min_us: u32,
    pub frame_time_max_us: u32,
    frame_time_avg_us: f32,

    // Counters
    pub total_frames: u64,
    pub samples_accepted: u64,
    pub samples_rejected: u64,
    pub messages_ignored: u64,

    start_time: Instant,
    last_report: Instant,
}

impl LoopMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            samples_accepted: 0,
            samples_rejected: 0,
            messages_ignored: 0,
            start_time: now,
            last_report: now,
        }
    }

    /// Record frame timing for this frame.
    pub fn record_frame(
        &mut self,
        total_time: Duration,
        render_time: Duration,
        sleep_time: Duration,
    ) {
        let total_us = total_time.as_micros() as u32;
        self.frame_time_us = total_us;
        self.render_time_us = render_time.as_micros() as u32;
        self.sleep_time_us = sleep_time.as_micros() as u32;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        self.total_frames += 1;
    }

    pub fn record_ingest(
        &mut self,
        summary: IngestSummary,
    ) {
        self.samples_accepted += summary.accepted as u64;
        self.samples_rejected += summary.rejected as u64;
        self.messages_ignored += summary.ignored as u64;
    }

    /// Exponential moving average of the frame time.
    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS.
    pub fn uptime_string(&self) -> String {
        let secs = self.uptime().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    /// Log a summary if a report interval has passed since the last one.
    pub fn maybe_report(
        &mut self,
        view: ViewStats,
        trace_len: usize,
    ) -> bool {
        if self.last_report.elapsed() < REPORT_INTERVAL {
            return false;
        }
        self.last_report = Instant::now();
        self.report(view, trace_len);
        true
    }

    pub fn report(
        &self,
        view: ViewStats,
        trace_len: usize,
    ) {
        info!(
            "[{}] frames {} (avg {} us, min {} us, max {} us) | drawn {} skipped {} | trace {} | accepted {} rejected {} | pruned {} in {} passes",
            self.uptime_string(),
            self.total_frames,
            self.frame_time_avg_us(),
            self.frame_time_min_us,
            self.frame_time_max_us,
            view.frames_drawn,
            view.frames_skipped,
            trace_len,
            self.samples_accepted,
            self.samples_rejected,
            view.samples_pruned,
            view.prune_passes,
        );
    }
}

impl Default for LoopMetrics {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame_tracks_extremes() {
        let mut metrics = LoopMetrics::new();
        metrics.record_frame(Duration::from_micros(500), Duration::from_micros(100), Duration::ZERO);
        metrics.record_frame(Duration::from_micros(1500), Duration::from_micros(300), Duration::ZERO);

        assert_eq!(metrics.total_frames, 2);
        assert_eq!(metrics.frame_time_min_us, 500);
        assert_eq!(metrics.frame_time_max_us, 1500);
        assert!((599..=600).contains(&metrics.frame_time_avg_us()), "EMA with alpha 0.1");
    }

    #[test]
    fn test_record_ingest_accumulates() {
        let mut metrics = LoopMetrics::new();
        metrics.record_ingest(IngestSummary { accepted: 3, rejected: 1, ignored: 2 });
        metrics.record_ingest(IngestSummary { accepted: 1, rejected: 0, ignored: 0 });
        assert_eq!(metrics.samples_accepted, 4);
        assert_eq!(metrics.samples_rejected, 1);
        assert_eq!(metrics.messages_ignored, 2);
    }

    #[test]
    fn test_uptime_string_format() {
        let metrics = LoopMetrics::new();
        assert_eq!(metrics.uptime_string(), "00:00:00");
    }
}
