//! Panel configuration constants.
//!
//! These use `std::time::Duration` and host-side types, so they live here
//! rather than in the `no_std` common crate.

use std::time::Duration;

use gforce_common::colors::TRACE_ORANGE;
use gforce_common::{Sample, Trace, TraceConfig};
use log::warn;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Display refresh period (~60 Hz). The host loop ticks vsync at this rate.
pub const FRAME_TIME: Duration = Duration::from_millis(16);

/// How often the headless runner reports loop metrics.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// Vehicle Panel Configuration
// =============================================================================

/// IMU topic feeding the trajectory.
pub const IMU_TOPIC: &str = "/sensor/bosch/imu";

/// Trajectory surface edge length on the vehicle panel.
pub const PANEL_TRACE_SIZE: u32 = 200;

/// Trajectory window on the vehicle panel.
pub const PANEL_TRACE_DURATION_MS: u32 = 500;

/// Logical units per g of acceleration.
pub const PX_PER_G: f32 = 25.0;

/// Standard gravity used to convert m/s² into g.
pub const STANDARD_GRAVITY: f64 = 9.8;

const _: () = assert!(PANEL_TRACE_SIZE > 0);
const _: () = assert!(PANEL_TRACE_DURATION_MS > 0);

/// Everything the vehicle panel needs to mount its trajectory.
#[derive(Clone, Debug)]
pub struct PanelConfig {
    pub trace: TraceConfig,
    /// Logical units per g used by the IMU adapter and the scale caption.
    pub px_per_g: f32,
    /// m/s² per g.
    pub gravity: f64,
    /// Starting trace handed to the host-owned store on mount.
    pub initial_points: Trace,
}

impl PanelConfig {
    /// Panel config with a custom trace surface and window.
    pub fn new(
        size: u32,
        duration_ms: u32,
    ) -> Self {
        Self {
            trace: TraceConfig::new(size)
                .with_duration(duration_ms)
                .with_point_color(TRACE_ORANGE),
            px_per_g: PX_PER_G,
            gravity: STANDARD_GRAVITY,
            initial_points: Trace::new(),
        }
    }

    /// Use `points` as the starting trace.
    ///
    /// Samples outside the surface are dropped with a warning.
    #[must_use]
    pub fn with_initial_points(
        mut self,
        points: &[Sample],
    ) -> Self {
        let trace = self.trace;
        self.initial_points = gforce_common::trace::filtered(points, |p| {
            let inside = trace.contains(p.x, p.y);
            if !inside {
                warn!("dropping initial sample ({}, {}) outside the canvas", p.x, p.y);
            }
            inside
        });
        self
    }
}

impl Default for PanelConfig {
    fn default() -> Self { Self::new(PANEL_TRACE_SIZE, PANEL_TRACE_DURATION_MS) }
}
