//! Trace canvas configuration.
//!
//! Defaults mirror the stand-alone canvas; the vehicle panel overrides them
//! with a smaller surface and a shorter window (see the root crate's config).

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::TRACE_RED;

// =============================================================================
// Defaults
// =============================================================================

/// Default draw-surface edge length in logical units.
pub const DEFAULT_SIZE: u32 = 800;

/// Default retention window in milliseconds.
pub const DEFAULT_DURATION_MS: u32 = 5000;

/// Default highlight color for the most recent sample.
pub const DEFAULT_POINT_COLOR: Rgb565 = TRACE_RED;

// =============================================================================
// Timing
// =============================================================================

/// Period of the idle prune pass, independent of window and frame rate.
pub const PRUNE_INTERVAL_MS: u64 = 1000;

// =============================================================================
// Drawing
// =============================================================================

/// Radius of a sample marker in logical units.
pub const POINT_RADIUS: u32 = 4;

/// Reference ring radii as fractions of the surface size.
pub const RING_FRACTIONS: [f32; 4] = [0.125, 0.25, 0.375, 0.5];

const _: () = assert!(RING_FRACTIONS[0] < RING_FRACTIONS[1]);
const _: () = assert!(RING_FRACTIONS[1] < RING_FRACTIONS[2]);
const _: () = assert!(RING_FRACTIONS[2] < RING_FRACTIONS[3]);
const _: () = assert!(RING_FRACTIONS[3] <= 0.5);

// =============================================================================
// Trace Configuration
// =============================================================================

/// Recognized canvas options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceConfig {
    /// Edge length of the square draw surface.
    pub size: u32,
    /// Retention window in milliseconds.
    pub duration_ms: u32,
    /// Color of the most recent sample.
    pub point_color: Rgb565,
}

impl TraceConfig {
    /// Create a config for a `size × size` surface with default window and color.
    pub const fn new(size: u32) -> Self {
        Self {
            size,
            duration_ms: DEFAULT_DURATION_MS,
            point_color: DEFAULT_POINT_COLOR,
        }
    }

    #[must_use]
    pub const fn with_duration(
        mut self,
        duration_ms: u32,
    ) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub const fn with_point_color(
        mut self,
        point_color: Rgb565,
    ) -> Self {
        self.point_color = point_color;
        self
    }

    /// Center of the surface, where zero lateral/longitudinal force sits.
    #[inline]
    pub fn center(&self) -> f32 { self.size as f32 / 2.0 }

    /// Check whether a coordinate pair lies on the surface (edges included).
    ///
    /// NaN never lies on the surface.
    #[inline]
    pub fn contains(
        &self,
        x: f32,
        y: f32,
    ) -> bool {
        let size = self.size as f32;
        (0.0..=size).contains(&x) && (0.0..=size).contains(&y)
    }
}

impl Default for TraceConfig {
    fn default() -> Self { Self::new(DEFAULT_SIZE) }
}
