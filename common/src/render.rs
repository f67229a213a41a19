//! Decay rendering of a trace onto an `Rgb565` draw target.
//!
//! Each frame is drawn from scratch:
//!
//! 1. The `size × size` area is filled with the background.
//! 2. The reference overlay is stroked: a crosshair through the center and
//!    four concentric rings at [`RING_FRACTIONS`] of the size.
//! 3. Every sample is drawn as a filled marker. The most recent sample uses
//!    the highlight color at full strength; older samples use the trail color
//!    faded toward the background by their [`opacity`].
//!
//! Rendering only reads the trace. Eviction is the prune pass's job, so a
//! sample about to be pruned may still be drawn (nearly invisible) for one
//! more frame.
//!
//! # Fading without Alpha
//!
//! `Rgb565` has no alpha channel. Fading is done by interpolating each 5-6-5
//! component between the background and the trail color with 8-bit
//! fixed-point weights, which gives the same visual result on an opaque
//! background.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
#[cfg(not(test))]
use micromath::F32Ext;

use crate::colors::{BLACK, TRAIL_GRAY, WHITE};
use crate::config::{POINT_RADIUS, RING_FRACTIONS, TraceConfig};
use crate::trace::{Millis, Sample, opacity};

// =============================================================================
// Style Constants
// =============================================================================

/// Canvas background.
pub const BACKGROUND: Rgb565 = BLACK;

/// Stroke color of the crosshair and rings.
pub const REFERENCE_COLOR: Rgb565 = WHITE;

/// Base color of samples other than the most recent one.
pub const TRAIL_COLOR: Rgb565 = TRAIL_GRAY;

const REFERENCE_STROKE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(REFERENCE_COLOR, 1);

const MARKER_DIAMETER: u32 = POINT_RADIUS * 2;

// =============================================================================
// Frame Rendering
// =============================================================================

/// Draw one full frame of the trace. Returns the number of markers drawn.
pub fn draw_trace<D>(
    display: &mut D,
    config: &TraceConfig,
    points: &[Sample],
    now: Millis,
) -> usize
where
    D: DrawTarget<Color = Rgb565>,
{
    clear_surface(display, config.size);
    draw_reference(display, config.size);
    draw_samples(display, points, now, config.duration_ms, config.point_color)
}

/// Fill the `size × size` surface area with the background.
pub fn clear_surface<D>(
    display: &mut D,
    size: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let area = Rectangle::new(Point::zero(), Size::new(size, size));
    display.fill_solid(&area, BACKGROUND).ok();
}

/// Stroke the crosshair and the concentric reference rings.
pub fn draw_reference<D>(
    display: &mut D,
    size: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let edge = size as i32;
    let center = Point::new(edge / 2, edge / 2);

    Line::new(Point::new(0, center.y), Point::new(edge, center.y))
        .into_styled(REFERENCE_STROKE)
        .draw(display)
        .ok();
    Line::new(Point::new(center.x, 0), Point::new(center.x, edge))
        .into_styled(REFERENCE_STROKE)
        .draw(display)
        .ok();

    for fraction in RING_FRACTIONS {
        let diameter = (size as f32 * fraction * 2.0) as u32;
        Circle::with_center(center, diameter)
            .into_styled(REFERENCE_STROKE)
            .draw(display)
            .ok();
    }
}

/// Draw sample markers in order, highlighting the last one.
///
/// Returns the number of markers drawn.
pub fn draw_samples<D>(
    display: &mut D,
    points: &[Sample],
    now: Millis,
    duration_ms: u32,
    highlight: Rgb565,
) -> usize
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(last) = points.len().checked_sub(1) else {
        return 0;
    };

    for (i, sample) in points.iter().enumerate() {
        let color = if i == last {
            highlight
        } else {
            fade(TRAIL_COLOR, opacity(sample, now, duration_ms))
        };
        draw_marker(display, sample, color);
    }
    points.len()
}

fn draw_marker<D>(
    display: &mut D,
    sample: &Sample,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let center = Point::new(sample.x.round() as i32, sample.y.round() as i32);
    Circle::with_center(center, MARKER_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}

// =============================================================================
// Color Helpers
// =============================================================================

/// Fade `color` toward the background. `opacity` is clamped to `[0, 1]`.
pub fn fade(
    color: Rgb565,
    opacity: f32,
) -> Rgb565 {
    lerp_rgb565(BACKGROUND, color, opacity.clamp(0.0, 1.0))
}

/// Linear interpolation between two `Rgb565` colors with 8-bit fixed point.
///
/// `t = 0` returns `from`, `t = 1` returns `to`.
pub fn lerp_rgb565(
    from: Rgb565,
    to: Rgb565,
    t: f32,
) -> Rgb565 {
    // Rgb565: RRRRRGGGGGGBBBBB (5-6-5 bits)
    let from_raw = from.into_storage();
    let to_raw = to.into_storage();

    let t_fixed = (t * 256.0) as i32;
    let mix = |shift: u16, mask: u16| -> u8 {
        let a = i32::from((from_raw >> shift) & mask);
        let b = i32::from((to_raw >> shift) & mask);
        (a + (((b - a) * t_fixed) >> 8)).clamp(0, i32::from(mask)) as u8
    };

    Rgb565::new(mix(11, 0x1F), mix(5, 0x3F), mix(0, 0x1F))
}

// =============================================================================
// Unit Tests
// =============================================================================
