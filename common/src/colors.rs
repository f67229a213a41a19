//! Color constants for the G-force trajectory canvas.
//!
//! The draw surface uses `Rgb565` (5 bits red, 6 bits green, 5 bits blue),
//! the native format of the embedded-graphics targets this crate draws to.
//! Web-style `#rrggbb` colors are converted with [`rgb888`] at compile time.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black (0, 0, 0). Canvas background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Reference crosshair and rings.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Trace Colors
// =============================================================================

/// Default highlight for the most recent sample (`#ef4444`).
pub const TRACE_RED: Rgb565 = rgb888(0xef, 0x44, 0x44);

/// Highlight used by the vehicle panel (`#ff4400`).
pub const TRACE_ORANGE: Rgb565 = rgb888(0xff, 0x44, 0x00);

/// Neutral trail color for older samples, roughly rgb(200, 200, 200).
pub const TRAIL_GRAY: Rgb565 = rgb888(200, 200, 200);

/// Title and scale caption color.
pub const CAPTION_GRAY: Rgb565 = Rgb565::new(20, 40, 20);

// =============================================================================
// Conversion
// =============================================================================

/// Convert 8-bit-per-channel RGB into `Rgb565` by dropping the low bits.
pub const fn rgb888(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}
