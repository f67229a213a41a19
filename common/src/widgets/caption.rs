//! Title and full-scale caption of the G-force canvas.
//!
//! The outer reference ring sits at half the surface size. With the IMU
//! adapter mapping `px_per_g` logical units to 1 g, the ring marks
//! `size / 2 / px_per_g` g; a 200-unit surface at 25 units per g reads "4.0G".

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use crate::styles::{BOTTOM_RIGHT, SCALE_STYLE, TITLE_STYLE, TOP_LEFT};

const TITLE: &str = "G-FORCE";

/// Inset of the caption text from the surface edges.
const CAPTION_MARGIN: i32 = 2;

/// Acceleration marked by the outer reference ring.
pub fn full_scale_g(
    size: u32,
    px_per_g: f32,
) -> f32 {
    if px_per_g <= 0.0 {
        return 0.0;
    }
    size as f32 / 2.0 / px_per_g
}

/// Format the full-scale label, e.g. `4.0G`.
pub fn scale_label(
    size: u32,
    px_per_g: f32,
) -> String<12> {
    let mut label = String::new();
    write!(label, "{:.1}G", full_scale_g(size, px_per_g)).ok();
    label
}

/// Draw the title in the top-left corner and the scale label in the bottom-right.
pub fn draw_caption<D>(
    display: &mut D,
    size: u32,
    px_per_g: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let edge = size as i32;

    Text::with_text_style(TITLE, Point::new(CAPTION_MARGIN, CAPTION_MARGIN), TITLE_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    let label = scale_label(size, px_per_g);
    Text::with_text_style(
        label.as_str(),
        Point::new(edge - CAPTION_MARGIN, edge - CAPTION_MARGIN),
        SCALE_STYLE,
        BOTTOM_RIGHT,
    )
    .draw(display)
    .ok();
}
