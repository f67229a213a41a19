//! Pre-computed static text styles for the canvas captions.
//!
//! Styles are `const` so they live in read-only data and are never rebuilt
//! per frame.

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

use crate::colors::CAPTION_GRAY;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, top baseline. Used for the title in the top-left corner.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, bottom baseline. Used for the scale label.
pub const BOTTOM_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Bottom)
    .build();

// =============================================================================
// Text Styles
// =============================================================================

/// Panel title ("G-FORCE").
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, CAPTION_GRAY);

/// Full-scale label of the outer ring.
pub const SCALE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, CAPTION_GRAY);
