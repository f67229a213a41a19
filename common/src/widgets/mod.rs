//! Widget components drawn around the trajectory.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod caption;

pub use caption::{draw_caption, full_scale_g, scale_label};
