//! Heap-backed RGB565 framebuffer.
//!
//! The panel's draw surface when no window is attached: the headless runner
//! renders into it and tests read pixels back out of it.

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use gforce_common::colors::BLACK;

/// Square or rectangular RGB565 pixel buffer implementing `DrawTarget`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    /// New buffer filled with black.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    /// New `size` x `size` buffer, the shape of a trajectory surface.
    pub fn square(size: u32) -> Self { Self::new(size, size) }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Number of pixels that differ from `background`.
    pub fn count_not(
        &self,
        background: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|c| **c != background).count()
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count(
        &self,
        color: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|c| **c == color).count()
    }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point.x, point.y) {
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let x_start = drawable_area.top_left.x as usize;
        let width = drawable_area.size.width as usize;
        for y in drawable_area.rows() {
            let row_start = y as usize * self.width as usize + x_start;
            self.pixels[row_start..row_start + width].fill(color);
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
