//! Packed 1-bit framebuffer in NT7538 page layout.
//!
//! Byte `x + page * width` holds column `x` of page `page`; bit `n` of that
//! byte is pixel row `page * 8 + n`. This is the controller's RAM layout, so
//! a flush is a straight copy in memory order.

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use heapless::Vec;

use crate::config::MAX_BUFFER_LEN;

/// Bounds-checked pixel writes into a fixed-size surface.
pub trait PixelSink {
    /// Surface size as `(width, height)` in pixels.
    fn dimensions(&self) -> (u16, u16);

    /// Set (`on = true`) or clear one pixel.
    ///
    /// Positions outside the surface are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, on: bool);
}

/// In-memory pixel buffer owned by [`Nt7538`](crate::Nt7538).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    data: Vec<u8, MAX_BUFFER_LEN>,
}

impl FrameBuffer {
    /// Zero-filled buffer for a `width` × `height` panel.
    ///
    /// Dimensions must already be validated; a buffer larger than
    /// [`MAX_BUFFER_LEN`] is truncated to it.
    pub(crate) fn new(width: u16, height: u16) -> Self {
        let len = (width as usize * height as usize / 8).min(MAX_BUFFER_LEN);
        let mut data = Vec::new();
        // `len` never exceeds the capacity.
        let _ = data.resize(len, 0);
        Self {
            width,
            height,
            data,
        }
    }

    /// Length in bytes: `width * height / 8`.
    pub fn buffer_len(&self) -> usize {
        self.data.len()
    }

    /// Packed contents in controller order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The `width` bytes of one page, or `None` past the last page.
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        let width = self.width as usize;
        let start = page as usize * width;
        self.data.get(start..start + width)
    }

    /// State of one pixel, or `None` outside the panel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let (index, bit) = self.locate(x, y)?;
        Some(self.data[index] & (1 << bit) != 0)
    }

    /// Clear every pixel.
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set every pixel to `on`.
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.data.iter_mut().for_each(|b| *b = value);
    }

    /// Byte index and bit position of an in-bounds pixel.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let index = x as usize + (y as usize / 8) * self.width as usize;
        Some((index, (y & 0x07) as u8))
    }
}

impl PixelSink for FrameBuffer {
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((index, bit)) = self.locate(x, y) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Position out of area: {}x{}", x, y);
            return;
        };
        if on {
            self.data[index] |= 1 << bit;
        } else {
            self.data[index] &= !(1 << bit);
        }
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

    fn count_set_bits(buffer: &FrameBuffer) -> u32 {
        buffer.as_bytes().iter().map(|b| b.count_ones()).sum()
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let buffer = FrameBuffer::new(128, 64);
        assert_eq!(buffer.buffer_len(), 1024);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.dimensions(), (128, 64));
    }

    #[test]
    fn set_pixel_touches_one_bit() {
        let mut buffer = FrameBuffer::new(128, 64);
        buffer.set_pixel(5, 13, true);

        // 13 / 8 = page 1, bit 13 & 7 = 5
        assert_eq!(buffer.as_bytes()[5 + 128], 1 << 5);
        assert_eq!(count_set_bits(&buffer), 1);
        assert_eq!(buffer.pixel(5, 13), Some(true));
    }

    #[test]
    fn clear_pixel_touches_one_bit() {
        let mut buffer = FrameBuffer::new(128, 64);
        buffer.fill(true);
        buffer.set_pixel(127, 63, false);

        let bytes = buffer.as_bytes();
        assert_eq!(bytes[127 + 7 * 128], 0x7F);
        assert_eq!(bytes.iter().filter(|&&b| b != 0xFF).count(), 1);
        assert_eq!(buffer.pixel(127, 63), Some(false));
        assert_eq!(buffer.pixel(126, 63), Some(true));
    }

    #[test]
    fn every_in_bounds_pixel_maps_to_its_own_bit() {
        let mut buffer = FrameBuffer::new(128, 64);
        for y in 0..64 {
            for x in 0..128 {
                buffer.set_pixel(x, y, true);
                assert_eq!(buffer.pixel(x, y), Some(true));
                assert_eq!(count_set_bits(&buffer), 1);
                buffer.set_pixel(x, y, false);
                assert_eq!(count_set_bits(&buffer), 0);
            }
        }
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buffer = FrameBuffer::new(128, 64);
        buffer.set_pixel(3, 3, true);
        let before = buffer.clone();

        for (x, y) in [(-1, 0), (0, -1), (128, 0), (0, 64), (i32::MAX, i32::MIN)] {
            buffer.set_pixel(x, y, true);
            buffer.set_pixel(x, y, false);
            assert_eq!(buffer.pixel(x, y), None);
        }
        assert_eq!(buffer, before);
    }

    #[test]
    fn page_slices() {
        let mut buffer = FrameBuffer::new(128, 64);
        buffer.set_pixel(0, 8, true);
        assert_eq!(buffer.page(0).map(|p| p.len()), Some(128));
        assert_eq!(buffer.page(1).map(|p| p[0]), Some(0x01));
        assert!(buffer.page(8).is_none());
    }

    #[test]
    fn smaller_panel() {
        let mut buffer = FrameBuffer::new(96, 32);
        assert_eq!(buffer.buffer_len(), 96 * 32 / 8);
        buffer.set_pixel(95, 31, true);
        assert_eq!(buffer.as_bytes()[95 + 3 * 96], 0x80);
        buffer.set_pixel(96, 0, true);
        assert_eq!(count_set_bits(&buffer), 1);
    }

    #[test]
    fn draw_target_vertical_line_fills_a_column_byte() {
        let mut buffer = FrameBuffer::new(128, 64);
        Line::new(Point::new(10, 0), Point::new(10, 7))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut buffer)
            .unwrap();
        assert_eq!(buffer.as_bytes()[10], 0xFF);
        assert_eq!(count_set_bits(&buffer), 8);
    }

    #[test]
    fn draw_target_clips_offscreen_shapes() {
        let mut buffer = FrameBuffer::new(128, 64);
        Rectangle::new(Point::new(-4, -4), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut buffer)
            .unwrap();
        assert_eq!(count_set_bits(&buffer), 16);
        assert_eq!(buffer.as_bytes()[0], 0x0F);
    }

    #[test]
    fn draw_target_clear() {
        let mut buffer = FrameBuffer::new(128, 64);
        DrawTarget::clear(&mut buffer, BinaryColor::On).unwrap();
        assert!(buffer.as_bytes().iter().all(|&b| b == 0xFF));
        buffer.clear();
        assert_eq!(count_set_bits(&buffer), 0);
        assert_eq!(buffer.size(), Size::new(128, 64));
    }
}
