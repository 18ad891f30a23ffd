use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size},
};

/// One bit per pixel over a caller-provided buffer, row-major, LSB first.
pub struct Framebuffer<'a> {
    size: Size,
    bits: &'a mut [u8],
}

impl<'a> Framebuffer<'a> {
    pub const fn buffer_len(size: Size) -> usize {
        (size.width as usize).div_ceil(8) * size.height as usize
    }

    /// `None` when `bits` is shorter than [`Framebuffer::buffer_len`].
    pub fn new(size: Size, bits: &'a mut [u8]) -> Option<Self> {
        if bits.len() < Self::buffer_len(size) {
            return None;
        }
        Some(Self { size, bits })
    }

    fn stride(&self) -> usize {
        (self.size.width as usize).div_ceil(8)
    }

    pub fn pixel(&self, point: Point) -> bool {
        let Some((byte_idx, bit)) = self.locate(point) else {
            return false;
        };
        self.bits[byte_idx] & bit != 0
    }

    pub fn set_pixel(&mut self, point: Point, on: bool) {
        let Some((byte_idx, bit)) = self.locate(point) else {
            return;
        };
        if on {
            self.bits[byte_idx] |= bit;
        } else {
            self.bits[byte_idx] &= !bit;
        }
    }

    pub fn lit_pixels(&self) -> usize {
        let mut count = 0;
        for y in 0..self.size.height as i32 {
            for x in 0..self.size.width as i32 {
                if self.pixel(Point::new(x, y)) {
                    count += 1;
                }
            }
        }
        count
    }

    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let x = point.x as usize;
        let y = point.y as usize;
        if x >= self.size.width as usize || y >= self.size.height as usize {
            return None;
        }
        Some((self.stride() * y + x / 8, 1u8 << (x % 8)))
    }
}

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color == BinaryColor::On);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let len = Self::buffer_len(self.size);
        self.bits[..len].fill(match color {
            BinaryColor::Off => 0x00,
            BinaryColor::On => 0xFF,
        });
        Ok(())
    }
}
