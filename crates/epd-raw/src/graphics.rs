//! embedded-graphics support
//!
//! [`FrameBuffer`] implements [`DrawTarget`] with [`Gray4`] colors, so any
//! embedded-graphics primitive, font or image can be drawn into it. A
//! `Gray4` luma maps one to one onto a [`PixelValue`]; the panel codec does
//! the quantization later, at flush time.
//!
//! ## Example
//!
//! ```rust,ignore
//! use embedded_graphics::{
//!     pixelcolor::Gray4,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//!
//! let mut fb = device.new_frame_buffer()?;
//! fb.clear(Gray4::WHITE)?;
//! Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Gray4::new(5)))
//!     .draw(&mut fb)?;
//! device.flush_frame(&fb, &mut delay)?;
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{Gray4, GrayColor},
};

use crate::framebuffer::FrameBuffer;
use crate::pixel::PixelValue;

impl From<Gray4> for PixelValue {
    fn from(color: Gray4) -> Self {
        PixelValue::saturating(color.luma())
    }
}

impl From<PixelValue> for Gray4 {
    fn from(value: PixelValue) -> Self {
        Gray4::new(value.get())
    }
}

impl<B> DrawTarget for FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Gray4;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (i32::from(self.width()), i32::from(self.height()));

        for Pixel(Point { x, y }, color) in pixels {
            // off-screen pixels are clipped
            if !(0..width).contains(&x) || !(0..height).contains(&y) {
                continue;
            }
            let (nx, ny) = self.remap(x as u16, y as u16);
            let index = self.index(nx, ny);
            self.store(index, color.into());
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into());
        Ok(())
    }
}

impl<B: AsRef<[u8]>> OriginDimensions for FrameBuffer<B> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}
