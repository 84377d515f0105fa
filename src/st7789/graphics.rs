use core::ops::Range;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::St7789;
use crate::transport::Transport;

impl<T: Transport> DrawTarget for St7789<T> {
    type Color = Rgb565;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(coord, color) in pixels.into_iter() {
            if bounds.contains(coord) {
                self.write_pixel(coord.x as u16, coord.y as u16, color.into_storage())?;
            }
        }

        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Clamp area to drawable part of the display target
        let drawable_area = area.intersection(&self.bounding_box());

        if drawable_area.size == Size::zero() {
            return Ok(());
        }

        let Range {
            start: x_start,
            end: x_end,
        } = drawable_area.columns();
        let Range {
            start: y_start,
            end: y_end,
        } = drawable_area.rows();
        self.set_window(
            x_start as u16,
            y_start as u16,
            (x_end - 1) as u16,
            (y_end - 1) as u16,
        )?;
        self.write_pixels(
            area.points()
                .zip(colors)
                .filter(|(pos, _color)| drawable_area.contains(*pos))
                .map(|(_, color)| color.into_storage()),
        )
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color.into_storage(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into_storage())
    }
}

impl<T> OriginDimensions for St7789<T> {
    fn size(&self) -> Size {
        Size::new(self.state.width as u32, self.state.height as u32)
    }
}
