//! Driver for the ST7789 TFT on the Pico Pibody board.
//!
//! Everything is drawn through two bus primitives, program a window and
//! stream pixels into it. Shapes and text live in [`raster`] and [`text`]
//! and work on any [`raster::Canvas`].
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod color;
pub mod lcd;
pub mod raster;
pub mod st7789;
pub mod text;
pub mod transport;

pub use color::color565;
pub use raster::{Canvas, Rasterizer, WrapOptions};
pub use st7789::{ColorOrder, Config, DisplayState, St7789};
pub use text::Font;
pub use transport::{DataMode, Transport};
