//! ST7789 TFT controller over a command/data framed serial bus.

pub mod graphics;
pub mod registers;
pub mod rotation;

use crate::color::BLACK;
use crate::raster::{Canvas, Rasterizer, WrapOptions};
use crate::text::Font;
use crate::transport::{DataMode, Transport};

use registers::{init_sequence, InitOp, Instruction, MADCTL_BGR, MADCTL_RGB};
use rotation::{table_for, table_index, RotationEntry};

/// Solid fills are replayed from a buffer of this many bytes.
const FILL_CHUNK: usize = 256;

/// Sub-pixel order of the panel wiring, as MADCTL bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ColorOrder {
    #[default]
    Rgb = MADCTL_RGB,
    Bgr = MADCTL_BGR,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Native panel width.
    pub width: u16,
    /// Native panel height.
    pub height: u16,
    pub rotation: i32,
    pub color_order: ColorOrder,
    pub inversion: bool,
    pub wrap: WrapOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 240,
            height: 320,
            rotation: 2,
            color_order: ColorOrder::Rgb,
            inversion: true,
            wrap: WrapOptions::NONE,
        }
    }
}

/// Everything the driver knows about the panel.
///
/// `width`, `height` and the offsets always come from the rotation table
/// entry at `rotation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub panel_width: u16,
    pub panel_height: u16,
    pub rotation: usize,
    pub width: u16,
    pub height: u16,
    pub x_offset: u16,
    pub y_offset: u16,
    pub color_order: ColorOrder,
    pub inversion: bool,
    pub wrap: WrapOptions,
}

impl DisplayState {
    fn apply(&mut self, index: usize, entry: &RotationEntry) {
        self.rotation = index;
        self.width = entry.width;
        self.height = entry.height;
        self.x_offset = entry.x_offset;
        self.y_offset = entry.y_offset;
    }
}

pub struct St7789<T> {
    transport: T,
    table: &'static [RotationEntry],
    state: DisplayState,
    font: Option<Font<'static>>,
}

impl<T: Transport> St7789<T> {
    /// Reset and initialize the panel, then clear it to black.
    ///
    /// Any transport error here means the panel was never brought up.
    pub fn new(transport: T, config: Config) -> Result<Self, T::Error> {
        let table = table_for(config.width, config.height);
        let index = table_index(config.rotation, table.len());
        let mut state = DisplayState {
            panel_width: config.width,
            panel_height: config.height,
            rotation: 0,
            width: 0,
            height: 0,
            x_offset: 0,
            y_offset: 0,
            color_order: config.color_order,
            inversion: config.inversion,
            wrap: config.wrap,
        };
        state.apply(index, &table[index]);

        let mut lcd = Self {
            transport,
            table,
            state,
            font: None,
        };
        lcd.reset()?;
        lcd.initialize(config.rotation)?;
        Ok(lcd)
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn width(&self) -> u16 {
        self.state.width
    }

    pub fn height(&self) -> u16 {
        self.state.height
    }

    pub fn rotation_table(&self) -> &'static [RotationEntry] {
        self.table
    }

    pub fn set_wrap(&mut self, wrap: WrapOptions) {
        self.state.wrap = wrap;
    }

    /// Bind a font for [`St7789::text_default`].
    pub fn set_font(&mut self, font: Font<'static>) {
        self.font = Some(font);
    }

    pub fn font(&self) -> Option<&Font<'static>> {
        self.font.as_ref()
    }

    /// Borrow the driver as a drawing surface.
    pub fn raster(&mut self) -> Rasterizer<'_, Self> {
        Rasterizer::new(self)
    }

    pub fn release(self) -> T {
        self.transport
    }

    /// Hardware reset pulse.
    pub fn reset(&mut self) -> Result<(), T::Error> {
        debug!("lcd: reset");
        self.transport.deselect()?;
        self.transport.set_reset(true)?;
        self.transport.delay_ms(50);
        self.transport.set_reset(false)?;
        self.transport.delay_ms(50);
        self.transport.set_reset(true)?;
        self.transport.delay_ms(150);
        Ok(())
    }

    fn initialize(&mut self, rotation: i32) -> Result<(), T::Error> {
        info!("lcd: init, inversion={=bool}", self.state.inversion);
        for op in init_sequence(self.state.inversion) {
            match op {
                InitOp::Cmd(c) => {
                    self.command(c.cmd)?;
                    if !c.data.is_empty() {
                        self.data(c.data)?;
                    }
                }
                InitOp::Delay(d) => {
                    self.transport.delay_ms(d);
                }
            }
        }
        self.transport.set_backlight(true)?;
        self.set_rotation(rotation)?;
        self.fill(BLACK)?;
        info!("lcd: ready, {=u16}x{=u16}", self.state.width, self.state.height);
        Ok(())
    }

    pub fn command(&mut self, cmd: Instruction) -> Result<(), T::Error> {
        self.transport.select()?;
        self.transport.set_data_mode(DataMode::Command)?;
        self.transport.write(&[cmd.opcode()])?;
        self.transport.deselect()
    }

    pub fn data(&mut self, data: &[u8]) -> Result<(), T::Error> {
        self.transport.select()?;
        self.transport.set_data_mode(DataMode::Data)?;
        self.transport.write(data)?;
        self.transport.deselect()
    }

    /// Command and its parameters inside a single chip-select bracket.
    pub fn write_register(&mut self, cmd: Instruction, data: &[u8]) -> Result<(), T::Error> {
        self.transport.select()?;
        self.transport.set_data_mode(DataMode::Command)?;
        self.transport.write(&[cmd.opcode()])?;
        self.transport.set_data_mode(DataMode::Data)?;
        self.transport.write(data)?;
        self.transport.deselect()
    }

    pub fn set_inversion(&mut self, enable: bool) -> Result<(), T::Error> {
        debug!("lcd: inversion={=bool}", enable);
        self.state.inversion = enable;
        self.command(if enable {
            Instruction::InvOn
        } else {
            Instruction::InvOff
        })
    }

    pub fn set_sleep(&mut self, enable: bool) -> Result<(), T::Error> {
        debug!("lcd: sleep={=bool}", enable);
        self.command(if enable {
            Instruction::SlpIn
        } else {
            Instruction::SlpOut
        })
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), T::Error> {
        debug!("lcd: display on={=bool}", on);
        self.command(if on {
            Instruction::DispOn
        } else {
            Instruction::DispOff
        })
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), T::Error> {
        self.transport.set_backlight(on)
    }

    /// Select rotation `n mod table length` and program MADCTL.
    pub fn set_rotation(&mut self, rotation: i32) -> Result<(), T::Error> {
        let index = table_index(rotation, self.table.len());
        let entry = self.table[index];
        self.state.apply(index, &entry);

        let madctl = entry.madctl | self.state.color_order as u8;
        debug!(
            "lcd: rotation {=usize}, {=u16}x{=u16} at +{=u16}+{=u16}, madctl {=u8:#x}",
            index,
            entry.width,
            entry.height,
            entry.x_offset,
            entry.y_offset,
            madctl,
        );
        self.write_register(Instruction::MadCtl, &[madctl])
    }

    /// Program the addressing window (inclusive corners) and arm RAM write.
    pub fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), T::Error> {
        let xo = self.state.x_offset;
        let yo = self.state.y_offset;
        let [xs_hi, xs_lo] = x0.wrapping_add(xo).to_be_bytes();
        let [xe_hi, xe_lo] = x1.wrapping_add(xo).to_be_bytes();
        let [ys_hi, ys_lo] = y0.wrapping_add(yo).to_be_bytes();
        let [ye_hi, ye_lo] = y1.wrapping_add(yo).to_be_bytes();

        self.command(Instruction::CaSet)?;
        self.data(&[xs_hi, xs_lo, xe_hi, xe_lo])?;
        self.command(Instruction::RaSet)?;
        self.data(&[ys_hi, ys_lo, ye_hi, ye_lo])?;
        self.command(Instruction::RamWr)
    }

    /// Solid rectangle, clipped to the active area.
    ///
    /// Streams `w * h * 2` bytes for the visible part through a fixed
    /// buffer; nothing is sent if the rectangle is entirely off screen.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), T::Error> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.state.width as i32);
        let y1 = y.saturating_add(h).min(self.state.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        self.set_window(x0 as u16, y0 as u16, (x1 - 1) as u16, (y1 - 1) as u16)?;

        let mut buf = [0u8; FILL_CHUNK];
        for px in buf.chunks_exact_mut(2) {
            px.copy_from_slice(&color.to_be_bytes());
        }

        let total = (x1 - x0) as usize * (y1 - y0) as usize * 2;
        let mut sent = 0;
        while sent < total {
            let n = FILL_CHUNK.min(total - sent);
            self.data(&buf[..n])?;
            sent += n;
        }
        Ok(())
    }

    pub fn fill(&mut self, color: u16) -> Result<(), T::Error> {
        let (w, h) = (self.state.width as i32, self.state.height as i32);
        self.fill_rect(0, 0, w, h, color)
    }

    /// One on-screen pixel.
    pub fn write_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), T::Error> {
        self.set_window(x, y, x, y)?;
        self.data(&color.to_be_bytes())
    }

    /// Stream a pre-rendered RGB565 buffer. `buf` must hold `w * h * 2` bytes.
    pub fn blit_buffer(&mut self, buf: &[u8], x: u16, y: u16, w: u16, h: u16) -> Result<(), T::Error> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_window(x, y, x.wrapping_add(w - 1), y.wrapping_add(h - 1))?;
        self.data(buf)
    }

    /// Stream colors into an already programmed window, chunked.
    pub(crate) fn write_pixels<I>(&mut self, colors: I) -> Result<(), T::Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut buf = [0u8; FILL_CHUNK];
        let mut n = 0;
        for color in colors {
            buf[n..n + 2].copy_from_slice(&color.to_be_bytes());
            n += 2;
            if n == FILL_CHUNK {
                self.data(&buf)?;
                n = 0;
            }
        }
        if n > 0 {
            self.data(&buf[..n])?;
        }
        Ok(())
    }

    /// Vertical scroll area and start line. Not validated.
    pub fn scroll(&mut self, top: u16, height: u16, offset: u16) -> Result<(), T::Error> {
        let bottom = self
            .state
            .panel_height
            .wrapping_sub(top)
            .wrapping_sub(height);
        trace!(
            "lcd: scroll top={=u16} height={=u16} bottom={=u16} offset={=u16}",
            top,
            height,
            bottom,
            offset,
        );

        let [t_hi, t_lo] = top.to_be_bytes();
        let [h_hi, h_lo] = height.to_be_bytes();
        let [b_hi, b_lo] = bottom.to_be_bytes();
        self.command(Instruction::VScrDef)?;
        self.data(&[t_hi, t_lo, h_hi, h_lo, b_hi, b_lo])?;
        self.command(Instruction::VScSad)?;
        self.data(&offset.to_be_bytes())
    }

    /// Text in the bound font. Without one this draws nothing.
    pub fn text_default(&mut self, s: &str, x: i32, y: i32, fg: u16, bg: u16) -> Result<i32, T::Error> {
        match self.font {
            Some(font) => self.raster().text(s, x, y, &font, fg, bg),
            None => {
                warn!("lcd: text without a bound font");
                Ok(x)
            }
        }
    }
}

impl<T: Transport> Canvas for St7789<T> {
    type Error = T::Error;

    fn size(&self) -> (i32, i32) {
        (self.state.width as i32, self.state.height as i32)
    }

    fn wrap(&self) -> WrapOptions {
        self.state.wrap
    }

    fn write_pixel(&mut self, x: u16, y: u16, color: u16) -> Result<(), T::Error> {
        St7789::write_pixel(self, x, y, color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), T::Error> {
        St7789::fill_rect(self, x, y, w, h, color)
    }

    fn blit_buffer(&mut self, buf: &[u8], x: u16, y: u16, w: u16, h: u16) -> Result<(), T::Error> {
        St7789::blit_buffer(self, buf, x, y, w, h)
    }
}
