// Pibody wiring:
//
// * 10 - LCD CLK
// * 11 - LCD DIN
// * 13 - LCD Reset
// * 14 - LCD D/C
// * 15 - LCD CSn

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::transport::{DataMode, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    Spi(spi::ErrorKind),
    Pin(digital::ErrorKind),
}

fn pin<E: digital::Error>(e: E) -> LcdError {
    LcdError::Pin(e.kind())
}

fn bus<E: spi::Error>(e: E) -> LcdError {
    LcdError::Spi(e.kind())
}

/// Stand-in for an unwired backlight.
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// SPI bus plus the control lines of the panel. Chip-select is driven by
/// hand so commands and data can share or split a bracket.
pub struct LcdPins<SPI, DC, CS, RST, BL, D> {
    pub spi: SPI,
    pub dc: DC,
    pub cs: CS,
    pub rst: RST,
    pub backlight: Option<BL>,
    pub delay: D,
}

impl<SPI, DC, CS, RST, BL, D> LcdPins<SPI, DC, CS, RST, BL, D> {
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, backlight: Option<BL>, delay: D) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            backlight,
            delay,
        }
    }
}

impl<SPI, DC, CS, RST, BL, D> Transport for LcdPins<SPI, DC, CS, RST, BL, D>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    type Error = LcdError;

    fn select(&mut self) -> Result<(), LcdError> {
        self.cs.set_low().map_err(pin)
    }

    fn deselect(&mut self) -> Result<(), LcdError> {
        self.spi.flush().map_err(bus)?;
        self.cs.set_high().map_err(pin)
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), LcdError> {
        match mode {
            DataMode::Command => self.dc.set_low().map_err(pin),
            DataMode::Data => self.dc.set_high().map_err(pin),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), LcdError> {
        self.spi.write(bytes).map_err(bus)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), LcdError> {
        if high {
            self.rst.set_high().map_err(pin)
        } else {
            self.rst.set_low().map_err(pin)
        }
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), LcdError> {
        match self.backlight.as_mut() {
            Some(bl) if on => bl.set_high().map_err(pin),
            Some(bl) => bl.set_low().map_err(pin),
            None => Ok(()),
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
