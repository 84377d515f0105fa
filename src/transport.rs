/// Level of the D/C line for the bytes that follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    Command,
    Data,
}

/// The bus the controller hangs off.
///
/// Bytes written between `select` and `deselect` must arrive in order;
/// nothing else is assumed about the wire.
pub trait Transport {
    type Error;

    /// Pull chip-select active.
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip-select. All written bytes must be on the wire first.
    fn deselect(&mut self) -> Result<(), Self::Error>;

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Drive the reset line. `true` is released (high).
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Switch the backlight, if one is wired.
    fn set_backlight(&mut self, _on: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Blocking wait.
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        T::deselect(self)
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), Self::Error> {
        T::set_data_mode(self, mode)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        T::write(self, bytes)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        T::set_reset(self, high)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        T::set_backlight(self, on)
    }

    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }
}
