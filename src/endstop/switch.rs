//! Endstop switch on a digital input.

use embedded_hal::digital::InputPin;

use crate::error::{MotorError, Result};

/// Source of the raw endstop level.
pub trait EndstopInput {
    /// Read the raw level. `true` means the switch reports "at end of travel".
    fn is_triggered(&mut self) -> Result<bool>;
}

/// Endstop switch wired to an embedded-hal input pin.
pub struct Endstop<PIN: InputPin> {
    pin: PIN,
    active_low: bool,
}

impl<PIN: InputPin> Endstop<PIN> {
    /// Wrap an input pin. With `active_low` the switch pulls the line low when hit.
    pub fn new(pin: PIN, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Release the pin.
    pub fn release(self) -> PIN {
        self.pin
    }
}

impl<PIN: InputPin> EndstopInput for Endstop<PIN> {
    fn is_triggered(&mut self) -> Result<bool> {
        let high = self.pin.is_high().map_err(|_| MotorError::EndstopReadError)?;
        Ok(high != self.active_low)
    }
}

impl EndstopInput for bool {
    fn is_triggered(&mut self) -> Result<bool> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    #[test]
    fn test_active_low_polarity() {
        let mut pin = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);

        let mut endstop = Endstop::new(pin.clone(), true);
        assert!(!endstop.is_triggered().unwrap());
        assert!(endstop.is_triggered().unwrap());

        pin.done();
    }

    #[test]
    fn test_active_high_polarity() {
        let mut pin = PinMock::new(&[PinTransaction::get(PinState::High)]);

        let mut endstop = Endstop::new(pin.clone(), false);
        assert!(endstop.is_triggered().unwrap());

        pin.done();
    }
}
