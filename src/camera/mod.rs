//! Camera remote-release outputs.
//!
//! A shutter remote has two lines: focus (half-press) and shutter
//! (full-press). Both are active high at this interface.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

/// Focus and shutter outputs of a camera remote.
pub trait CameraTrigger {
    /// Assert or release the focus line.
    fn set_focus(&mut self, active: bool) -> Result<()>;

    /// Assert or release the shutter line.
    fn set_shutter(&mut self, active: bool) -> Result<()>;

    /// Release both lines.
    fn release(&mut self) -> Result<()> {
        self.set_shutter(false)?;
        self.set_focus(false)
    }
}

/// Camera trigger driving two output pins.
pub struct PinTrigger<FOCUS, SHUTTER>
where
    FOCUS: OutputPin,
    SHUTTER: OutputPin,
{
    focus: FOCUS,
    shutter: SHUTTER,
}

impl<FOCUS, SHUTTER> PinTrigger<FOCUS, SHUTTER>
where
    FOCUS: OutputPin,
    SHUTTER: OutputPin,
{
    /// Wrap the pins and drive both lines low.
    pub fn new(focus: FOCUS, shutter: SHUTTER) -> Result<Self> {
        let mut trigger = Self { focus, shutter };
        trigger.release()?;
        Ok(trigger)
    }

    /// Release the pins.
    pub fn into_pins(self) -> (FOCUS, SHUTTER) {
        (self.focus, self.shutter)
    }
}

fn drive<P: OutputPin>(pin: &mut P, active: bool) -> Result<()> {
    if active {
        pin.set_high().map_err(|_| MotorError::TriggerPinError)?;
    } else {
        pin.set_low().map_err(|_| MotorError::TriggerPinError)?;
    }
    Ok(())
}

impl<FOCUS, SHUTTER> CameraTrigger for PinTrigger<FOCUS, SHUTTER>
where
    FOCUS: OutputPin,
    SHUTTER: OutputPin,
{
    fn set_focus(&mut self, active: bool) -> Result<()> {
        drive(&mut self.focus, active)
    }

    fn set_shutter(&mut self, active: bool) -> Result<()> {
        drive(&mut self.shutter, active)
    }
}
