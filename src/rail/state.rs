//! Rail states and fault kinds.

use core::fmt;

use serde::Serialize;

/// Top-level state of the rail. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RailState {
    /// At rest, motor disabled, accepting commands.
    #[default]
    Idle,
    /// Driving toward the endstop.
    Homing,
    /// Backing off the endstop after it triggered.
    HomingRetract,
    /// Running a positioning move.
    Moving,
    /// Running a photo sequence.
    Shooting,
    /// Stopped on a mechanical fault; needs an explicit reset.
    Error,
}

impl RailState {
    /// Symbolic name reported to status clients.
    ///
    /// The retract phase reports as `Homing`.
    pub const fn status_name(self) -> &'static str {
        match self {
            RailState::Idle => "Ready",
            RailState::Homing | RailState::HomingRetract => "Homing",
            RailState::Moving => "Moving",
            RailState::Shooting => "Shooting",
            RailState::Error => "ERROR",
        }
    }

    /// Whether the rail is carrying out a homing run.
    #[inline]
    pub const fn is_homing(self) -> bool {
        matches!(self, RailState::Homing | RailState::HomingRetract)
    }

    /// Whether the rail is doing anything but resting.
    #[inline]
    pub const fn is_busy(self) -> bool {
        !matches!(self, RailState::Idle | RailState::Error)
    }
}

impl fmt::Display for RailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_name())
    }
}

/// Cause of a transition into [`RailState::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Endstop asserted outside of homing.
    EndstopTriggered,
    /// Homing retract did not finish within the watchdog window.
    RetractTimeout,
    /// Homing move used up its travel without reaching the endstop.
    EndstopNotFound,
    /// Endstop still asserted after the retract finished.
    RetractBlocked,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::EndstopTriggered => write!(f, "Endstop triggered"),
            FaultKind::RetractTimeout => write!(f, "Homing retract timeout"),
            FaultKind::EndstopNotFound => write!(f, "Endstop not found"),
            FaultKind::RetractBlocked => write!(f, "Endstop still pressed after retract"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(RailState::Idle.status_name(), "Ready");
        assert_eq!(RailState::HomingRetract.status_name(), "Homing");
        assert_eq!(RailState::Error.status_name(), "ERROR");
    }

    #[test]
    fn test_busy_states() {
        assert!(!RailState::Idle.is_busy());
        assert!(!RailState::Error.is_busy());
        assert!(RailState::Shooting.is_busy());
        assert!(RailState::HomingRetract.is_homing());
    }
}
