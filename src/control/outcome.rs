//! Result tag for control commands.

use core::fmt;

use serde::Serialize;

/// What a control command did.
///
/// Commands never fail because of the rail's state; they report it here
/// instead. Hardware failures still surface as [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// The command took effect (or was queued, for [`CommandQueue`](super::CommandQueue)).
    Applied,
    /// Nothing to do: the rail was already in the requested condition.
    Unchanged,
    /// The rail is busy with another operation, or the queue is full.
    RejectedBusy,
    /// An argument was out of range or not a number.
    RejectedBounds,
    /// The rail is latched in a fault, or the fault cannot be cleared yet.
    RejectedFault,
}

impl CommandOutcome {
    /// Whether the command took effect.
    #[inline]
    pub const fn is_applied(self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    /// Whether the command was refused.
    #[inline]
    pub const fn is_rejected(self) -> bool {
        matches!(
            self,
            CommandOutcome::RejectedBusy | CommandOutcome::RejectedBounds | CommandOutcome::RejectedFault
        )
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Applied => write!(f, "applied"),
            CommandOutcome::Unchanged => write!(f, "unchanged"),
            CommandOutcome::RejectedBusy => write!(f, "rejected: busy"),
            CommandOutcome::RejectedBounds => write!(f, "rejected: out of bounds"),
            CommandOutcome::RejectedFault => write!(f, "rejected: fault"),
        }
    }
}
