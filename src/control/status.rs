//! Status snapshot for polling clients.

use serde::Serialize;

use crate::rail::{FaultKind, HomingReport};

/// Point-in-time view of the rail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RailStatus {
    /// Current position in mm.
    pub position: f32,
    /// Target position in mm.
    pub target: f32,
    /// Current position in raw steps.
    pub steps: i64,
    /// Symbolic state name (`Ready`, `Homing`, `Moving`, `Shooting`, `ERROR`).
    pub state: &'static str,
    /// Photos taken in the running sequence.
    pub photo_count: u16,
    /// Photos requested for the running sequence, or the configured count.
    pub total_photos: u16,
    /// Whether a photo sequence is running.
    pub shooting: bool,
    /// Last raw endstop sample.
    pub endstop_raw: bool,
    /// Debounced endstop level.
    pub endstop: bool,
    /// Whether the zero reference is established.
    pub homed: bool,
    /// Cause of the most recent fault.
    pub fault: Option<FaultKind>,
    /// Diagnostics of the most recent homing trigger.
    pub homing: Option<HomingReport>,
}
