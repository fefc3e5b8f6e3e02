//! Homing run bookkeeping.

use serde::Serialize;

use crate::config::units::Steps;
use crate::time::Instant;

/// In-flight homing procedure. Exists only during `Homing`/`HomingRetract`.
#[derive(Debug, Clone)]
pub(crate) struct HomingRun {
    pub started_at: Instant,
    pub start_position: Steps,
    pub triggered: bool,
    /// Set while the carriage settles on the switch after the hard stop.
    pub settle_until: Option<Instant>,
    /// Start of the retract move, for the watchdog.
    pub retract_started: Option<Instant>,
    /// Retract arrived while the debounced switch was still asserted.
    pub arrived_on_switch: Option<Instant>,
}

impl HomingRun {
    pub fn new(now: Instant, start_position: Steps) -> Self {
        Self {
            started_at: now,
            start_position,
            triggered: false,
            settle_until: None,
            retract_started: None,
            arrived_on_switch: None,
        }
    }
}

/// Diagnostics captured when the endstop triggered during homing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingReport {
    /// Steps travelled from the homing start to the trigger.
    pub steps_moved: u64,
    /// Time from the homing start to the trigger, in milliseconds.
    pub elapsed_ms: u64,
    /// Average speed over the homing move, in mm/s.
    pub average_mm_per_sec: f32,
    /// Step speed at the trigger, in steps/s.
    pub final_steps_per_sec: f32,
}

impl HomingReport {
    pub(crate) fn capture(
        run: &HomingRun,
        now: Instant,
        position: Steps,
        steps_per_mm: f32,
        speed: f32,
    ) -> Self {
        let steps_moved = (position - run.start_position).abs();
        let elapsed_us = now.saturating_duration_since(run.started_at).as_micros() as u64;
        let average_mm_per_sec = if elapsed_us > 0 {
            (steps_moved as f32 / steps_per_mm) / (elapsed_us as f32 / 1_000_000.0)
        } else {
            0.0
        };

        Self {
            steps_moved,
            elapsed_ms: elapsed_us / 1_000,
            average_mm_per_sec,
            final_steps_per_sec: libm::fabsf(speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_average_speed() {
        let run = HomingRun::new(Instant::from_millis(1_000), Steps(0));
        let report = HomingReport::capture(&run, Instant::from_millis(3_000), Steps(-400), 100.0, -200.0);

        assert_eq!(report.steps_moved, 400);
        assert_eq!(report.elapsed_ms, 2_000);
        assert!((report.average_mm_per_sec - 2.0).abs() < 1e-4);
        assert_eq!(report.final_steps_per_sec, 200.0);
    }
}
