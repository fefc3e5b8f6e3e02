//! Control surface of the rail.
//!
//! [`RailControl`] pairs the [`Rail`] with its endstop input and exposes the
//! operations a request handler calls, taking plain numbers. [`RailRunner`]
//! adds a bounded command queue serviced at a fixed interval for handlers
//! that run outside the tick loop.

mod command;
mod outcome;
mod request;
mod runner;
mod status;

pub use command::{Command, CommandQueue};
pub use outcome::CommandOutcome;
pub use request::ShootRequest;
pub use runner::RailRunner;
pub use status::RailStatus;

use crate::camera::CameraTrigger;
use crate::config::units::Millimeters;
use crate::config::{RailConfig, ShootingSettings};
use crate::endstop::EndstopInput;
use crate::error::Result;
use crate::motor::MotionDriver;
use crate::rail::{Rail, RailState};
use crate::time::Instant;

/// Rail plus endstop input, driven by [`poll`](Self::poll).
pub struct RailControl<M, C, E>
where
    M: MotionDriver,
    C: CameraTrigger,
    E: EndstopInput,
{
    rail: Rail<M, C>,
    endstop: E,
}

impl<M, C, E> RailControl<M, C, E>
where
    M: MotionDriver,
    C: CameraTrigger,
    E: EndstopInput,
{
    /// Assemble a controller from its parts.
    pub fn new(motor: M, trigger: C, endstop: E, config: &RailConfig) -> Self {
        Self {
            rail: Rail::new(motor, trigger, config),
            endstop,
        }
    }

    /// Sample the endstop and tick the rail.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        let raw = self.endstop.is_triggered()?;
        self.rail.tick(now, raw)
    }

    /// Start homing.
    pub fn start_homing(&mut self) -> Result<CommandOutcome> {
        self.rail.start_homing()
    }

    /// Move to `position` mm.
    pub fn move_to(&mut self, position: f32) -> Result<CommandOutcome> {
        self.rail.move_to(Millimeters(position))
    }

    /// Move by `offset` mm.
    pub fn move_by(&mut self, offset: f32) -> Result<CommandOutcome> {
        self.rail.move_by(Millimeters(offset))
    }

    /// Start a photo sequence with complete settings.
    pub fn start_shooting(
        &mut self,
        settings: ShootingSettings,
        return_to_start: bool,
    ) -> Result<CommandOutcome> {
        self.rail.start_shooting(settings, return_to_start)
    }

    /// Start a photo sequence, overlaying `request` onto the current settings.
    pub fn shoot(&mut self, request: &ShootRequest) -> Result<CommandOutcome> {
        let settings = request.apply_to(self.rail.settings());
        self.rail.start_shooting(settings, request.return_to_start)
    }

    /// Stop.
    pub fn stop(&mut self) -> Result<CommandOutcome> {
        self.rail.stop()
    }

    /// Clear a latched fault.
    pub fn reset_emergency(&mut self) -> Result<CommandOutcome> {
        self.rail.reset_emergency()
    }

    /// Apply a queued command.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::Home => self.start_homing(),
            Command::MoveTo(position) => self.move_to(position),
            Command::MoveBy(offset) => self.move_by(offset),
            Command::Shoot(request) => self.shoot(&request),
            Command::Stop => self.stop(),
            Command::Reset => self.reset_emergency(),
        }
    }

    /// Snapshot for status clients.
    pub fn status(&self) -> RailStatus {
        let rail = &self.rail;
        let progress = rail.progress();

        RailStatus {
            position: rail.position().0,
            target: rail.target().0,
            steps: rail.steps().0,
            state: rail.state().status_name(),
            photo_count: progress.map_or(0, |p| p.photos_taken),
            total_photos: progress.map_or(rail.settings().photos, |p| p.total_photos),
            shooting: rail.state() == RailState::Shooting,
            endstop_raw: rail.endstop_raw(),
            endstop: rail.endstop_triggered(),
            homed: rail.is_homed(),
            fault: rail.last_fault(),
            homing: rail.homing_report().copied(),
        }
    }

    /// The underlying rail.
    pub fn rail(&self) -> &Rail<M, C> {
        &self.rail
    }

    /// Mutable access to the rail, for direct ticking.
    pub fn rail_mut(&mut self) -> &mut Rail<M, C> {
        &mut self.rail
    }

    /// The endstop input.
    pub fn endstop_mut(&mut self) -> &mut E {
        &mut self.endstop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::SimulatedMotor;

    struct NoTrigger;

    impl CameraTrigger for NoTrigger {
        fn set_focus(&mut self, _active: bool) -> Result<()> {
            Ok(())
        }

        fn set_shutter(&mut self, _active: bool) -> Result<()> {
            Ok(())
        }
    }

    fn control() -> RailControl<SimulatedMotor, NoTrigger, bool> {
        let config = RailConfig::default();
        let motor = SimulatedMotor::from_mechanics(&config.mechanics());
        RailControl::new(motor, NoTrigger, false, &config)
    }

    #[test]
    fn test_idle_status() {
        let control = control();
        let status = control.status();

        assert_eq!(status.state, "Ready");
        assert_eq!(status.steps, 0);
        assert_eq!(status.photo_count, 0);
        assert_eq!(status.total_photos, 3);
        assert!(!status.shooting);
        assert!(!status.homed);
        assert_eq!(status.fault, None);
    }

    #[test]
    fn test_shoot_request_reports_progress() {
        let mut control = control();
        let request = ShootRequest {
            photos: Some(7),
            ..ShootRequest::default()
        };

        assert_eq!(control.shoot(&request).unwrap(), CommandOutcome::Applied);
        let status = control.status();
        assert_eq!(status.state, "Shooting");
        assert!(status.shooting);
        assert_eq!(status.total_photos, 7);
        assert_eq!(control.rail().settings().photos, 7);
    }

    #[test]
    fn test_apply_dispatches() {
        let mut control = control();
        assert_eq!(control.apply(Command::Reset).unwrap(), CommandOutcome::Unchanged);
        assert_eq!(control.apply(Command::Home).unwrap(), CommandOutcome::Applied);
        assert_eq!(control.apply(Command::MoveTo(1.0)).unwrap(), CommandOutcome::RejectedBusy);
        assert_eq!(control.apply(Command::Stop).unwrap(), CommandOutcome::Applied);
        assert_eq!(control.status().state, "Ready");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_status_serializes() {
        let status = control().status();
        let text = toml::to_string(&status).unwrap();
        assert!(text.contains("state = \"Ready\""));
    }
}
