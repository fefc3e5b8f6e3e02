//! The rail state machine.
//!
//! [`Rail`] owns the motor, the camera trigger and the endstop debouncer, and
//! advances homing, positioning and photo sequences one non-blocking
//! [`tick`](Rail::tick) at a time. Commands only change state when the
//! current state allows it and report what happened as a [`CommandOutcome`].
//!
//! Each tick evaluates the endstop safety check before any normal
//! progression, so a fault always wins over a pending stage transition.

mod homing;
mod shooting;
mod state;

pub use homing::HomingReport;
pub use shooting::{ShootingProgress, ShootingStage};
pub use state::{FaultKind, RailState};

use homing::HomingRun;
use shooting::ShootingRun;

use crate::camera::CameraTrigger;
use crate::config::units::{Millimeters, Steps};
use crate::config::{HomingConfig, RailConfig, RailMechanics, ShootingSettings};
use crate::control::CommandOutcome;
use crate::endstop::Debouncer;
use crate::error::Result;
use crate::motor::MotionDriver;
use crate::time::Instant;

/// Single-axis macro rail.
///
/// Generic over the motion driver and camera trigger so the same state
/// machine runs against GPIO or against [`SimulatedMotor`](crate::motor::SimulatedMotor)
/// in tests.
pub struct Rail<M, C>
where
    M: MotionDriver,
    C: CameraTrigger,
{
    motor: M,
    trigger: C,
    mechanics: RailMechanics,
    homing_config: HomingConfig,
    debouncer: Debouncer,
    state: RailState,
    settings: ShootingSettings,
    homing: Option<HomingRun>,
    shooting: Option<ShootingRun>,
    report: Option<HomingReport>,
    homed: bool,
    last_fault: Option<FaultKind>,
    now: Instant,
}

impl<M, C> Rail<M, C>
where
    M: MotionDriver,
    C: CameraTrigger,
{
    /// Create an idle, unhomed rail.
    pub fn new(motor: M, trigger: C, config: &RailConfig) -> Self {
        Self {
            motor,
            trigger,
            mechanics: config.mechanics(),
            homing_config: config.homing.clone(),
            debouncer: Debouncer::new(config.endstop.debounce.to_duration(), false),
            state: RailState::Idle,
            settings: config.shooting,
            homing: None,
            shooting: None,
            report: None,
            homed: false,
            last_fault: None,
            now: Instant::ZERO,
        }
    }

    // ---- queries ----

    /// Current state.
    #[inline]
    pub fn state(&self) -> RailState {
        self.state
    }

    /// Current position in millimeters.
    pub fn position(&self) -> Millimeters {
        self.mechanics.steps_to_mm(self.motor.current_position())
    }

    /// Target position in millimeters.
    pub fn target(&self) -> Millimeters {
        self.mechanics.steps_to_mm(self.motor.target_position())
    }

    /// Current position in raw steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.motor.current_position()
    }

    /// Shooting settings of the current or most recent run.
    #[inline]
    pub fn settings(&self) -> &ShootingSettings {
        &self.settings
    }

    /// Progress of the running photo sequence.
    pub fn progress(&self) -> Option<ShootingProgress> {
        self.shooting.as_ref().map(|run| run.progress)
    }

    /// Whether homing has completed since the last fault.
    #[inline]
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Cause of the most recent fault.
    #[inline]
    pub fn last_fault(&self) -> Option<FaultKind> {
        self.last_fault
    }

    /// Diagnostics of the most recent endstop trigger during homing.
    #[inline]
    pub fn homing_report(&self) -> Option<&HomingReport> {
        self.report.as_ref()
    }

    /// Last raw endstop sample.
    #[inline]
    pub fn endstop_raw(&self) -> bool {
        self.debouncer.raw()
    }

    /// Debounced endstop level.
    #[inline]
    pub fn endstop_triggered(&self) -> bool {
        self.debouncer.level()
    }

    /// Derived mechanical parameters.
    #[inline]
    pub fn mechanics(&self) -> &RailMechanics {
        &self.mechanics
    }

    /// The motion driver.
    #[inline]
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// The camera trigger.
    #[inline]
    pub fn trigger(&self) -> &C {
        &self.trigger
    }

    /// Time of the last tick.
    #[inline]
    pub fn now(&self) -> Instant {
        self.now
    }

    // ---- commands ----

    /// Start homing toward the endstop. Only accepted from `Idle`.
    pub fn start_homing(&mut self) -> Result<CommandOutcome> {
        if let Some(rejected) = self.reject_unless_idle("start_homing") {
            return Ok(rejected);
        }

        let start = self.motor.current_position();
        let travel = self.mechanics.max_travel_steps() + self.retract_steps();

        self.motor.enable()?;
        self.motor
            .set_max_speed(self.mechanics.speed_to_steps(self.homing_config.speed));
        self.motor.set_acceleration(
            self.mechanics
                .acceleration_to_steps(self.homing_config.acceleration),
        );
        self.motor.move_by(-travel);

        self.homing = Some(HomingRun::new(self.now, start));
        self.homed = false;
        info!("Homing started at {} steps", start.0);
        self.transition(RailState::Homing);
        Ok(CommandOutcome::Applied)
    }

    /// Move to an absolute position, clamped to the travel.
    ///
    /// Accepted from `Idle` and from `Shooting`, where it abandons the photo
    /// sequence.
    pub fn move_to(&mut self, position: Millimeters) -> Result<CommandOutcome> {
        match self.state {
            RailState::Idle | RailState::Shooting => {}
            RailState::Error => {
                warn!("move_to ignored: rail in error");
                return Ok(CommandOutcome::RejectedFault);
            }
            _ => {
                warn!("move_to ignored: rail busy ({})", self.state.status_name());
                return Ok(CommandOutcome::RejectedBusy);
            }
        }

        if !position.0.is_finite() {
            warn!("move_to ignored: position is not a number");
            return Ok(CommandOutcome::RejectedBounds);
        }

        let target = self.mechanics.clamp_target(position);
        if target != self.mechanics.mm_to_steps(position) {
            debug!("Target {} mm clamped to {} steps", position.0, target.0);
        }

        if self.state == RailState::Shooting {
            info!("Shooting abandoned for move");
            self.shooting = None;
            self.trigger.release()?;
        }

        self.motor.enable()?;
        self.apply_motion_settings();
        self.motor.move_to(target);
        info!(
            "Move {} -> {} steps",
            self.motor.current_position().0,
            target.0
        );
        self.transition(RailState::Moving);
        Ok(CommandOutcome::Applied)
    }

    /// Move relative to the current position.
    pub fn move_by(&mut self, offset: Millimeters) -> Result<CommandOutcome> {
        if !offset.0.is_finite() {
            warn!("move_by ignored: offset is not a number");
            return Ok(CommandOutcome::RejectedBounds);
        }
        let target = self.position() + offset;
        self.move_to(target)
    }

    /// Start a photo sequence from the current position. Only accepted from `Idle`.
    ///
    /// The first photo is taken where the carriage stands. With
    /// `return_to_start` the carriage moves back to this position once the
    /// last photo is taken.
    pub fn start_shooting(
        &mut self,
        settings: ShootingSettings,
        return_to_start: bool,
    ) -> Result<CommandOutcome> {
        if let Some(rejected) = self.reject_unless_idle("start_shooting") {
            return Ok(rejected);
        }

        if settings.validate().is_err() {
            warn!("start_shooting ignored: invalid settings");
            return Ok(CommandOutcome::RejectedBounds);
        }

        self.settings = settings;
        let start = self.motor.current_position();
        self.shooting = Some(ShootingRun::new(settings, self.now, start, return_to_start));

        self.motor.enable()?;
        self.apply_motion_settings();
        info!(
            "Shooting started: {} photos, step {} mm, speed {} mm/s",
            settings.photos,
            settings.step.0,
            settings.max_speed.0
        );
        self.transition(RailState::Shooting);
        Ok(CommandOutcome::Applied)
    }

    /// Stop whatever is running and return to `Idle`.
    ///
    /// In `Error` the motor is made safe but the fault stays latched until
    /// [`reset_emergency`](Self::reset_emergency).
    pub fn stop(&mut self) -> Result<CommandOutcome> {
        let at_rest = self.motor.remaining() == 0 && !self.motor.is_enabled();
        match self.state {
            RailState::Idle if at_rest => return Ok(CommandOutcome::Unchanged),
            RailState::Error if at_rest => return Ok(CommandOutcome::Unchanged),
            _ => {}
        }

        self.motor.halt();
        self.homing = None;
        self.shooting = None;
        let disabled = self.motor.disable();
        let released = self.trigger.release();

        if self.state != RailState::Error {
            info!("Movement stopped");
            self.transition(RailState::Idle);
        }
        disabled?;
        released?;
        Ok(CommandOutcome::Applied)
    }

    /// Clear a latched fault. Refused while the endstop is asserted.
    pub fn reset_emergency(&mut self) -> Result<CommandOutcome> {
        if self.state != RailState::Error {
            return Ok(CommandOutcome::Unchanged);
        }
        if self.debouncer.level() {
            warn!("Reset refused: endstop still asserted");
            return Ok(CommandOutcome::RejectedFault);
        }

        info!("Emergency cleared");
        self.transition(RailState::Idle);
        Ok(CommandOutcome::Applied)
    }

    // ---- tick ----

    /// Advance the state machine by one step.
    ///
    /// `endstop_raw` is the undebounced switch level sampled at `now`.
    pub fn tick(&mut self, now: Instant, endstop_raw: bool) -> Result<()> {
        self.now = now;
        let endstop = self.debouncer.sample(endstop_raw, now);

        match self.state {
            RailState::Idle | RailState::Error => Ok(()),
            RailState::Homing => self.tick_homing(now, endstop),
            RailState::HomingRetract => self.tick_retract(now, endstop),
            RailState::Moving | RailState::Shooting if endstop => {
                self.emergency_stop(FaultKind::EndstopTriggered)
            }
            RailState::Moving => self.tick_moving(now),
            RailState::Shooting => self.tick_shooting(now),
        }
    }

    fn tick_homing(&mut self, now: Instant, endstop: bool) -> Result<()> {
        let Some(run) = self.homing.as_mut() else {
            return self.settle_idle();
        };

        if let Some(deadline) = run.settle_until {
            if now < deadline {
                return Ok(());
            }
            run.settle_until = None;
            run.retract_started = Some(now);

            let retract = self.retract_steps();
            let speed = self
                .mechanics
                .speed_to_steps(self.settings.max_speed.min(self.homing_config.speed));
            self.motor.enable()?;
            self.motor.set_max_speed(speed);
            self.motor.move_by(retract);
            debug!("Retracting {} steps", retract);
            self.transition(RailState::HomingRetract);
            return Ok(());
        }

        if endstop && !run.triggered {
            run.triggered = true;
            let position = self.motor.current_position();
            let report = HomingReport::capture(
                run,
                now,
                position,
                self.mechanics.steps_per_mm,
                self.motor.speed(),
            );
            run.settle_until = Some(now + self.homing_config.settle.to_duration());

            self.motor.halt();
            self.motor.disable()?;
            info!(
                "Endstop hit: {} steps in {} ms, avg {} mm/s, final {} steps/s",
                report.steps_moved,
                report.elapsed_ms,
                report.average_mm_per_sec,
                report.final_steps_per_sec
            );
            self.report = Some(report);
            return Ok(());
        }

        self.motor.step(now)?;
        if self.motor.remaining() == 0 {
            return self.emergency_stop(FaultKind::EndstopNotFound);
        }
        Ok(())
    }

    fn tick_retract(&mut self, now: Instant, endstop: bool) -> Result<()> {
        let started = self
            .homing
            .as_ref()
            .and_then(|run| run.retract_started)
            .unwrap_or(now);
        if now.has_elapsed(started, self.homing_config.retract_timeout.to_duration()) {
            return self.emergency_stop(FaultKind::RetractTimeout);
        }

        self.motor.step(now)?;
        if self.motor.remaining() != 0 {
            return Ok(());
        }
        if endstop {
            // The debounced level trails the carriage by up to one window
            let window = self.debouncer.window();
            let arrived = match self.homing.as_mut() {
                Some(run) => *run.arrived_on_switch.get_or_insert(now),
                None => now,
            };
            if now.has_elapsed(arrived, window) {
                return self.emergency_stop(FaultKind::RetractBlocked);
            }
            return Ok(());
        }

        self.motor.set_current_position(Steps(0));
        self.homing = None;
        self.homed = true;
        info!("Homing complete, zero set");
        self.settle_idle()
    }

    fn tick_moving(&mut self, now: Instant) -> Result<()> {
        self.motor.step(now)?;
        if self.motor.remaining() == 0 {
            debug!("Move complete at {} steps", self.motor.current_position().0);
            return self.settle_idle();
        }
        Ok(())
    }

    fn tick_shooting(&mut self, now: Instant) -> Result<()> {
        let Some(run) = self.shooting.as_mut() else {
            return self.settle_idle();
        };
        let settings = run.settings;

        match run.progress.stage {
            ShootingStage::Advancing => {
                self.motor.step(now)?;
                if self.motor.remaining() == 0 {
                    self.motor.halt();
                    self.motor.disable()?;
                    run.enter(ShootingStage::PreShootDelay, now);
                }
            }
            ShootingStage::PreShootDelay => {
                if run.stage_elapsed(now, settings.before_shoot_delay) {
                    self.trigger.set_focus(true)?;
                    run.enter(ShootingStage::Focusing, now);
                }
            }
            ShootingStage::Focusing => {
                if run.stage_elapsed(now, settings.focus_time) {
                    self.trigger.set_shutter(true)?;
                    run.enter(ShootingStage::Releasing, now);
                }
            }
            ShootingStage::Releasing => {
                if run.stage_elapsed(now, settings.release_time) {
                    self.trigger.release()?;
                    run.progress.photos_taken += 1;
                    info!(
                        "Photo {}/{} taken",
                        run.progress.photos_taken,
                        run.progress.total_photos
                    );
                    run.enter(ShootingStage::PostShootDelay, now);
                }
            }
            ShootingStage::PostShootDelay => {
                if !run.stage_elapsed(now, settings.after_shoot_delay) {
                    return Ok(());
                }
                if run.is_complete() {
                    return self.finish_shooting();
                }

                let step = self.mechanics.mm_to_steps(settings.step);
                let next = self.motor.current_position() + step;
                let next = Steps(self.mechanics.limits.clamp(next.0));
                self.motor.enable()?;
                self.motor.move_to(next);
                run.enter(ShootingStage::Advancing, now);
            }
        }
        Ok(())
    }

    fn finish_shooting(&mut self) -> Result<()> {
        let run = self.shooting.take();
        info!("Shooting complete");
        self.settle_idle()?;

        if let Some(run) = run {
            if run.return_to_start {
                let start = self.mechanics.steps_to_mm(run.start_position);
                self.move_to(start)?;
            }
        }
        Ok(())
    }

    // ---- helpers ----

    fn reject_unless_idle(&self, _command: &'static str) -> Option<CommandOutcome> {
        match self.state {
            RailState::Idle => None,
            RailState::Error => {
                warn!("{} ignored: rail in error", _command);
                Some(CommandOutcome::RejectedFault)
            }
            _ => {
                warn!("{} ignored: rail busy ({})", _command, self.state.status_name());
                Some(CommandOutcome::RejectedBusy)
            }
        }
    }

    fn retract_steps(&self) -> i64 {
        self.mechanics.mm_to_steps(self.homing_config.retract).0.max(1)
    }

    fn apply_motion_settings(&mut self) {
        self.motor
            .set_max_speed(self.mechanics.speed_to_steps(self.settings.max_speed));
        self.motor
            .set_acceleration(self.mechanics.acceleration_steps_per_sec2);
    }

    /// Bring the motor to rest and enter `Idle`.
    fn settle_idle(&mut self) -> Result<()> {
        self.motor.halt();
        self.transition(RailState::Idle);
        self.motor.disable()
    }

    /// Hard stop on a mechanical fault. The state is latched before any pin
    /// is touched so a failing write cannot leave the rail running.
    fn emergency_stop(&mut self, kind: FaultKind) -> Result<()> {
        self.motor.halt();
        self.homing = None;
        self.shooting = None;
        self.homed = false;
        self.last_fault = Some(kind);
        error!("EMERGENCY STOP: {}", kind);
        self.transition(RailState::Error);

        let disabled = self.motor.disable();
        let released = self.trigger.release();
        disabled?;
        released
    }

    fn transition(&mut self, next: RailState) {
        if self.state != next {
            debug!("{} -> {}", self.state, next);
            self.state = next;
        }
    }
}
