//! Motor module for macro-rail.
//!
//! Provides the [`MotionDriver`] abstraction the rail commands, a stepper
//! driver over embedded-hal pins, and a pin-free simulation of it.

mod builder;
mod driver;
mod position;
mod sim;

pub use builder::StepperMotorBuilder;
pub use driver::StepperMotor;
pub use position::Position;
pub use sim::SimulatedMotor;

use crate::config::units::Steps;
use crate::error::Result;
use crate::time::Instant;

/// A stepper actuator with an acceleration-limited, non-blocking step generator.
///
/// Commands only set targets; motion happens inside [`step`](Self::step),
/// which must be called at least as often as the shortest step interval.
/// [`remaining`](Self::remaining) reaching zero is the only arrival signal.
pub trait MotionDriver {
    /// Set an absolute target.
    fn move_to(&mut self, target: Steps);

    /// Set a target relative to the current position.
    fn move_by(&mut self, delta: i64) {
        let target = self.current_position().0.saturating_add(delta);
        self.move_to(Steps(target));
    }

    /// Redefine the current position without moving. Drops any pending move.
    fn set_current_position(&mut self, position: Steps);

    /// Current position.
    fn current_position(&self) -> Steps;

    /// Target position.
    fn target_position(&self) -> Steps;

    /// Signed steps left to the target.
    fn remaining(&self) -> i64 {
        self.target_position().0 - self.current_position().0
    }

    /// Signed speed in steps per second.
    fn speed(&self) -> f32;

    /// Set the speed ceiling in steps per second.
    fn set_max_speed(&mut self, steps_per_sec: f32);

    /// Set the acceleration in steps per second squared.
    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Stop immediately, without deceleration. The target collapses onto the
    /// current position.
    fn halt(&mut self);

    /// Advance the profile. Emits at most one step; none while disabled.
    ///
    /// Returns `true` if a step was emitted.
    fn step(&mut self, now: Instant) -> Result<bool>;

    /// Deliver current to the motor.
    fn enable(&mut self) -> Result<()>;

    /// Cut current to the motor. Queued commands are kept.
    fn disable(&mut self) -> Result<()>;

    /// Whether the motor is energized.
    fn is_enabled(&self) -> bool;
}
