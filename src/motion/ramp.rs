//! Non-blocking acceleration ramp.
//!
//! Computes the interval to the next step on the fly, one step at a time,
//! using David Austin's approximation of a constant-acceleration ramp
//! ("Generate stepper-motor speed profiles in real time", 2005):
//!
//! ```text
//! c0 = 0.676 * sqrt(2 / a)         first interval (seconds)
//! cn = cn-1 - 2 * cn-1 / (4n + 1)  subsequent intervals
//! ```
//!
//! Because nothing is precomputed, the target can change mid-move: the ramp
//! decelerates, reverses if needed, and re-accelerates toward the new target.

use libm::sqrtf;

use crate::time::Instant;

/// Direction of carriage motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Away from the endstop (increasing step count).
    Forward,
    /// Toward the endstop (decreasing step count).
    Reverse,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise speed.
    Accelerating,
    /// Moving at the speed ceiling.
    Cruising,
    /// Decelerating toward rest.
    Decelerating,
    /// No step pending.
    Complete,
}

/// Step scheduler with a trapezoidal speed profile.
///
/// Owns the open-loop position counter. Call [`run`](Self::run) as often as
/// possible; it emits at most one step per call.
#[derive(Debug, Clone)]
pub struct SpeedRamp {
    current: i64,
    target: i64,
    /// Signed speed in steps per second.
    speed: f32,
    max_speed: f32,
    acceleration: f32,
    /// Microseconds to the next step, 0 when stopped.
    step_interval_us: u32,
    last_step: Instant,
    /// Ramp step counter, negative while decelerating.
    n: i64,
    c0: f32,
    cn: f32,
    cmin: f32,
    direction: Direction,
}

impl SpeedRamp {
    /// Create a stopped ramp at position 0.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        let mut ramp = Self {
            current: 0,
            target: 0,
            speed: 0.0,
            max_speed: 0.0,
            acceleration: 0.0,
            step_interval_us: 0,
            last_step: Instant::ZERO,
            n: 0,
            c0: 0.0,
            cn: 0.0,
            cmin: 1.0,
            direction: Direction::Forward,
        };
        ramp.set_max_speed(max_speed);
        ramp.set_acceleration(acceleration);
        ramp
    }

    /// Current position in steps.
    #[inline]
    pub fn current_position(&self) -> i64 {
        self.current
    }

    /// Target position in steps.
    #[inline]
    pub fn target_position(&self) -> i64 {
        self.target
    }

    /// Signed distance from the current position to the target.
    #[inline]
    pub fn distance_to_go(&self) -> i64 {
        self.target - self.current
    }

    /// Signed speed in steps per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed ceiling in steps per second.
    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Acceleration in steps per second squared.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Direction of the current or last step.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current phase of the profile.
    pub fn phase(&self) -> MotionPhase {
        if self.step_interval_us == 0 {
            MotionPhase::Complete
        } else if self.n < 0 {
            MotionPhase::Decelerating
        } else if self.cn <= self.cmin {
            MotionPhase::Cruising
        } else {
            MotionPhase::Accelerating
        }
    }

    /// Whether a step is still pending or the carriage is still moving.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.speed != 0.0 || self.distance_to_go() != 0
    }

    /// Set the speed ceiling in steps per second. Non-positive values are ignored.
    pub fn set_max_speed(&mut self, steps_per_sec: f32) {
        if !(steps_per_sec.is_finite() && steps_per_sec > 0.0) || self.max_speed == steps_per_sec {
            return;
        }
        self.max_speed = steps_per_sec;
        // One step per microsecond at most: a zero interval reads as stopped
        self.cmin = (1_000_000.0 / steps_per_sec).max(1.0);
        // Already accelerating: recompute where on the ramp we are
        if self.n > 0 && self.acceleration > 0.0 {
            self.n = (self.speed * self.speed / (2.0 * self.acceleration)) as i64;
            self.compute_new_speed();
        }
    }

    /// Set the acceleration in steps per second squared. Non-positive values are ignored.
    pub fn set_acceleration(&mut self, steps_per_sec2: f32) {
        if !(steps_per_sec2.is_finite() && steps_per_sec2 > 0.0) || self.acceleration == steps_per_sec2 {
            return;
        }
        if self.acceleration > 0.0 {
            // Keep the current speed: rescale the ramp counter to the new slope
            self.n = (self.n as f32 * (self.acceleration / steps_per_sec2)) as i64;
        }
        self.c0 = 0.676 * sqrtf(2.0 / steps_per_sec2) * 1_000_000.0;
        self.acceleration = steps_per_sec2;
        self.compute_new_speed();
    }

    /// Set an absolute target.
    pub fn move_to(&mut self, target: i64) {
        if self.target != target {
            self.target = target;
            self.compute_new_speed();
        }
    }

    /// Set a target relative to the current position.
    pub fn move_by(&mut self, delta: i64) {
        self.move_to(self.current.saturating_add(delta));
    }

    /// Redefine the current position without moving. Drops any pending move.
    pub fn set_current_position(&mut self, position: i64) {
        self.current = position;
        self.target = position;
        self.halt();
    }

    /// Stop immediately: no deceleration, target collapses onto the current position.
    pub fn halt(&mut self) {
        self.target = self.current;
        self.n = 0;
        self.step_interval_us = 0;
        self.speed = 0.0;
    }

    /// Direction of the step due at `now`, without emitting it.
    pub fn due(&self, now: Instant) -> Option<Direction> {
        if self.step_interval_us == 0 {
            return None;
        }
        if now.saturating_duration_since(self.last_step).as_micros() < self.step_interval_us as u128 {
            return None;
        }
        Some(self.direction)
    }

    /// Emit one step if it is due at `now`.
    ///
    /// Returns the direction of the emitted step, or `None` when no step was
    /// due. Drivers check [`due`](Self::due) and pulse the STEP line first, then
    /// call this to count the step.
    pub fn run(&mut self, now: Instant) -> Option<Direction> {
        let direction = self.due(now)?;
        self.current += direction.sign();
        self.last_step = now;
        self.compute_new_speed();
        Some(direction)
    }

    fn compute_new_speed(&mut self) {
        if self.acceleration <= 0.0 {
            return;
        }

        let distance_to = self.distance_to_go();
        let steps_to_stop = (self.speed * self.speed / (2.0 * self.acceleration)) as i64;

        if distance_to == 0 && steps_to_stop <= 1 {
            // Arrived
            self.step_interval_us = 0;
            self.speed = 0.0;
            self.n = 0;
            return;
        }

        if distance_to > 0 {
            // Target ahead
            if self.n > 0 {
                if steps_to_stop >= distance_to || self.direction == Direction::Reverse {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0 && steps_to_stop < distance_to && self.direction == Direction::Forward {
                self.n = -self.n;
            }
        } else if distance_to < 0 {
            // Target behind
            if self.n > 0 {
                if steps_to_stop >= -distance_to || self.direction == Direction::Forward {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0 && steps_to_stop < -distance_to && self.direction == Direction::Reverse {
                self.n = -self.n;
            }
        }

        if self.n == 0 {
            // First step from rest
            self.cn = self.c0.max(self.cmin);
            self.direction = Direction::from_steps(distance_to);
        } else {
            self.cn -= (2.0 * self.cn) / ((4 * self.n + 1) as f32);
            self.cn = self.cn.max(self.cmin);
        }
        self.n += 1;
        self.step_interval_us = (self.cn as u32).max(1);
        self.speed = 1_000_000.0 / self.cn;
        if self.direction == Direction::Reverse {
            self.speed = -self.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the ramp with a fixed tick until it settles, returning the peak speed.
    fn run_until_idle(ramp: &mut SpeedRamp, start: Instant, tick_us: u64) -> (f32, Instant) {
        let mut now = start;
        let mut peak = 0.0f32;
        for _ in 0..10_000_000 {
            ramp.run(now);
            peak = peak.max(ramp.speed().abs());
            if !ramp.is_running() {
                break;
            }
            now = Instant::from_micros(now.as_micros() + tick_us);
        }
        (peak, now)
    }

    #[test]
    fn test_reaches_target_exactly() {
        let mut ramp = SpeedRamp::new(1_000.0, 10_000.0);
        ramp.move_to(2_500);

        let _ = run_until_idle(&mut ramp, Instant::ZERO, 10);

        assert_eq!(ramp.current_position(), 2_500);
        assert_eq!(ramp.distance_to_go(), 0);
        assert_eq!(ramp.phase(), MotionPhase::Complete);
    }

    #[test]
    fn test_never_exceeds_max_speed() {
        let mut ramp = SpeedRamp::new(800.0, 50_000.0);
        ramp.move_to(-3_000);

        let (peak, _) = run_until_idle(&mut ramp, Instant::ZERO, 10);

        assert_eq!(ramp.current_position(), -3_000);
        assert!(peak <= 800.0 + 0.5, "peak speed {} above ceiling", peak);
    }

    #[test]
    fn test_phase_transitions() {
        let mut ramp = SpeedRamp::new(1_000.0, 5_000.0);
        ramp.move_to(2_000);

        let mut saw_accel = false;
        let mut saw_cruise = false;
        let mut saw_decel = false;
        let mut now = Instant::ZERO;
        while ramp.is_running() {
            match ramp.phase() {
                MotionPhase::Accelerating => saw_accel = true,
                MotionPhase::Cruising => saw_cruise = true,
                MotionPhase::Decelerating => saw_decel = true,
                MotionPhase::Complete => {}
            }
            ramp.run(now);
            now = Instant::from_micros(now.as_micros() + 10);
        }

        assert!(saw_accel);
        assert!(saw_cruise);
        assert!(saw_decel);
    }

    #[test]
    fn test_halt_drops_pending_move() {
        let mut ramp = SpeedRamp::new(1_000.0, 10_000.0);
        ramp.move_to(500);
        let mut now = Instant::ZERO;
        for _ in 0..5_000 {
            ramp.run(now);
            now = Instant::from_micros(now.as_micros() + 10);
        }
        assert!(ramp.current_position() > 0);

        ramp.halt();
        let stopped_at = ramp.current_position();
        assert_eq!(ramp.distance_to_go(), 0);
        assert_eq!(ramp.speed(), 0.0);
        assert_eq!(ramp.run(Instant::from_micros(now.as_micros() + 1_000_000)), None);
        assert_eq!(ramp.current_position(), stopped_at);
    }

    #[test]
    fn test_retarget_reverses() {
        let mut ramp = SpeedRamp::new(1_000.0, 10_000.0);
        ramp.move_to(1_000);
        let mut now = Instant::ZERO;
        for _ in 0..20_000 {
            ramp.run(now);
            now = Instant::from_micros(now.as_micros() + 10);
        }

        ramp.move_to(-200);
        let _ = run_until_idle(&mut ramp, now, 10);
        assert_eq!(ramp.current_position(), -200);
    }

    #[test]
    fn test_set_current_position_rezeroes() {
        let mut ramp = SpeedRamp::new(1_000.0, 10_000.0);
        ramp.move_to(100);
        ramp.set_current_position(0);

        assert_eq!(ramp.current_position(), 0);
        assert_eq!(ramp.target_position(), 0);
        assert!(!ramp.is_running());
    }

    #[test]
    fn test_ceiling_above_one_step_per_microsecond_still_arrives() {
        // 200 mm/s and 50 000 mm/s² at 7266.67 steps/mm
        let mut ramp = SpeedRamp::new(1_453_333.0, 363_333_333.0);
        ramp.move_to(36_333);

        let (peak, _) = run_until_idle(&mut ramp, Instant::ZERO, 1);

        assert_eq!(ramp.current_position(), 36_333);
        assert_eq!(ramp.phase(), MotionPhase::Complete);
        assert!(peak <= 1_000_000.0 + 0.5, "peak speed {}", peak);
    }

    #[test]
    fn test_step_intervals_respect_ceiling() {
        let mut ramp = SpeedRamp::new(500.0, 1_000_000.0);
        ramp.move_to(50);

        // At 500 steps/s two steps are at least 2 ms apart
        let mut now = Instant::ZERO;
        let mut last: Option<Instant> = None;
        while ramp.is_running() {
            if ramp.run(now).is_some() {
                if let Some(prev) = last {
                    assert!(now.saturating_duration_since(prev).as_micros() >= 2_000);
                }
                last = Some(now);
            }
            now = Instant::from_micros(now.as_micros() + 10);
        }
    }
}
