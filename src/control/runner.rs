//! Cooperative tick loop with a serviced command queue.

use core::time::Duration;

use crate::camera::CameraTrigger;
use crate::config::ControlConfig;
use crate::endstop::EndstopInput;
use crate::error::Result;
use crate::motor::MotionDriver;
use crate::time::{Clock, Instant};

use super::command::{Command, CommandQueue};
use super::outcome::CommandOutcome;
use super::RailControl;

/// Drives a [`RailControl`]: ticks on every call and applies queued commands
/// at the service interval, always between two ticks.
///
/// [`Command::Stop`] bypasses the queue: it drops pending commands and is
/// applied on submission.
pub struct RailRunner<M, C, E, const N: usize = 8>
where
    M: MotionDriver,
    C: CameraTrigger,
    E: EndstopInput,
{
    control: RailControl<M, C, E>,
    queue: CommandQueue<N>,
    service_interval: Duration,
    last_service: Option<Instant>,
    home_on_start: bool,
    last_outcome: Option<CommandOutcome>,
}

impl<M, C, E, const N: usize> RailRunner<M, C, E, N>
where
    M: MotionDriver,
    C: CameraTrigger,
    E: EndstopInput,
{
    /// Wrap a controller.
    pub fn new(control: RailControl<M, C, E>, config: &ControlConfig) -> Self {
        Self {
            control,
            queue: CommandQueue::new(),
            service_interval: config.service_interval.to_duration(),
            last_service: None,
            home_on_start: config.home_on_start,
            last_outcome: None,
        }
    }

    /// Queue the boot sequence.
    pub fn start(&mut self) -> CommandOutcome {
        if self.home_on_start {
            info!("Homing on start");
            self.queue.push(Command::Home)
        } else {
            CommandOutcome::Unchanged
        }
    }

    /// Hand in a command from a request handler.
    pub fn submit(&mut self, command: Command) -> Result<CommandOutcome> {
        if command == Command::Stop {
            self.queue.clear();
            let outcome = self.control.stop()?;
            self.last_outcome = Some(outcome);
            return Ok(outcome);
        }
        Ok(self.queue.push(command))
    }

    /// One loop iteration at `now`.
    pub fn run_once(&mut self, now: Instant) -> Result<()> {
        self.control.poll(now)?;

        let due = match self.last_service {
            Some(last) => now.has_elapsed(last, self.service_interval),
            None => true,
        };
        if !due {
            return Ok(());
        }
        self.last_service = Some(now);

        while let Some(command) = self.queue.pop() {
            let outcome = self.control.apply(command)?;
            if outcome.is_rejected() {
                debug!("{} {}", command.name(), outcome);
            }
            self.last_outcome = Some(outcome);
        }
        Ok(())
    }

    /// One loop iteration at the clock's current time.
    pub fn run_with<K: Clock>(&mut self, clock: &K) -> Result<()> {
        self.run_once(clock.now())
    }

    /// Outcome of the most recently applied command.
    pub fn last_outcome(&self) -> Option<CommandOutcome> {
        self.last_outcome
    }

    /// Commands waiting for the next service slot.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The controller.
    pub fn control(&self) -> &RailControl<M, C, E> {
        &self.control
    }

    /// Mutable access to the controller.
    pub fn control_mut(&mut self) -> &mut RailControl<M, C, E> {
        &mut self.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RailConfig;
    use crate::motor::SimulatedMotor;
    use crate::rail::RailState;
    use core::cell::Cell;

    struct NoTrigger;

    impl CameraTrigger for NoTrigger {
        fn set_focus(&mut self, _active: bool) -> Result<()> {
            Ok(())
        }

        fn set_shutter(&mut self, _active: bool) -> Result<()> {
            Ok(())
        }
    }

    struct ManualClock(Cell<u64>);

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            Instant::from_millis(self.0.get())
        }
    }

    fn runner(home_on_start: bool) -> RailRunner<SimulatedMotor, NoTrigger, bool, 2> {
        let mut config = RailConfig::default();
        config.control.home_on_start = home_on_start;
        let motor = SimulatedMotor::from_mechanics(&config.mechanics());
        let control = RailControl::new(motor, NoTrigger, false, &config);
        RailRunner::new(control, &config.control)
    }

    #[test]
    fn test_start_queues_homing() {
        let mut runner = runner(true);
        assert_eq!(runner.start(), CommandOutcome::Applied);
        assert_eq!(runner.pending(), 1);

        runner.run_once(Instant::from_millis(0)).unwrap();
        assert_eq!(runner.control().rail().state(), RailState::Homing);
        assert_eq!(runner.last_outcome(), Some(CommandOutcome::Applied));
    }

    #[test]
    fn test_start_without_homing() {
        let mut runner = runner(false);
        assert_eq!(runner.start(), CommandOutcome::Unchanged);
        assert_eq!(runner.pending(), 0);
    }

    #[test]
    fn test_commands_wait_for_service_interval() {
        let mut runner = runner(false);
        let clock = ManualClock(Cell::new(0));

        runner.run_with(&clock).unwrap();
        runner.submit(Command::MoveTo(1.0)).unwrap();

        clock.0.set(49);
        runner.run_with(&clock).unwrap();
        assert_eq!(runner.control().rail().state(), RailState::Idle);

        clock.0.set(50);
        runner.run_with(&clock).unwrap();
        assert_eq!(runner.control().rail().state(), RailState::Moving);
    }

    #[test]
    fn test_full_queue_and_stop_bypass() {
        let mut runner = runner(false);
        assert!(runner.submit(Command::Home).unwrap().is_applied());
        assert!(runner.submit(Command::MoveTo(2.0)).unwrap().is_applied());
        assert_eq!(
            runner.submit(Command::Reset).unwrap(),
            CommandOutcome::RejectedBusy
        );

        assert_eq!(runner.submit(Command::Stop).unwrap(), CommandOutcome::Unchanged);
        assert_eq!(runner.pending(), 0);
    }
}
