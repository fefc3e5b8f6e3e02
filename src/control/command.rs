//! Queued control commands.

use heapless::Deque;

use super::outcome::CommandOutcome;
use super::request::ShootRequest;

/// One control operation, as received from a request handler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start homing.
    Home,
    /// Move to an absolute position in mm.
    MoveTo(f32),
    /// Move by an offset in mm.
    MoveBy(f32),
    /// Start a photo sequence, merging the request onto the current settings.
    Shoot(ShootRequest),
    /// Stop whatever is running.
    Stop,
    /// Clear a latched fault.
    Reset,
}

impl Command {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Home => "home",
            Command::MoveTo(_) => "move_to",
            Command::MoveBy(_) => "move_by",
            Command::Shoot(_) => "shoot",
            Command::Stop => "stop",
            Command::Reset => "reset",
        }
    }
}

/// Bounded FIFO of pending commands.
#[derive(Debug, Default)]
pub struct CommandQueue<const N: usize> {
    pending: Deque<Command, N>,
}

impl<const N: usize> CommandQueue<N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self { pending: Deque::new() }
    }

    /// Queue a command. A full queue rejects it as busy.
    pub fn push(&mut self, command: Command) -> CommandOutcome {
        match self.pending.push_back(command) {
            Ok(()) => CommandOutcome::Applied,
            Err(_) => {
                warn!("Command queue full, {} dropped", command.name());
                CommandOutcome::RejectedBusy
            }
        }
    }

    /// Take the oldest command.
    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    /// Drop every pending command.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of pending commands.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue: CommandQueue<4> = CommandQueue::new();
        assert!(queue.push(Command::Home).is_applied());
        assert!(queue.push(Command::MoveTo(3.0)).is_applied());

        assert_eq!(queue.pop(), Some(Command::Home));
        assert_eq!(queue.pop(), Some(Command::MoveTo(3.0)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_full_queue_rejects_busy() {
        let mut queue: CommandQueue<2> = CommandQueue::new();
        queue.push(Command::Home);
        queue.push(Command::Stop);

        assert_eq!(queue.push(Command::Reset), CommandOutcome::RejectedBusy);
        assert_eq!(queue.len(), 2);
    }
}
