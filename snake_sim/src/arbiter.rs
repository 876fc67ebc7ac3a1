//! Merges keyboard and gesture direction requests into one pending heading.
//!
//! Rule: a request is accepted only if it does not reverse the snake's
//! *current* heading.  The last accepted request before a step wins, and the
//! pending value is sticky between ticks.

use crate::geometry::Direction;

/// Where a direction request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestSource {
    Keyboard,
    Gesture,
}

#[derive(Clone, Debug)]
pub struct InputArbiter {
    pending:     Direction,
    last_source: Option<RequestSource>,
}

impl Default for InputArbiter {
    fn default() -> Self {
        InputArbiter::new(Direction::Right)
    }
}

impl InputArbiter {
    pub fn new(initial: Direction) -> Self {
        InputArbiter { pending: initial, last_source: None }
    }

    /// Offer a request.  Returns `true` if it replaced the pending direction.
    pub fn submit(&mut self, requested: Direction, source: RequestSource, current: Direction) -> bool {
        if requested.is_opposite(current) {
            return false;
        }
        self.pending = requested;
        self.last_source = Some(source);
        true
    }

    pub fn pending(&self) -> Direction { self.pending }

    /// Source of the request currently pending, if any was accepted since
    /// the last reset.
    pub fn last_source(&self) -> Option<RequestSource> { self.last_source }

    /// Re-seed after a restart.
    pub fn reset(&mut self, direction: Direction) {
        self.pending = direction;
        self.last_source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_never_accepted() {
        for current in Direction::ALL {
            for source in [RequestSource::Keyboard, RequestSource::Gesture] {
                let mut arb = InputArbiter::new(current);
                assert!(!arb.submit(current.opposite(), source, current));
                assert_eq!(arb.pending(), current);
                assert_eq!(arb.last_source(), None);
            }
        }
    }

    #[test]
    fn last_valid_request_wins() {
        let mut arb = InputArbiter::new(Direction::Right);
        assert!(arb.submit(Direction::Up, RequestSource::Keyboard, Direction::Right));
        assert!(arb.submit(Direction::Down, RequestSource::Gesture, Direction::Right));
        assert!(!arb.submit(Direction::Left, RequestSource::Keyboard, Direction::Right));
        assert_eq!(arb.pending(), Direction::Down);
        assert_eq!(arb.last_source(), Some(RequestSource::Gesture));
    }

    #[test]
    fn check_is_against_current_not_pending() {
        // Pending Up while still moving Right: Down is not a reversal of Right.
        let mut arb = InputArbiter::new(Direction::Right);
        arb.submit(Direction::Up, RequestSource::Keyboard, Direction::Right);
        assert!(arb.submit(Direction::Down, RequestSource::Keyboard, Direction::Right));
        assert_eq!(arb.pending(), Direction::Down);
    }

    #[test]
    fn pending_is_sticky_and_resettable() {
        let mut arb = InputArbiter::default();
        arb.submit(Direction::Down, RequestSource::Gesture, Direction::Right);
        assert_eq!(arb.pending(), Direction::Down);
        assert_eq!(arb.pending(), Direction::Down);
        arb.reset(Direction::Right);
        assert_eq!(arb.pending(), Direction::Right);
        assert_eq!(arb.last_source(), None);
    }
}
