//! Cooperative search budgets.
//!
//! Iterative deepening and MCTS poll a [`Budget`] between discrete units of
//! work (a full depth pass, or one playout round over all root moves). Work in
//! progress is never interrupted, so a single long unit can overshoot.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Decides whether another unit of search work may start.
pub trait Budget {
    fn expired(&self) -> bool;
}

/// Wall-clock deadline.
#[derive(Copy, Clone, Debug)]
pub struct Deadline(pub Instant);

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Deadline(Instant::now() + limit)
    }
}

impl Budget for Deadline {
    fn expired(&self) -> bool {
        Instant::now() >= self.0
    }
}

/// Never expires; the search stops on its own limits.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unlimited;

impl Budget for Unlimited {
    fn expired(&self) -> bool {
        false
    }
}

/// Allows a fixed number of polls to succeed, then expires.
///
/// Deterministic stand-in for a clock, used to drive time-boxed searches
/// unit by unit.
#[derive(Debug)]
pub struct Polls {
    left: Cell<usize>,
}

impl Polls {
    pub fn new(n: usize) -> Self {
        Self { left: Cell::new(n) }
    }
}

impl Budget for Polls {
    fn expired(&self) -> bool {
        match self.left.get() {
            0 => true,
            n => {
                self.left.set(n - 1);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polls_count_down() {
        let budget = Polls::new(2);
        assert!(!budget.expired());
        assert!(!budget.expired());
        assert!(budget.expired());
        assert!(budget.expired());
    }

    #[test]
    fn test_deadline_in_past_is_expired() {
        let budget = Deadline(Instant::now());
        assert!(budget.expired());
        assert!(!Deadline::after(Duration::from_secs(60)).expired());
        assert!(!Unlimited.expired());
    }
}
