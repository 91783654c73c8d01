//! Flat Monte Carlo search with UCT selection.
//!
//! Every legal root move is a bandit arm. Arms are played round-robin, one
//! random playout per arm per round, until the playout budget
//! (`simulations x arms`) is spent or the time budget expires. The budget is
//! checked between rounds and the first round always completes, so every arm
//! has at least one visit when the final choice is made.
//!
//! Playout outcomes in {-1, 0, +1} are normalised to rewards in [0, 1]
//! (loss 0, draw 0.5, win 1) before UCT is applied:
//!
//! ```text
//! uct = winrate + C * sqrt(ln(total) / visits)
//! ```
//!
//! The exploration term is taken as 0 while `total <= 1`, and arms with no
//! visits are never selected.

use fastrand::Rng;

use crate::board::{Board, Side};
use crate::budget::Budget;
use crate::config::MctsParams;
use crate::eval::Evaluator;
use crate::movegen::{Move, legal_moves};
use crate::playout::playout_result;
use crate::search::{SearchKind, SearchResult};

/// Statistics for one root move.
#[derive(Debug, Clone)]
pub struct Arm {
    pub mv: Move,
    /// Number of playouts
    pub visits: u32,
    /// Sum of normalised rewards
    pub reward: f64,
}

impl Arm {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            visits: 0,
            reward: 0.0,
        }
    }

    /// Mean reward in [0, 1], or `None` if unvisited.
    #[inline]
    pub fn winrate(&self) -> Option<f64> {
        (self.visits > 0).then(|| self.reward / self.visits as f64)
    }

    /// UCT value given the total number of playouts over all arms.
    pub fn uct(&self, total: u64, exploration: f64) -> Option<f64> {
        let winrate = self.winrate()?;
        let explore = if total > 1 {
            exploration * ((total as f64).ln() / self.visits as f64).sqrt()
        } else {
            0.0
        };
        Some(winrate + explore)
    }

    fn record(&mut self, outcome: i32) {
        self.visits += 1;
        self.reward += (outcome as f64 + 1.0) / 2.0;
    }
}

/// Index of the arm with the greatest UCT value. Ties keep the earlier arm.
pub fn select(arms: &[Arm], total: u64, exploration: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, arm) in arms.iter().enumerate() {
        let Some(value) = arm.uct(total, exploration) else {
            continue;
        };
        if best.is_none_or(|(_, b)| value > b) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}

/// Play round-robin playouts over all root moves and return the arm
/// statistics with the total number of playouts.
pub fn run_arms<B: Budget>(
    board: &Board,
    side: Side,
    evaluator: &Evaluator,
    params: &MctsParams,
    budget: &B,
    rng: &mut Rng,
) -> (Vec<Arm>, u64) {
    let mut arms: Vec<Arm> = legal_moves(board, side).into_iter().map(Arm::new).collect();
    if arms.is_empty() {
        return (arms, 0);
    }

    let limit = (params.simulations.max(1) as u64).saturating_mul(arms.len() as u64);
    let mut total = 0u64;
    loop {
        for arm in arms.iter_mut() {
            let next = board.after(&arm.mv, side);
            let outcome = playout_result(&next, side.opponent(), side, evaluator, rng);
            arm.record(outcome);
            total += 1;
        }
        if total >= limit || budget.expired() {
            break;
        }
    }
    (arms, total)
}

/// Choose a move for `side` by flat UCT.
pub fn uct_search<B: Budget>(
    board: &Board,
    side: Side,
    evaluator: &Evaluator,
    params: &MctsParams,
    budget: &B,
) -> SearchResult {
    let mut rng = Rng::with_seed(params.seed);
    let (arms, total) = run_arms(board, side, evaluator, params, budget, &mut rng);

    let Some(idx) = select(&arms, total, params.exploration) else {
        return SearchResult::pass();
    };
    for arm in &arms {
        log::trace!(
            "arm {} visits={} winrate={:.3}",
            arm.mv.pos,
            arm.visits,
            arm.winrate().unwrap_or(0.0)
        );
    }

    let arm = &arms[idx];
    log::debug!(
        "mcts: {} after {total} playouts, winrate {:.1}%",
        arm.mv.pos,
        arm.winrate().unwrap_or(0.0) * 100.0
    );
    SearchResult {
        best_move: Some(arm.mv.clone()),
        score: None,
        depth: 1,
        nodes: total,
        kind: SearchKind::Mcts,
        time_ms: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::budget::{Polls, Unlimited};

    fn arm(col: usize, visits: u32, reward: f64) -> Arm {
        Arm {
            mv: Move {
                pos: Pos::new(0, col),
                flips: vec![Pos::new(1, col)],
            },
            visits,
            reward,
        }
    }

    #[test]
    fn test_unvisited_arm_has_no_value() {
        let a = arm(0, 0, 0.0);
        assert_eq!(a.winrate(), None);
        assert_eq!(a.uct(10, 1.41), None);
        assert_eq!(select(&[a], 10, 1.41), None);
    }

    #[test]
    fn test_single_playout_has_no_exploration_term() {
        let a = arm(0, 1, 1.0);
        assert_eq!(a.uct(1, 1.41), Some(1.0));
        assert_eq!(a.uct(0, 1.41), Some(1.0));
    }

    #[test]
    fn test_equal_arms_pick_first() {
        let arms = [arm(0, 1, 0.5), arm(1, 1, 0.5)];
        assert_eq!(select(&arms, 2, 1.41), Some(0));
        let v = arms[0].uct(2, 1.41).unwrap();
        assert!(v.is_finite());
    }

    #[test]
    fn test_zero_visit_arm_is_skipped() {
        let arms = [arm(0, 0, 0.0), arm(1, 2, 0.0)];
        assert_eq!(select(&arms, 2, 1.41), Some(1));
    }

    #[test]
    fn test_exploration_prefers_less_visited() {
        let arms = [arm(0, 10, 6.0), arm(1, 1, 0.5)];
        assert_eq!(select(&arms, 11, 0.0), Some(0));
        assert_eq!(select(&arms, 11, 2.0), Some(1));
    }

    #[test]
    fn test_first_round_always_completes() {
        let board = Board::opening(8);
        let params = MctsParams {
            simulations: 50,
            ..MctsParams::default()
        };
        let eval = Evaluator::default();
        let mut rng = Rng::with_seed(9);
        let (arms, total) = run_arms(&board, Side::Black, &eval, &params, &Polls::new(0), &mut rng);
        assert_eq!(arms.len(), 4);
        assert_eq!(total, 4);
        assert!(arms.iter().all(|a| a.visits == 1));
    }

    #[test]
    fn test_simulation_limit() {
        let board = Board::opening(8);
        let params = MctsParams {
            simulations: 3,
            ..MctsParams::default()
        };
        let eval = Evaluator::default();
        let mut rng = Rng::with_seed(9);
        let (arms, total) = run_arms(&board, Side::Black, &eval, &params, &Unlimited, &mut rng);
        assert_eq!(total, 12);
        assert!(arms.iter().all(|a| a.visits == 3));
    }

    #[test]
    fn test_huge_simulation_count_saturates() {
        let board = Board::opening(8);
        let params = MctsParams {
            simulations: usize::MAX,
            ..MctsParams::default()
        };
        let eval = Evaluator::default();
        let mut rng = Rng::with_seed(5);
        let (arms, total) = run_arms(&board, Side::Black, &eval, &params, &Polls::new(2), &mut rng);
        assert_eq!(total, 12);
        assert!(arms.iter().all(|a| a.visits == 3));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let board = Board::opening(8);
        let params = MctsParams {
            simulations: 5,
            seed: 1234,
            ..MctsParams::default()
        };
        let eval = Evaluator::default();
        let a = uct_search(&board, Side::Black, &eval, &params, &Unlimited);
        let b = uct_search(&board, Side::Black, &eval, &params, &Unlimited);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.nodes, 20);
        assert_eq!(a.kind, SearchKind::Mcts);
    }

    #[test]
    fn test_no_moves_is_pass() {
        let board = Board::new(4);
        let result = uct_search(&board, Side::Black, &Evaluator::default(), &MctsParams::default(), &Unlimited);
        assert!(result.best_move.is_none());
    }
}
