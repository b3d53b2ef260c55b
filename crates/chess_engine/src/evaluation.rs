use log::trace;

use crate::board_engine::{BoardEngine, Perspective};
use crate::config::{EvalFormula, SearchConfig};
use crate::transposition::EvaluationCache;

/// Signed score, higher is better for the player the search runs for.
pub type Score = i32;

// Finished games use the extremes so they outrank every heuristic score
pub const WIN_SCORE: Score = Score::MAX;
pub const LOSS_SCORE: Score = Score::MIN;
pub const DRAW_SCORE: Score = 0;

/// Turns raw board signals into a score for one player, memoizing the
/// board-dependent part by position identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    formula: EvalFormula,
    domination_weight: i32,
    repetition_penalty: i32,
}

impl Evaluator {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            formula: config.formula,
            domination_weight: config.domination_weight.max(1),
            repetition_penalty: config.repetition_penalty.max(0),
        }
    }

    /// Heuristic score in the board's canonical orientation.
    pub fn raw_score<B: BoardEngine>(&self, board: &B) -> Score {
        let material = board.material_balance();
        match self.formula {
            EvalFormula::Material => material,
            EvalFormula::MaterialAndDomination => {
                material.saturating_add(board.domination_score() / self.domination_weight)
            }
        }
    }

    /// Score of `board` for `perspective`. A position already in the cache is
    /// marked down by the repetition penalty.
    pub fn evaluate<B: BoardEngine>(
        &self,
        board: &B,
        perspective: B::Side,
        cache: &mut EvaluationCache<B::Identity>,
    ) -> Score {
        let identity = board.stable_identity();
        let (raw, seen_before) = match cache.get(&identity) {
            Some(raw) => (raw, true),
            None => {
                let raw = self.raw_score(board);
                cache.insert(identity, raw);
                (raw, false)
            }
        };

        let score = clamp_heuristic(raw.saturating_mul(perspective.sign()));
        if seen_before {
            trace!("repeated position {:?}, raw score {}", identity, raw);
            clamp_heuristic(score.saturating_sub(self.repetition_penalty))
        } else {
            score
        }
    }
}

/// Keeps heuristic scores strictly inside the terminal sentinels.
pub(crate) fn clamp_heuristic(score: Score) -> Score {
    score.clamp(LOSS_SCORE + 1, WIN_SCORE - 1)
}
