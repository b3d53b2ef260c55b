//! Fixed-depth minimax with alpha-beta pruning.
//!
//! `maximize` and `minimize` call each other on alternate plies. Every move is
//! applied through a `MoveGuard`, so the board is back in its original state
//! whenever a call returns, including cutoffs and errors.

use log::{trace, warn};

use crate::board_engine::{BoardEngine, MoveGuard};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::evaluation::{Evaluator, Score};
use crate::terminal::classify;
use crate::transposition::EvaluationCache;

/// Best move found at a node and its value. Leaves carry no move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<M> {
    pub best_move: Option<M>,
    pub score: Score,
}

impl<M> SearchResult<M> {
    fn leaf(score: Score) -> Self {
        Self { best_move: None, score }
    }
}

/// Counters for one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited below the root.
    pub nodes: u64,
    /// Depth-cutoff positions handed to the evaluator.
    pub leaf_evaluations: u64,
    /// Sibling loops stopped early by alpha-beta.
    pub cutoffs: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Max,
    Min,
}

impl Role {
    /// Strict comparison: the first move reaching the best value is kept.
    fn prefers(self, candidate: Score, current: Score) -> bool {
        match self {
            Role::Max => candidate > current,
            Role::Min => candidate < current,
        }
    }
}

type NodeResult<B> = Result<
    SearchResult<<B as BoardEngine>::Move>,
    SearchError<<B as BoardEngine>::Error>,
>;

/// State for one search call. The perspective is fixed for the whole call.
pub(crate) struct Search<'a, B: BoardEngine> {
    pruning: bool,
    evaluator: Evaluator,
    cache: &'a mut EvaluationCache<B::Identity>,
    perspective: B::Side,
    stats: SearchStats,
    hits_before: u64,
    misses_before: u64,
}

impl<'a, B: BoardEngine> Search<'a, B> {
    pub(crate) fn new(
        config: &SearchConfig,
        cache: &'a mut EvaluationCache<B::Identity>,
        perspective: B::Side,
    ) -> Self {
        let hits_before = cache.hits();
        let misses_before = cache.misses();
        Self {
            pruning: config.pruning,
            evaluator: Evaluator::new(config),
            cache,
            perspective,
            stats: SearchStats::default(),
            hits_before,
            misses_before,
        }
    }

    /// Node where the searching player moves.
    fn maximize(&mut self, board: &mut B, depth: u8, alpha: Score, beta: Score) -> NodeResult<B> {
        self.node(board, depth, alpha, beta, Role::Max)
    }

    /// Node where the opponent moves.
    fn minimize(&mut self, board: &mut B, depth: u8, alpha: Score, beta: Score) -> NodeResult<B> {
        self.node(board, depth, alpha, beta, Role::Min)
    }

    fn node(&mut self, board: &mut B, depth: u8, alpha: Score, beta: Score, role: Role) -> NodeResult<B> {
        self.stats.nodes += 1;

        if let Some(score) = classify(board, self.perspective).sentinel() {
            return Ok(SearchResult::leaf(score));
        }

        if depth == 0 {
            self.stats.leaf_evaluations += 1;
            let score = self.evaluator.evaluate(board, self.perspective, self.cache);
            return Ok(SearchResult::leaf(score));
        }

        self.expand(board, depth, depth - 1, alpha, beta, role)
            .map(|(mv, score)| SearchResult { best_move: Some(mv), score })
    }

    /// Tries every legal move and searches each child `child_depth` plies
    /// deep with the opposite role. Also used directly for the root, where
    /// `depth` and `child_depth` are equal.
    fn expand(
        &mut self,
        board: &mut B,
        depth: u8,
        child_depth: u8,
        mut alpha: Score,
        mut beta: Score,
        role: Role,
    ) -> Result<(B::Move, Score), SearchError<B::Error>> {
        let mut best: Option<(B::Move, Score)> = None;

        for mv in board.legal_moves() {
            let child = {
                let mut guard = MoveGuard::apply(board, mv).map_err(|source| {
                    warn!("board rejected its own move {:?}: {}", mv, source);
                    SearchError::IllegalMove { mv: format!("{:?}", mv), source }
                })?;
                match role {
                    Role::Max => self.minimize(&mut guard, child_depth, alpha, beta)?,
                    Role::Min => self.maximize(&mut guard, child_depth, alpha, beta)?,
                }
            };

            let best_score = match best {
                Some((_, score)) if !role.prefers(child.score, score) => score,
                _ => {
                    best = Some((mv, child.score));
                    child.score
                }
            };

            if !self.pruning {
                continue;
            }
            match role {
                Role::Max => {
                    if best_score >= beta {
                        self.stats.cutoffs += 1;
                        trace!("beta cutoff at {:?}: {} >= {}", mv, best_score, beta);
                        break;
                    }
                    alpha = alpha.max(best_score);
                }
                Role::Min => {
                    if best_score <= alpha {
                        self.stats.cutoffs += 1;
                        trace!("alpha cutoff at {:?}: {} <= {}", mv, best_score, alpha);
                        break;
                    }
                    beta = beta.min(best_score);
                }
            }
        }

        best.ok_or(SearchError::EmptyMoveListAtNonTerminal { depth })
    }

    pub(crate) fn finish(self) -> SearchStats {
        SearchStats {
            cache_hits: self.cache.hits() - self.hits_before,
            cache_misses: self.cache.misses() - self.misses_before,
            ..self.stats
        }
    }
}

/// Searches the root position for the side to move, which plays the maximizing
/// role. Each root move is followed by `depth` plies of search.
pub(crate) fn search_root<B: BoardEngine>(
    search: &mut Search<'_, B>,
    board: &mut B,
    depth: u8,
    alpha: Score,
    beta: Score,
) -> Result<(B::Move, Score), SearchError<B::Error>> {
    search.expand(board, depth, depth, alpha, beta, Role::Max)
}
