use chess_core::Board;
use log::debug;

use crate::board_engine::BoardEngine;
use crate::config::{SearchConfig, MAX_DEPTH};
use crate::error::{ConfigError, SearchError};
use crate::evaluation::{Score, LOSS_SCORE, WIN_SCORE};
use crate::search::{search_root, Search, SearchResult, SearchStats};
use crate::terminal::classify;
use crate::transposition::EvaluationCache;

/// Picks moves for whichever side is to move.
///
/// The evaluation cache is owned by the engine and carried from one move to
/// the next. Call `new_game` before reusing the engine in an unrelated game.
pub struct ChessAI<B: BoardEngine = Board> {
    config: SearchConfig,
    cache: EvaluationCache<B::Identity>,
    last_stats: SearchStats,
}

impl<B: BoardEngine> ChessAI<B> {
    /// Engine with default settings searching `depth` plies below each root
    /// move (clamped to `MAX_DEPTH`).
    pub fn new(depth: u8) -> Self {
        ChessAI {
            config: SearchConfig::default().with_depth(depth),
            cache: EvaluationCache::new(),
            last_stats: SearchStats::default(),
        }
    }

    pub fn with_config(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ChessAI {
            config: SearchConfig { depth: config.depth.min(MAX_DEPTH), ..config },
            cache: EvaluationCache::new(),
            last_stats: SearchStats::default(),
        })
    }

    /// Chooses a move for the side to move. The board is left exactly as it
    /// was passed in, whether or not the search succeeds.
    pub fn choose_move(&mut self, board: &mut B) -> Result<B::Move, SearchError<B::Error>> {
        self.search(board).map(|(mv, _)| mv)
    }

    /// Like `choose_move`, also returning the score of the chosen move.
    pub fn analyze(&mut self, board: &mut B) -> Result<SearchResult<B::Move>, SearchError<B::Error>> {
        self.search(board).map(|(mv, score)| SearchResult { best_move: Some(mv), score })
    }

    fn search(&mut self, board: &mut B) -> Result<(B::Move, Score), SearchError<B::Error>> {
        // The side to move anchors classification and evaluation for the whole search
        let perspective = board.side_to_move();

        let outcome = classify(board, perspective);
        if outcome.is_terminal() {
            debug!("asked for a move in a finished game ({})", outcome);
            return Err(SearchError::NoLegalMoveAtRoot { outcome });
        }

        debug!(
            "searching {} plies for {:?} (pruning: {}, cached positions: {})",
            self.config.depth,
            perspective,
            self.config.pruning,
            self.cache.len()
        );

        let mut search = Search::new(&self.config, &mut self.cache, perspective);
        let result = search_root(&mut search, board, self.config.depth, LOSS_SCORE, WIN_SCORE);
        self.last_stats = search.finish();

        let (mv, score) = result?;
        debug!(
            "best move {:?} scored {} ({} nodes, {} cutoffs, {} cache hits)",
            mv, score, self.last_stats.nodes, self.last_stats.cutoffs, self.last_stats.cache_hits
        );
        Ok((mv, score))
    }

    /// Forgets every cached evaluation, for use before an unrelated game.
    pub fn new_game(&mut self) {
        self.cache.clear();
        self.last_stats = SearchStats::default();
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.config.depth = depth.min(MAX_DEPTH);
    }

    /// Counters from the most recent search.
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Number of positions in the evaluation cache.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for ChessAI<Board> {
    fn default() -> Self {
        ChessAI::new(SearchConfig::default().depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Outcome;
    use chess_core::Move;

    #[test]
    fn finished_games_are_rejected() {
        let mut mated = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let before = mated.clone();
        let mut ai = ChessAI::new(2);
        let err = ai.choose_move(&mut mated).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoveAtRoot { outcome: Outcome::Loss }));
        assert!(!err.is_internal());
        assert_eq!(mated, before);

        let mut stalemate = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        let err = ai.choose_move(&mut stalemate).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoveAtRoot { outcome: Outcome::Draw }));
    }

    #[test]
    fn cache_persists_until_new_game() {
        let mut board = Board::new();
        let mut ai: ChessAI = ChessAI::new(1);
        ai.choose_move(&mut board).unwrap();
        let cached = ai.cache_len();
        assert!(cached > 0);
        assert!(ai.last_stats().nodes > 0);

        ai.choose_move(&mut board).unwrap();
        assert_eq!(ai.cache_len(), cached);
        assert!(ai.last_stats().cache_hits > 0);

        ai.new_game();
        assert_eq!(ai.cache_len(), 0);
        assert_eq!(ai.last_stats(), SearchStats::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SearchConfig::default().with_domination_weight(-3);
        assert_eq!(
            ChessAI::<Board>::with_config(config).err(),
            Some(ConfigError::InvalidDominationWeight(-3))
        );
    }

    #[test]
    fn depth_is_clamped() {
        let mut ai: ChessAI = ChessAI::new(100);
        assert_eq!(ai.config().depth, MAX_DEPTH);
        ai.set_depth(2);
        assert_eq!(ai.config().depth, 2);
    }

    #[test]
    fn analyze_reports_the_chosen_move() {
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut ai: ChessAI = ChessAI::new(1);
        let result = ai.analyze(&mut board).unwrap();
        assert_eq!(result.best_move, Move::from_long_algebraic("a1a8"));
        assert_eq!(result.score, WIN_SCORE);
    }
}
