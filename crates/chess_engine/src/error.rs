//! Error types for the search engine.

use thiserror::Error;

use crate::terminal::Outcome;

/// Failures surfaced by a search. None of these is a normal game result:
/// they mean a component broke its contract.
#[derive(Error, Debug)]
pub enum SearchError<E>
where
    E: std::error::Error + 'static,
{
    /// The board rejected a move it had itself enumerated as legal.
    #[error("board rejected enumerated move {mv}")]
    IllegalMove {
        mv: String,
        #[source]
        source: E,
    },

    /// The board produced no moves for a position it did not report as finished.
    #[error("no legal moves in a non-terminal position ({depth} plies left)")]
    EmptyMoveListAtNonTerminal { depth: u8 },

    /// A move was requested for a position where the game is already over.
    #[error("no move to choose, the game is already decided: {outcome}")]
    NoLegalMoveAtRoot { outcome: Outcome },
}

impl<E> SearchError<E>
where
    E: std::error::Error + 'static,
{
    /// True for errors caused by the board breaking its contract, as opposed
    /// to the caller asking for a move in a finished game.
    pub fn is_internal(&self) -> bool {
        !matches!(self, SearchError::NoLegalMoveAtRoot { .. })
    }
}

/// Rejected search settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("domination weight must be positive, got {0}")]
    InvalidDominationWeight(i32),

    #[error("repetition penalty must not be negative, got {0}")]
    NegativeRepetitionPenalty(i32),
}
