//! Error types for board operations.

use thiserror::Error;

use crate::{Move, Position};

/// Errors raised when a move cannot be played on the board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {square}")]
    NoPiece { square: Position },

    #[error("piece on {square} does not belong to the side to move")]
    NotYourTurn { square: Position },

    #[error("illegal move {mv}")]
    Illegal { mv: Move },
}

/// Errors raised while parsing Forsyth-Edwards Notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 fields, found {found}")]
    MissingFields { found: usize },

    #[error("invalid piece placement: {reason}")]
    Placement { reason: String },

    #[error("invalid side to move: {0}")]
    SideToMove(String),

    #[error("invalid castling field: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid move counter: {0}")]
    Counter(String),
}
