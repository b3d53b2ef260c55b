use std::fmt;

use crate::board_engine::BoardEngine;
use crate::evaluation::{Score, DRAW_SCORE, LOSS_SCORE, WIN_SCORE};

/// Game state relative to the player the search runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    NonTerminal,
}

impl Outcome {
    /// Score of a finished game, `None` while play continues.
    pub fn sentinel(self) -> Option<Score> {
        match self {
            Outcome::Win => Some(WIN_SCORE),
            Outcome::Loss => Some(LOSS_SCORE),
            Outcome::Draw => Some(DRAW_SCORE),
            Outcome::NonTerminal => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::NonTerminal
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Draw => "draw",
            Outcome::NonTerminal => "in progress",
        };
        f.write_str(name)
    }
}

/// Classifies `board` for `perspective`. Draws are checked first. A mate is a
/// loss when `perspective` is the side to move (it is the one mated) and a
/// win otherwise, so the same test serves both halves of the search.
pub fn classify<B: BoardEngine>(board: &B, perspective: B::Side) -> Outcome {
    if board.is_stalemate() {
        return Outcome::Draw;
    }

    if board.is_terminal_by_mate() {
        return if board.side_to_move() == perspective {
            Outcome::Loss
        } else {
            Outcome::Win
        };
    }

    Outcome::NonTerminal
}
