//! The board services the search consumes, and their implementation for
//! `chess_core::Board`.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use chess_core::{Board, Color, Move, MoveError};

/// A player, seen through the sign it gives to canonical board scores.
pub trait Perspective: Copy + Eq + Debug {
    /// +1 for the side canonical scores favour when positive, -1 for the other.
    fn sign(self) -> i32;
}

impl Perspective for Color {
    fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// Position representation, move generation and raw heuristic signals.
///
/// The search mutates the board in place through `apply_move`/`undo_move`
/// and never copies it. `material_balance` and `domination_score` must be
/// canonical, that is independent of whose turn it is: the evaluation cache
/// stores them keyed by `stable_identity` alone.
pub trait BoardEngine {
    type Move: Copy + PartialEq + Debug;
    type Side: Perspective;
    type Identity: Copy + Eq + Hash + Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    fn side_to_move(&self) -> Self::Side;

    /// Legal moves in a fixed order; empty iff none exist.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays `mv`, failing if it is not legal in the current position.
    fn apply_move(&mut self, mv: Self::Move) -> Result<(), Self::Error>;

    /// Reverts the most recent successful `apply_move`.
    fn undo_move(&mut self);

    /// Drawn by stalemate or by any rule.
    fn is_stalemate(&self) -> bool;

    /// The side to move is checkmated.
    fn is_terminal_by_mate(&self) -> bool;

    fn material_balance(&self) -> i32;

    fn domination_score(&self) -> i32;

    /// Exact-match key, stable for the lifetime of one game.
    fn stable_identity(&self) -> Self::Identity;
}

/// A move applied to a board for as long as the guard lives. Dropping the
/// guard undoes the move, whichever way the scope is left.
pub struct MoveGuard<'a, B: BoardEngine> {
    board: &'a mut B,
}

impl<'a, B: BoardEngine> MoveGuard<'a, B> {
    pub fn apply(board: &'a mut B, mv: B::Move) -> Result<Self, B::Error> {
        board.apply_move(mv)?;
        Ok(Self { board })
    }
}

impl<B: BoardEngine> Deref for MoveGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.board
    }
}

impl<B: BoardEngine> DerefMut for MoveGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.board
    }
}

impl<B: BoardEngine> Drop for MoveGuard<'_, B> {
    fn drop(&mut self) {
        self.board.undo_move();
    }
}

impl BoardEngine for Board {
    type Move = Move;
    type Side = Color;
    type Identity = u64;
    type Error = MoveError;

    fn side_to_move(&self) -> Color {
        self.current_turn()
    }

    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        self.make_move(mv)
    }

    fn undo_move(&mut self) {
        Board::undo_move(self);
    }

    fn is_stalemate(&self) -> bool {
        self.is_draw()
    }

    fn is_terminal_by_mate(&self) -> bool {
        self.is_checkmate()
    }

    fn material_balance(&self) -> i32 {
        Board::material_balance(self)
    }

    fn domination_score(&self) -> i32 {
        Board::domination_score(self)
    }

    fn stable_identity(&self) -> u64 {
        self.zobrist_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(notation: &str) -> Move {
        Move::from_long_algebraic(notation).unwrap()
    }

    #[test]
    fn guard_undoes_on_drop() {
        let mut board = Board::new();
        let before = board.clone();
        {
            let guard = MoveGuard::apply(&mut board, mv("d2d4")).unwrap();
            assert_eq!(guard.side_to_move(), Color::Black);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn guard_undoes_when_scope_exits_with_error() {
        fn play_two(board: &mut Board, first: Move, second: Move) -> Result<(), MoveError> {
            let mut guard = MoveGuard::apply(board, first)?;
            let _inner = MoveGuard::apply(&mut *guard, second)?;
            Ok(())
        }

        let mut board = Board::new();
        let before = board.clone();
        let result = play_two(&mut board, mv("e2e4"), mv("e2e4"));
        assert!(matches!(result, Err(MoveError::NoPiece { .. })));
        assert_eq!(board, before);
    }

    #[test]
    fn failed_apply_leaves_board_untouched() {
        let mut board = Board::new();
        let before = board.clone();
        assert!(MoveGuard::apply(&mut board, mv("e2e5")).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn canonical_signals_ignore_side_to_move() {
        let white = Board::from_fen("4k3/8/8/8/8/8/4Q3/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/8/8/4Q3/4K3 b - - 0 1").unwrap();
        assert_eq!(
            BoardEngine::material_balance(&white),
            BoardEngine::material_balance(&black)
        );
        assert_eq!(
            BoardEngine::domination_score(&white),
            BoardEngine::domination_score(&black)
        );
        assert_ne!(white.stable_identity(), black.stable_identity());
    }
}
