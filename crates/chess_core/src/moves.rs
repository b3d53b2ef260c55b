use std::fmt;

use crate::{Position, Piece, piece::{PieceType, Color}, Board};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    Capture,
    EnPassant,
    Castle,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Normal,
        }
    }

    pub fn with_promotion(from: Position, to: Position, promotion: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
            move_type: MoveType::Normal,
        }
    }

    pub fn castle(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
            move_type: MoveType::Castle,
        }
    }

    /// Parses long algebraic notation such as `e2e4` or `e7e8q`.
    /// The move type is left as `Normal`; `Board::make_move` resolves it.
    pub fn from_long_algebraic(notation: &str) -> Option<Self> {
        if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
            return None;
        }
        let from = Position::from_algebraic(&notation[0..2])?;
        let to = Position::from_algebraic(&notation[2..4])?;
        match notation[4..].chars().next() {
            None => Some(Self::new(from, to)),
            Some(c) => {
                let promotion = PieceType::from_char(c)?;
                if matches!(promotion, PieceType::Pawn | PieceType::King) {
                    return None;
                }
                Some(Self::with_promotion(from, to, promotion))
            }
        }
    }

    /// True when both moves connect the same squares with the same promotion,
    /// regardless of the recorded move type.
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    /// Checks the piece's movement pattern, occupancy of the destination and
    /// promotion requirements. King safety and castling are handled by the board.
    pub(crate) fn is_pseudo_legal(&self, board: &Board) -> bool {
        let piece = match board.get_piece(self.from) {
            Some(p) => p,
            None => return false,
        };

        if self.from == self.to {
            return false;
        }

        // Check if destination has a piece of the same color
        if let Some(dest_piece) = board.get_piece(self.to) {
            if dest_piece.color == piece.color {
                return false;
            }
        }

        let promotion_rank = match piece.color {
            Color::White => 8,
            Color::Black => 1,
        };
        let must_promote = piece.piece_type == PieceType::Pawn && self.to.rank == promotion_rank;
        match self.promotion {
            Some(PieceType::Pawn) | Some(PieceType::King) => return false,
            Some(_) if !must_promote => return false,
            None if must_promote => return false,
            _ => {}
        }

        self.is_valid_piece_movement(piece, board)
    }

    fn is_valid_piece_movement(&self, piece: &Piece, board: &Board) -> bool {
        match piece.piece_type {
            PieceType::Pawn => self.is_valid_pawn_move(piece.color, board),
            PieceType::Knight => self.is_valid_knight_move(),
            PieceType::Bishop => self.is_valid_diagonal_move(board),
            PieceType::Rook => self.is_valid_straight_move(board),
            PieceType::Queen => self.is_valid_diagonal_move(board) || self.is_valid_straight_move(board),
            PieceType::King => self.is_valid_king_move(),
        }
    }

    fn is_valid_pawn_move(&self, color: Color, board: &Board) -> bool {
        let direction = pawn_direction(color);

        let rank_diff = (self.to.rank as i8) - (self.from.rank as i8);
        let file_diff = (self.to.file as i8) - (self.from.file as i8);

        // Basic forward movement
        if file_diff == 0 {
            if rank_diff == direction {
                return board.get_piece(self.to).is_none();
            }
            // Initial two-square move
            let start_rank = match color {
                Color::White => 2,
                Color::Black => 7,
            };
            if self.from.rank == start_rank && rank_diff == 2 * direction {
                return match self.from.offset(0, direction) {
                    Some(intermediate) => {
                        board.get_piece(intermediate).is_none() && board.get_piece(self.to).is_none()
                    }
                    None => false,
                };
            }
            return false;
        }

        // Captures, including en passant onto the board's target square
        if file_diff.abs() == 1 && rank_diff == direction {
            if let Some(captured_piece) = board.get_piece(self.to) {
                return captured_piece.color != color;
            }
            return board.en_passant_target() == Some(self.to);
        }

        false
    }

    fn is_valid_knight_move(&self) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        (rank_diff == 2 && file_diff == 1) || (rank_diff == 1 && file_diff == 2)
    }

    fn is_valid_diagonal_move(&self, board: &Board) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        if rank_diff != file_diff {
            return false;
        }

        self.is_path_clear(board)
    }

    fn is_valid_straight_move(&self, board: &Board) -> bool {
        let rank_diff = self.to.rank as i8 - self.from.rank as i8;
        let file_diff = self.to.file as i8 - self.from.file as i8;

        if rank_diff != 0 && file_diff != 0 {
            return false;
        }

        self.is_path_clear(board)
    }

    fn is_valid_king_move(&self) -> bool {
        let rank_diff = (self.to.rank as i8 - self.from.rank as i8).abs();
        let file_diff = (self.to.file as i8 - self.from.file as i8).abs();

        rank_diff <= 1 && file_diff <= 1
    }

    fn is_path_clear(&self, board: &Board) -> bool {
        let rank_step = (self.to.rank as i8 - self.from.rank as i8).signum();
        let file_step = (self.to.file as i8 - self.from.file as i8).signum();

        let mut current = self.from.offset(file_step, rank_step);
        while let Some(pos) = current {
            if pos == self.to {
                return true;
            }
            if board.get_piece(pos).is_some() {
                return false;
            }
            current = pos.offset(file_step, rank_step);
        }

        false
    }
}

/// Whether `piece` standing on `from` attacks `target`. Unlike move validation,
/// pawns only attack diagonally and the occupant of `target` is irrelevant.
pub(crate) fn attacks(board: &Board, from: Position, piece: Piece, target: Position) -> bool {
    if from == target {
        return false;
    }
    let ray = Move::new(from, target);
    match piece.piece_type {
        PieceType::Pawn => {
            let rank_diff = target.rank as i8 - from.rank as i8;
            let file_diff = (target.file as i8 - from.file as i8).abs();
            file_diff == 1 && rank_diff == pawn_direction(piece.color)
        }
        PieceType::Knight => ray.is_valid_knight_move(),
        PieceType::Bishop => ray.is_valid_diagonal_move(board),
        PieceType::Rook => ray.is_valid_straight_move(board),
        PieceType::Queen => ray.is_valid_diagonal_move(board) || ray.is_valid_straight_move(board),
        PieceType::King => ray.is_valid_king_move(),
    }
}

pub(crate) fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).unwrap()
    }

    #[test]
    fn long_algebraic_round_trip() {
        let mv = Move::from_long_algebraic("e7e8q").unwrap();
        assert_eq!(mv.from, sq("e7"));
        assert_eq!(mv.to, sq("e8"));
        assert_eq!(mv.promotion, Some(PieceType::Queen));
        assert_eq!(mv.to_string(), "e7e8q");

        assert!(Move::from_long_algebraic("e7e8k").is_none());
        assert!(Move::from_long_algebraic("e7").is_none());
        assert!(Move::from_long_algebraic("z2e4").is_none());
    }

    #[test]
    fn sliding_pieces_are_blocked() {
        let mut board = Board::empty();
        board.put_piece(sq("a1"), Piece::new(PieceType::Rook, Color::White));
        board.put_piece(sq("a4"), Piece::new(PieceType::Pawn, Color::White));

        assert!(Move::new(sq("a1"), sq("a3")).is_pseudo_legal(&board));
        assert!(!Move::new(sq("a1"), sq("a4")).is_pseudo_legal(&board));
        assert!(!Move::new(sq("a1"), sq("a5")).is_pseudo_legal(&board));
        assert!(Move::new(sq("a1"), sq("h1")).is_pseudo_legal(&board));
        assert!(!Move::new(sq("a1"), sq("b2")).is_pseudo_legal(&board));
    }

    #[test]
    fn pawn_attacks_differ_from_pawn_moves() {
        let mut board = Board::empty();
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        board.put_piece(sq("e4"), pawn);

        assert!(attacks(&board, sq("e4"), pawn, sq("d5")));
        assert!(attacks(&board, sq("e4"), pawn, sq("f5")));
        assert!(!attacks(&board, sq("e4"), pawn, sq("e5")));

        // Moving diagonally needs something to capture
        assert!(!Move::new(sq("e4"), sq("d5")).is_pseudo_legal(&board));
        assert!(Move::new(sq("e4"), sq("e5")).is_pseudo_legal(&board));
    }

    #[test]
    fn promotion_is_required_on_last_rank() {
        let mut board = Board::empty();
        board.put_piece(sq("b7"), Piece::new(PieceType::Pawn, Color::White));

        assert!(!Move::new(sq("b7"), sq("b8")).is_pseudo_legal(&board));
        assert!(Move::with_promotion(sq("b7"), sq("b8"), PieceType::Knight).is_pseudo_legal(&board));
        assert!(!Move::with_promotion(sq("b7"), sq("b8"), PieceType::King).is_pseudo_legal(&board));
    }
}
