use std::collections::HashMap;

use log::debug;

use crate::{
    error::{FenError, MoveError},
    moves::{attacks, pawn_direction},
    piece::{Color, PieceType},
    zobrist::ZOBRIST,
    Move, MoveType, Piece, Position,
};

const PROMOTION_CHOICES: [Option<PieceType>; 4] = [
    Some(PieceType::Queen),
    Some(PieceType::Rook),
    Some(PieceType::Bishop),
    Some(PieceType::Knight),
];

// Halfmove clock value at which the fifty-move rule draws the game
const FIFTY_MOVE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    fn get(&self, color: Color, kingside: bool) -> bool {
        match (color, kingside) {
            (Color::White, true) => self.white_kingside,
            (Color::White, false) => self.white_queenside,
            (Color::Black, true) => self.black_kingside,
            (Color::Black, false) => self.black_queenside,
        }
    }

    fn clear(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    /// Drops the right tied to a rook's home square, if `pos` is one.
    fn clear_rook_square(&mut self, pos: Position) {
        match (pos.file, pos.rank) {
            (1, 1) => self.white_queenside = false,
            (8, 1) => self.white_kingside = false,
            (1, 8) => self.black_queenside = false,
            (8, 8) => self.black_kingside = false,
            _ => {}
        }
    }

    fn as_array(&self) -> [bool; 4] {
        [
            self.white_kingside,
            self.white_queenside,
            self.black_kingside,
            self.black_queenside,
        ]
    }
}

/// Everything `undo_move` needs to restore the state before a move.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UndoRecord {
    mv: Move,
    moved: Piece,
    captured: Option<(Position, Piece)>,
    castling_rights: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: HashMap<Position, Piece>,
    current_turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<UndoRecord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.castling_rights = CastlingRights::default();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces, white to move and no castling rights.
    pub fn empty() -> Self {
        Self {
            pieces: HashMap::new(),
            current_turn: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    pub fn setup_initial_position(&mut self) {
        // Setup pawns
        for file in 1..=8 {
            self.pieces.insert(Position { file, rank: 2 }, Piece::new(PieceType::Pawn, Color::White));
            self.pieces.insert(Position { file, rank: 7 }, Piece::new(PieceType::Pawn, Color::Black));
        }

        // Setup other pieces
        let piece_order = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (file, &piece_type) in (1..=8).zip(piece_order.iter()) {
            // White pieces on rank 1
            self.pieces.insert(Position { file, rank: 1 }, Piece::new(piece_type, Color::White));
            // Black pieces on rank 8
            self.pieces.insert(Position { file, rank: 8 }, Piece::new(piece_type, Color::Black));
        }
    }

    /// Parses a position from Forsyth-Edwards Notation.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields { found: parts.len() });
        }

        let mut board = Self::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement {
                reason: format!("expected 8 ranks, found {}", ranks.len()),
            });
        }
        // FEN lists rank 8 first
        for (rank_str, rank) in ranks.iter().zip((1..=8u8).rev()) {
            let mut file = 1u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file = match file.checked_add(skip as u8) {
                        Some(next) if next <= 9 => next,
                        _ => {
                            return Err(FenError::Placement {
                                reason: format!("rank {} overflows", rank),
                            })
                        }
                    };
                } else {
                    let piece_type = PieceType::from_char(ch).ok_or_else(|| FenError::Placement {
                        reason: format!("unknown piece '{}'", ch),
                    })?;
                    let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
                    let pos = Position::new(file, rank).ok_or_else(|| FenError::Placement {
                        reason: format!("rank {} overflows", rank),
                    })?;
                    board.pieces.insert(pos, Piece::new(piece_type, color));
                    file += 1;
                }
            }
            if file != 9 {
                return Err(FenError::Placement {
                    reason: format!("rank {} does not span 8 files", rank),
                });
            }
        }

        board.current_turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => board.castling_rights.white_kingside = true,
                    'Q' => board.castling_rights.white_queenside = true,
                    'k' => board.castling_rights.black_kingside = true,
                    'q' => board.castling_rights.black_queenside = true,
                    _ => return Err(FenError::Castling(parts[2].to_string())),
                }
            }
        }

        board.en_passant = match parts[3] {
            "-" => None,
            square => Some(
                Position::from_algebraic(square)
                    .ok_or_else(|| FenError::EnPassant(square.to_string()))?,
            ),
        };

        if let Some(halfmove) = parts.get(4) {
            board.halfmove_clock = halfmove
                .parse()
                .map_err(|_| FenError::Counter(halfmove.to_string()))?;
        }
        if let Some(fullmove) = parts.get(5) {
            board.fullmove_number = fullmove
                .parse()
                .map_err(|_| FenError::Counter(fullmove.to_string()))?;
        }

        Ok(board)
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn put_piece(&mut self, pos: Position, piece: Piece) {
        self.pieces.insert(pos, piece);
    }

    pub fn get_piece(&self, pos: Position) -> Option<&Piece> {
        self.pieces.get(&pos)
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// All legal moves for the side to move, in a fixed order: origin squares
    /// and then destination squares scanned from a1 to h8, promotions as
    /// queen, rook, bishop, knight.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.visit_legal_moves(|mv| {
            moves.push(mv);
            true
        });
        moves
    }

    /// True when the side to move has at least one legal move. Stops at the
    /// first one found.
    pub fn has_legal_move(&self) -> bool {
        let mut found = false;
        self.visit_legal_moves(|_| {
            found = true;
            false
        });
        found
    }

    /// Hands legal moves to `visit` in `legal_moves` order until it returns false.
    fn visit_legal_moves(&self, mut visit: impl FnMut(Move) -> bool) {
        let color = self.current_turn;
        let promotion_rank = if color == Color::White { 8 } else { 1 };
        let mut scratch = self.clone();

        for from in Position::all() {
            let piece = match self.get_piece(from) {
                Some(piece) if piece.color == color => *piece,
                _ => continue,
            };

            for to in Position::all() {
                if piece.piece_type == PieceType::King && is_castling_step(from, to) {
                    if self.can_castle(from, to) && !visit(Move::castle(from, to)) {
                        return;
                    }
                    continue;
                }

                let promotes = piece.piece_type == PieceType::Pawn && to.rank == promotion_rank;
                let choices: &[Option<PieceType>] = if promotes { &PROMOTION_CHOICES } else { &[None] };

                for &promotion in choices {
                    let candidate = Move { from, to, move_type: MoveType::Normal, promotion };
                    if !candidate.is_pseudo_legal(self) {
                        continue;
                    }
                    let mv = self.with_move_type(candidate);
                    if scratch.keeps_king_safe(mv) && !visit(mv) {
                        return;
                    }
                }
            }
        }
    }

    /// Plays a legal move. Only the squares and promotion of `chess_move` are
    /// looked at; the move type is resolved from the position.
    pub fn make_move(&mut self, chess_move: Move) -> Result<(), MoveError> {
        let piece = *self
            .pieces
            .get(&chess_move.from)
            .ok_or(MoveError::NoPiece { square: chess_move.from })?;

        if piece.color != self.current_turn {
            return Err(MoveError::NotYourTurn { square: chess_move.from });
        }

        let mv = if piece.piece_type == PieceType::King && is_castling_step(chess_move.from, chess_move.to) {
            if chess_move.promotion.is_some() || !self.can_castle(chess_move.from, chess_move.to) {
                return Err(rejected(chess_move));
            }
            Move::castle(chess_move.from, chess_move.to)
        } else {
            let candidate = Move { move_type: MoveType::Normal, ..chess_move };
            if !candidate.is_pseudo_legal(self) {
                return Err(rejected(chess_move));
            }
            self.with_move_type(candidate)
        };

        self.apply_unchecked(mv);
        if self.is_in_check(piece.color) {
            self.undo_move();
            return Err(rejected(chess_move));
        }
        Ok(())
    }

    /// Reverts the most recent move, returning it. `None` when there is
    /// nothing to undo.
    pub fn undo_move(&mut self) -> Option<Move> {
        let record = self.history.pop()?;
        let mv = record.mv;

        self.pieces.remove(&mv.to);
        self.pieces.insert(mv.from, record.moved);

        if mv.move_type == MoveType::Castle {
            let (rook_from, rook_to) = castle_rook_squares(mv);
            if let Some(rook) = self.pieces.remove(&rook_to) {
                self.pieces.insert(rook_from, rook);
            }
        }

        if let Some((square, captured)) = record.captured {
            self.pieces.insert(square, captured);
        }

        self.current_turn = record.moved.color;
        self.castling_rights = record.castling_rights;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.fullmove_number = record.fullmove_number;

        Some(mv)
    }

    /// Moves pieces without any validation. `mv` must be pseudo-legal and
    /// carry its resolved move type.
    fn apply_unchecked(&mut self, mv: Move) {
        let moved = match self.pieces.remove(&mv.from) {
            Some(piece) => piece,
            None => return,
        };

        let captured = match mv.move_type {
            MoveType::EnPassant => {
                let square = Position { file: mv.to.file, rank: mv.from.rank };
                self.pieces.remove(&square).map(|piece| (square, piece))
            }
            _ => self.pieces.remove(&mv.to).map(|piece| (mv.to, piece)),
        };

        self.history.push(UndoRecord {
            mv,
            moved,
            captured,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        if mv.move_type == MoveType::Castle {
            let (rook_from, rook_to) = castle_rook_squares(mv);
            if let Some(rook) = self.pieces.remove(&rook_from) {
                self.pieces.insert(rook_to, rook);
            }
        }

        let final_piece = match mv.promotion {
            Some(promotion_type) => Piece::new(promotion_type, moved.color),
            None => moved,
        };
        self.pieces.insert(mv.to, final_piece);

        // Update castling rights
        if moved.piece_type == PieceType::King {
            self.castling_rights.clear(moved.color);
        }
        self.castling_rights.clear_rook_square(mv.from);
        self.castling_rights.clear_rook_square(mv.to);

        self.en_passant = None;
        if moved.piece_type == PieceType::Pawn && (mv.to.rank as i8 - mv.from.rank as i8).abs() == 2 {
            self.en_passant = mv.from.offset(0, pawn_direction(moved.color));
        }

        if moved.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if moved.color == Color::Black {
            self.fullmove_number += 1;
        }

        self.current_turn = self.current_turn.opposite();
    }

    fn with_move_type(&self, mut mv: Move) -> Move {
        let is_pawn = matches!(
            self.get_piece(mv.from),
            Some(piece) if piece.piece_type == PieceType::Pawn
        );
        mv.move_type = if self.get_piece(mv.to).is_some() {
            MoveType::Capture
        } else if is_pawn && Some(mv.to) == self.en_passant && mv.from.file != mv.to.file {
            MoveType::EnPassant
        } else {
            MoveType::Normal
        };
        mv
    }

    /// Tries `mv` on this scratch board and reports whether the mover's king
    /// is left out of check. The board is restored before returning.
    fn keeps_king_safe(&mut self, mv: Move) -> bool {
        let color = self.current_turn;
        self.apply_unchecked(mv);
        let safe = !self.is_in_check(color);
        self.undo_move();
        safe
    }

    fn can_castle(&self, from: Position, to: Position) -> bool {
        let king = match self.get_piece(from) {
            Some(piece) if piece.piece_type == PieceType::King => *piece,
            _ => return false,
        };
        let home_rank = if king.color == Color::White { 1 } else { 8 };
        if from != (Position { file: 5, rank: home_rank }) || to.rank != home_rank {
            return false;
        }

        let kingside = to.file == 7;
        if !self.castling_rights.get(king.color, kingside) {
            return false;
        }

        let rook_square = Position { file: if kingside { 8 } else { 1 }, rank: home_rank };
        match self.get_piece(rook_square) {
            Some(rook) if rook.piece_type == PieceType::Rook && rook.color == king.color => {}
            _ => return false,
        }

        // Squares between king and rook must be empty
        let between: &[u8] = if kingside { &[6, 7] } else { &[2, 3, 4] };
        if between
            .iter()
            .any(|&file| self.pieces.contains_key(&Position { file, rank: home_rank }))
        {
            return false;
        }

        // The king may not start in, pass through, or land on an attacked square
        let king_path: &[u8] = if kingside { &[5, 6, 7] } else { &[5, 4, 3] };
        !king_path
            .iter()
            .any(|&file| self.is_position_under_attack(Position { file, rank: home_rank }, king.color))
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        // Find the king
        let king_pos = self
            .pieces
            .iter()
            .find(|(_, piece)| piece.piece_type == PieceType::King && piece.color == color)
            .map(|(pos, _)| *pos);

        match king_pos {
            Some(pos) => self.is_position_under_attack(pos, color),
            None => false,
        }
    }

    pub fn is_position_under_attack(&self, pos: Position, defending_color: Color) -> bool {
        self.attackers_count(pos, defending_color.opposite()) > 0
    }

    /// Number of `color` pieces attacking `pos`.
    pub fn attackers_count(&self, pos: Position, color: Color) -> usize {
        self.pieces
            .iter()
            .filter(|&(&from, &piece)| piece.color == color && attacks(self, from, piece, pos))
            .count()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.current_turn) && !self.has_legal_move()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.current_turn) && !self.has_legal_move()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_LIMIT
    }

    pub fn has_insufficient_material(&self) -> bool {
        let mut white_pieces = Vec::new();
        let mut black_pieces = Vec::new();

        for (&pos, piece) in self.pieces.iter() {
            if piece.piece_type == PieceType::King {
                continue;
            }
            match piece.color {
                Color::White => white_pieces.push((pos, piece.piece_type)),
                Color::Black => black_pieces.push((pos, piece.piece_type)),
            }
        }

        let is_minor = |(_, piece_type): &(Position, PieceType)| {
            matches!(piece_type, PieceType::Bishop | PieceType::Knight)
        };

        match (white_pieces.as_slice(), black_pieces.as_slice()) {
            // King vs King
            ([], []) => true,
            // King and minor piece vs King
            ([single], []) | ([], [single]) => is_minor(single),
            // King and Bishop vs King and Bishop (same color bishops)
            ([(white_pos, PieceType::Bishop)], [(black_pos, PieceType::Bishop)]) => {
                (white_pos.file + white_pos.rank) % 2 == (black_pos.file + black_pos.rank) % 2
            }
            _ => false,
        }
    }

    /// Any rule-based or stalemate draw.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.has_insufficient_material() || self.is_stalemate()
    }

    /// Material of white minus material of black, in centipawns.
    pub fn material_balance(&self) -> i32 {
        self.pieces
            .values()
            .map(|piece| match piece.color {
                Color::White => piece.piece_type.value(),
                Color::Black => -piece.piece_type.value(),
            })
            .sum()
    }

    /// Square control: for every square, white attackers minus black attackers.
    pub fn domination_score(&self) -> i32 {
        Position::all()
            .map(|pos| {
                self.attackers_count(pos, Color::White) as i32
                    - self.attackers_count(pos, Color::Black) as i32
            })
            .sum()
    }

    /// Zobrist hash of pieces, side to move, castling rights and en passant file.
    pub fn zobrist_hash(&self) -> u64 {
        let keys = &*ZOBRIST;
        let mut hash = 0u64;

        for (pos, piece) in self.pieces.iter() {
            hash ^= keys.pieces[piece.color.index()][piece.piece_type.index()][pos.index()];
        }

        if self.current_turn == Color::Black {
            hash ^= keys.black_to_move;
        }

        for (key, enabled) in keys.castling.iter().zip(self.castling_rights.as_array()) {
            if enabled {
                hash ^= key;
            }
        }

        if let Some(target) = self.en_passant {
            hash ^= keys.en_passant[target.file as usize - 1];
        }

        hash
    }
}

/// A two-file king step along a rank, the only shape a castling move takes.
fn is_castling_step(from: Position, to: Position) -> bool {
    from.rank == to.rank && (to.file as i8 - from.file as i8).abs() == 2
}

fn rejected(mv: Move) -> MoveError {
    debug!("rejected move {}", mv);
    MoveError::Illegal { mv }
}

/// Rook origin and destination for a castling king move.
fn castle_rook_squares(king_move: Move) -> (Position, Position) {
    let rank = king_move.from.rank;
    if king_move.to.file == 7 {
        (Position { file: 8, rank }, Position { file: 6, rank })
    } else {
        (Position { file: 1, rank }, Position { file: 4, rank })
    }
}
