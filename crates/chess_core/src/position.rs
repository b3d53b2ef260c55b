use std::fmt;

/// A square on the board, 1-based in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub rank: u8,  // 1-8
    pub file: u8,  // a-h (1-8)
}

impl Position {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return None,
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8) - b'a' + 1,
            rank: (rank as u8) - b'0',
        })
    }

    /// Square shifted by the given deltas, if it stays on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file as i8 + file_delta;
        let rank = self.rank as i8 + rank_delta;
        if file < 1 || rank < 1 {
            return None;
        }
        Self::new(file as u8, rank as u8)
    }

    /// Index 0..64, a1 = 0, h8 = 63.
    pub fn index(self) -> usize {
        (self.rank as usize - 1) * 8 + (self.file as usize - 1)
    }

    /// Every square in scan order: rank 1 to 8, file a to h within each rank.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Position { rank, file }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file - 1) as char, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_notation() {
        let e4 = Position::from_algebraic("e4").unwrap();
        assert_eq!(e4, Position { file: 5, rank: 4 });
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Position::from_algebraic("i1"), None);
        assert_eq!(Position::from_algebraic("a9"), None);
        assert_eq!(Position::from_algebraic("a10"), None);
    }

    #[test]
    fn rejects_off_board_squares() {
        assert!(Position::new(0, 1).is_none());
        assert!(Position::new(1, 9).is_none());
        assert_eq!(Position { file: 8, rank: 8 }.offset(1, 0), None);
        assert_eq!(
            Position { file: 1, rank: 1 }.offset(1, 2),
            Some(Position { file: 2, rank: 3 })
        );
    }

    #[test]
    fn scan_order_starts_at_a1() {
        let squares: Vec<_> = Position::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].to_string(), "a1");
        assert_eq!(squares[1].to_string(), "b1");
        assert_eq!(squares[63].to_string(), "h8");
        assert!(squares.iter().enumerate().all(|(i, sq)| sq.index() == i));
    }
}
