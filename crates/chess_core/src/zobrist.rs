//! Zobrist keys used for the board's stable identity.
//!
//! The keys are drawn once from a seeded generator so that the same position
//! hashes to the same value in every run of the program.

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};

const ZOBRIST_SEED: u64 = 0x5EED_C4E5_5A11_D00D;

pub(crate) struct ZobristKeys {
    /// Indexed by [color][piece_type][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XOR-ed in when black is to move
    pub black_to_move: u64,
    /// [white kingside, white queenside, black kingside, black queenside]
    pub castling: [u64; 4],
    /// By file of the en passant target
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in pieces.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move = rng.gen();

        let mut castling = [0u64; 4];
        rng.fill(&mut castling[..]);

        let mut en_passant = [0u64; 8];
        rng.fill(&mut en_passant[..]);

        Self {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);
