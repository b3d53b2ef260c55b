use rayon::prelude::*;

use chess_core::Board;

/// Counts leaf positions `depth` plies down, walking the tree with
/// make/undo on a single board.
fn perft(board: &mut Board, depth: u8) -> u64 {
    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv).unwrap();
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

#[test]
fn perft_known_positions() {
    let cases: &[(&str, &[(u8, u64)])] = &[
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[(1, 20), (2, 400), (3, 8902)],
        ),
        // Castling both ways, pins and many captures
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[(1, 48)],
        ),
        // En passant and rook checks along the rank
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[(1, 14), (2, 191)]),
    ];

    cases.par_iter().for_each(|(fen, depths)| {
        for &(depth, expected) in depths.iter() {
            let mut board = Board::from_fen(fen).unwrap();
            let before = board.clone();
            let nodes = perft(&mut board, depth);
            assert_eq!(nodes, expected, "{} at depth {}", fen, depth);
            assert_eq!(board, before);
        }
    });
}
