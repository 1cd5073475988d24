//! Castling
//!
//! Castling rights, blocked-by-attack rejection, and rook placement after a
//! completed castle, driven through `Game::play_move`.

use std::time::Duration;

use zugzwang_core::{Game, Position, Square, TimeControl};

fn blitz() -> TimeControl {
    TimeControl::new(Duration::from_secs(300), Duration::from_secs(0)).unwrap()
}

#[test]
fn kingside_castle_moves_king_and_rook_to_their_standard_squares() {
    let position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mut game = Game::from_position(position, blitz());
    game.start();
    game.play_move("e1g1".parse().unwrap())
        .expect("kingside castle should be legal with clear, unattacked squares");
    let board = game.position().board();
    assert_eq!(
        board[Square::G1].map(|p| *p.piece_kind()),
        Some(zugzwang_core::PieceKind::King)
    );
    assert_eq!(
        board[Square::F1].map(|p| *p.piece_kind()),
        Some(zugzwang_core::PieceKind::Rook)
    );
    assert!(board[Square::E1].is_none());
    assert!(board[Square::H1].is_none());
}

#[test]
fn queenside_castle_moves_king_and_rook_to_their_standard_squares() {
    let position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mut game = Game::from_position(position, blitz());
    game.start();
    game.play_move("e1c1".parse().unwrap())
        .expect("queenside castle should be legal with clear, unattacked squares");
    let board = game.position().board();
    assert_eq!(
        board[Square::C1].map(|p| *p.piece_kind()),
        Some(zugzwang_core::PieceKind::King)
    );
    assert_eq!(
        board[Square::D1].map(|p| *p.piece_kind()),
        Some(zugzwang_core::PieceKind::Rook)
    );
    assert!(board[Square::A1].is_none());
}

#[test]
fn castling_through_an_attacked_square_is_rejected() {
    // A black bishop on c4 attacks f1, the square the king must pass through
    // on the way to g1, so the kingside castle is illegal even though the
    // path is otherwise clear and the king itself is not in check.
    let position = Position::parse_fen("4k3/8/8/8/2b5/8/8/4K2R w K - 0 1").unwrap();
    let mut game = Game::from_position(position, blitz());
    game.start();
    let err = game.play_move("e1g1".parse().unwrap()).unwrap_err();
    assert_eq!(err.kind(), zugzwang_core::ErrorKind::IllegalMoveForPiece);
}

#[test]
fn castling_while_in_check_is_rejected() {
    let position = Position::parse_fen("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1").unwrap();
    let mut game = Game::from_position(position, blitz());
    game.start();
    assert!(game.position().is_in_check());
    let err = game.play_move("e1c1".parse().unwrap()).unwrap_err();
    assert_eq!(err.kind(), zugzwang_core::ErrorKind::IllegalMoveForPiece);
}

#[test]
fn moving_the_king_and_back_permanently_forfeits_castling_rights() {
    let position = Position::parse_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let mut game = Game::from_position(position, blitz());
    game.start();
    game.play_move("e1e2".parse().unwrap()).unwrap();
    game.play_move("e8e7".parse().unwrap()).unwrap();
    game.play_move("e2e1".parse().unwrap()).unwrap();
    game.play_move("e7e8".parse().unwrap()).unwrap();
    // The king has returned to e1, but the right is gone for good.
    let err = game.play_move("e1g1".parse().unwrap()).unwrap_err();
    assert_eq!(err.kind(), zugzwang_core::ErrorKind::IllegalMoveForPiece);
}
