//! En passant
//!
//! The en-passant target is set for exactly one half-move after a pawn
//! double-push, and is the *only* thing that makes the capture legal --
//! inserting any other move first loses the right permanently.

use std::time::Duration;

use zugzwang_core::{Game, Position, Square, TimeControl};

fn blitz() -> TimeControl {
    TimeControl::new(Duration::from_secs(300), Duration::from_secs(0)).unwrap()
}

#[test]
fn en_passant_capture_removes_the_passed_pawn() {
    let mut game = Game::new(blitz());
    game.start();
    for mv in ["a2a3", "d7d5", "a3a4", "d5d4", "e2e4"] {
        game.play_move(mv.parse().unwrap()).unwrap();
    }
    // Black's pawn on d4 may capture en passant into e3, taking the pawn
    // that just double-pushed to e4.
    game.play_move("d4e3".parse().unwrap())
        .expect("en passant capture should be legal immediately after the double push");
    let board = game.position().board();
    assert!(board[Square::E4].is_none(), "captured pawn should be gone");
    assert!(board[Square::E3].is_some(), "capturing pawn should have landed on e3");
}

#[test]
fn inserting_any_move_forfeits_the_en_passant_right() {
    let mut game = Game::new(blitz());
    game.start();
    for mv in ["a2a3", "d7d5", "a3a4", "d5d4", "e2e4", "h7h6"] {
        game.play_move(mv.parse().unwrap()).unwrap();
    }
    game.play_move("a4a5".parse().unwrap()).unwrap();
    // The window to capture en passant has passed.
    let err = game.play_move("d4e3".parse().unwrap()).unwrap_err();
    assert_eq!(err.kind(), zugzwang_core::ErrorKind::IllegalMoveForPiece);
}

#[test]
fn en_passant_target_is_set_only_immediately_after_a_double_push() {
    let position = Position::start_position();
    let after_push = position.make_move(zugzwang_core::Move::new(Square::E2, Square::E4, None));
    assert_eq!(after_push.en_passant(), &Some(Square::E3));

    let after_quiet = after_push.make_move(zugzwang_core::Move::new(Square::G8, Square::F6, None));
    assert_eq!(after_quiet.en_passant(), &None);
}

#[test]
fn single_step_pawn_moves_do_not_set_an_en_passant_target() {
    let position = Position::start_position();
    let after = position.make_move(zugzwang_core::Move::new(Square::E2, Square::E3, None));
    assert_eq!(after.en_passant(), &None);
}
