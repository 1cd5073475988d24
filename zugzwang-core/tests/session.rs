//! Session actor and registry
//!
//! Exercises the concurrency layer from outside the crate: joining,
//! playing, resigning, and closing a session purely through
//! `Registry`/`SessionHandle`, plus the ordering guarantee that a snapshot
//! taken after a move is guaranteed to observe it even when the move and
//! the snapshot are issued from different threads.

use std::thread;
use std::time::Duration;

use zugzwang_core::session::Registry;
use zugzwang_core::{Color, ErrorKind, TimeControl};

fn blitz() -> TimeControl {
    TimeControl::new(Duration::from_secs(180), Duration::from_secs(1)).unwrap()
}

#[test]
fn joining_both_seats_assigns_opposite_colours_and_starts_the_clock() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    let handle = registry.get(id).unwrap();

    let first = handle.join(1).unwrap();
    let second = handle.join(2).unwrap();
    assert_ne!(first, second);

    // The clock does not start until the second player joins; by now it has.
    let snapshot = handle.snapshot(1).unwrap();
    assert!(snapshot.game.white_remaining <= Duration::from_secs(180));
    assert!(snapshot.game.black_remaining <= Duration::from_secs(180));
}

#[test]
fn a_move_is_visible_to_a_snapshot_issued_from_another_thread_afterward() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    let handle = registry.get(id).unwrap();
    let white = handle.join(1).unwrap();
    handle.join(2).unwrap();
    let (white_user, black_user) = if white == Color::White { (1, 2) } else { (2, 1) };
    let _ = black_user;

    let mover = handle.clone();
    thread::spawn(move || {
        mover.play_move(white_user, "e2e4".parse().unwrap()).unwrap();
    })
    .join()
    .unwrap();

    // FIFO per session: this snapshot is enqueued strictly after the move
    // completed, so it must observe it.
    let snapshot = handle.snapshot(white_user).unwrap();
    assert_eq!(snapshot.game.moves.len(), 1);
}

#[test]
fn a_third_join_is_rejected_with_game_full() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    let handle = registry.get(id).unwrap();
    handle.join(1).unwrap();
    handle.join(2).unwrap();
    let err = handle.join(3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GameFull);
}

#[test]
fn playing_out_of_turn_is_rejected() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    let handle = registry.get(id).unwrap();
    let white = handle.join(1).unwrap();
    let black = handle.join(2).unwrap();
    let black_user = if black == Color::Black { 2 } else { 1 };
    let _ = white;

    let err = handle
        .play_move(black_user, "e7e5".parse().unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotYourTurn);
}

#[test]
fn resigning_is_visible_in_the_next_snapshot() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    let handle = registry.get(id).unwrap();
    let white = handle.join(1).unwrap();
    handle.join(2).unwrap();
    let white_user = if white == Color::White { 1 } else { 2 };

    let snapshot = handle.resign(white_user).unwrap();
    assert!(snapshot.game.result.is_some());
    assert_eq!(snapshot.game.result.unwrap().winner, Some(Color::Black));
}

#[test]
fn closing_a_session_fails_subsequent_commands_and_forgets_it_in_the_registry() {
    let registry = Registry::new();
    let id = registry.new_game(blitz());
    registry.close_session(id);
    assert!(registry.get(id).is_none());
}

#[test]
fn registry_assigns_independent_ids_for_concurrently_created_games() {
    let registry = Registry::new();
    let ids: Vec<_> = (0..8).map(|_| registry.new_game(blitz())).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len(), "every game id should be unique");
}
