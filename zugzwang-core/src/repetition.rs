//! Repetition-hash construction for threefold-repetition detection.
//!
//! Per FIDE §9.2, two positions are "the same" only when they agree on
//! piece placement, castling rights, side to move, and the en passant
//! target square -- nothing else. The key is built from a canonical string
//! encoding exactly those four things, sorted so board re-serialization
//! cannot change it, then hashed with a fixed (non-randomized) hasher so the
//! same position always produces the same key within a run.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use crate::position::Position;

/// A deterministic fingerprint of a position's repetition-equivalence class.
pub type Key = u64;

/// Computes `position`'s repetition key.
pub fn key(position: &Position) -> Key {
    let mut hasher = DefaultHasher::new();
    canonical_string(position).hash(&mut hasher);
    hasher.finish()
}

/// Builds the canonical string described above: occupied squares sorted
/// lexicographically, then castling rights, side to move, and en passant.
fn canonical_string(position: &Position) -> String {
    let mut squares: Vec<_> = position.board().occupied().collect();
    squares.sort_by_key(|(square, _)| *square);

    let mut canonical = String::with_capacity(squares.len() * 3 + 8);
    for (square, piece) in squares {
        let _ = write!(canonical, "{square}{piece}");
    }
    let _ = write!(
        canonical,
        "|{}|{}",
        position.castling(),
        position.side_to_move()
    );
    if let Some(en_passant) = position.en_passant() {
        let _ = write!(canonical, "|{en_passant}");
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{Move, Square::*};

    #[test]
    fn deterministic_for_equal_positions() {
        let a = Position::start_position();
        let b = Position::start_position();
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn differs_after_a_move() {
        let a = Position::start_position();
        let b = a.make_move(Move::new(E2, E4, None));
        assert_ne!(key(&a), key(&b));
    }

    #[test]
    fn same_placement_but_different_castling_rights_differ() {
        let with_rights = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let without_rights = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert_ne!(key(&with_rights), key(&without_rights));
    }

    #[test]
    fn same_placement_but_different_en_passant_differ() {
        let no_ep = Position::parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3")
            .unwrap();
        let with_ep = Position::parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
            .unwrap();
        assert_ne!(key(&no_ep), key(&with_ep));
    }

    #[test]
    fn returning_to_a_prior_position_repeats_its_key() {
        let start = Position::start_position();
        let after_four = start
            .make_move(Move::new(B1, C3, None))
            .make_move(Move::new(G8, F6, None))
            .make_move(Move::new(C3, B1, None))
            .make_move(Move::new(F6, G8, None));
        assert_eq!(key(&start), key(&after_four));
    }
}
