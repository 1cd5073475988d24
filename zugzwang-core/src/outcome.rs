//! Rules & result analyzer.
//!
//! Stateless queries over a [`Position`]: is the active side in check, does
//! it have any legal move, is there enough material on the board to force
//! mate, has the fifty-move counter run out. [`analyze`] combines these
//! with clock state and a repetition count (both owned by [`crate::game::Game`],
//! not by `Position` itself) into the terminal-outcome decision from §4.3.

use crate::coretypes::{Color, Color::*, PieceKind::*};
use crate::position::Position;

/// The terminal category a finished game falls into.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameResult {
    Draw,
    Checkmate,
    Timeout,
    Resigned,
}

/// Further detail for a [`GameResult::Draw`]; `None` for every other result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawReason {
    None,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoves,
    Agreement,
    InsufficientMaterialTimeout,
}

/// The outcome of a finished game. `winner` is set for `Checkmate`/`Timeout`/
/// `Resigned`, and absent for any `Draw`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ResultData {
    pub result: GameResult,
    pub draw_reason: DrawReason,
    pub winner: Option<Color>,
}

impl ResultData {
    pub const fn checkmate(winner: Color) -> Self {
        Self {
            result: GameResult::Checkmate,
            draw_reason: DrawReason::None,
            winner: Some(winner),
        }
    }
    pub const fn timeout(winner: Color) -> Self {
        Self {
            result: GameResult::Timeout,
            draw_reason: DrawReason::None,
            winner: Some(winner),
        }
    }
    pub const fn resigned(winner: Color) -> Self {
        Self {
            result: GameResult::Resigned,
            draw_reason: DrawReason::None,
            winner: Some(winner),
        }
    }
    pub const fn draw(reason: DrawReason) -> Self {
        Self {
            result: GameResult::Draw,
            draw_reason: reason,
            winner: None,
        }
    }
}

/// Returns true if `color` lacks the pieces to force mate against a lone
/// king: no pieces at all (excluding kings), or exactly one minor piece.
/// Used only to decide the `Timeout` vs `InsufficientMaterialTimeout` split.
pub fn is_insufficient_mating_material(position: &Position, color: Color) -> bool {
    let mut non_king = position
        .board()
        .occupied()
        .filter(|(_, piece)| *piece.color() == color && *piece.piece_kind() != King);
    match non_king.next() {
        None => true,
        Some((_, first)) => {
            matches!(first.piece_kind(), Bishop | Knight) && non_king.next().is_none()
        }
    }
}

/// Returns true iff neither side retains enough material to force
/// checkmate: K v K, K v K+minor, or opposite-coloured-bishops K+B v K+B.
pub fn is_insufficient_material(position: &Position) -> bool {
    let board = position.board();
    let white: Vec<_> = board
        .occupied()
        .filter(|(_, piece)| *piece.color() == White && *piece.piece_kind() != King)
        .collect();
    let black: Vec<_> = board
        .occupied()
        .filter(|(_, piece)| *piece.color() == Black && *piece.piece_kind() != King)
        .collect();

    match (white.as_slice(), black.as_slice()) {
        ([], []) => true,
        ([(_, lone)], []) | ([], [(_, lone)]) => matches!(lone.piece_kind(), Bishop | Knight),
        ([(white_sq, white_piece)], [(black_sq, black_piece)]) => {
            *white_piece.piece_kind() == Bishop
                && *black_piece.piece_kind() == Bishop
                && white_sq.is_light() != black_sq.is_light()
        }
        _ => false,
    }
}

/// Draw under the fifty-move rule: 100 half-moves since the last capture
/// and since the last pawn move (50 full moves).
pub fn is_fifty_move_draw(position: &Position) -> bool {
    position.num_moves() - position.last_capture_move() >= 100
        && position.num_moves() - position.last_pawn_move() >= 100
}

/// Decides `position`'s terminal outcome, per §4.3's ordering:
/// clock exhaustion, then checkmate/stalemate, then the three forced draws
/// in order (insufficient material, threefold, fifty-move). Returns `None`
/// while the game is still active.
///
/// `repetition_count` is the number of times `position`'s repetition key has
/// been seen, maintained by the caller (`Game` owns the running tally across
/// its whole history; `Position` itself carries no memory of prior states).
/// `side_to_move_clock_expired` likewise comes from the caller's clocks.
pub fn analyze(
    position: &Position,
    repetition_count: u32,
    side_to_move_clock_expired: bool,
) -> Option<ResultData> {
    let side = position.side_to_move();

    if side_to_move_clock_expired {
        return Some(if is_insufficient_mating_material(position, !side) {
            ResultData::draw(DrawReason::InsufficientMaterialTimeout)
        } else {
            ResultData::timeout(!side)
        });
    }

    if position.generate_legal_moves().is_empty() {
        return Some(if position.is_in_check() {
            ResultData::checkmate(!side)
        } else {
            ResultData::draw(DrawReason::Stalemate)
        });
    }

    if is_insufficient_material(position) {
        return Some(ResultData::draw(DrawReason::InsufficientMaterial));
    }
    if repetition_count >= 3 {
        return Some(ResultData::draw(DrawReason::ThreefoldRepetition));
    }
    if is_fifty_move_draw(position) {
        return Some(ResultData::draw(DrawReason::FiftyMoves));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_active() {
        let position = Position::start_position();
        assert_eq!(analyze(&position, 1, false), None);
    }

    #[test]
    fn fools_mate_is_checkmate_for_black() {
        let mut position = Position::start_position();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            position.do_legal_move(mv.parse().unwrap()).unwrap();
        }
        assert_eq!(
            analyze(&position, 1, false),
            Some(ResultData::checkmate(Black))
        );
    }

    #[test]
    fn lone_kings_stalemate_position() {
        let position = Position::parse_fen("k7/P7/K7/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(position.generate_legal_moves().is_empty());
        assert!(!position.is_in_check());
        assert_eq!(
            analyze(&position, 1, false),
            Some(ResultData::draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn lone_kings_is_insufficient_material() {
        let position = Position::parse_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1").unwrap();
        assert!(is_insufficient_material(&position));
        assert_eq!(
            analyze(&position, 1, false),
            Some(ResultData::draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn king_and_rook_is_sufficient_material() {
        let position = Position::parse_fen("8/8/4k3/8/8/4K2R/8/8 w - - 0 1").unwrap();
        assert!(!is_insufficient_material(&position));
    }

    #[test]
    fn opposite_coloured_bishops_are_insufficient() {
        let position = Position::parse_fen("8/2b1k3/8/8/8/4K3/3B4/8 w - - 0 1").unwrap();
        assert!(is_insufficient_material(&position));
    }

    #[test]
    fn same_coloured_bishops_are_sufficient() {
        let position = Position::parse_fen("8/3bk3/8/8/8/4K3/3B4/8 w - - 0 1").unwrap();
        assert!(!is_insufficient_material(&position));
    }

    #[test]
    fn timeout_with_lone_king_on_both_sides_is_drawn() {
        let position = Position::parse_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1").unwrap();
        assert_eq!(
            analyze(&position, 1, true),
            Some(ResultData::draw(DrawReason::InsufficientMaterialTimeout))
        );
    }

    #[test]
    fn timeout_with_opponent_holding_a_rook_is_a_real_timeout() {
        let position = Position::parse_fen("8/8/4k3/8/8/4K2R/8/8 w - - 0 1").unwrap();
        assert_eq!(analyze(&position, 1, true), Some(ResultData::timeout(Black)));
    }

    #[test]
    fn threefold_repetition_draws() {
        let position = Position::start_position();
        assert_eq!(
            analyze(&position, 3, false),
            Some(ResultData::draw(DrawReason::ThreefoldRepetition))
        );
    }

    #[test]
    fn fifty_move_rule_draws_at_the_hundredth_half_move() {
        let mut position = Position::parse_fen("k7/8/8/8/8/8/8/K6R w - - 99 1").unwrap();
        position.do_legal_move("h1h2".parse().unwrap()).unwrap();
        assert_eq!(
            analyze(&position, 1, false),
            Some(ResultData::draw(DrawReason::FiftyMoves))
        );
    }
}
