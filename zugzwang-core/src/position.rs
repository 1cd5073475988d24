//! Holds the `Position` struct, an immutable snapshot of a chess position.
//!
//! A `Position` never mutates; applying a move produces a new snapshot. The
//! half-move counter `num_moves` is the single source of truth for whose
//! turn it is: an even count means White is to move.

use std::fmt::{self, Display};

use crate::boardrepr::Mailbox;
use crate::castling::CastlingRights;
use crate::coretypes::{Color, Move, MoveCount, MoveInfo, MoveKind, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::error::{self, ErrorKind};
use crate::movegen as mg;
use crate::movelist::MoveList;

/// An immutable snapshot of a chess position.
/// # Members:
/// * board - square-centric placement of every piece.
/// * num_moves - half-move counter; even means White to move, odd means Black.
/// * castling - tracks which of the six castling-relevant squares have moved.
/// * en_passant - target square capturable by en passant this move, if any.
/// * last_capture_move - `num_moves` value at the most recent capture (0 if none yet).
/// * last_pawn_move - `num_moves` value at the most recent pawn move (0 if none yet).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Position {
    pub(crate) board: Mailbox,
    pub(crate) num_moves: MoveCount,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) last_capture_move: MoveCount,
    pub(crate) last_pawn_move: MoveCount,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            board: Mailbox::start_position(),
            num_moves: 0,
            castling: CastlingRights::new(),
            en_passant: None,
            last_capture_move: 0,
            last_pawn_move: 0,
        }
    }

    /// Builds a position from its raw parts, as FEN parsing does.
    pub(crate) fn from_parts(
        board: Mailbox,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: MoveCount,
        fullmove_count: MoveCount,
    ) -> Self {
        // `num_moves` is the total ply count; a FEN's fullmove_count is 1-based
        // and counts from White's first move, so convert to 0-based ply.
        let mut num_moves = match side_to_move {
            White => fullmove_count.saturating_sub(1) * 2,
            Black => fullmove_count.saturating_sub(1) * 2 + 1,
        };
        // A hand-built FEN (tests use these to stage near-fifty-move
        // positions) can carry a halfmove clock bigger than the
        // fullmove-derived ply count. Bump `num_moves` up to fit it without
        // disturbing whose turn it is, so the clock survives the round trip
        // instead of saturating away.
        if halfmove_clock > num_moves {
            let shortfall = halfmove_clock - num_moves;
            num_moves += shortfall + shortfall % 2;
        }
        let last_capture_move = num_moves - halfmove_clock;
        Self {
            board,
            num_moves,
            castling,
            en_passant,
            last_capture_move,
            last_pawn_move: last_capture_move,
        }
    }

    /// Const getters.
    pub fn board(&self) -> &Mailbox {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        if self.num_moves % 2 == 0 {
            White
        } else {
            Black
        }
    }
    pub fn castling(&self) -> &CastlingRights {
        &self.castling
    }
    pub fn en_passant(&self) -> &Option<Square> {
        &self.en_passant
    }
    pub fn num_moves(&self) -> MoveCount {
        self.num_moves
    }
    pub fn last_capture_move(&self) -> MoveCount {
        self.last_capture_move
    }
    pub fn last_pawn_move(&self) -> MoveCount {
        self.last_pawn_move
    }

    /// Half-moves since the last capture or pawn move, the fifty-move rule's counter.
    pub fn halfmove_clock(&self) -> MoveCount {
        self.num_moves - self.last_capture_move.max(self.last_pawn_move)
    }

    /// Applies `move_` to self in place, assuming it is already a legal move
    /// for the side to move. Returns metadata describing what happened.
    ///
    /// Callers that have not already validated legality should use
    /// [`Position::do_legal_move`] instead.
    pub fn do_move(&mut self, move_: Move) -> MoveInfo {
        let side = self.side_to_move();
        let piece = self.board[move_.from].expect("do_move requires a piece on `from`");
        let is_castle = mg::is_castling_move(piece.piece_kind, move_.from, move_.to);
        let is_en_passant = mg::is_en_passant_move(&self.board, piece.piece_kind, move_.from, move_.to);
        let captured_piece_kind = if is_en_passant {
            Some(Pawn)
        } else {
            self.board[move_.to].map(|p| p.piece_kind)
        };

        let move_kind = if is_castle {
            MoveKind::Castle
        } else if is_en_passant {
            MoveKind::EnPassant
        } else if let Some(captured) = captured_piece_kind {
            MoveKind::Capture(captured)
        } else {
            MoveKind::Quiet
        };

        // Remove the captured en passant pawn, which sits beside `to`, not on it.
        if is_en_passant {
            let captured_square = match side {
                White => move_.to.decrement_rank().unwrap(),
                Black => move_.to.increment_rank().unwrap(),
            };
            self.board[captured_square] = None;
        }

        self.board[move_.from] = None;
        let placed = match move_.promotion {
            Some(promotion_kind) => Piece::new(side, promotion_kind),
            None => piece,
        };
        self.board[move_.to] = Some(placed);

        // Castling also relocates the rook.
        if is_castle {
            let (rook_from, rook_to) = match move_.to {
                Square::G1 => (Square::H1, Square::F1),
                Square::C1 => (Square::A1, Square::D1),
                Square::G8 => (Square::H8, Square::F8),
                Square::C8 => (Square::A8, Square::D8),
                _ => unreachable!("castling destination is always one of G1/C1/G8/C8"),
            };
            let rook = self.board[rook_from].take();
            self.board[rook_to] = rook;
        }

        self.castling.touch(move_.from);
        self.castling.touch(move_.to);

        self.en_passant = match (piece.piece_kind, move_.from.rank(), move_.to.rank()) {
            (Pawn, from_rank, to_rank)
                if (from_rank as i8 - to_rank as i8).abs() == 2 =>
            {
                match side {
                    White => move_.from.increment_rank(),
                    Black => move_.from.decrement_rank(),
                }
            }
            _ => None,
        };

        self.num_moves += 1;
        if piece.piece_kind == Pawn {
            self.last_pawn_move = self.num_moves;
        }
        if move_kind != MoveKind::Quiet && move_kind != MoveKind::Castle {
            self.last_capture_move = self.num_moves;
        }

        MoveInfo::new(move_, piece.piece_kind, move_kind)
    }

    /// Generates a new Position from applying `move_` on the current Position.
    pub fn make_move(&self, move_: Move) -> Self {
        let mut position_clone = self.clone();
        position_clone.do_move(move_);
        position_clone
    }

    /// Validates and applies `move_`, mutating self only if it is legal.
    /// Errors describe precisely why the move was rejected, per the engine's
    /// move legality checks.
    pub fn do_legal_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        let piece = self.board[move_.from].ok_or(ErrorKind::NoPieceAtOrigin)?;
        if piece.color != self.side_to_move() {
            return Err(ErrorKind::WrongTurn.into());
        }
        if self.generate_legal_moves().iter().any(|m| *m == move_) {
            return Ok(self.do_move(move_));
        }

        // Not an exact match among legal moves. Find the most precise reason
        // why, by walking back through increasingly permissive checks.
        let pseudo = mg::pseudo_legal_moves(&self.board, piece.color, &self.castling, self.en_passant);
        let reachable = pseudo.iter().any(|m| m.from() == move_.from && m.to() == move_.to);

        if reachable && piece.piece_kind == Pawn && mg::is_promotion_rank(piece.color, move_.to) {
            match move_.promotion {
                None => return Err(ErrorKind::PromotionMissing.into()),
                Some(kind) if !kind.is_promotable_to() => {
                    return Err(ErrorKind::PromotionInvalid.into())
                }
                _ => {}
            }
        }
        if reachable {
            return Err(ErrorKind::LeavesKingInCheck.into());
        }
        Err(ErrorKind::IllegalMoveForPiece.into())
    }

    /// Checks if `move_` is legal for the current position.
    pub fn is_legal_move(&self, move_: Move) -> bool {
        self.generate_legal_moves().iter().any(|m| *m == move_)
    }

    /// Returns true if the active player's king is in check.
    pub fn is_in_check(&self) -> bool {
        mg::is_in_check(&self.board, self.side_to_move())
    }

    /// Returns every legal move for the side to move: pseudo-legal moves,
    /// filtered to exclude any that would leave (or put) the mover's own
    /// king in check.
    pub fn generate_legal_moves(&self) -> MoveList {
        let side = self.side_to_move();
        let pseudo = mg::pseudo_legal_moves(&self.board, side, &self.castling, self.en_passant);

        let mut legal = MoveList::new();
        for move_ in pseudo {
            let mut after = self.clone();
            after.do_move(move_);
            if !mg::is_in_check(&after.board, side) {
                legal.push(move_);
            }
        }
        legal
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and FEN string representing the Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\n Fen: {}\n", self.board, self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn pretty_print_position() {
        let start_pos = Position::start_position();
        println!("{start_pos}");
    }

    #[test]
    fn do_move_with_legal_move() {
        let move1 = Move::new(E2, E4, None);
        let mut position = Position::start_position();
        position.do_move(move1);
        assert_eq!(position.board[E4].map(|p| p.piece_kind), Some(Pawn));
        assert!(position.board[E2].is_none());
        assert_eq!(position.en_passant, Some(E3));
        assert_eq!(position.side_to_move(), Black);
    }

    #[test]
    fn start_position_has_twenty_legal_moves() {
        let position = Position::start_position();
        assert_eq!(position.generate_legal_moves().len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_move_off_pin_line() {
        // White king on e1, white rook pinned on e4 by black rook on e8.
        let position = Position::parse_fen("4r3/8/8/8/4R3/8/8/4K3 w - - 0 1").unwrap();
        let legal = position.generate_legal_moves();
        // The pinned rook may only move along the e-file.
        assert!(legal
            .iter()
            .filter(|m| m.from() == E4)
            .all(|m| m.to().file() == E4.file()));
    }

    #[test]
    fn king_in_check_restricts_moves() {
        let position = Position::parse_fen("8/8/8/8/3K3r/8/8/8 w - - 0 1").unwrap();
        assert!(position.is_in_check());
        for m in position.generate_legal_moves() {
            let after = position.make_move(m);
            assert!(!mg::is_in_check(&after.board, White));
        }
    }

    #[test]
    fn castling_requires_clear_and_unattacked_squares() {
        let position =
            Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let legal = position.generate_legal_moves();
        assert!(legal.iter().any(|m| m.from() == E1 && m.to() == G1));
        assert!(legal.iter().any(|m| m.from() == E1 && m.to() == C1));
    }
}
