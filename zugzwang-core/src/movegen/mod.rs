//! Move generation over a [`Mailbox`] board.
//!
//! Sliding pieces walk outward from their origin square one delta at a time,
//! stopping as soon as they hit the edge of the board or a piece (inclusive
//! if that piece is an enemy). Stepping pieces (knights, kings) and pawns
//! look up a fixed offset table instead of walking.

use crate::boardrepr::Mailbox;
use crate::castling::CastlingRights;
use crate::coretypes::{Color, Color::*, Move, Piece, PieceKind, PieceKind::*, Square};
use crate::movelist::MoveList;

/// (file_delta, rank_delta) offsets a rook can step along, one square at a time.
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// (file_delta, rank_delta) offsets a bishop can step along, one square at a time.
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
/// All 8 knight-leap offsets.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
/// All 8 adjacent-square offsets a king can step to.
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Walks from `origin` in a single direction until the edge of the board or an
/// occupied square is reached. The occupied square is included if it holds an
/// enemy piece, excluded (not a legal destination) if it holds a friendly one.
fn walk(board: &Mailbox, origin: Square, dir: (i8, i8), color: Color, out: &mut Vec<Square>) {
    let mut current = origin;
    loop {
        match current.add_delta(dir.0, dir.1) {
            Some(next) => current = next,
            None => return,
        }
        match board[current] {
            None => out.push(current),
            Some(piece) => {
                if piece.color != color {
                    out.push(current);
                }
                return;
            }
        }
    }
}

/// Pseudo-legal destination squares for the piece on `origin`, ignoring
/// whether the move would leave the mover's own king in check.
fn pseudo_destinations(
    board: &Mailbox,
    origin: Square,
    piece: Piece,
    castling: &CastlingRights,
    en_passant: Option<Square>,
) -> Vec<Square> {
    let color = piece.color;
    let mut squares = Vec::with_capacity(27);

    match piece.piece_kind {
        Rook => {
            for dir in ROOK_DIRS {
                walk(board, origin, dir, color, &mut squares);
            }
        }
        Bishop => {
            for dir in BISHOP_DIRS {
                walk(board, origin, dir, color, &mut squares);
            }
        }
        Queen => {
            for dir in ROOK_DIRS.iter().chain(BISHOP_DIRS.iter()) {
                walk(board, origin, *dir, color, &mut squares);
            }
        }
        Knight => {
            for (df, dr) in KNIGHT_OFFSETS {
                if let Some(to) = origin.add_delta(df, dr) {
                    if !matches_own(board, to, color) {
                        squares.push(to);
                    }
                }
            }
        }
        King => {
            for (df, dr) in KING_OFFSETS {
                if let Some(to) = origin.add_delta(df, dr) {
                    if !matches_own(board, to, color) {
                        squares.push(to);
                    }
                }
            }
            squares.extend(castling_destinations(board, origin, color, castling));
        }
        Pawn => pawn_destinations(board, origin, color, en_passant, &mut squares),
    }

    squares
}

fn matches_own(board: &Mailbox, square: Square, color: Color) -> bool {
    matches!(board[square], Some(p) if p.color == color)
}

fn pawn_forward(color: Color, square: Square) -> Option<Square> {
    match color {
        White => square.increment_rank(),
        Black => square.decrement_rank(),
    }
}

fn pawn_home_rank(color: Color, square: Square) -> bool {
    match color {
        White => square.rank() == crate::coretypes::Rank::R2,
        Black => square.rank() == crate::coretypes::Rank::R7,
    }
}

fn pawn_destinations(
    board: &Mailbox,
    origin: Square,
    color: Color,
    en_passant: Option<Square>,
    out: &mut Vec<Square>,
) {
    if let Some(one) = pawn_forward(color, origin) {
        if board[one].is_none() {
            out.push(one);
            if pawn_home_rank(color, origin) {
                if let Some(two) = pawn_forward(color, one) {
                    if board[two].is_none() {
                        out.push(two);
                    }
                }
            }
        }
    }

    for df in [-1i8, 1i8] {
        let attack_rank_delta = match color {
            White => 1,
            Black => -1,
        };
        if let Some(to) = origin.add_delta(df, attack_rank_delta) {
            let is_enemy = matches!(board[to], Some(p) if p.color != color);
            let is_ep = Some(to) == en_passant;
            if is_enemy || is_ep {
                out.push(to);
            }
        }
    }
}

/// Returns the number of `by_color` pieces that attack `square` on `board`.
/// Used to tell single check from double check, which restricts a king's
/// legal responses to moving the king itself.
pub fn count_attackers(board: &Mailbox, square: Square, by_color: Color) -> u32 {
    let mut count = 0;

    for dir in ROOK_DIRS {
        if let Some(found) = first_hit(board, square, dir) {
            if found.1.color == by_color && matches!(found.1.piece_kind, Rook | Queen) {
                count += 1;
            }
        }
    }
    for dir in BISHOP_DIRS {
        if let Some(found) = first_hit(board, square, dir) {
            if found.1.color == by_color && matches!(found.1.piece_kind, Bishop | Queen) {
                count += 1;
            }
        }
    }
    for (df, dr) in KNIGHT_OFFSETS {
        if let Some(at) = square.add_delta(df, dr) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == Knight) {
                count += 1;
            }
        }
    }
    for (df, dr) in KING_OFFSETS {
        if let Some(at) = square.add_delta(df, dr) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == King) {
                count += 1;
            }
        }
    }
    let behind_rank_delta = match by_color {
        White => -1,
        Black => 1,
    };
    for df in [-1i8, 1i8] {
        if let Some(at) = square.add_delta(df, behind_rank_delta) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == Pawn) {
                count += 1;
            }
        }
    }
    count
}

/// Returns true if `square` is attacked by any piece of `by_color` on `board`.
pub fn is_square_attacked(board: &Mailbox, square: Square, by_color: Color) -> bool {
    // Sliding attackers: walk outward from the target as if it carried a
    // rook/bishop, and see whether the piece found (if any) could reach back.
    for dir in ROOK_DIRS {
        if let Some(found) = first_hit(board, square, dir) {
            if found.1.color == by_color
                && matches!(found.1.piece_kind, Rook | Queen)
            {
                return true;
            }
        }
    }
    for dir in BISHOP_DIRS {
        if let Some(found) = first_hit(board, square, dir) {
            if found.1.color == by_color
                && matches!(found.1.piece_kind, Bishop | Queen)
            {
                return true;
            }
        }
    }
    for (df, dr) in KNIGHT_OFFSETS {
        if let Some(at) = square.add_delta(df, dr) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == Knight) {
                return true;
            }
        }
    }
    for (df, dr) in KING_OFFSETS {
        if let Some(at) = square.add_delta(df, dr) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == King) {
                return true;
            }
        }
    }
    // A pawn of by_color attacks `square` if it sits one rank behind `square`
    // on either diagonal, from by_color's point of view.
    let behind_rank_delta = match by_color {
        White => -1,
        Black => 1,
    };
    for df in [-1i8, 1i8] {
        if let Some(at) = square.add_delta(df, behind_rank_delta) {
            if matches!(board[at], Some(p) if p.color == by_color && p.piece_kind == Pawn) {
                return true;
            }
        }
    }
    false
}

fn first_hit(board: &Mailbox, origin: Square, dir: (i8, i8)) -> Option<(Square, Piece)> {
    let mut current = origin;
    loop {
        current = current.add_delta(dir.0, dir.1)?;
        if let Some(piece) = board[current] {
            return Some((current, piece));
        }
    }
}

/// Returns castling destination squares for the king on `origin`, checking
/// rights, clear in-between squares, and that the king does not start, pass
/// through, or land on an attacked square.
fn castling_destinations(
    board: &Mailbox,
    origin: Square,
    color: Color,
    castling: &CastlingRights,
) -> Vec<Square> {
    use Square::*;
    let mut dests = Vec::with_capacity(2);
    let opponent = !color;

    if is_square_attacked(board, origin, opponent) {
        return dests; // King in check, cannot castle at all.
    }

    let (kingside_between, kingside_to, queenside_between, queenside_pass, queenside_to) =
        match color {
            White => (
                [F1, G1],
                G1,
                [D1, C1, B1],
                [D1, C1],
                C1,
            ),
            Black => (
                [F8, G8],
                G8,
                [D8, C8, B8],
                [D8, C8],
                C8,
            ),
        };

    if castling.can_castle_kingside(color)
        && origin == kingside_castling_origin(color)
        && kingside_between.iter().all(|s| board[*s].is_none())
        && kingside_between
            .iter()
            .all(|s| !is_square_attacked(board, *s, opponent))
    {
        dests.push(kingside_to);
    }

    if castling.can_castle_queenside(color)
        && origin == kingside_castling_origin(color)
        && queenside_between.iter().all(|s| board[*s].is_none())
        && queenside_pass
            .iter()
            .all(|s| !is_square_attacked(board, *s, opponent))
    {
        dests.push(queenside_to);
    }

    dests
}

fn kingside_castling_origin(color: Color) -> Square {
    match color {
        White => CastlingRights::WHITE_KING_SQUARE,
        Black => CastlingRights::BLACK_KING_SQUARE,
    }
}

/// Generates every pseudo-legal move for `color` on `board`, not yet
/// filtered for leaving the mover's own king in check.
pub fn pseudo_legal_moves(
    board: &Mailbox,
    color: Color,
    castling: &CastlingRights,
    en_passant: Option<Square>,
) -> MoveList {
    let mut moves = MoveList::new();
    for (origin, piece) in board.occupied() {
        if piece.color != color {
            continue;
        }
        for to in pseudo_destinations(board, origin, piece, castling, en_passant) {
            if piece.piece_kind == Pawn && is_promotion_rank(color, to) {
                for promo in [Queen, Rook, Bishop, Knight] {
                    moves.push(Move::new(origin, to, Some(promo)));
                }
            } else {
                moves.push(Move::new(origin, to, None));
            }
        }
    }
    moves
}

pub(crate) fn is_promotion_rank(color: Color, square: Square) -> bool {
    match color {
        White => square.rank() == crate::coretypes::Rank::R8,
        Black => square.rank() == crate::coretypes::Rank::R1,
    }
}

/// Returns true if `color`'s king is presently attacked on `board`.
pub fn is_in_check(board: &Mailbox, color: Color) -> bool {
    match board.king_square(color) {
        Some(king_square) => is_square_attacked(board, king_square, !color),
        // A board with no king for `color` cannot be "in check" in the usual sense.
        None => false,
    }
}

/// Returns true if `to` is two files away from `from` along the same rank
/// for a king move -- the geometric signature of a castling move.
pub fn is_castling_move(piece_kind: PieceKind, from: Square, to: Square) -> bool {
    piece_kind == King && (from.file_u8() as i8 - to.file_u8() as i8).abs() == 2
}

/// Returns true if `to` is the en passant target and the mover is a pawn
/// moving diagonally into an empty square -- the geometric signature of an
/// en passant capture.
pub fn is_en_passant_move(
    board: &Mailbox,
    piece_kind: PieceKind,
    from: Square,
    to: Square,
) -> bool {
    piece_kind == Pawn && from.file_u8() != to.file_u8() && board[to].is_none()
}
