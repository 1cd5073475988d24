//! Forsyth-Edwards Notation parsing and serialization.
//!
//! FEN is not part of the rules engine's external interface; it exists
//! purely as test-construction tooling, letting tests build arbitrary
//! positions in one line instead of replaying a move sequence.

use std::convert::TryFrom;
use std::error;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::boardrepr::Mailbox;
use crate::castling::CastlingRights;
use crate::coretypes::{Color::*, MoveCount, Piece, Square};
use crate::position::Position;

/// Describes why a FEN string failed to parse.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseFenError(pub(crate) String);

impl Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid fen: {}", self.0)
    }
}

impl error::Error for ParseFenError {}

fn fen_err<S: Into<String>>(message: S) -> ParseFenError {
    ParseFenError(message.into())
}

impl Position {
    /// Parses a FEN string into a `Position`.
    ///
    /// # Example
    /// ```ignore
    /// Position::parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
    /// ```
    pub fn parse_fen(fen: &str) -> Result<Position, ParseFenError> {
        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or_else(|| fen_err("missing placement"))?;
        let side_to_move = fields
            .next()
            .ok_or_else(|| fen_err("missing side to move"))?;
        let castling = fields.next().ok_or_else(|| fen_err("missing castling"))?;
        let en_passant = fields.next().ok_or_else(|| fen_err("missing en passant"))?;
        let halfmove_clock = fields
            .next()
            .ok_or_else(|| fen_err("missing halfmove clock"))?;
        let fullmove_count = fields
            .next()
            .ok_or_else(|| fen_err("missing fullmove count"))?;

        let board = parse_placement(placement)?;
        let side_to_move = match side_to_move {
            "w" => White,
            "b" => Black,
            other => return Err(fen_err(format!("invalid side to move `{other}`"))),
        };
        let castling = CastlingRights::from_str(castling)
            .map_err(|_| fen_err(format!("invalid castling rights `{castling}`")))?;
        let en_passant = match en_passant {
            "-" => None,
            square => Some(
                Square::from_str(square)
                    .map_err(|_| fen_err(format!("invalid en passant square `{square}`")))?,
            ),
        };
        let halfmove_clock: MoveCount = halfmove_clock
            .parse()
            .map_err(|_| fen_err(format!("invalid halfmove clock `{halfmove_clock}`")))?;
        let fullmove_count: MoveCount = fullmove_count
            .parse()
            .map_err(|_| fen_err(format!("invalid fullmove count `{fullmove_count}`")))?;

        Ok(Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_count,
        ))
    }

    /// Serializes this position to a FEN string.
    pub fn to_fen(&self) -> String {
        let placement = placement_to_fen(self.board());
        let side_to_move = self.side_to_move().to_char();
        let castling = self.castling().to_string();
        let en_passant = match self.en_passant() {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };
        let halfmove_clock = self.halfmove_clock();
        let fullmove_count = self.num_moves() / 2 + 1;

        format!(
            "{placement} {side_to_move} {castling} {en_passant} {halfmove_clock} {fullmove_count}"
        )
    }
}

fn parse_placement(placement: &str) -> Result<Mailbox, ParseFenError> {
    let mut board = Mailbox::new();
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(fen_err(format!(
            "placement has {} ranks, expected 8",
            ranks.len()
        )));
    }

    // FEN lists ranks from 8 down to 1.
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank_u8 = 7 - rank_from_top as u8;
        let mut file_u8 = 0u8;
        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                file_u8 += empty_count as u8;
            } else {
                let piece = Piece::try_from(ch)
                    .map_err(|_| fen_err(format!("invalid piece char `{ch}`")))?;
                let square = Square::from_u8(rank_u8 * 8 + file_u8)
                    .ok_or_else(|| fen_err("placement rank overflowed 8 files"))?;
                board[square] = Some(piece);
                file_u8 += 1;
            }
        }
        if file_u8 != 8 {
            return Err(fen_err(format!(
                "rank `{rank_str}` does not describe exactly 8 files"
            )));
        }
    }

    Ok(board)
}

fn placement_to_fen(board: &Mailbox) -> String {
    let mut placement = String::with_capacity(64 + 8);

    for rank_from_top in 0..8u8 {
        let rank_u8 = 7 - rank_from_top;
        let mut empty_run = 0u8;
        for file_u8 in 0..8u8 {
            let square = Square::from_u8(rank_u8 * 8 + file_u8).unwrap();
            match board[square] {
                Some(piece) => {
                    if empty_run > 0 {
                        placement.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    placement.push(char::from(piece));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            placement.push_str(&empty_run.to_string());
        }
        if rank_from_top != 7 {
            placement.push('/');
        }
    }

    placement
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_round_trips() {
        let start = Position::start_position();
        let fen = start.to_fen();
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let parsed = Position::parse_fen(&fen).unwrap();
        assert_eq!(parsed, start);
    }

    #[test]
    fn parses_en_passant_target() {
        let position =
            Position::parse_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert_eq!(position.en_passant(), &Some(Square::D6));
    }

    #[test]
    fn rejects_malformed_placement() {
        assert!(Position::parse_fen("not-a-fen w KQkq - 0 1").is_err());
    }
}
