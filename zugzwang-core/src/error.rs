//! Error type for the chess rules engine and session lifecycle.

use std::error;
use std::fmt::{self, Display};
use std::result;

use crate::fen::ParseFenError;

/// Crate-wide result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors produced by this crate.
///
/// Validation-class kinds are surfaced to callers as 4xx-equivalent failures;
/// everything else indicates a bug in the caller or in this crate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Square parse string malformed.
    ParseSquareMalformed,
    /// File parse string malformed.
    ParseFileMalformed,
    /// Rank parse string malformed.
    ParseRankMalformed,
    /// Color parse string malformed.
    ParseColorMalformed,
    /// Piece parse string malformed.
    ParsePieceMalformed,
    /// Castling rights parse string malformed.
    ParseCastlingMalformed,
    /// Fen error kinds.
    Fen,

    /// There is no piece on the move's origin square.
    NoPieceAtOrigin,
    /// The piece at the origin square belongs to the side not currently to move.
    WrongTurn,
    /// The proposed move is not a legal movement pattern for the piece in question.
    IllegalMoveForPiece,
    /// Playing the move would leave (or keep) the moving side's own king in check.
    LeavesKingInCheck,
    /// A pawn reached the promotion rank but no promotion piece was given.
    PromotionMissing,
    /// A promotion piece was given that is not one of Queen, Rook, Bishop, Knight.
    PromotionInvalid,
    /// A `TimeControl` was outside the allowed total/increment ranges.
    InvalidTimeControl,
    /// The game already has a terminal result; no further moves are accepted.
    GameAlreadyEnded,
    /// A command was issued by a user whose assigned colour is not the side to move.
    NotYourTurn,
    /// The moving side's clock reached zero before the move was played.
    OutOfTime,

    /// A command was issued by a user who is not seated in the session.
    NotAParticipant,

    /// No session exists for the given game id.
    GameNotFound,

    /// Both seats of the session are already taken.
    GameFull,
    /// The given user is already seated in the session.
    UserAlreadyJoined,

    /// The engine can only play games with a finite static number of moves.
    /// That limit has been exceeded.
    MoveHistoryExceeded,

    /// The session's command channel has been closed; it is no longer serviced.
    SessionClosed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseSquareMalformed => "parse square malformed",
            ErrorKind::ParseFileMalformed => "parse file malformed",
            ErrorKind::ParseRankMalformed => "parse rank malformed",
            ErrorKind::ParseColorMalformed => "parse color malformed",
            ErrorKind::ParsePieceMalformed => "parse piece malformed",
            ErrorKind::ParseCastlingMalformed => "parse castling malformed",
            ErrorKind::Fen => "fen",

            ErrorKind::NoPieceAtOrigin => "no piece at origin",
            ErrorKind::WrongTurn => "wrong turn",
            ErrorKind::IllegalMoveForPiece => "illegal move for piece",
            ErrorKind::LeavesKingInCheck => "leaves king in check",
            ErrorKind::PromotionMissing => "promotion missing",
            ErrorKind::PromotionInvalid => "promotion invalid",
            ErrorKind::InvalidTimeControl => "invalid time control",
            ErrorKind::GameAlreadyEnded => "game already ended",
            ErrorKind::NotYourTurn => "not your turn",
            ErrorKind::OutOfTime => "out of time",

            ErrorKind::NotAParticipant => "not a participant",

            ErrorKind::GameNotFound => "game not found",

            ErrorKind::GameFull => "game full",
            ErrorKind::UserAlreadyJoined => "user already joined",

            ErrorKind::MoveHistoryExceeded => "move history exceeded",

            ErrorKind::SessionClosed => "session closed",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary and general error type for this crate.
#[derive(Debug)]
pub enum Error {
    Simple(ErrorKind),
    Message(ErrorKind, String),
    Custom(ErrorKind, Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub fn new<E>(error_kind: ErrorKind, inner_error: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::Custom(error_kind, inner_error.into())
    }

    /// Returns the `ErrorKind` of this error, regardless of variant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(kind) => *kind,
            Error::Message(kind, _) => *kind,
            Error::Custom(kind, _) => *kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Simple(error_kind) => {
                write!(f, "{error_kind}")
            }
            Error::Message(error_kind, string) => {
                write!(f, "{error_kind}: {string}")
            }
            Error::Custom(error_kind, ref box_error) => {
                write!(f, "{error_kind}, error: {}", *box_error)
            }
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

impl From<ParseFenError> for Error {
    fn from(error: ParseFenError) -> Self {
        Self::Custom(ErrorKind::Fen, error.into())
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}
