//! MoveList types used throughout the rules engine.
//!
//! The underlying type of these aliases may change at any time during
//! pre-1.0 development, so keeping them as type aliases makes changes easy.

use crate::arrayvec::ArrayVec;
use crate::coretypes::MAX_HISTORY;
use crate::coretypes::MAX_MOVES;
use crate::coretypes::{Move, MoveInfo};

/// MoveList holds at most `MAX_MOVES`, the most moves possible in any single chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
/// MoveInfoList is like MoveList however it also holds metadata for its moves.
pub type MoveInfoList = ArrayVec<MoveInfo, MAX_MOVES>;
/// MoveHistory holds the full sequence of moves played in a single game, up to `MAX_HISTORY`.
pub type MoveHistory = ArrayVec<Move, MAX_HISTORY>;
