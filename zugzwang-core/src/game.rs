//! Game object: a position plus the clocks, time control, move history, and
//! repetition tally that determine when -- and how -- it ends.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::coretypes::{Color, Color::*, Move, MoveInfo};
use crate::error::{self, ErrorKind};
use crate::movelist::MoveHistory;
use crate::outcome::{self, DrawReason, ResultData};
use crate::position::Position;
use crate::repetition::{self, Key};
use crate::timeman::{Clock, TimeControl};

/// A read-only view of a game's progress, cheap to produce on demand.
/// `snapshot_time` lets a caller relate `remaining` to its own clock, since
/// both are sampled at the same instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub moves: MoveHistory,
    pub result: Option<ResultData>,
    pub snapshot_time: Instant,
    pub white_remaining: Duration,
    pub black_remaining: Duration,
}

impl Snapshot {
    pub fn remaining(&self, color: Color) -> Duration {
        match color {
            White => self.white_remaining,
            Black => self.black_remaining,
        }
    }
}

/// An in-progress or finished chess game: the current position, the time
/// control it was seeded with, a clock per side, the moves played so far,
/// a running tally of how many times each position has been reached (for
/// threefold detection), and the cached terminal result, once there is one.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    moves: MoveHistory,
    time_control: TimeControl,
    white_clock: Clock,
    black_clock: Clock,
    repetition_counts: HashMap<Key, u32>,
    result: Option<ResultData>,
}

impl Game {
    /// A new game from the standard start position under `time_control`.
    pub fn new(time_control: TimeControl) -> Self {
        Self::from_position(Position::start_position(), time_control)
    }

    /// A new game from an arbitrary starting position. Exposed for test
    /// construction alongside FEN parsing; `zugzwang-core` itself only ever
    /// starts games from [`Position::start_position`].
    pub fn from_position(position: Position, time_control: TimeControl) -> Self {
        let (white_clock, black_clock) = time_control.new_clocks();
        let mut repetition_counts = HashMap::new();
        repetition_counts.insert(repetition::key(&position), 1);
        Self {
            position,
            moves: MoveHistory::new(),
            time_control,
            white_clock,
            black_clock,
            repetition_counts,
            result: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn moves(&self) -> &MoveHistory {
        &self.moves
    }
    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    fn clock(&self, color: Color) -> &Clock {
        match color {
            White => &self.white_clock,
            Black => &self.black_clock,
        }
    }
    fn clock_mut(&mut self, color: Color) -> &mut Clock {
        match color {
            White => &mut self.white_clock,
            Black => &mut self.black_clock,
        }
    }

    /// Starts the moving side's clock, once, at the very start of the game.
    /// A no-op once a move has been played or the game has already ended.
    pub fn start(&mut self) {
        if self.result.is_none() && self.moves.is_empty() {
            self.clock_mut(self.position.side_to_move()).start();
        }
    }

    /// Plays `move_` for the side to move. Rejects the move, leaving the
    /// game entirely unchanged, if the game has already ended, if the move
    /// is illegal, or if the mover's clock had already run out.
    pub fn play_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        if self.result.is_some() {
            return Err(ErrorKind::GameAlreadyEnded.into());
        }
        if self.moves.len() == self.moves.capacity() {
            return Err(ErrorKind::MoveHistoryExceeded.into());
        }

        let mover = self.position.side_to_move();
        let mut next_position = self.position.clone();
        let move_info = next_position.do_legal_move(move_)?;

        let mover_clock = self.clock_mut(mover);
        if mover_clock.is_running() {
            mover_clock.stop();
        }
        if mover_clock.is_expired() {
            return Err(ErrorKind::OutOfTime.into());
        }
        mover_clock.add_increment(self.time_control.increment);

        self.position = next_position;
        self.moves.push(move_);

        let opponent_clock = self.clock_mut(!mover);
        if !opponent_clock.is_expired() {
            opponent_clock.start();
        }

        let key = repetition::key(&self.position);
        let count = self.repetition_counts.entry(key).or_insert(0);
        *count += 1;
        let count = *count;

        self.result = outcome::analyze(&self.position, count, false);
        Ok(move_info)
    }

    /// Resigns the game on `color`'s behalf; the opponent wins. Fails if the
    /// game has already ended.
    pub fn resign(&mut self, color: Color) -> error::Result<ResultData> {
        if self.result.is_some() {
            return Err(ErrorKind::GameAlreadyEnded.into());
        }
        self.white_clock.stop();
        self.black_clock.stop();
        let result = ResultData::resigned(!color);
        self.result = Some(result);
        Ok(result)
    }

    /// Ends the game as a draw by agreement. Fails if the game has already ended.
    pub fn agree_draw(&mut self) -> error::Result<ResultData> {
        if self.result.is_some() {
            return Err(ErrorKind::GameAlreadyEnded.into());
        }
        self.white_clock.stop();
        self.black_clock.stop();
        let result = ResultData::draw(DrawReason::Agreement);
        self.result = Some(result);
        Ok(result)
    }

    /// The game's terminal result, if any. Clock expiry is not pushed to the
    /// game as it happens; it is only observed here (and in [`Game::snapshot`])
    /// by checking whether the side to move has run out of time.
    pub fn result(&mut self) -> Option<ResultData> {
        self.refresh_result();
        self.result
    }

    /// A point-in-time view of the game, suitable for a glue layer to
    /// serialize. Also refreshes `result` for a clock that ran out between
    /// moves.
    pub fn snapshot(&mut self) -> Snapshot {
        self.refresh_result();
        Snapshot {
            moves: self.moves.clone(),
            result: self.result,
            snapshot_time: Instant::now(),
            white_remaining: self.white_clock.remaining_time(),
            black_remaining: self.black_clock.remaining_time(),
        }
    }

    fn refresh_result(&mut self) {
        if self.result.is_some() {
            return;
        }
        let side = self.position.side_to_move();
        if self.clock(side).is_expired() {
            self.result = outcome::analyze(&self.position, 0, true);
        }
    }
}
