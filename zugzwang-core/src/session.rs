//! Session actor and registry: the concurrency layer around [`Game`].
//!
//! Every live game runs on its own OS thread, consuming commands from an
//! `mpsc` channel strictly in order; the game, its clocks, and its position
//! are therefore never touched from more than one thread at a time and need
//! no locking of their own. A single process-wide registry maps a game id to
//! the channel that reaches its actor, guarded by a reader/writer lock that
//! is held only long enough to look up or mutate the map -- never while a
//! command runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, RwLock};
use std::thread;

use crate::coretypes::{Color, Color::*, Move};
use crate::diagnostics;
use crate::error::{self, Error, ErrorKind};
use crate::game::{Game, Snapshot};
use crate::timeman::TimeControl;

/// Opaque identity of a participant, assigned by the glue layer.
pub type UserId = u64;
/// Opaque identity of a game, assigned by [`Registry::new_game`].
pub type GameId = u64;

/// A point-in-time view of a session: the game snapshot plus which user, if
/// any, occupies each seat.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub game: Snapshot,
    pub users: HashMap<UserId, Color>,
}

type Reply<T> = mpsc::Sender<error::Result<T>>;

/// One message in a session's command queue. Every variant carries a
/// single-shot reply channel; the caller blocks on its `Receiver` half.
enum Command {
    Join(UserId, Reply<Color>),
    Move(UserId, Move, Reply<SessionSnapshot>),
    Resign(UserId, Reply<SessionSnapshot>),
    AgreeDraw(UserId, Reply<SessionSnapshot>),
    Snapshot(UserId, Reply<SessionSnapshot>),
    Close,
}

/// A cloneable, cheap-to-hold reference to a running session. Every method
/// sends one command and blocks on its reply, so it behaves like an ordinary
/// (fallible) method call even though the real work happens on another
/// thread.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<Command>,
}

impl SessionHandle {
    fn send<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> error::Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.sender
            .send(build(reply_tx))
            .map_err(|_| Error::from(ErrorKind::SessionClosed))?;
        reply_rx
            .recv()
            .map_err(|_| Error::from(ErrorKind::SessionClosed))?
    }

    /// Seats `user` in the first free seat. Once both seats are filled, the
    /// game's clock starts. Fails if `user` is already seated or neither
    /// seat is free.
    pub fn join(&self, user: UserId) -> error::Result<Color> {
        self.send(|reply| Command::Join(user, reply))
    }

    /// Plays `move_` on `user`'s behalf. Fails if `user` is not seated, if it
    /// is not their turn, or for any reason [`Game::play_move`] would fail.
    pub fn play_move(&self, user: UserId, move_: Move) -> error::Result<SessionSnapshot> {
        self.send(|reply| Command::Move(user, move_, reply))
    }

    /// Resigns on `user`'s behalf.
    pub fn resign(&self, user: UserId) -> error::Result<SessionSnapshot> {
        self.send(|reply| Command::Resign(user, reply))
    }

    /// Ends the game as a draw by agreement; either seated user may call this.
    pub fn agree_draw(&self, user: UserId) -> error::Result<SessionSnapshot> {
        self.send(|reply| Command::AgreeDraw(user, reply))
    }

    /// Reads the current session state. Fails if `user` is not seated.
    pub fn snapshot(&self, user: UserId) -> error::Result<SessionSnapshot> {
        self.send(|reply| Command::Snapshot(user, reply))
    }

    /// Terminates the session's actor thread. Commands sent after this
    /// resolve (or already in flight) fail with `SessionClosed`.
    pub fn close(&self) {
        let _ = self.sender.send(Command::Close);
    }
}

/// The two named seats a session has, indexed `White = 0, Black = 1`.
fn seat_index(color: Color) -> usize {
    match color {
        White => 0,
        Black => 1,
    }
}

/// Owns the [`Game`] and seat assignments; lives entirely on its actor
/// thread, so every method here takes `&mut self` freely.
struct SessionActor {
    game: Game,
    seats: [Option<UserId>; 2],
    debug: bool,
}

impl SessionActor {
    fn new(game: Game, debug: bool) -> Self {
        Self {
            game,
            seats: [None, None],
            debug,
        }
    }

    fn colour_of(&self, user: UserId) -> Option<Color> {
        if self.seats[seat_index(White)] == Some(user) {
            Some(White)
        } else if self.seats[seat_index(Black)] == Some(user) {
            Some(Black)
        } else {
            None
        }
    }

    fn join(&mut self, user: UserId) -> error::Result<Color> {
        if self.colour_of(user).is_some() {
            return Err(ErrorKind::UserAlreadyJoined.into());
        }
        let free: Vec<Color> = [White, Black]
            .into_iter()
            .filter(|color| self.seats[seat_index(*color)].is_none())
            .collect();
        let assigned = match free.as_slice() {
            [] => return Err(ErrorKind::GameFull.into()),
            [only] => *only,
            _ => {
                if rand::random::<bool>() {
                    White
                } else {
                    Black
                }
            }
        };
        self.seats[seat_index(assigned)] = Some(user);
        // The clock does not start until both seats are occupied.
        if self.seats.iter().all(Option::is_some) {
            self.game.start();
        }
        diagnostics::trace(self.debug, &format!("user {user} seated as {assigned:?}"));
        Ok(assigned)
    }

    fn play_move(&mut self, user: UserId, move_: Move) -> error::Result<SessionSnapshot> {
        let color = self.colour_of(user).ok_or(ErrorKind::NotAParticipant)?;
        if color != self.game.position().side_to_move() {
            return Err(ErrorKind::NotYourTurn.into());
        }
        self.game.play_move(move_)?;
        Ok(self.snapshot())
    }

    fn resign(&mut self, user: UserId) -> error::Result<SessionSnapshot> {
        let color = self.colour_of(user).ok_or(ErrorKind::NotAParticipant)?;
        self.game.resign(color)?;
        Ok(self.snapshot())
    }

    fn agree_draw(&mut self, user: UserId) -> error::Result<SessionSnapshot> {
        self.colour_of(user).ok_or(ErrorKind::NotAParticipant)?;
        self.game.agree_draw()?;
        Ok(self.snapshot())
    }

    fn snapshot_for(&mut self, user: UserId) -> error::Result<SessionSnapshot> {
        self.colour_of(user).ok_or(ErrorKind::NotAParticipant)?;
        Ok(self.snapshot())
    }

    fn snapshot(&mut self) -> SessionSnapshot {
        let mut users = HashMap::new();
        if let Some(user) = self.seats[seat_index(White)] {
            users.insert(user, White);
        }
        if let Some(user) = self.seats[seat_index(Black)] {
            users.insert(user, Black);
        }
        SessionSnapshot {
            game: self.game.snapshot(),
            users,
        }
    }

    fn run(mut self, commands: mpsc::Receiver<Command>) {
        for command in commands {
            match command {
                Command::Join(user, reply) => {
                    let _ = reply.send(self.join(user));
                }
                Command::Move(user, move_, reply) => {
                    let _ = reply.send(self.play_move(user, move_));
                }
                Command::Resign(user, reply) => {
                    let _ = reply.send(self.resign(user));
                }
                Command::AgreeDraw(user, reply) => {
                    let _ = reply.send(self.agree_draw(user));
                }
                Command::Snapshot(user, reply) => {
                    let _ = reply.send(self.snapshot_for(user));
                }
                Command::Close => break,
            }
        }
    }
}

/// Spawns a session's actor thread and returns a handle to it.
fn spawn_session(game: Game, debug: bool) -> SessionHandle {
    let (sender, receiver) = mpsc::channel();
    let actor = SessionActor::new(game, debug);
    thread::spawn(move || actor.run(receiver));
    SessionHandle { sender }
}

/// Process-wide `gameId -> session` map. The lock guards only the map
/// itself; no game logic ever runs while it is held.
pub struct Registry {
    sessions: RwLock<HashMap<GameId, SessionHandle>>,
    next_id: AtomicU64,
    debug: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// `capacity` is a hint for the initial size of the backing map; it does
    /// not bound how many sessions may be created.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::with_capacity(capacity)),
            next_id: AtomicU64::new(1),
            debug: false,
        }
    }

    /// Enables stderr tracing for every session this registry creates from
    /// this point on.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Starts a new game under `time_control`, spawns its actor, and
    /// registers it. Returns the id callers use to reach it.
    pub fn new_game(&self, time_control: TimeControl) -> GameId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = spawn_session(Game::new(time_control), self.debug);
        self.sessions.write().unwrap().insert(id, handle);
        diagnostics::trace(self.debug, &format!("game {id} started"));
        id
    }

    /// Looks up a session handle by id.
    pub fn get(&self, id: GameId) -> Option<SessionHandle> {
        self.sessions.read().unwrap().get(&id).cloned()
    }

    /// Closes and forgets a session. A no-op if `id` is not registered.
    pub fn close_session(&self, id: GameId) {
        if let Some(handle) = self.sessions.write().unwrap().remove(&id) {
            handle.close();
            diagnostics::trace(self.debug, &format!("game {id} closed"));
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
