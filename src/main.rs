//! CLI demo: stands up a registry, starts one game, and drives it from
//! stdin-typed pure-algebraic moves. Exists to exercise the actor/registry/
//! game stack by hand, in place of a real HTTP glue layer (out of scope --
//! see `zugzwang_core`'s crate docs).

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use zugzwang_core::session::Registry;
use zugzwang_core::{Color, Move, TimeControl};

const HOST_USER: u64 = 1;
const GUEST_USER: u64 = 2;

enum InputKind {
    Exit,
    Help,
    Resign,
    AgreeDraw,
    GameMove(Move),
    Unrecognized,
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(move_) = trimmed.parse() {
            return Self::GameMove(move_);
        }
        match trimmed {
            "exit" | "quit" => Self::Exit,
            "help" => Self::Help,
            "resign" => Self::Resign,
            "draw" => Self::AgreeDraw,
            _ => Self::Unrecognized,
        }
    }
}

fn main() -> io::Result<()> {
    println!("zugzwang CLI 0.1.0\n");

    let (total_secs, increment_secs) = parse_time_control_args();
    let time_control = TimeControl::new(
        Duration::from_secs(total_secs),
        Duration::from_secs(increment_secs),
    )
    .expect("command-line time control should be within the allowed range");

    let registry = Registry::new();
    let game_id = registry.new_game(time_control);
    let handle = registry.get(game_id).expect("just-created game is registered");

    let white = handle.join(HOST_USER).expect("first join always succeeds");
    handle.join(GUEST_USER).expect("second seat is free");
    println!("Playing both seats from one terminal. You are seated as {white:?} first.\n");

    print_help();

    let mut input = String::new();
    loop {
        let snapshot = handle
            .snapshot(HOST_USER)
            .expect("the host is always seated");
        let to_move = if snapshot.game.moves.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        };
        let acting_user = snapshot
            .users
            .iter()
            .find(|(_, &color)| color == to_move)
            .map(|(&user, _)| user)
            .unwrap_or(HOST_USER);

        println!(
            "move {} | White {:>6.1}s | Black {:>6.1}s",
            snapshot.game.moves.len(),
            snapshot.game.white_remaining.as_secs_f32(),
            snapshot.game.black_remaining.as_secs_f32(),
        );
        if let Some(result) = snapshot.game.result {
            println!("game over: {result:?}");
            return Ok(());
        }

        print!("{to_move:?}> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match InputKind::from(input.as_str()) {
            InputKind::Exit => break,
            InputKind::Help => print_help(),
            InputKind::Unrecognized => println!("unrecognized input: {}", input.trim()),
            InputKind::Resign => match handle.resign(acting_user) {
                Ok(snapshot) => println!("resigned. result: {:?}", snapshot.game.result),
                Err(err) => println!("could not resign: {err}"),
            },
            InputKind::AgreeDraw => match handle.agree_draw(acting_user) {
                Ok(snapshot) => println!("drawn. result: {:?}", snapshot.game.result),
                Err(err) => println!("could not agree to a draw: {err}"),
            },
            InputKind::GameMove(move_) => {
                if let Err(err) = handle.play_move(acting_user, move_) {
                    println!("illegal move: {err}");
                }
            }
        }
    }

    registry.close_session(game_id);
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  e2e4, g7g8q, ...  play a move in pure algebraic form");
    println!("  resign            resign on behalf of the side to move");
    println!("  draw              end the game as a draw by agreement");
    println!("  help              print this help text");
    println!("  exit | quit       leave the CLI\n");
}

/// `zugzwang [total_seconds] [increment_seconds]`, defaulting to 5+0 blitz.
fn parse_time_control_args() -> (u64, u64) {
    let mut args = env::args().skip(1);
    let total = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(300);
    let increment = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    (total, increment)
}
