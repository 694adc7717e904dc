//! Hegemon -- a territory conquest game engine driven over stdin.
//!
//! This binary reads commands from stdin and writes one line per game
//! event to stdout. Diagnostics go to stderr via `RUST_LOG`.

use std::io::{self, BufRead, Write};

use log::{error, info};

use hegemon::protocol::parser::{parse_command, Command};
use hegemon::protocol::session::{Flow, Session};

/// Runs the main protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new();

    if let Err(e) = run(&mut session, stdin.lock(), &mut out) {
        error!("output failed: {e}");
    }
}

fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match cmd {
            Command::IsReady => {
                session.handle_isready(out)?;
                Ok(())
            }
            Command::SetOption { name, value } => session.set_option(name, value),
            Command::NewGame { board } => session.new_game(board.as_deref()),
            Command::Save { path } => session.save(&path),
            Command::Load { path } => session.load(&path),
            Command::Play(action) => {
                let flow = session.handle_action(action, out)?;
                out.flush()?;
                if flow == Flow::Stop {
                    info!("session finished");
                    break;
                }
                Ok(())
            }
            Command::Quit => break,
        };
        if let Err(e) = result {
            writeln!(out, "error {e}")?;
        }
        out.flush()?;
    }
    out.flush()
}
