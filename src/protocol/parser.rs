//! Command parser for the line protocol.
//!
//! Parses incoming text lines into structured `Command` values. Game
//! commands become typed `Action`s; session commands (new game, save,
//! options) are handled by `protocol::session`.

use log::warn;

use crate::board::{Action, AttackDice};

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the session replies `readyok`.
    IsReady,

    /// Set a session option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a new game on the sample board or a board file.
    NewGame { board: Option<String> },

    /// Write a snapshot of the current game to a file.
    Save { path: String },

    /// Resume a game from a snapshot file.
    Load { path: String },

    /// Terminate the process.
    Quit,

    /// A game action for the engine.
    Play(Action),
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines, unknown commands, and malformed
/// arguments; the latter two are logged.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    let command = match head {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "setoption" => parse_setoption(args),
        "newgame" => Some(Command::NewGame {
            board: args.first().map(|s| s.to_string()),
        }),
        "save" => single(args).map(|path| Command::Save { path }),
        "load" => single(args).map(|path| Command::Load { path }),
        _ => parse_action(head, args).map(Command::Play),
    };
    if command.is_none() {
        warn!("unrecognized or malformed command: '{}'", line.trim());
    }
    command
}

fn single(args: &[&str]) -> Option<String> {
    match args {
        [one] => Some(one.to_string()),
        _ => None,
    }
}

fn number<T: std::str::FromStr>(token: &str) -> Option<T> {
    token.parse::<T>().ok()
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(args: &[&str]) -> Option<Command> {
    if args.len() < 2 || args[0] != "name" {
        return None;
    }
    let rest = &args[1..];
    let (name, value) = match rest.iter().position(|&t| t == "value") {
        Some(vi) => {
            let value = rest[vi + 1..].join(" ");
            (rest[..vi].join(" "), (!value.is_empty()).then_some(value))
        }
        None => (rest.join(" "), None),
    };
    if name.is_empty() {
        return None;
    }
    Some(Command::SetOption { name, value })
}

/// Parses the game command grammar into an `Action`.
fn parse_action(head: &str, args: &[&str]) -> Option<Action> {
    match (head, args) {
        ("gameplayer", ["add", name]) => Some(Action::AddPlayer {
            name: name.to_string(),
        }),
        ("gameplayer", ["remove", name]) => Some(Action::RemovePlayer {
            name: name.to_string(),
        }),
        ("assigncountries", []) => Some(Action::AssignTerritories),
        ("placearmy", [territory]) => Some(Action::PlaceArmy {
            territory: territory.to_string(),
        }),
        ("exchange", [a, b, c]) => {
            // Cards are numbered from 1 on the wire.
            let pick = |t: &str| number::<usize>(t)?.checked_sub(1);
            Some(Action::ExchangeCards {
                cards: [pick(a)?, pick(b)?, pick(c)?],
            })
        }
        ("deploy", [territory, count]) => Some(Action::Reinforce {
            territory: territory.to_string(),
            count: number(count)?,
        }),
        ("attack", [from, to, dice]) => {
            let dice = match *dice {
                "allout" => AttackDice::AllOut,
                n => AttackDice::Count(number(n)?),
            };
            Some(Action::Attack {
                from: from.to_string(),
                to: to.to_string(),
                dice,
            })
        }
        ("noattack", []) => Some(Action::DeclineAttack),
        ("defend", [dice]) => Some(Action::Defend {
            dice: number(dice)?,
        }),
        ("attackmove", [count]) => Some(Action::MoveArmies {
            count: number(count)?,
        }),
        ("fortify", [from, to, count]) => Some(Action::Fortify {
            from: from.to_string(),
            to: to.to_string(),
            count: number(count)?,
        }),
        ("nofortify", []) => Some(Action::DeclineFortify),
        ("showmap", []) => Some(Action::ShowBoard),
        ("help", []) => Some(Action::Help),
        ("exit", []) => Some(Action::Exit),
        _ => None,
    }
}
