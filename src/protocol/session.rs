//! Session state for the line protocol.
//!
//! Holds the running game and session options between commands, and turns
//! engine events into output lines.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use log::{info, warn};

use crate::board::{Action, Board};
use crate::config::RulesConfig;
use crate::engine::Game;
use crate::error::SnapshotError;
use crate::event::Event;
use crate::resolve::phase::{legal_actions, ActionKind};

use super::snapshot::{load_board, load_snapshot, save_snapshot};

/// Whether the main loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Holds the mutable state of the session between commands.
pub struct Session {
    pub game: Game,
    pub options: HashMap<String, String>,
    /// Rules from the `Rules` option, used for the next `new_game`.
    rules: RulesConfig,
}

impl Session {
    /// Creates a session with a fresh game on the sample board.
    pub fn new() -> Self {
        Session {
            game: Game::new(Board::sample(), RulesConfig::default(), 0),
            options: HashMap::new(),
            rules: RulesConfig::default(),
        }
    }

    /// The `Seed` option, or 0 (entropy) when unset or unparsable.
    fn seed(&self) -> u64 {
        self.options
            .get("Seed")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Sets a session option. `Rules` loads a rules file immediately and
    /// applies to the next game.
    pub fn set_option(&mut self, name: String, value: Option<String>) -> Result<(), SnapshotError> {
        let value = value.unwrap_or_default();
        if name == "Rules" {
            self.rules = if value.is_empty() {
                RulesConfig::default()
            } else {
                RulesConfig::load(Path::new(&value))?
            };
        }
        self.options.insert(name, value);
        Ok(())
    }

    /// Starts a new game on the given board file, or the sample board.
    pub fn new_game(&mut self, board: Option<&str>) -> Result<(), SnapshotError> {
        let board = match board {
            Some(path) => load_board(Path::new(path))?,
            None => Board::sample(),
        };
        info!("new game on {} territories", board.territory_count());
        self.game = Game::new(board, self.rules.clone(), self.seed());
        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        save_snapshot(Path::new(path), &self.game.snapshot())
    }

    /// Replaces the running game with a saved one, which keeps its own rules.
    pub fn load(&mut self, path: &str) -> Result<(), SnapshotError> {
        let snapshot = load_snapshot(Path::new(path))?;
        self.game = Game::from_snapshot(snapshot, self.seed());
        Ok(())
    }

    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")
    }

    /// Submits an action and writes one line per event, or an `error` line.
    ///
    /// Returns `Flow::Stop` once the game is won or a player asked to exit.
    pub fn handle_action<W: Write>(&mut self, action: Action, out: &mut W) -> io::Result<Flow> {
        let events = match self.game.apply(action) {
            Ok(events) => events,
            Err(e) => {
                warn!("rejected: {e}");
                writeln!(out, "error {e}")?;
                return Ok(Flow::Continue);
            }
        };
        let mut flow = Flow::Continue;
        for event in &events {
            writeln!(out, "{event}")?;
            match event {
                Event::BoardRequested => self.write_board(out)?,
                Event::HelpRequested { context } => {
                    for &kind in legal_actions(*context) {
                        writeln!(out, "  {}", usage(kind))?;
                    }
                }
                Event::ExitRequested | Event::Victory { .. } => flow = Flow::Stop,
                _ => {}
            }
        }
        Ok(flow)
    }

    /// Writes the map, one territory per line, then the active context.
    pub fn write_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for t in self.game.board().territories.values() {
            let owner = t.owner.as_deref().unwrap_or("-");
            writeln!(
                out,
                "  {} [{}] {} {} | {}",
                t.name,
                t.region,
                owner,
                t.armies,
                t.borders.iter().cloned().collect::<Vec<_>>().join(" ")
            )?;
        }
        for p in self.game.roster().players() {
            writeln!(
                out,
                "  player {} territories {} cards {} pending {}",
                p.name,
                self.game.board().owned_count(&p.name),
                p.cards.len(),
                p.pending
            )?;
        }
        writeln!(
            out,
            "  context {} player {}",
            self.game.context(),
            self.game.current_player().unwrap_or("-")
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Command syntax for an action kind.
fn usage(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::AddPlayer => "gameplayer add <name>",
        ActionKind::RemovePlayer => "gameplayer remove <name>",
        ActionKind::AssignTerritories => "assigncountries",
        ActionKind::PlaceArmy => "placearmy <territory>",
        ActionKind::ExchangeCards => "exchange <card> <card> <card>",
        ActionKind::Reinforce => "deploy <territory> <count>",
        ActionKind::Attack => "attack <from> <to> <dice|allout>",
        ActionKind::DeclineAttack => "noattack",
        ActionKind::Defend => "defend <dice>",
        ActionKind::MoveArmies => "attackmove <count>",
        ActionKind::Fortify => "fortify <from> <to> <count>",
        ActionKind::DeclineFortify => "nofortify",
        ActionKind::ShowBoard => "showmap",
        ActionKind::Help => "help",
        ActionKind::Exit => "exit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut Session, action: Action) -> (String, Flow) {
        let mut output = Vec::new();
        let flow = session.handle_action(action, &mut output).unwrap();
        (String::from_utf8(output).unwrap(), flow)
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let session = Session::new();
        let mut output = Vec::new();
        session.handle_isready(&mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap().trim(), "readyok");
    }

    #[test]
    fn set_option_stores_value() {
        let mut session = Session::new();
        session
            .set_option("Seed".to_string(), Some("8".to_string()))
            .unwrap();
        assert_eq!(session.options.get("Seed"), Some(&"8".to_string()));
        assert_eq!(session.seed(), 8);
    }

    #[test]
    fn missing_rules_file_is_an_error() {
        let mut session = Session::new();
        let err = session
            .set_option("Rules".to_string(), Some("/nonexistent/rules.json".to_string()))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn rejected_action_writes_error_line() {
        let mut session = Session::new();
        let (text, flow) = run(&mut session, Action::DeclineAttack);
        assert_eq!(flow, Flow::Continue);
        assert!(text.starts_with("error "), "{text}");
    }

    #[test]
    fn accepted_action_writes_events() {
        let mut session = Session::new();
        let (text, _) = run(
            &mut session,
            Action::AddPlayer {
                name: "red".to_string(),
            },
        );
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("red"));
    }

    #[test]
    fn help_lists_commands_for_context() {
        let mut session = Session::new();
        let (text, _) = run(&mut session, Action::Help);
        assert!(text.contains("gameplayer add <name>"));
        assert!(text.contains("assigncountries"));
        assert!(!text.contains("nofortify"));
    }

    #[test]
    fn showmap_lists_every_territory() {
        let mut session = Session::new();
        let (text, _) = run(&mut session, Action::ShowBoard);
        assert!(text.contains("frost [north]"));
        assert!(text.contains("context setup"));
        assert_eq!(text.lines().filter(|l| l.contains(" | ")).count(), 12);
    }

    #[test]
    fn exit_stops_the_session() {
        let mut session = Session::new();
        let (_, flow) = run(&mut session, Action::Exit);
        assert_eq!(flow, Flow::Stop);
    }

    #[test]
    fn new_game_resets_state() {
        let mut session = Session::new();
        run(
            &mut session,
            Action::AddPlayer {
                name: "red".to_string(),
            },
        );
        session.new_game(None).unwrap();
        assert!(session.game.roster().is_empty());
    }

    #[test]
    fn save_and_load_resume_the_game() {
        let path = std::env::temp_dir().join(format!("hegemon-session-{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let mut session = Session::new();
        for name in ["red", "blue"] {
            run(&mut session, Action::AddPlayer { name: name.to_string() });
        }
        session.save(&path).unwrap();

        let mut resumed = Session::new();
        resumed.load(&path).unwrap();
        assert_eq!(resumed.game.snapshot(), session.game.snapshot());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_keeps_the_rules_option_for_the_next_game() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let rules_path = dir.join(format!("hegemon-session-rules-{id}.json"));
        let save_path = dir.join(format!("hegemon-session-default-{id}.json"));
        std::fs::write(&rules_path, r#"{"initial_armies": [2]}"#).unwrap();

        let saved = Session::new();
        saved.save(&save_path.to_string_lossy()).unwrap();

        let mut session = Session::new();
        session
            .set_option("Rules".to_string(), Some(rules_path.to_string_lossy().to_string()))
            .unwrap();
        session.load(&save_path.to_string_lossy()).unwrap();
        assert_eq!(session.game.rules(), &RulesConfig::default());

        session.new_game(None).unwrap();
        assert_eq!(session.game.rules().initial_armies, vec![2]);

        let _ = std::fs::remove_file(&rules_path);
        let _ = std::fs::remove_file(&save_path);
    }
}
