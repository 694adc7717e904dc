//! Change-set events returned after every accepted action.
//!
//! Callers render these (or poll the engine's accessors) instead of
//! registering callbacks. `Display` gives one transcript line per event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::CardKind;
use crate::resolve::combat::{PairOutcome, RoundReport};
use crate::resolve::phase::ContextKind;

/// Something that changed (or was requested) as a result of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PlayerAdded { player: String },
    PlayerRemoved { player: String },
    TerritoriesAssigned { player: String, count: usize, pending: u32 },
    ArmiesPlaced { player: String, territory: String, count: u32, pending: u32 },
    TurnStarted { player: String, reinforcements: u32 },
    CardsExchanged { player: String, bonus: u32 },
    CardAwarded { player: String, card: CardKind },
    PhaseChanged { from: ContextKind, to: ContextKind },
    BattleStarted { from: String, to: String, attacker: String, defender: String, all_out: bool },
    DefenderPrompted { defender: String, territory: String, max_dice: u8 },
    RoundResolved(RoundReport),
    AttackRepelled { from: String, to: String },
    TerritoryCaptured { territory: String, from: String, to: String },
    ArmiesMoved { from: String, to: String, count: u32 },
    PlayerEliminated { player: String, by: String },
    Victory { winner: String },
    BoardRequested,
    HelpRequested { context: ContextKind },
    ExitRequested,
}

fn faces(rolls: &[u8]) -> String {
    rolls
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {} -> {}: attacker [{}] defender [{}]",
            self.from,
            self.to,
            faces(&self.attacker_rolls),
            faces(&self.defender_rolls)
        )?;
        for (i, outcome) in self.outcomes.iter().enumerate() {
            let (a, d) = (self.attacker_rolls[i], self.defender_rolls[i]);
            match outcome {
                PairOutcome::AttackerWins => write!(f, " | {a}>{d} attacker")?,
                PairOutcome::DefenderWins => write!(f, " | {a}<={d} defender")?,
            }
        }
        write!(
            f,
            " | losses attacker {} defender {}",
            self.attacker_losses, self.defender_losses
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::PlayerAdded { player } => write!(f, "player {player} added"),
            Event::PlayerRemoved { player } => write!(f, "player {player} removed"),
            Event::TerritoriesAssigned { player, count, pending } => {
                write!(f, "{player} receives {count} territories, {pending} armies to place")
            }
            Event::ArmiesPlaced { player, territory, count, pending } => {
                write!(f, "{player} places {count} on {territory}, {pending} left")
            }
            Event::TurnStarted { player, reinforcements } => {
                write!(f, "turn {player}: {reinforcements} reinforcements")
            }
            Event::CardsExchanged { player, bonus } => {
                write!(f, "{player} exchanges cards for {bonus} armies")
            }
            Event::CardAwarded { player, card } => {
                write!(f, "{player} draws a {} card", card.name())
            }
            Event::PhaseChanged { from, to } => write!(f, "phase {from} -> {to}"),
            Event::BattleStarted { from, to, attacker, defender, all_out } => {
                let mode = if *all_out { " (all-out)" } else { "" };
                write!(f, "{attacker} attacks {to} ({defender}) from {from}{mode}")
            }
            Event::DefenderPrompted { defender, territory, max_dice } => {
                write!(f, "{defender} defends {territory}: choose 1-{max_dice} dice")
            }
            Event::RoundResolved(report) => report.fmt(f),
            Event::AttackRepelled { from, to } => {
                write!(f, "attack from {from} on {to} is exhausted")
            }
            Event::TerritoryCaptured { territory, from, to } => {
                write!(f, "{to} captures {territory} from {from}")
            }
            Event::ArmiesMoved { from, to, count } => write!(f, "{count} armies move {from} -> {to}"),
            Event::PlayerEliminated { player, by } => write!(f, "{player} is eliminated by {by}"),
            Event::Victory { winner } => write!(f, "{winner} wins the game"),
            Event::BoardRequested => write!(f, "board requested"),
            Event::HelpRequested { context } => write!(f, "help requested during {context}"),
            Event::ExitRequested => write!(f, "exit requested"),
        }
    }
}
