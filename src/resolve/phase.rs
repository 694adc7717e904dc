//! Phase/context state machine.
//!
//! Each context owns a fixed set of legal action kinds, held in a static
//! table. The engine checks membership before dispatching any action.
//!
//! Phase flow:
//! - Setup     -> Startup (territories dealt)
//! - Startup   -> Reinforce (every pending pool placed)
//! - Reinforce -> Attack (current player's pool empty)
//! - Attack    -> Defend (attack declared) -> Attack | Occupy | GameOver
//! - Occupy    -> Attack
//! - Attack    -> Fortify (declined, or no legal attack left)
//! - Fortify   -> Reinforce for the next player

use std::fmt;

use serde::{Deserialize, Serialize};

use super::combat::{Battle, Conquest};

/// Every kind of action a player can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    AddPlayer,
    RemovePlayer,
    AssignTerritories,
    PlaceArmy,
    ExchangeCards,
    Reinforce,
    Attack,
    DeclineAttack,
    Defend,
    MoveArmies,
    Fortify,
    DeclineFortify,
    ShowBoard,
    Help,
    Exit,
}

impl ActionKind {
    /// Returns true for actions that never mutate the game.
    pub const fn is_passive(self) -> bool {
        matches!(self, ActionKind::ShowBoard | ActionKind::Help | ActionKind::Exit)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::AddPlayer => "add-player",
            ActionKind::RemovePlayer => "remove-player",
            ActionKind::AssignTerritories => "assign-territories",
            ActionKind::PlaceArmy => "place-army",
            ActionKind::ExchangeCards => "exchange-cards",
            ActionKind::Reinforce => "reinforce",
            ActionKind::Attack => "attack",
            ActionKind::DeclineAttack => "decline-attack",
            ActionKind::Defend => "defend",
            ActionKind::MoveArmies => "move-armies",
            ActionKind::Fortify => "fortify",
            ActionKind::DeclineFortify => "decline-fortify",
            ActionKind::ShowBoard => "show-board",
            ActionKind::Help => "help",
            ActionKind::Exit => "exit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The active context without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextKind {
    Setup,
    Startup,
    Reinforce,
    Attack,
    Defend,
    Occupy,
    Fortify,
    GameOver,
}

impl ContextKind {
    pub const fn name(self) -> &'static str {
        match self {
            ContextKind::Setup => "setup",
            ContextKind::Startup => "startup",
            ContextKind::Reinforce => "reinforcement",
            ContextKind::Attack => "attack",
            ContextKind::Defend => "defend",
            ContextKind::Occupy => "attack move",
            ContextKind::Fortify => "fortification",
            ContextKind::GameOver => "game over",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use ActionKind::*;

const SETUP: &[ActionKind] = &[AddPlayer, RemovePlayer, AssignTerritories, ShowBoard, Help, Exit];
const STARTUP: &[ActionKind] = &[PlaceArmy, ShowBoard, Help, Exit];
const REINFORCE: &[ActionKind] = &[ExchangeCards, Reinforce, ShowBoard, Help, Exit];
const ATTACK: &[ActionKind] = &[Attack, DeclineAttack, ShowBoard, Help, Exit];
const DEFEND: &[ActionKind] = &[Defend, ShowBoard, Help, Exit];
const OCCUPY: &[ActionKind] = &[MoveArmies];
const FORTIFY: &[ActionKind] = &[Fortify, DeclineFortify, ShowBoard, Help, Exit];
const GAME_OVER: &[ActionKind] = &[ShowBoard, Exit];

/// Returns the legal action kinds for a context.
pub const fn legal_actions(kind: ContextKind) -> &'static [ActionKind] {
    match kind {
        ContextKind::Setup => SETUP,
        ContextKind::Startup => STARTUP,
        ContextKind::Reinforce => REINFORCE,
        ContextKind::Attack => ATTACK,
        ContextKind::Defend => DEFEND,
        ContextKind::Occupy => OCCUPY,
        ContextKind::Fortify => FORTIFY,
        ContextKind::GameOver => GAME_OVER,
    }
}

/// Returns true if `action` may be issued in `context`.
pub fn is_legal(context: ContextKind, action: ActionKind) -> bool {
    legal_actions(context).contains(&action)
}

/// The context entered when `kind` reaches its terminal condition.
///
/// Battle sub-contexts return to Attack; Fortify wraps to the next
/// player's Reinforce. GameOver is absorbing.
pub const fn next_context(kind: ContextKind) -> ContextKind {
    match kind {
        ContextKind::Setup => ContextKind::Startup,
        ContextKind::Startup => ContextKind::Reinforce,
        ContextKind::Reinforce => ContextKind::Attack,
        ContextKind::Attack => ContextKind::Fortify,
        ContextKind::Defend | ContextKind::Occupy => ContextKind::Attack,
        ContextKind::Fortify => ContextKind::Reinforce,
        ContextKind::GameOver => ContextKind::GameOver,
    }
}

/// The active context, carrying battle state where a sub-context needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Context {
    Setup,
    Startup,
    Reinforce,
    Attack,
    /// Waiting for the defender's dice for the next round of a battle.
    Defend(Battle),
    /// Waiting for the attacker to move armies into a captured territory.
    Occupy(Conquest),
    Fortify,
    GameOver { winner: String },
}

impl Context {
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::Setup => ContextKind::Setup,
            Context::Startup => ContextKind::Startup,
            Context::Reinforce => ContextKind::Reinforce,
            Context::Attack => ContextKind::Attack,
            Context::Defend(_) => ContextKind::Defend,
            Context::Occupy(_) => ContextKind::Occupy,
            Context::Fortify => ContextKind::Fortify,
            Context::GameOver { .. } => ContextKind::GameOver,
        }
    }

    pub fn allows(&self, action: ActionKind) -> bool {
        is_legal(self.kind(), action)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}
