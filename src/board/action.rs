//! Action types for every context of the turn cycle.
//!
//! Each variant carries exactly the typed parameters the action needs.
//! Raw text never reaches this layer; see `protocol::parser` for the
//! command grammar used by the binary.

use serde::{Deserialize, Serialize};

use crate::resolve::phase::ActionKind;

/// How many dice an attacker commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackDice {
    /// A fixed number of dice for a single round.
    Count(u8),
    /// Maximum dice every round until capture or the attacker is spent.
    AllOut,
}

/// A request from a human or AI player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Setup: `gameplayer add red`
    AddPlayer { name: String },

    /// Setup: `gameplayer remove red`
    RemovePlayer { name: String },

    /// Setup: deal all territories to the players.
    AssignTerritories,

    /// Startup placement: put one pending army on an owned territory.
    PlaceArmy { territory: String },

    /// Reinforce: trade three cards (indexes into the hand) for armies.
    ExchangeCards { cards: [usize; 3] },

    /// Reinforce: `deploy alaska 3`
    Reinforce { territory: String, count: u32 },

    /// Attack: `attack alaska kamchatka 3` or `attack alaska kamchatka allout`
    Attack {
        from: String,
        to: String,
        dice: AttackDice,
    },

    /// Attack: end the attack phase.
    DeclineAttack,

    /// Battle: the defender's dice for the pending round.
    Defend { dice: u8 },

    /// After a capture: move armies into the captured territory.
    MoveArmies { count: u32 },

    /// Fortify: `fortify alaska alberta 2`
    Fortify { from: String, to: String, count: u32 },

    /// Fortify: end the turn without moving.
    DeclineFortify,

    ShowBoard,
    Help,
    Exit,
}

impl Action {
    /// The kind used for legality checks.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddPlayer { .. } => ActionKind::AddPlayer,
            Action::RemovePlayer { .. } => ActionKind::RemovePlayer,
            Action::AssignTerritories => ActionKind::AssignTerritories,
            Action::PlaceArmy { .. } => ActionKind::PlaceArmy,
            Action::ExchangeCards { .. } => ActionKind::ExchangeCards,
            Action::Reinforce { .. } => ActionKind::Reinforce,
            Action::Attack { .. } => ActionKind::Attack,
            Action::DeclineAttack => ActionKind::DeclineAttack,
            Action::Defend { .. } => ActionKind::Defend,
            Action::MoveArmies { .. } => ActionKind::MoveArmies,
            Action::Fortify { .. } => ActionKind::Fortify,
            Action::DeclineFortify => ActionKind::DeclineFortify,
            Action::ShowBoard => ActionKind::ShowBoard,
            Action::Help => ActionKind::Help,
            Action::Exit => ActionKind::Exit,
        }
    }
}
