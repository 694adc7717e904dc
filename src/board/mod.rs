//! Board representation and game-state types.
//!
//! Contains the territory/region graph, the player roster, and the action
//! types players submit.

pub mod action;
pub mod player;
pub mod state;
pub mod territory;

pub use action::{Action, AttackDice};
pub use player::{CardKind, Player, Roster};
pub use state::Board;
pub use territory::{Region, Territory};
