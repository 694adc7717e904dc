//! Rules resolution.
//!
//! The phase/context table, reinforcement income, card exchanges, and
//! dice combat. Everything here is a function of explicit inputs; the
//! session state lives in `engine::Game`.

pub mod cards;
pub mod combat;
pub mod phase;
pub mod reinforce;

pub use combat::{
    attacker_max_dice, compare_rolls, defender_max_dice, resolve_round, Battle, Conquest,
    PairOutcome, RoundEnd, RoundReport,
};
pub use phase::{is_legal, legal_actions, next_context, ActionKind, Context, ContextKind};
pub use reinforce::calculate;
