//! Error types for action validation and snapshots.
//!
//! Every `ActionError` names the constraint that failed so the caller can
//! re-prompt. A rejected action never mutates the game.

use crate::resolve::phase::{ActionKind, ContextKind};

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("invalid command for phase: {action} is not allowed during {context}")]
    IllegalForPhase {
        action: ActionKind,
        context: ContextKind,
    },

    #[error("the game is over: {winner} controls every territory")]
    GameOver { winner: String },

    #[error("unknown territory '{0}'")]
    UnknownTerritory(String),

    #[error("territory '{territory}' is not owned by {player}")]
    NotOwned { territory: String, player: String },

    #[error("cannot attack '{0}': it is your own territory")]
    OwnTerritory(String),

    #[error("'{from}' does not border '{to}'")]
    NotAdjacent { from: String, to: String },

    #[error("dice count must be at least 1")]
    ZeroDice,

    #[error("need at least {needed} armies to attack with {requested} dice ({armies} in territory)")]
    AttackerDice {
        requested: u8,
        needed: u32,
        armies: u32,
    },

    #[error("need at least {requested} armies to defend with {requested} dice ({armies} in territory, max {max})")]
    DefenderDice { requested: u8, armies: u32, max: u8 },

    #[error("'{territory}' has only {armies} armies; at least one must stay behind")]
    NotEnoughArmies { territory: String, armies: u32 },

    #[error("army count must be at least 1")]
    ZeroCount,

    #[error("cannot place {requested} armies: only {pending} pending")]
    PendingExceeded { requested: u32, pending: u32 },

    #[error("must move between {min} and {max} armies, got {count}")]
    MoveOutOfRange { count: u32, min: u32, max: u32 },

    #[error("card index {0} is out of range or repeated")]
    CardIndex(usize),

    #[error("cards must be three of a kind or one of each")]
    InvalidCardSet,

    #[error("holding {cards} cards: exchange a set before reinforcing")]
    MustExchange { cards: usize },

    #[error("player '{0}' already exists")]
    DuplicatePlayer(String),

    #[error("unknown player '{0}'")]
    UnknownPlayer(String),

    #[error("need between {min} and {max} players, have {count}")]
    PlayerCount { count: usize, min: usize, max: usize },

    #[error("the board has no territories")]
    EmptyBoard,

    #[error("{territories} territories cannot be dealt to {players} players")]
    TooFewTerritories { territories: usize, players: usize },
}

/// Errors that can occur while reading or writing snapshots and config files.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}
