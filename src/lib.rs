//! Hegemon engine library.
//!
//! A turn-based territory conquest game: the board and player roster, the
//! per-context rules for reinforcement, combat and cards, legal action
//! generation, and the line protocol used by the binary entry point.

pub mod board;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod event;
pub mod movegen;
pub mod protocol;
pub mod resolve;

pub use board::{Action, AttackDice, Board};
pub use engine::{Game, Snapshot};
pub use error::{ActionError, SnapshotError};
pub use event::Event;
