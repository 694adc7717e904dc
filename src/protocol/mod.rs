//! Line protocol handling.
//!
//! Parsing for the text command grammar, JSON encoding for boards and
//! snapshots, and the session state driven by the binary's main loop.

pub mod parser;
pub mod session;
pub mod snapshot;

pub use parser::{parse_command, Command};
pub use session::{Flow, Session};
pub use snapshot::{encode_snapshot, load_board, load_snapshot, parse_board, parse_snapshot, save_snapshot};
