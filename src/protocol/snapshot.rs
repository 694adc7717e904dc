//! Snapshot and board file encoding.
//!
//! Snapshots and boards are the serde JSON form of `engine::Snapshot` and
//! `board::Board`. Decoding checks the structural guarantees the engine
//! relies on, so a bad file is rejected at the boundary instead of
//! tripping an assertion mid-game.

use std::fs;
use std::path::Path;

use crate::board::Board;
use crate::engine::Snapshot;
use crate::error::SnapshotError;
use crate::resolve::phase::Context;

/// Serializes a snapshot to a JSON string.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parses and checks a JSON snapshot.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, SnapshotError> {
    let snapshot: Snapshot = serde_json::from_str(text)?;
    check_board(&snapshot.board)?;
    for t in snapshot.board.territories.values() {
        match &t.owner {
            Some(owner) if !snapshot.roster.contains(owner) => {
                return Err(SnapshotError::Inconsistent(format!(
                    "{} is owned by unknown player {owner}",
                    t.name
                )));
            }
            None if t.armies > 0 => {
                return Err(SnapshotError::Inconsistent(format!(
                    "{} has {} armies but no owner",
                    t.name, t.armies
                )));
            }
            _ => {}
        }
    }
    let roster = &snapshot.roster;
    if roster.current_index() >= roster.len().max(1) {
        return Err(SnapshotError::Inconsistent(format!(
            "current player index {} out of range for {} players",
            roster.current_index(),
            roster.len()
        )));
    }
    let current = roster.current().map(|p| p.name.as_str());
    let in_play = !matches!(snapshot.context, Context::Setup | Context::GameOver { .. });
    if in_play && current.is_none() {
        return Err(SnapshotError::Inconsistent(format!(
            "no current player during {}",
            snapshot.context
        )));
    }

    let battle_ends = match &snapshot.context {
        Context::Defend(b) => Some((&b.from, &b.to)),
        Context::Occupy(c) => Some((&c.from, &c.to)),
        _ => None,
    };
    if let Some((from, to)) = battle_ends {
        if !snapshot.board.are_adjacent(from, to) {
            return Err(SnapshotError::Inconsistent(format!(
                "battle between non-adjacent {from} and {to}"
            )));
        }
        let from_owner = snapshot.board.get(from).and_then(|t| t.owner.as_deref());
        if from_owner != current {
            return Err(SnapshotError::Inconsistent(format!(
                "battle source {from} is not held by the current player"
            )));
        }
    }
    Ok(snapshot)
}

/// Parses and checks a JSON board.
pub fn parse_board(text: &str) -> Result<Board, SnapshotError> {
    let board: Board = serde_json::from_str(text)?;
    check_board(&board)?;
    Ok(board)
}

pub fn load_board(path: &Path) -> Result<Board, SnapshotError> {
    parse_board(&fs::read_to_string(path)?)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    parse_snapshot(&fs::read_to_string(path)?)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    fs::write(path, encode_snapshot(snapshot)?)?;
    Ok(())
}

/// Checks region membership and border symmetry.
fn check_board(board: &Board) -> Result<(), SnapshotError> {
    for (name, t) in &board.territories {
        if name != &t.name {
            return Err(SnapshotError::Inconsistent(format!(
                "territory keyed as {name} is named {}",
                t.name
            )));
        }
        let in_region = board
            .regions
            .get(&t.region)
            .is_some_and(|r| r.members.contains(name));
        if !in_region {
            return Err(SnapshotError::Inconsistent(format!(
                "{name} is not a member of region {}",
                t.region
            )));
        }
        if t.borders.is_empty() {
            return Err(SnapshotError::Inconsistent(format!("{name} has no borders")));
        }
        for b in &t.borders {
            if !board.get(b).is_some_and(|n| n.borders(name)) {
                return Err(SnapshotError::Inconsistent(format!(
                    "border {name} -> {b} is not mirrored"
                )));
            }
        }
    }
    for region in board.regions.values() {
        for m in &region.members {
            if board.get(m).map(|t| &t.region) != Some(&region.name) {
                return Err(SnapshotError::Inconsistent(format!(
                    "region {} lists foreign member {m}",
                    region.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::engine::Game;
    use crate::resolve::combat::Conquest;

    #[test]
    fn snapshot_roundtrip() {
        let game = Game::new(Board::sample(), RulesConfig::default(), 2);
        let text = encode_snapshot(&game.snapshot()).unwrap();
        let back = parse_snapshot(&text).unwrap();
        assert_eq!(back, game.snapshot());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_snapshot("garbage"), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn asymmetric_border_rejected() {
        let mut board = Board::sample();
        if let Some(t) = board.get_mut("frost") {
            t.borders.insert("reef".to_string());
        }
        let text = serde_json::to_string(&board).unwrap();
        let err = parse_board(&text).unwrap_err();
        assert!(err.to_string().contains("not mirrored"));
    }

    #[test]
    fn unknown_owner_rejected() {
        let game = Game::new(Board::sample(), RulesConfig::default(), 2);
        let mut snapshot = game.snapshot();
        snapshot.board.occupy("reef", "ghost", 3);
        let text = encode_snapshot(&snapshot).unwrap();
        let err = parse_snapshot(&text).unwrap_err();
        assert!(err.to_string().contains("unknown player ghost"));
    }

    /// Red holds the north and east, blue the south and west.
    fn midgame_snapshot(context: Context) -> Snapshot {
        let game = Game::new(Board::sample(), RulesConfig::default(), 2);
        let mut snapshot = game.snapshot();
        for t in ["frost", "tundra", "pines", "dunes", "oasis", "mesa"] {
            snapshot.board.occupy(t, "red", 3);
        }
        for t in ["delta", "marsh", "reef", "harbor", "cliffs", "vale"] {
            snapshot.board.occupy(t, "blue", 2);
        }
        snapshot.roster.add("red");
        snapshot.roster.add("blue");
        snapshot.context = context;
        snapshot
    }

    fn conquest(from: &str, to: &str) -> Context {
        Context::Occupy(Conquest {
            from: from.to_string(),
            to: to.to_string(),
            dice_used: 2,
        })
    }

    #[test]
    fn current_player_out_of_range_rejected() {
        let snapshot = midgame_snapshot(Context::Attack);
        let text = encode_snapshot(&snapshot)
            .unwrap()
            .replace("\"current\": 0", "\"current\": 7");
        let err = parse_snapshot(&text).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn empty_roster_outside_setup_rejected() {
        let mut snapshot = midgame_snapshot(Context::Attack);
        snapshot.roster = Default::default();
        for t in snapshot.board.territories.values_mut() {
            t.owner = None;
            t.armies = 0;
        }
        let text = encode_snapshot(&snapshot).unwrap();
        let err = parse_snapshot(&text).unwrap_err();
        assert!(err.to_string().contains("no current player"), "{err}");
    }

    #[test]
    fn battle_from_foreign_territory_rejected() {
        let text = encode_snapshot(&midgame_snapshot(conquest("delta", "mesa"))).unwrap();
        let err = parse_snapshot(&text).unwrap_err();
        assert!(err.to_string().contains("not held by the current player"), "{err}");

        let text = encode_snapshot(&midgame_snapshot(conquest("mesa", "delta"))).unwrap();
        assert!(parse_snapshot(&text).is_ok());
    }

    #[test]
    fn missing_region_rejected() {
        let mut board = Board::sample();
        if let Some(t) = board.get_mut("reef") {
            t.region = "atlantis".to_string();
        }
        let text = serde_json::to_string(&board).unwrap();
        assert!(matches!(parse_board(&text), Err(SnapshotError::Inconsistent(_))));
    }
}
