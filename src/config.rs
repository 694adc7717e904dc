//! Rule constants for a game session.
//!
//! Defaults reproduce the classic rules. A `RulesConfig` can be loaded from
//! JSON; any omitted field keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Tunable rule constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub min_players: usize,
    pub max_players: usize,
    /// Initial armies per player, indexed by `player_count - min_players`.
    pub initial_armies: Vec<u32>,
    /// Flat income granted while a player holds fewer than `income_threshold` territories.
    pub minimum_income: u32,
    pub income_threshold: usize,
    /// One army per this many owned territories.
    pub territory_divisor: usize,
    /// Bonus for the first exchanged card sets, in order.
    pub card_bonuses: Vec<u32>,
    /// Added per set once `card_bonuses` is exhausted.
    pub card_bonus_step: u32,
    /// Holding this many cards forces an exchange before reinforcing.
    pub max_hand: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            min_players: 2,
            max_players: 6,
            initial_armies: vec![40, 35, 30, 25, 20],
            minimum_income: 3,
            income_threshold: 9,
            territory_divisor: 3,
            card_bonuses: vec![4, 6, 8, 10, 12, 15],
            card_bonus_step: 5,
            max_hand: 5,
        }
    }
}

impl RulesConfig {
    /// Initial army pool per player for the given player count.
    pub fn initial_armies_for(&self, player_count: usize) -> u32 {
        if self.initial_armies.is_empty() {
            return 0;
        }
        let idx = player_count
            .saturating_sub(self.min_players)
            .min(self.initial_armies.len() - 1);
        self.initial_armies[idx]
    }

    /// Reads a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
