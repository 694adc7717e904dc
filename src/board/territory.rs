//! Territories and regions.
//!
//! A territory is the atomic unit of ownership and army placement. A region
//! groups territories and grants its control value to a player who holds
//! every member.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single territory on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub name: String,
    pub region: String,
    /// Owning player name; `None` only before territories are dealt.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub armies: u32,
    /// Names of bordering territories. The relation is symmetric across the board.
    pub borders: BTreeSet<String>,
}

impl Territory {
    /// Creates an unowned, empty territory in the given region.
    pub fn new(name: &str, region: &str) -> Self {
        Territory {
            name: name.to_string(),
            region: region.to_string(),
            owner: None,
            armies: 0,
            borders: BTreeSet::new(),
        }
    }

    /// Returns true if this territory borders `other`.
    pub fn borders(&self, other: &str) -> bool {
        self.borders.contains(other)
    }

    /// Returns true if `player` owns this territory.
    pub fn is_owned_by(&self, player: &str) -> bool {
        self.owner.as_deref() == Some(player)
    }
}

/// A named group of territories with a control bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub control_value: u32,
    pub members: BTreeSet<String>,
}

impl Region {
    pub fn new(name: &str, control_value: u32) -> Self {
        Region {
            name: name.to_string(),
            control_value,
            members: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_territory_is_unowned_and_empty() {
        let t = Territory::new("alaska", "north_america");
        assert_eq!(t.owner, None);
        assert_eq!(t.armies, 0);
        assert!(t.borders.is_empty());
    }

    #[test]
    fn ownership_check() {
        let mut t = Territory::new("alaska", "north_america");
        assert!(!t.is_owned_by("red"));
        t.owner = Some("red".to_string());
        assert!(t.is_owned_by("red"));
        assert!(!t.is_owned_by("blue"));
    }

    #[test]
    fn border_lookup() {
        let mut t = Territory::new("alaska", "north_america");
        t.borders.insert("kamchatka".to_string());
        assert!(t.borders("kamchatka"));
        assert!(!t.borders("peru"));
    }
}
