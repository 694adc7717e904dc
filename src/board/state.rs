//! Board state: the territory/region graph.
//!
//! Territories and regions are keyed by name in ordered maps so that
//! iteration order (and therefore seeded dealing) is deterministic.
//! Ownership is stored on each territory only; per-player holdings are
//! always derived by scanning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::territory::{Region, Territory};

/// The full territory graph with ownership and army counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub territories: BTreeMap<String, Territory>,
    pub regions: BTreeMap<String, Region>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// Declares a region. Re-declaring an existing region updates its value.
    pub fn add_region(&mut self, name: &str, control_value: u32) {
        self.regions
            .entry(name.to_string())
            .and_modify(|r| r.control_value = control_value)
            .or_insert_with(|| Region::new(name, control_value));
    }

    /// Adds a territory to an already-declared region.
    pub fn add_territory(&mut self, name: &str, region: &str) {
        debug_assert!(
            self.regions.contains_key(region),
            "territory {name} references undeclared region {region}"
        );
        if let Some(r) = self.regions.get_mut(region) {
            r.members.insert(name.to_string());
        }
        self.territories
            .insert(name.to_string(), Territory::new(name, region));
    }

    /// Records a symmetric border between two territories.
    pub fn connect(&mut self, a: &str, b: &str) {
        if let Some(t) = self.territories.get_mut(a) {
            t.borders.insert(b.to_string());
        }
        if let Some(t) = self.territories.get_mut(b) {
            t.borders.insert(a.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Territory> {
        self.territories.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Territory> {
        self.territories.get_mut(name)
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    /// Returns true if `a` and `b` share a border.
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        let adjacent = self.get(a).is_some_and(|t| t.borders(b));
        debug_assert!(
            adjacent == self.get(b).is_some_and(|t| t.borders(a)),
            "asymmetric border between {a} and {b}"
        );
        adjacent
    }

    /// Iterates over the territories owned by `player`.
    pub fn owned_by<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a Territory> + 'a {
        self.territories.values().filter(move |t| t.is_owned_by(player))
    }

    /// Counts the territories owned by `player`.
    pub fn owned_count(&self, player: &str) -> usize {
        self.owned_by(player).count()
    }

    /// Returns true if `player` owns every member of the region.
    pub fn controls_region(&self, player: &str, region: &Region) -> bool {
        !region.members.is_empty()
            && region
                .members
                .iter()
                .all(|m| self.get(m).is_some_and(|t| t.is_owned_by(player)))
    }

    /// Iterates over the regions fully controlled by `player`.
    pub fn controlled_regions<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions
            .values()
            .filter(move |r| self.controls_region(player, r))
    }

    /// Returns true if `player` owns every territory on the board.
    pub fn owns_all(&self, player: &str) -> bool {
        !self.territories.is_empty() && self.territories.values().all(|t| t.is_owned_by(player))
    }

    /// Sets a territory's owner and army count.
    pub fn occupy(&mut self, name: &str, owner: &str, armies: u32) {
        if let Some(t) = self.territories.get_mut(name) {
            t.owner = Some(owner.to_string());
            t.armies = armies;
        }
    }

    pub fn add_armies(&mut self, name: &str, count: u32) {
        if let Some(t) = self.territories.get_mut(name) {
            t.armies = t.armies.saturating_add(count);
        }
    }

    /// Removes armies, never going below zero.
    pub fn remove_armies(&mut self, name: &str, count: u32) {
        if let Some(t) = self.territories.get_mut(name) {
            t.armies = t.armies.saturating_sub(count);
        }
    }

    /// Returns the army count of a territory, or 0 if it does not exist.
    pub fn armies(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |t| t.armies)
    }

    /// A small twelve-territory board with four regions.
    ///
    /// Used by the binary when no board file is given, and by tests and benches.
    pub fn sample() -> Self {
        let mut board = Board::new();
        let regions: [(&str, u32, [&str; 3]); 4] = [
            ("north", 3, ["frost", "tundra", "pines"]),
            ("east", 2, ["dunes", "oasis", "mesa"]),
            ("south", 2, ["delta", "marsh", "reef"]),
            ("west", 3, ["harbor", "cliffs", "vale"]),
        ];
        for (region, value, members) in regions {
            board.add_region(region, value);
            for m in members {
                board.add_territory(m, region);
            }
        }
        let borders = [
            ("frost", "tundra"),
            ("tundra", "pines"),
            ("frost", "pines"),
            ("dunes", "oasis"),
            ("oasis", "mesa"),
            ("delta", "marsh"),
            ("marsh", "reef"),
            ("harbor", "cliffs"),
            ("cliffs", "vale"),
            ("harbor", "vale"),
            ("pines", "dunes"),
            ("tundra", "oasis"),
            ("mesa", "delta"),
            ("reef", "harbor"),
            ("vale", "frost"),
        ];
        for (a, b) in borders {
            board.connect(a, b);
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_board_shape() {
        let board = Board::sample();
        assert_eq!(board.territory_count(), 12);
        assert_eq!(board.regions.len(), 4);
        assert!(board.territories.values().all(|t| !t.borders.is_empty()));
    }

    #[test]
    fn connect_is_symmetric() {
        let board = Board::sample();
        for t in board.territories.values() {
            for b in &t.borders {
                assert!(board.are_adjacent(b, &t.name), "{} -> {}", b, t.name);
            }
        }
    }

    #[test]
    fn region_membership_matches_territories() {
        let board = Board::sample();
        for t in board.territories.values() {
            assert!(board.regions[&t.region].members.contains(&t.name));
        }
    }

    #[test]
    fn owned_count_and_region_control() {
        let mut board = Board::sample();
        board.occupy("frost", "red", 1);
        board.occupy("tundra", "red", 1);
        assert_eq!(board.owned_count("red"), 2);
        assert_eq!(board.controlled_regions("red").count(), 0);

        board.occupy("pines", "red", 1);
        let controlled: Vec<&str> = board
            .controlled_regions("red")
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(controlled, vec!["north"]);
    }

    #[test]
    fn remove_armies_saturates_at_zero() {
        let mut board = Board::sample();
        board.occupy("reef", "blue", 2);
        board.remove_armies("reef", 5);
        assert_eq!(board.armies("reef"), 0);
    }

    #[test]
    fn owns_all_requires_every_territory() {
        let mut board = Board::sample();
        let names: Vec<String> = board.territories.keys().cloned().collect();
        for n in &names {
            board.occupy(n, "red", 1);
        }
        assert!(board.owns_all("red"));
        board.occupy("reef", "blue", 1);
        assert!(!board.owns_all("red"));
    }

    #[test]
    fn board_roundtrips_through_json() {
        let board = Board::sample();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
