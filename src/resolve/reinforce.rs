//! Reinforcement income.
//!
//! Income is a pure function of the board: a flat minimum while the player
//! holds fewer than the threshold of territories, plus one army per
//! `territory_divisor` territories (always added), plus the control value of
//! every fully held region. Recompute at the start of every Reinforce phase.

use crate::board::Board;
use crate::config::RulesConfig;

/// Computes the reinforcement armies owed to `player`.
pub fn calculate(player: &str, board: &Board, rules: &RulesConfig) -> u32 {
    let owned = board.owned_count(player);
    let base = if owned < rules.income_threshold {
        rules.minimum_income
    } else {
        0
    };
    let per_territory = (owned / rules.territory_divisor.max(1)) as u32;
    let regions: u32 = board
        .controlled_regions(player)
        .map(|r| r.control_value)
        .sum();
    base + per_territory + regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    /// A board with `n` territories in one region worth `value`, plus a
    /// filler region so the player never owns everything by accident.
    fn board_with(n: usize, value: u32) -> Board {
        let mut board = Board::new();
        board.add_region("land", value);
        board.add_region("rest", 7);
        for i in 0..n {
            board.add_territory(&format!("t{i}"), "land");
        }
        for i in 0..12 {
            board.add_territory(&format!("r{i}"), "rest");
        }
        board
    }

    #[test]
    fn ten_territories_with_one_region() {
        let mut board = board_with(3, 3);
        for i in 0..3 {
            board.occupy(&format!("t{i}"), "red", 1);
        }
        for i in 0..7 {
            board.occupy(&format!("r{i}"), "red", 1);
        }
        assert_eq!(board.owned_count("red"), 10);
        // 0 base (10 >= 9) + 10/3 + region 3.
        assert_eq!(calculate("red", &board, &RulesConfig::default()), 6);
    }

    #[test]
    fn eight_territories_no_region() {
        let mut board = board_with(3, 3);
        for i in 0..8 {
            board.occupy(&format!("r{i}"), "red", 1);
        }
        // 3 base + 8/3.
        assert_eq!(calculate("red", &board, &RulesConfig::default()), 5);
    }

    #[test]
    fn nine_territories_drop_flat_bonus() {
        let mut board = board_with(3, 3);
        for i in 0..9 {
            board.occupy(&format!("r{i}"), "red", 1);
        }
        assert_eq!(calculate("red", &board, &RulesConfig::default()), 3);
    }

    #[test]
    fn no_territories_still_gets_minimum() {
        let board = board_with(3, 3);
        assert_eq!(calculate("red", &board, &RulesConfig::default()), 3);
    }

    #[test]
    fn calculation_is_idempotent() {
        let mut board = Board::sample();
        board.occupy("frost", "red", 1);
        board.occupy("tundra", "red", 1);
        board.occupy("pines", "red", 1);
        let rules = RulesConfig::default();
        let first = calculate("red", &board, &rules);
        let second = calculate("red", &board, &rules);
        assert_eq!(first, second);
        assert_eq!(first, 3 + 1 + 3);
    }
}
