//! Attack and fortify move generation.
//!
//! Lists the territory pairs a player can legally attack across or fortify
//! along, given the current army counts.

use crate::board::Board;

/// Every (from, to) pair `player` can attack: an owned territory with at
/// least two armies bordering an enemy territory.
pub fn legal_attacks(board: &Board, player: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for t in board.owned_by(player).filter(|t| t.armies >= 2) {
        for b in &t.borders {
            if board.get(b).is_some_and(|n| !n.is_owned_by(player)) {
                pairs.push((t.name.clone(), b.clone()));
            }
        }
    }
    pairs
}

/// Returns true if `player` has at least one legal attack.
pub fn has_legal_attack(board: &Board, player: &str) -> bool {
    board.owned_by(player).filter(|t| t.armies >= 2).any(|t| {
        t.borders
            .iter()
            .any(|b| board.get(b).is_some_and(|n| !n.is_owned_by(player)))
    })
}

/// Every (from, to) pair of bordering owned territories where `from` can spare an army.
pub fn legal_fortifies(board: &Board, player: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for t in board.owned_by(player).filter(|t| t.armies >= 2) {
        for b in &t.borders {
            if board.get(b).is_some_and(|n| n.is_owned_by(player)) {
                pairs.push((t.name.clone(), b.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_board() -> Board {
        let mut board = Board::sample();
        for t in ["frost", "tundra", "pines", "dunes", "oasis", "mesa"] {
            board.occupy(t, "red", 1);
        }
        for t in ["delta", "marsh", "reef", "harbor", "cliffs", "vale"] {
            board.occupy(t, "blue", 1);
        }
        board
    }

    #[test]
    fn single_armies_cannot_attack() {
        let board = split_board();
        assert!(!has_legal_attack(&board, "red"));
        assert!(legal_attacks(&board, "red").is_empty());
    }

    #[test]
    fn attacks_only_cross_into_enemy_territory() {
        let mut board = split_board();
        board.occupy("mesa", "red", 4);
        let attacks = legal_attacks(&board, "red");
        assert_eq!(attacks, vec![("mesa".to_string(), "delta".to_string())]);
        assert!(has_legal_attack(&board, "red"));
    }

    #[test]
    fn fortifies_stay_inside_own_territory() {
        let mut board = split_board();
        board.occupy("mesa", "red", 4);
        let moves = legal_fortifies(&board, "red");
        assert_eq!(moves, vec![("mesa".to_string(), "oasis".to_string())]);
    }
}
