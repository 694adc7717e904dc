//! Legal action generation.
//!
//! Enumerates concrete legal actions for the current context of a game,
//! and picks random ones. Strategies and simulations submit the generated
//! actions through `Game::apply` like any human player would.

pub mod attack;

pub use attack::{has_legal_attack, legal_attacks, legal_fortifies};

use rand::Rng;

use crate::board::{Action, AttackDice, CardKind};
use crate::dice::Dice;
use crate::engine::Game;
use crate::resolve::cards::is_valid_set;
use crate::resolve::combat::{attacker_max_dice, defender_max_dice};
use crate::resolve::phase::Context;

/// Finds the first valid set of three cards in a hand, by index.
pub fn find_card_set(hand: &[CardKind]) -> Option<[usize; 3]> {
    let n = hand.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                if is_valid_set([hand[i], hand[j], hand[k]]) {
                    return Some([i, j, k]);
                }
            }
        }
    }
    None
}

/// Generates a representative set of legal, state-changing actions for the
/// player to act.
///
/// Counts are sampled at their bounds rather than enumerated exhaustively.
/// Setup actions are not generated; the roster is the caller's choice.
pub fn legal_actions<D: Dice>(game: &Game<D>) -> Vec<Action> {
    let board = game.board();
    let Some(player) = game.roster().current() else {
        return Vec::new();
    };
    let name = player.name.as_str();
    let mut actions = Vec::new();

    match game.context() {
        Context::Setup | Context::GameOver { .. } => {}
        Context::Startup => {
            for t in board.owned_by(name) {
                actions.push(Action::PlaceArmy {
                    territory: t.name.clone(),
                });
            }
        }
        Context::Reinforce => {
            if let Some(cards) = find_card_set(&player.cards) {
                actions.push(Action::ExchangeCards { cards });
            }
            if player.cards.len() < game.rules().max_hand && player.pending > 0 {
                for t in board.owned_by(name) {
                    actions.push(Action::Reinforce {
                        territory: t.name.clone(),
                        count: player.pending,
                    });
                }
            }
        }
        Context::Attack => {
            for (from, to) in legal_attacks(board, name) {
                let max = attacker_max_dice(board.armies(&from));
                actions.push(Action::Attack {
                    from: from.clone(),
                    to: to.clone(),
                    dice: AttackDice::Count(max),
                });
                actions.push(Action::Attack {
                    from,
                    to,
                    dice: AttackDice::AllOut,
                });
            }
            actions.push(Action::DeclineAttack);
        }
        Context::Defend(battle) => {
            for dice in 1..=defender_max_dice(board.armies(&battle.to)) {
                actions.push(Action::Defend { dice });
            }
        }
        Context::Occupy(conquest) => {
            let (min, max) = conquest.move_range(board.armies(&conquest.from));
            actions.push(Action::MoveArmies { count: min });
            if max != min {
                actions.push(Action::MoveArmies { count: max });
            }
        }
        Context::Fortify => {
            for (from, to) in legal_fortifies(board, name) {
                let spare = board.armies(&from) - 1;
                actions.push(Action::Fortify { from, to, count: spare });
            }
            actions.push(Action::DeclineFortify);
        }
    }
    actions
}

/// Picks one random legal action for the player to act.
pub fn random_action<D: Dice>(game: &Game<D>, rng: &mut impl Rng) -> Option<Action> {
    let actions = legal_actions(game);
    if actions.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..actions.len());
    Some(actions[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::RulesConfig;
    use rand::SeedableRng;
    use CardKind::*;

    fn game_in(context: Context, mesa_armies: u32) -> Game {
        let mut board = Board::sample();
        for t in ["frost", "tundra", "pines", "dunes", "oasis", "mesa"] {
            board.occupy(t, "red", 1);
        }
        for t in ["delta", "marsh", "reef", "harbor", "cliffs", "vale"] {
            board.occupy(t, "blue", 2);
        }
        board.occupy("mesa", "red", mesa_armies);
        let mut game = Game::new(Board::new(), RulesConfig::default(), 5);
        let mut snapshot = game.snapshot();
        snapshot.board = board;
        snapshot.roster.add("red");
        snapshot.roster.add("blue");
        snapshot.context = context;
        game.restore(snapshot);
        game
    }

    #[test]
    fn find_card_set_prefers_first_valid() {
        assert_eq!(find_card_set(&[Infantry, Cavalry, Infantry, Artillery]), Some([0, 1, 3]));
        assert_eq!(find_card_set(&[Infantry, Infantry, Cavalry, Cavalry]), None);
    }

    #[test]
    fn attack_actions_include_decline() {
        let game = game_in(Context::Attack, 4);
        let actions = legal_actions(&game);
        assert!(actions.contains(&Action::DeclineAttack));
        assert!(actions.contains(&Action::Attack {
            from: "mesa".to_string(),
            to: "delta".to_string(),
            dice: AttackDice::Count(3),
        }));
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn fortify_moves_all_spare_armies() {
        let game = game_in(Context::Fortify, 4);
        let actions = legal_actions(&game);
        assert_eq!(
            actions,
            vec![
                Action::Fortify {
                    from: "mesa".to_string(),
                    to: "oasis".to_string(),
                    count: 3,
                },
                Action::DeclineFortify,
            ]
        );
    }

    #[test]
    fn every_generated_action_is_accepted() {
        let game = game_in(Context::Attack, 4);
        for action in legal_actions(&game) {
            let mut copy = Game::from_snapshot(game.snapshot(), 11);
            assert!(copy.apply(action.clone()).is_ok(), "{action:?}");
        }
    }

    #[test]
    fn random_action_is_legal_for_context() {
        let game = game_in(Context::Fortify, 4);
        let mut rng = rand::rngs::SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            let action = random_action(&game, &mut rng).unwrap();
            assert!(game.context().allows(action.kind()));
        }
    }
}
