//! Combat resolution.
//!
//! A battle is one or more dice rounds between an attacking and a defending
//! territory. Each round both sides roll, the rolls are sorted descending and
//! paired highest-with-highest, and every lost pair removes one army from the
//! loser. The attacker wins a pair only on strictly greater; ties go to the
//! defender.
//!
//! Dice caps are always computed from the current army counts.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::dice::Dice;
use crate::error::ActionError;

/// Most dice an attacker may ever roll.
pub const MAX_ATTACK_DICE: u8 = 3;

/// Most dice a defender may ever roll.
pub const MAX_DEFEND_DICE: u8 = 2;

/// The winner of one attacker/defender die pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairOutcome {
    AttackerWins,
    DefenderWins,
}

/// An attack in progress, waiting on the defender's dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub from: String,
    pub to: String,
    pub attacker: String,
    pub defender: String,
    /// Dice the attacker rolls in the pending round.
    pub attacker_dice: u8,
    pub all_out: bool,
    /// Rounds already resolved in this battle.
    pub rounds: u32,
}

/// A freshly captured territory awaiting the attacker's army movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conquest {
    pub from: String,
    pub to: String,
    /// Dice the attacker used in the capturing round: the minimum move.
    pub dice_used: u8,
}

impl Conquest {
    /// The inclusive range of armies that may move into the captured territory.
    ///
    /// At least `dice_used` must move and at least one army stays behind.
    pub fn move_range(&self, attacker_armies: u32) -> (u32, u32) {
        let max = attacker_armies.saturating_sub(1);
        let min = u32::from(self.dice_used).min(max);
        (min, max)
    }
}

/// The dice, pairings, and losses of a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub from: String,
    pub to: String,
    /// Attacker rolls, sorted descending.
    pub attacker_rolls: Vec<u8>,
    /// Defender rolls, sorted descending.
    pub defender_rolls: Vec<u8>,
    pub outcomes: Vec<PairOutcome>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

/// How a round left the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// The defending territory has no armies left.
    Captured,
    /// The attacking territory is down to one army.
    Held,
    /// Both sides can roll again.
    Continues,
}

/// Maximum attacker dice for a territory holding `armies`.
pub fn attacker_max_dice(armies: u32) -> u8 {
    if armies <= 1 {
        return 0;
    }
    (armies - 1).min(u32::from(MAX_ATTACK_DICE)) as u8
}

/// Maximum defender dice for a territory holding `armies`.
pub fn defender_max_dice(armies: u32) -> u8 {
    match armies {
        0 => 0,
        1 => 1,
        _ => MAX_DEFEND_DICE,
    }
}

/// Checks a declared attacker dice count against the cap.
pub fn check_attacker_dice(requested: u8, armies: u32) -> Result<u8, ActionError> {
    if requested == 0 {
        return Err(ActionError::ZeroDice);
    }
    if requested > attacker_max_dice(armies) {
        return Err(ActionError::AttackerDice {
            requested,
            needed: u32::from(requested) + 1,
            armies,
        });
    }
    Ok(requested)
}

/// Checks a declared defender dice count against the cap.
pub fn check_defender_dice(requested: u8, armies: u32) -> Result<u8, ActionError> {
    if requested == 0 {
        return Err(ActionError::ZeroDice);
    }
    let max = defender_max_dice(armies);
    if requested > max {
        return Err(ActionError::DefenderDice {
            requested,
            armies,
            max,
        });
    }
    Ok(requested)
}

/// Rolls `count` dice and returns them sorted descending.
pub fn roll_dice(count: u8, dice: &mut impl Dice) -> Vec<u8> {
    let mut rolls: Vec<u8> = (0..count).map(|_| dice.roll()).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Pairs the rolls highest-with-highest and decides each pair.
///
/// The number of pairs is the shorter of the two roll lists.
pub fn compare_rolls(attacker: &[u8], defender: &[u8]) -> Vec<PairOutcome> {
    let mut a = attacker.to_vec();
    let mut d = defender.to_vec();
    a.sort_unstable_by(|x, y| y.cmp(x));
    d.sort_unstable_by(|x, y| y.cmp(x));
    a.iter()
        .zip(d.iter())
        .map(|(x, y)| {
            if x > y {
                PairOutcome::AttackerWins
            } else {
                PairOutcome::DefenderWins
            }
        })
        .collect()
}

/// Resolves one round of `battle` and removes the losers' armies from the board.
pub fn resolve_round(
    board: &mut Board,
    battle: &Battle,
    defender_dice: u8,
    dice: &mut impl Dice,
) -> RoundReport {
    let attacker_rolls = roll_dice(battle.attacker_dice, dice);
    let defender_rolls = roll_dice(defender_dice, dice);
    apply_rolls(board, battle, attacker_rolls, defender_rolls)
}

/// Applies already-rolled dice to the board.
pub fn apply_rolls(
    board: &mut Board,
    battle: &Battle,
    mut attacker_rolls: Vec<u8>,
    mut defender_rolls: Vec<u8>,
) -> RoundReport {
    attacker_rolls.sort_unstable_by(|a, b| b.cmp(a));
    defender_rolls.sort_unstable_by(|a, b| b.cmp(a));
    let outcomes = compare_rolls(&attacker_rolls, &defender_rolls);
    let defender_losses = outcomes
        .iter()
        .filter(|o| **o == PairOutcome::AttackerWins)
        .count() as u32;
    let attacker_losses = outcomes.len() as u32 - defender_losses;

    board.remove_armies(&battle.from, attacker_losses);
    board.remove_armies(&battle.to, defender_losses);

    RoundReport {
        from: battle.from.clone(),
        to: battle.to.clone(),
        attacker_rolls,
        defender_rolls,
        outcomes,
        attacker_losses,
        defender_losses,
    }
}

/// Classifies the board after a round.
pub fn round_end(board: &Board, battle: &Battle) -> RoundEnd {
    if board.armies(&battle.to) == 0 {
        RoundEnd::Captured
    } else if board.armies(&battle.from) <= 1 {
        RoundEnd::Held
    } else {
        RoundEnd::Continues
    }
}
