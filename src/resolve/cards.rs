//! Card sets and the exchange bonus schedule.
//!
//! The count of sets already traded is session state, passed in by the
//! caller; nothing here is global.

use crate::board::CardKind;
use crate::config::RulesConfig;
use crate::error::ActionError;

/// Returns true if three cards are all alike or all different.
pub fn is_valid_set(cards: [CardKind; 3]) -> bool {
    let [a, b, c] = cards;
    (a == b && b == c) || (a != b && b != c && a != c)
}

/// The armies granted for the next exchange, given how many sets were traded before.
pub fn exchange_bonus(sets_traded: u32, rules: &RulesConfig) -> u32 {
    let idx = sets_traded as usize;
    if let Some(bonus) = rules.card_bonuses.get(idx) {
        return *bonus;
    }
    let last = rules.card_bonuses.last().copied().unwrap_or(0);
    let extra = (idx - rules.card_bonuses.len() + 1) as u32;
    last + extra * rules.card_bonus_step
}

/// Resolves three hand indexes into card kinds, rejecting repeats and out-of-range picks.
pub fn pick_set(hand: &[CardKind], picks: [usize; 3]) -> Result<[CardKind; 3], ActionError> {
    for (i, &p) in picks.iter().enumerate() {
        if p >= hand.len() || picks[..i].contains(&p) {
            return Err(ActionError::CardIndex(p));
        }
    }
    let set = [hand[picks[0]], hand[picks[1]], hand[picks[2]]];
    if !is_valid_set(set) {
        return Err(ActionError::InvalidCardSet);
    }
    Ok(set)
}

/// Removes the picked cards from the hand. Indexes must already be validated.
pub fn remove_set(hand: &mut Vec<CardKind>, picks: [usize; 3]) {
    let mut sorted = picks;
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    for idx in sorted {
        hand.remove(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardKind::*;

    #[test]
    fn valid_sets() {
        assert!(is_valid_set([Infantry, Infantry, Infantry]));
        assert!(is_valid_set([Infantry, Cavalry, Artillery]));
        assert!(!is_valid_set([Infantry, Infantry, Cavalry]));
    }

    #[test]
    fn bonus_schedule_escalates() {
        let rules = RulesConfig::default();
        let bonuses: Vec<u32> = (0..9).map(|n| exchange_bonus(n, &rules)).collect();
        assert_eq!(bonuses, vec![4, 6, 8, 10, 12, 15, 20, 25, 30]);
    }

    #[test]
    fn pick_set_rejects_repeated_index() {
        let hand = [Infantry, Infantry, Infantry];
        assert_eq!(pick_set(&hand, [0, 0, 1]), Err(ActionError::CardIndex(0)));
        assert_eq!(pick_set(&hand, [0, 1, 5]), Err(ActionError::CardIndex(5)));
    }

    #[test]
    fn pick_set_rejects_mixed_pair() {
        let hand = [Infantry, Infantry, Cavalry, Artillery];
        assert_eq!(pick_set(&hand, [0, 1, 2]), Err(ActionError::InvalidCardSet));
        assert!(pick_set(&hand, [0, 2, 3]).is_ok());
    }

    #[test]
    fn remove_set_keeps_other_cards() {
        let mut hand = vec![Infantry, Cavalry, Cavalry, Artillery, Infantry];
        remove_set(&mut hand, [4, 1, 3]);
        assert_eq!(hand, vec![Infantry, Cavalry]);
    }
}
