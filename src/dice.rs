//! Six-sided dice sources.
//!
//! Combat draws every die through the `Dice` trait so tests can replace the
//! seeded generator with a fixed face sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of independent six-sided die faces.
pub trait Dice {
    /// Returns a face in `1..=6`.
    fn roll(&mut self) -> u8;
}

/// Uniform dice backed by a seedable `SmallRng`.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: SmallRng,
}

impl SeededDice {
    /// Creates dice with a fixed seed; equal seeds give equal sequences.
    pub fn new(seed: u64) -> Self {
        SeededDice {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededDice {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Dice that replay a fixed face sequence, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct LoadedDice {
    faces: Vec<u8>,
    next: usize,
}

impl LoadedDice {
    /// Faces outside `1..=6` are clamped into range. An empty sequence rolls 1s.
    pub fn new(faces: &[u8]) -> Self {
        LoadedDice {
            faces: faces.iter().map(|f| (*f).clamp(1, 6)).collect(),
            next: 0,
        }
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self) -> u8 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_stay_in_range() {
        let mut dice = SeededDice::new(7);
        for _ in 0..1000 {
            let face = dice.roll();
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn equal_seeds_give_equal_rolls() {
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        let ra: Vec<u8> = (0..20).map(|_| a.roll()).collect();
        let rb: Vec<u8> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn loaded_dice_cycle() {
        let mut dice = LoadedDice::new(&[6, 2]);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 2);
        assert_eq!(dice.roll(), 6);
    }

    #[test]
    fn loaded_dice_clamp_faces() {
        let mut dice = LoadedDice::new(&[0, 9]);
        assert_eq!(dice.roll(), 1);
        assert_eq!(dice.roll(), 6);
    }
}
