//! Players and the turn-order roster.
//!
//! The roster holds only active players, in turn order. Territory holdings
//! are not stored here; they are derived from the board.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The symbol on a territory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Infantry,
    Cavalry,
    Artillery,
}

impl CardKind {
    pub const ALL: [CardKind; 3] = [CardKind::Infantry, CardKind::Cavalry, CardKind::Artillery];

    /// Draws a card kind uniformly at random.
    pub fn draw(rng: &mut impl Rng) -> CardKind {
        CardKind::ALL[rng.gen_range(0..CardKind::ALL.len())]
    }

    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Infantry => "infantry",
            CardKind::Cavalry => "cavalry",
            CardKind::Artillery => "artillery",
        }
    }
}

/// A participant in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Armies received but not yet placed on the board.
    pub pending: u32,
    pub cards: Vec<CardKind>,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Player {
            name: name.to_string(),
            pending: 0,
            cards: Vec::new(),
        }
    }
}

/// Ordered list of active players plus the index of the player to act.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    current: usize,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Appends a player. Returns false if the name is already taken.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.players.push(Player::new(name));
        true
    }

    /// Removes a player from the roster, keeping the current player stable.
    ///
    /// Returns the removed player, or `None` if the name is unknown.
    pub fn remove(&mut self, name: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.name == name)?;
        let removed = self.players.remove(idx);
        if idx < self.current {
            self.current -= 1;
        }
        if self.current >= self.players.len() {
            self.current = 0;
        }
        Some(removed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The player whose turn it is. `None` only on an empty roster.
    pub fn current(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.current)
    }

    /// Moves the turn to the next player, wrapping around.
    pub fn advance(&mut self) {
        if !self.players.is_empty() {
            self.current = (self.current + 1) % self.players.len();
        }
    }

    /// Makes the player at `index` current (wrapping if out of range).
    pub fn set_current(&mut self, index: usize) {
        if !self.players.is_empty() {
            self.current = index % self.players.len();
        }
    }
}
