//! Game session state and action dispatch.
//!
//! `Game` owns the board, the roster, the active context, and the dice for
//! the whole session. Every action goes through `apply`, which checks the
//! context's legal-action table, validates parameters without mutating
//! anything, then dispatches to the handler and returns the change-set.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{Action, AttackDice, Board, CardKind, Roster};
use crate::config::RulesConfig;
use crate::dice::{Dice, SeededDice};
use crate::error::ActionError;
use crate::event::Event;
use crate::movegen::has_legal_attack;
use crate::resolve::cards::{exchange_bonus, pick_set, remove_set};
use crate::resolve::combat::{
    attacker_max_dice, check_attacker_dice, check_defender_dice, defender_max_dice,
    resolve_round, round_end, Battle, Conquest, RoundEnd, RoundReport,
};
use crate::resolve::phase::{next_context, ActionKind, Context, ContextKind};
use crate::resolve::reinforce::calculate;

/// Everything needed to resume a game, minus the dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub roster: Roster,
    pub context: Context,
    pub rules: RulesConfig,
    pub sets_traded: u32,
    pub captured_this_turn: bool,
}

/// A game session.
#[derive(Debug, Clone)]
pub struct Game<D: Dice = SeededDice> {
    board: Board,
    roster: Roster,
    context: Context,
    rules: RulesConfig,
    sets_traded: u32,
    captured_this_turn: bool,
    battle_log: Vec<RoundReport>,
    dice: D,
    rng: SmallRng,
}

fn seeded_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

impl Game<SeededDice> {
    /// Starts a new game in the Setup context. A seed of 0 uses entropy.
    pub fn new(board: Board, rules: RulesConfig, seed: u64) -> Self {
        let dice = if seed == 0 {
            SeededDice::from_entropy()
        } else {
            SeededDice::new(seed)
        };
        Game::with_dice(board, rules, dice, seed)
    }

    /// Resumes a game from a snapshot. A seed of 0 uses entropy.
    pub fn from_snapshot(snapshot: Snapshot, seed: u64) -> Self {
        let mut game = Game::new(snapshot.board.clone(), snapshot.rules.clone(), seed);
        game.restore(snapshot);
        game
    }
}

impl<D: Dice> Game<D> {
    /// Starts a new game with a caller-supplied dice source.
    pub fn with_dice(board: Board, rules: RulesConfig, dice: D, seed: u64) -> Self {
        Game {
            board,
            roster: Roster::new(),
            context: Context::Setup,
            rules,
            sets_traded: 0,
            captured_this_turn: false,
            battle_log: Vec::new(),
            dice,
            rng: seeded_rng(seed.wrapping_add(1)),
        }
    }

    /// Replaces the session state with a snapshot, keeping the dice.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.roster = snapshot.roster;
        self.context = snapshot.context;
        self.rules = snapshot.rules;
        self.sets_traded = snapshot.sets_traded;
        self.captured_this_turn = snapshot.captured_this_turn;
        self.battle_log.clear();
    }

    /// Captures the resumable state of the session.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            roster: self.roster.clone(),
            context: self.context.clone(),
            rules: self.rules.clone(),
            sets_traded: self.sets_traded,
            captured_this_turn: self.captured_this_turn,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn sets_traded(&self) -> u32 {
        self.sets_traded
    }

    /// Every round resolved since the session started (or was restored).
    pub fn battle_log(&self) -> &[RoundReport] {
        &self.battle_log
    }

    /// Name of the player to act, if any.
    pub fn current_player(&self) -> Option<&str> {
        self.roster.current().map(|p| p.name.as_str())
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.context {
            Context::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Reinforcement income the named player would receive now.
    pub fn reinforcements_for(&self, player: &str) -> u32 {
        calculate(player, &self.board, &self.rules)
    }

    /// Validates and executes an action, returning the resulting events.
    ///
    /// A rejected action leaves the game untouched.
    pub fn apply(&mut self, action: Action) -> Result<Vec<Event>, ActionError> {
        let kind = action.kind();
        if !self.context.allows(kind) {
            debug!("rejected {kind} during {}", self.context);
            if let Context::GameOver { winner } = &self.context {
                return Err(ActionError::GameOver {
                    winner: winner.clone(),
                });
            }
            return Err(ActionError::IllegalForPhase {
                action: kind,
                context: self.context.kind(),
            });
        }

        let mut events = Vec::new();
        match action {
            Action::AddPlayer { name } => self.add_player(name, &mut events)?,
            Action::RemovePlayer { name } => self.remove_player(&name, &mut events)?,
            Action::AssignTerritories => self.assign_territories(&mut events)?,
            Action::PlaceArmy { territory } => self.place_army(&territory, &mut events)?,
            Action::ExchangeCards { cards } => self.exchange_cards(cards, &mut events)?,
            Action::Reinforce { territory, count } => {
                self.reinforce(&territory, count, &mut events)?
            }
            Action::Attack { from, to, dice } => self.attack(&from, &to, dice, &mut events)?,
            Action::DeclineAttack => self.advance(&mut events),
            Action::Defend { dice } => self.defend(dice, &mut events)?,
            Action::MoveArmies { count } => self.move_armies(count, &mut events)?,
            Action::Fortify { from, to, count } => self.fortify(&from, &to, count, &mut events)?,
            Action::DeclineFortify => self.advance(&mut events),
            Action::ShowBoard => events.push(Event::BoardRequested),
            Action::Help => events.push(Event::HelpRequested {
                context: self.context.kind(),
            }),
            Action::Exit => events.push(Event::ExitRequested),
        }
        Ok(events)
    }

    /// Forces the current phase through its terminal transition.
    ///
    /// This is the turn controller the handlers use once a phase is done:
    /// Reinforce and the battle sub-contexts enter Attack, Attack enters
    /// Fortify, and Fortify passes the turn to the next player. A finished
    /// game never advances.
    pub fn advance_phase(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.advance(&mut events);
        events
    }

    fn advance(&mut self, events: &mut Vec<Event>) {
        let current = self.context.kind();
        match next_context(current) {
            ContextKind::Startup => self.transition(Context::Startup, events),
            ContextKind::Reinforce if current == ContextKind::Startup => {
                self.roster.set_current(0);
                self.start_turn(events);
            }
            ContextKind::Reinforce => self.end_turn(events),
            ContextKind::Attack => self.enter_attack(events),
            ContextKind::Fortify => self.transition(Context::Fortify, events),
            _ => {}
        }
    }

    fn transition(&mut self, next: Context, events: &mut Vec<Event>) {
        let from = self.context.kind();
        let to = next.kind();
        self.context = next;
        if from != to {
            debug!("phase {from} -> {to}");
            events.push(Event::PhaseChanged { from, to });
        }
    }

    fn out_of_context(&self, action: ActionKind) -> ActionError {
        debug!("{action} dispatched during {}", self.context);
        ActionError::IllegalForPhase {
            action,
            context: self.context.kind(),
        }
    }

    fn current_name(&self) -> String {
        self.current_player().unwrap_or_default().to_string()
    }

    fn require_territory(&self, name: &str) -> Result<(), ActionError> {
        if self.board.get(name).is_none() {
            return Err(ActionError::UnknownTerritory(name.to_string()));
        }
        Ok(())
    }

    fn require_owned(&self, territory: &str, player: &str) -> Result<(), ActionError> {
        self.require_territory(territory)?;
        if !self.board.get(territory).is_some_and(|t| t.is_owned_by(player)) {
            return Err(ActionError::NotOwned {
                territory: territory.to_string(),
                player: player.to_string(),
            });
        }
        Ok(())
    }

    fn require_adjacent(&self, from: &str, to: &str) -> Result<(), ActionError> {
        if !self.board.are_adjacent(from, to) {
            return Err(ActionError::NotAdjacent {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    fn add_player(&mut self, name: String, events: &mut Vec<Event>) -> Result<(), ActionError> {
        if self.roster.contains(&name) {
            return Err(ActionError::DuplicatePlayer(name));
        }
        if self.roster.len() >= self.rules.max_players {
            return Err(ActionError::PlayerCount {
                count: self.roster.len() + 1,
                min: self.rules.min_players,
                max: self.rules.max_players,
            });
        }
        self.roster.add(&name);
        events.push(Event::PlayerAdded { player: name });
        Ok(())
    }

    fn remove_player(&mut self, name: &str, events: &mut Vec<Event>) -> Result<(), ActionError> {
        if self.roster.remove(name).is_none() {
            return Err(ActionError::UnknownPlayer(name.to_string()));
        }
        events.push(Event::PlayerRemoved {
            player: name.to_string(),
        });
        Ok(())
    }

    /// Deals every territory round-robin in shuffled order, one army each.
    fn assign_territories(&mut self, events: &mut Vec<Event>) -> Result<(), ActionError> {
        let count = self.roster.len();
        let min = self.rules.min_players.max(1);
        if count < min || count > self.rules.max_players {
            return Err(ActionError::PlayerCount {
                count,
                min,
                max: self.rules.max_players,
            });
        }
        let territories = self.board.territory_count();
        if territories == 0 {
            return Err(ActionError::EmptyBoard);
        }
        // Every player must be dealt at least one territory.
        if territories < count {
            return Err(ActionError::TooFewTerritories {
                territories,
                players: count,
            });
        }

        let mut names: Vec<String> = self.board.territories.keys().cloned().collect();
        names.shuffle(&mut self.rng);
        let players: Vec<String> = self.roster.players().iter().map(|p| p.name.clone()).collect();
        for (i, territory) in names.iter().enumerate() {
            self.board.occupy(territory, &players[i % count], 1);
        }

        let initial = self.rules.initial_armies_for(count);
        for player in self.roster.players_mut() {
            let dealt = self.board.owned_count(&player.name);
            player.pending = initial.saturating_sub(dealt as u32);
            events.push(Event::TerritoriesAssigned {
                player: player.name.clone(),
                count: dealt,
                pending: player.pending,
            });
        }
        info!("dealt {} territories to {count} players", names.len());

        self.roster.set_current(0);
        self.advance(events);
        self.next_placer(0, events);
        Ok(())
    }

    /// Makes the first player at or after `start` with a pending pool current,
    /// or begins the first turn when every pool is empty.
    fn next_placer(&mut self, start: usize, events: &mut Vec<Event>) {
        let n = self.roster.len();
        let next = (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&i| self.roster.players()[i].pending > 0);
        match next {
            Some(i) => self.roster.set_current(i),
            None => self.advance(events),
        }
    }

    fn place_army(&mut self, territory: &str, events: &mut Vec<Event>) -> Result<(), ActionError> {
        let player = self.current_name();
        self.require_owned(territory, &player)?;

        self.board.add_armies(territory, 1);
        let pending = match self.roster.current_mut() {
            Some(p) => {
                p.pending = p.pending.saturating_sub(1);
                p.pending
            }
            None => 0,
        };
        events.push(Event::ArmiesPlaced {
            player,
            territory: territory.to_string(),
            count: 1,
            pending,
        });
        self.next_placer(self.roster.current_index() + 1, events);
        Ok(())
    }

    fn start_turn(&mut self, events: &mut Vec<Event>) {
        let player = self.current_name();
        let income = calculate(&player, &self.board, &self.rules);
        if let Some(p) = self.roster.current_mut() {
            p.pending += income;
        }
        self.captured_this_turn = false;
        info!("turn {player}: {income} reinforcements");
        self.transition(Context::Reinforce, events);
        events.push(Event::TurnStarted {
            player,
            reinforcements: income,
        });
    }

    fn end_turn(&mut self, events: &mut Vec<Event>) {
        if self.captured_this_turn {
            let card = CardKind::draw(&mut self.rng);
            if let Some(p) = self.roster.current_mut() {
                p.cards.push(card);
                events.push(Event::CardAwarded {
                    player: p.name.clone(),
                    card,
                });
            }
        }
        self.roster.advance();
        self.start_turn(events);
    }

    fn exchange_cards(&mut self, picks: [usize; 3], events: &mut Vec<Event>) -> Result<(), ActionError> {
        let bonus = exchange_bonus(self.sets_traded, &self.rules);
        let context = self.context.kind();
        let Some(player) = self.roster.current_mut() else {
            return Err(ActionError::IllegalForPhase {
                action: ActionKind::ExchangeCards,
                context,
            });
        };
        pick_set(&player.cards, picks)?;
        remove_set(&mut player.cards, picks);
        player.pending += bonus;
        events.push(Event::CardsExchanged {
            player: player.name.clone(),
            bonus,
        });
        self.sets_traded += 1;
        Ok(())
    }

    fn reinforce(&mut self, territory: &str, count: u32, events: &mut Vec<Event>) -> Result<(), ActionError> {
        if count == 0 {
            return Err(ActionError::ZeroCount);
        }
        let player = self.current_name();
        let (pending, cards) = self
            .roster
            .current()
            .map_or((0, 0), |p| (p.pending, p.cards.len()));
        if cards >= self.rules.max_hand {
            return Err(ActionError::MustExchange { cards });
        }
        self.require_owned(territory, &player)?;
        if count > pending {
            return Err(ActionError::PendingExceeded {
                requested: count,
                pending,
            });
        }

        self.board.add_armies(territory, count);
        let remaining = pending - count;
        if let Some(p) = self.roster.current_mut() {
            p.pending = remaining;
        }
        events.push(Event::ArmiesPlaced {
            player,
            territory: territory.to_string(),
            count,
            pending: remaining,
        });
        if remaining == 0 {
            self.advance(events);
        }
        Ok(())
    }

    /// Enters Attack, falling through to Fortify when no attack is possible.
    fn enter_attack(&mut self, events: &mut Vec<Event>) {
        self.transition(Context::Attack, events);
        let player = self.current_name();
        if !has_legal_attack(&self.board, &player) {
            debug!("{player} has no legal attack");
            self.transition(Context::Fortify, events);
        }
    }

    fn attack(
        &mut self,
        from: &str,
        to: &str,
        dice: AttackDice,
        events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let player = self.current_name();
        self.require_owned(from, &player)?;
        self.require_territory(to)?;
        if self.board.get(to).is_some_and(|t| t.is_owned_by(&player)) {
            return Err(ActionError::OwnTerritory(to.to_string()));
        }
        self.require_adjacent(from, to)?;

        let armies = self.board.armies(from);
        if armies < 2 {
            return Err(ActionError::NotEnoughArmies {
                territory: from.to_string(),
                armies,
            });
        }
        let (attacker_dice, all_out) = match dice {
            AttackDice::Count(n) => (check_attacker_dice(n, armies)?, false),
            AttackDice::AllOut => (attacker_max_dice(armies), true),
        };

        let defender = self
            .board
            .get(to)
            .and_then(|t| t.owner.clone())
            .unwrap_or_default();
        let battle = Battle {
            from: from.to_string(),
            to: to.to_string(),
            attacker: player.clone(),
            defender: defender.clone(),
            attacker_dice,
            all_out,
            rounds: 0,
        };
        events.push(Event::BattleStarted {
            from: from.to_string(),
            to: to.to_string(),
            attacker: player,
            defender,
            all_out,
        });
        self.prompt_defender(battle, events);
        Ok(())
    }

    fn prompt_defender(&mut self, battle: Battle, events: &mut Vec<Event>) {
        let max_dice = defender_max_dice(self.board.armies(&battle.to));
        events.push(Event::DefenderPrompted {
            defender: battle.defender.clone(),
            territory: battle.to.clone(),
            max_dice,
        });
        self.transition(Context::Defend(battle), events);
    }

    fn defend(&mut self, dice: u8, events: &mut Vec<Event>) -> Result<(), ActionError> {
        let Context::Defend(battle) = &self.context else {
            return Err(self.out_of_context(ActionKind::Defend));
        };
        let mut battle = battle.clone();
        check_defender_dice(dice, self.board.armies(&battle.to))?;

        let report = resolve_round(&mut self.board, &battle, dice, &mut self.dice);
        debug!("{report}");
        self.battle_log.push(report.clone());
        events.push(Event::RoundResolved(report));
        battle.rounds += 1;

        match round_end(&self.board, &battle) {
            RoundEnd::Captured => self.capture(battle, events),
            RoundEnd::Held => {
                events.push(Event::AttackRepelled {
                    from: battle.from,
                    to: battle.to,
                });
                self.advance(events);
            }
            RoundEnd::Continues if battle.all_out => {
                battle.attacker_dice = attacker_max_dice(self.board.armies(&battle.from));
                self.prompt_defender(battle, events);
            }
            RoundEnd::Continues => self.advance(events),
        }
        Ok(())
    }

    fn capture(&mut self, battle: Battle, events: &mut Vec<Event>) {
        self.board.occupy(&battle.to, &battle.attacker, 0);
        self.captured_this_turn = true;
        info!("{} captures {} from {}", battle.attacker, battle.to, battle.defender);
        events.push(Event::TerritoryCaptured {
            territory: battle.to.clone(),
            from: battle.defender.clone(),
            to: battle.attacker.clone(),
        });

        if self.board.owned_count(&battle.defender) == 0 {
            self.eliminate(&battle.defender, &battle.attacker, events);
        }

        let conquest = Conquest {
            from: battle.from,
            to: battle.to,
            dice_used: battle.attacker_dice,
        };
        if self.board.owns_all(&battle.attacker) || self.roster.len() == 1 {
            let (min, _) = conquest.move_range(self.board.armies(&conquest.from));
            self.move_between(&conquest.from, &conquest.to, min, events);
            info!("{} wins", battle.attacker);
            events.push(Event::Victory {
                winner: battle.attacker.clone(),
            });
            self.transition(
                Context::GameOver {
                    winner: battle.attacker,
                },
                events,
            );
            return;
        }
        self.transition(Context::Occupy(conquest), events);
    }

    fn eliminate(&mut self, player: &str, by: &str, events: &mut Vec<Event>) {
        let Some(removed) = self.roster.remove(player) else {
            return;
        };
        if let Some(conqueror) = self.roster.get_mut(by) {
            conqueror.cards.extend(removed.cards);
        }
        info!("{player} eliminated by {by}");
        events.push(Event::PlayerEliminated {
            player: player.to_string(),
            by: by.to_string(),
        });
    }

    fn move_between(&mut self, from: &str, to: &str, count: u32, events: &mut Vec<Event>) {
        self.board.remove_armies(from, count);
        self.board.add_armies(to, count);
        events.push(Event::ArmiesMoved {
            from: from.to_string(),
            to: to.to_string(),
            count,
        });
    }

    fn move_armies(&mut self, count: u32, events: &mut Vec<Event>) -> Result<(), ActionError> {
        let Context::Occupy(conquest) = &self.context else {
            return Err(self.out_of_context(ActionKind::MoveArmies));
        };
        let conquest = conquest.clone();
        let (min, max) = conquest.move_range(self.board.armies(&conquest.from));
        if count < min || count > max {
            return Err(ActionError::MoveOutOfRange { count, min, max });
        }
        self.move_between(&conquest.from, &conquest.to, count, events);
        self.advance(events);
        Ok(())
    }

    fn fortify(&mut self, from: &str, to: &str, count: u32, events: &mut Vec<Event>) -> Result<(), ActionError> {
        if count == 0 {
            return Err(ActionError::ZeroCount);
        }
        let player = self.current_name();
        self.require_owned(from, &player)?;
        self.require_owned(to, &player)?;
        self.require_adjacent(from, to)?;
        let armies = self.board.armies(from);
        if count >= armies {
            return Err(ActionError::NotEnoughArmies {
                territory: from.to_string(),
                armies,
            });
        }
        self.move_between(from, to, count, events);
        self.advance(events);
        Ok(())
    }
}
