use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use hegemon::board::{Action, Board};
use hegemon::config::RulesConfig;
use hegemon::dice::SeededDice;
use hegemon::engine::Game;
use hegemon::movegen::{legal_actions, random_action};
use hegemon::resolve::combat::{apply_rolls, roll_dice, Battle};
use hegemon::resolve::reinforce::calculate;

/// A three-player game on the sample board, dealt and past startup.
fn dealt_game(seed: u64) -> Game {
    let mut game = Game::new(Board::sample(), RulesConfig::default(), seed);
    for name in ["red", "blue", "green"] {
        game.apply(Action::AddPlayer {
            name: name.to_string(),
        })
        .unwrap();
    }
    game.apply(Action::AssignTerritories).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    while let Some(action) = random_action(&game, &mut rng) {
        if !matches!(action, Action::PlaceArmy { .. }) {
            break;
        }
        game.apply(action).unwrap();
    }
    game
}

fn bench_reinforcement_income(c: &mut Criterion) {
    let game = dealt_game(1);
    let rules = RulesConfig::default();
    c.bench_function("reinforcement_income", |b| {
        b.iter(|| calculate(black_box("red"), black_box(game.board()), &rules))
    });
}

fn bench_legal_actions(c: &mut Criterion) {
    let game = dealt_game(2);
    c.bench_function("legal_actions_reinforce", |b| {
        b.iter(|| legal_actions(black_box(&game)))
    });
}

fn bench_battle_round(c: &mut Criterion) {
    let mut board = Board::sample();
    board.occupy("mesa", "red", 50);
    board.occupy("delta", "blue", 50);
    let battle = Battle {
        from: "mesa".to_string(),
        to: "delta".to_string(),
        attacker: "red".to_string(),
        defender: "blue".to_string(),
        attacker_dice: 3,
        all_out: false,
        rounds: 0,
    };
    let mut dice = SeededDice::new(3);
    c.bench_function("battle_round_3v2", |b| {
        b.iter(|| {
            let mut scratch = board.clone();
            let attacker = roll_dice(3, &mut dice);
            let defender = roll_dice(2, &mut dice);
            apply_rolls(&mut scratch, black_box(&battle), attacker, defender)
        })
    });
}

fn bench_random_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_game");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("500_actions", |b| {
        b.iter(|| {
            let mut game = dealt_game(4);
            let mut rng = SmallRng::seed_from_u64(4);
            for _ in 0..500 {
                match random_action(&game, &mut rng) {
                    Some(action) => {
                        let _ = game.apply(action);
                    }
                    None => break,
                }
            }
            black_box(game.is_over())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_reinforcement_income,
    bench_legal_actions,
    bench_battle_round,
    bench_random_game
);
criterion_main!(benches);
