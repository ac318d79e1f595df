use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use dossier::config::{EngineConfig, RoundEndConfig, TurnConfig};
use dossier::game::{Action, AssetLedger, Defense, Offense, Roster, ALL_DEFENSES, ALL_OFFENSES};
use dossier::interaction::resolve_interaction;
use dossier::resolve::{apply_round_end_effects, resolve_round};
use dossier::selfplay::{play_game, random_actions, SimulationConfig, CODENAMES};
use dossier::session::Game;

fn six_player_roster() -> Roster {
    Roster::with_codenames(&CODENAMES, 10).unwrap()
}

/// Everyone attacks the next seat; the last seat broadcasts a banner.
fn ring_actions() -> HashMap<String, Action> {
    let mut actions = HashMap::new();
    for (i, codename) in CODENAMES.iter().enumerate() {
        let target = CODENAMES[(i + 1) % CODENAMES.len()];
        let offense = ALL_OFFENSES[i % ALL_OFFENSES.len()];
        let defense = if i == CODENAMES.len() - 1 {
            Defense::InformationWarfare
        } else {
            ALL_DEFENSES[i % ALL_DEFENSES.len()]
        };
        actions.insert(
            codename.to_string(),
            Action::attack(offense, target)
                .with_defense(defense)
                .with_spend(1),
        );
    }
    actions
}

fn bench_interaction_table(c: &mut Criterion) {
    c.bench_function("resolve_all_132_interactions", |b| {
        b.iter(|| {
            let mut hits = 0;
            for &o in &ALL_OFFENSES {
                for &d in &ALL_DEFENSES {
                    if resolve_interaction(black_box(o), black_box(d), 2, 1).succeeds {
                        hits += 1;
                    }
                }
            }
            hits
        })
    });
}

fn bench_resolve_ring(c: &mut Criterion) {
    let roster = six_player_roster();
    let actions = ring_actions();
    let config = TurnConfig::default();
    let mut rng = SmallRng::seed_from_u64(1);

    c.bench_function("resolve_round_6_player_ring", |b| {
        b.iter(|| {
            let mut r = roster.clone();
            let mut assets = AssetLedger::new();
            resolve_round(
                &mut r,
                black_box(&actions),
                1,
                &mut assets,
                &config,
                &mut rng,
            )
        })
    });
}

fn bench_dogpile(c: &mut Criterion) {
    let roster = six_player_roster();
    let mut actions: HashMap<String, Action> = CODENAMES[1..]
        .iter()
        .map(|c| {
            (
                c.to_string(),
                Action::attack(Offense::Assassination, "Falcon").with_spend(2),
            )
        })
        .collect();
    actions.insert("Falcon".to_string(), Action::safe(Defense::BodyguardDetail));
    let config = TurnConfig::default();
    let mut rng = SmallRng::seed_from_u64(2);

    c.bench_function("resolve_round_5_on_1", |b| {
        b.iter(|| {
            let mut r = roster.clone();
            let mut assets = AssetLedger::new();
            resolve_round(&mut r, black_box(&actions), 1, &mut assets, &config, &mut rng)
        })
    });
}

fn bench_round_end(c: &mut Criterion) {
    let mut roster = six_player_roster();
    for p in roster.iter_mut() {
        p.gadgets = vec!["anvil".into(), "piano".into(), "umbrella".into()];
    }
    let assets = AssetLedger::new();
    let config = RoundEndConfig::default();
    let mut rng = SmallRng::seed_from_u64(3);

    c.bench_function("round_end_effects_6_players", |b| {
        b.iter(|| {
            let mut r = roster.clone();
            apply_round_end_effects(&mut r, black_box(&assets), &config, &mut rng)
        })
    });
}

fn bench_game_round(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(4);
    c.bench_function("game_play_round_random", |b| {
        b.iter(|| {
            let mut game = Game::new(&CODENAMES, EngineConfig::default(), 9).unwrap();
            let actions = random_actions(&game, 0.7, &mut rng);
            game.play_round(black_box(actions))
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let config = SimulationConfig {
        max_rounds: 30,
        quiet: true,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(5);
    c.bench_function("selfplay_full_game_4_players", |b| {
        b.iter(|| play_game(black_box(&config), 0, &mut rng))
    });
}

criterion_group!(
    benches,
    bench_interaction_table,
    bench_resolve_ring,
    bench_dogpile,
    bench_round_end,
    bench_game_round,
    bench_full_game,
);
criterion_main!(benches);
