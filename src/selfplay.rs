//! Self-play game generation.
//!
//! Plays complete games with randomly chosen actions, alliance proposals,
//! betrayals and showdown moves. Records every round's submissions and
//! report as JSONL for balance analysis.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::alliance::{AllianceKind, ShowdownMove, ShowdownResult, SHOWDOWN_MOVES};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::game::{Action, Defense, Offense, Status};
use crate::interaction::{available_defenses, available_offenses};
use crate::plan::{PlanId, SPRING_ANVIL};
use crate::session::{Game, GamePhase, RoundReport, MAX_PLAYERS};
use crate::victory::{VictoryCondition, VictoryResult};

/// Codenames handed out to simulated players, in seat order.
pub const CODENAMES: [&str; MAX_PLAYERS] = ["Falcon", "Owl", "Raven", "Viper", "Jackal", "Heron"];

/// Configuration for self-play game generation.
#[derive(Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Players per game (2-6).
    pub players: usize,
    /// Rounds before a game is abandoned without a winner.
    pub max_rounds: u32,
    /// Chance that an operational player attacks rather than lying low.
    pub attack_chance: f64,
    /// Chance per round that two random players try to ally.
    pub alliance_chance: f64,
    /// Chance per round that a random allied player betrays.
    pub betrayal_chance: f64,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
    pub engine: EngineConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_games: 10,
            players: 4,
            max_rounds: 30,
            attack_chance: 0.7,
            alliance_chance: 0.2,
            betrayal_chance: 0.05,
            threads: 4,
            seed: 0,
            quiet: false,
            engine: EngineConfig::default(),
        }
    }
}

/// A single recorded round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub actions: BTreeMap<String, Action>,
    pub report: RoundReport,
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    pub plans: BTreeMap<String, PlanId>,
    pub rounds: Vec<RoundRecord>,
    /// `None` when the round cap was hit.
    pub outcome: Option<VictoryResult>,
    pub showdown: Option<ShowdownResult>,
    pub final_influence: BTreeMap<String, i32>,
    pub final_status: BTreeMap<String, Status>,
    pub alliances_formed: usize,
    pub betrayals: usize,
}

impl GameRecord {
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }
}

/// Picks a random action for every operational player from the options
/// available at this table size.
pub fn random_actions<R: Rng + ?Sized>(
    game: &Game<impl Rng>,
    attack_chance: f64,
    rng: &mut R,
) -> HashMap<String, Action> {
    let roster = game.roster();
    let offenses = available_offenses(roster.len());
    let defenses = available_defenses(roster.len());
    let mut actions = HashMap::new();

    for player in roster.iter().filter(|p| p.status.is_operational()) {
        let defense = *defenses.choose(rng).unwrap_or(&Defense::SafeHouse);
        let targets: Vec<&str> = roster
            .iter()
            .filter(|p| p.codename != player.codename && !p.is_terminal())
            .map(|p| p.codename.as_str())
            .collect();

        let mut action = Action::safe(defense);
        if rng.gen_bool(attack_chance) {
            if let (Some(&offense), Some(&target)) =
                (offenses.choose(rng), targets.choose(rng))
            {
                let budget = player.influence.clamp(0, 3) as u32;
                action = Action::attack(offense, target)
                    .with_defense(defense)
                    .with_spend(rng.gen_range(0..=budget));
                if offense == Offense::Assassination && rng.gen_bool(0.5) {
                    action = action.with_gadget(SPRING_ANVIL);
                }
            }
        }
        if defense == Defense::InformationWarfare && rng.gen_bool(0.5) {
            action = action.with_banner("Nothing to see here");
        }
        actions.insert(player.codename.clone(), action);
    }
    actions
}

/// Tries to form one random alliance. Returns true on success.
fn try_random_alliance<R: Rng + ?Sized>(game: &mut Game<SmallRng>, rng: &mut R) -> bool {
    let standing: Vec<String> = game.roster().standing().map(|p| p.codename.clone()).collect();
    let pair: Vec<&String> = standing.choose_multiple(rng, 2).collect();
    let [a, b] = pair.as_slice() else {
        return false;
    };
    let kind = if rng.gen_bool(0.5) {
        AllianceKind::NonAggression
    } else {
        AllianceKind::CoordinatedOperation
    };
    match game.propose_alliance(a, b, kind) {
        Ok(id) => {
            debug!(%id, a = %a, b = %b, "simulated alliance formed");
            true
        }
        Err(err) => {
            debug!(%err, "simulated alliance refused");
            false
        }
    }
}

/// Has a random member of a random alliance betray it. Returns true on success.
fn try_random_betrayal<R: Rng + ?Sized>(game: &mut Game<SmallRng>, rng: &mut R) -> bool {
    let alliances = game.alliance_summary().alliances;
    let Some(alliance) = alliances.choose(rng) else {
        return false;
    };
    let Some(betrayer) = alliance.members.choose(rng) else {
        return false;
    };
    game.betray(alliance.id, betrayer).is_ok()
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SimulationConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, EngineError> {
    let players = config.players.clamp(2, MAX_PLAYERS);
    let codenames = &CODENAMES[..players];
    let mut game = Game::new(codenames, config.engine.clone(), rng.gen_range(1..=u64::MAX))?;

    let plans = codenames
        .iter()
        .filter_map(|c| game.plan_of(c).map(|p| (c.to_string(), p)))
        .collect();
    let mut rounds = Vec::new();
    let mut alliances_formed = 0;
    let mut betrayals = 0;
    let mut showdown = None;

    while game.phase() == GamePhase::Planning && game.round() <= config.max_rounds {
        if rng.gen_bool(config.alliance_chance) && try_random_alliance(&mut game, rng) {
            alliances_formed += 1;
        }
        if rng.gen_bool(config.betrayal_chance) && try_random_betrayal(&mut game, rng) {
            betrayals += 1;
        }

        let actions = random_actions(&game, config.attack_chance, rng);
        let report = game.play_round(actions.clone())?;
        rounds.push(RoundRecord {
            actions: actions.into_iter().collect(),
            report,
        });
    }

    if game.phase() == GamePhase::FinalShowdown {
        let participants = game
            .alliance_summary()
            .showdown
            .participants;
        for codename in &participants {
            let chosen = *SHOWDOWN_MOVES.choose(rng).unwrap_or(&ShowdownMove::Assassination);
            game.submit_showdown_action(codename, chosen)?;
        }
        showdown = Some(game.resolve_showdown()?);
    }

    Ok(GameRecord {
        game_id,
        plans,
        rounds,
        outcome: game.outcome().cloned(),
        showdown,
        final_influence: game
            .roster()
            .iter()
            .map(|p| (p.codename.clone(), p.influence))
            .collect(),
        final_status: game
            .roster()
            .iter()
            .map(|p| (p.codename.clone(), p.status))
            .collect(),
        alliances_formed,
        betrayals,
    })
}

fn describe(game: &GameRecord) -> String {
    match &game.outcome {
        Some(v) if v.winners.is_empty() => format!("no winner by {}", v.condition.title()),
        Some(v) => format!("{} wins by {}", v.winners.join(" & "), v.condition.title()),
        None => "abandoned".to_string(),
    }
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SimulationConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs self-play generation, calling `on_game` with each completed game record.
pub fn run_self_play_with_callback<F>(config: &SimulationConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game and reports it; failed games are logged and dropped.
fn play_and_report(config: &SimulationConfig, game_id: usize, done: usize) -> Option<GameRecord> {
    let mut rng = game_rng(config.seed, game_id);
    let game_start = Instant::now();
    match play_game(config, game_id, &mut rng) {
        Ok(game) => {
            if !config.quiet {
                eprintln!(
                    "Game {}/{}: {} after {} rounds ({:.2}s)",
                    done,
                    config.num_games,
                    describe(&game),
                    game.rounds_played(),
                    game_start.elapsed().as_secs_f64(),
                );
            }
            Some(game)
        }
        Err(err) => {
            warn!(game_id, %err, "self-play game aborted");
            None
        }
    }
}

fn run_self_play_sequential<F>(config: &SimulationConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        if let Some(game) = play_and_report(config, i, i + 1) {
            on_game(game);
        }
    }
}

/// Plays games concurrently on a rayon pool, delivering them through a channel.
fn run_self_play_parallel<F>(config: &SimulationConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            warn!(%err, "thread pool unavailable, playing sequentially");
            return run_self_play_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();
    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(game) = play_and_report(&config_clone, i, n) {
                        let _ = tx.send(game);
                    }
                });
        });
    });

    for game in rx {
        on_game(game);
    }
    if handle.join().is_err() {
        warn!("self-play worker thread panicked");
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let mut by_condition: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_plan: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut abandoned = 0usize;
    let mut total_rounds = 0usize;
    let mut alliances = 0usize;
    let mut betrayals = 0usize;

    for game in games {
        total_rounds += game.rounds_played();
        alliances += game.alliances_formed;
        betrayals += game.betrayals;
        match &game.outcome {
            Some(v) => {
                *by_condition.entry(v.condition.title()).or_default() += 1;
                if v.condition == VictoryCondition::MissionCompletion {
                    if let Some(plan) = v.plan {
                        *by_plan.entry(plan.as_str()).or_default() += 1;
                    }
                }
            }
            None => abandoned += 1,
        }
    }

    let per_game = |n: usize| n as f64 / total.max(1) as f64;
    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg rounds/game: {:.1}", per_game(total_rounds));
    eprintln!("Avg alliances/game: {:.2}", per_game(alliances));
    eprintln!("Avg betrayals/game: {:.2}", per_game(betrayals));
    eprintln!("Abandoned at round cap: {}", abandoned);
    eprintln!("Victory conditions:");
    for (condition, count) in &by_condition {
        eprintln!(
            "  {:>22}: {} ({:.1}%)",
            condition,
            count,
            100.0 * per_game(*count)
        );
    }
    if !by_plan.is_empty() {
        eprintln!("Winning master plans:");
        for (plan, count) in &by_plan {
            eprintln!("  {:>22}: {}", plan, count);
        }
    }
}
