//! Self-play game generation CLI.
//!
//! Plays espionage games with random agents and outputs one JSON record per
//! game. Logging goes to stderr and honours `RUST_LOG`.
//!
//! Usage:
//!   cargo run --release -- [OPTIONS]

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use dossier::config::EngineConfig;
use dossier::selfplay::{self, SimulationConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = args[i].parse().expect("invalid --games value");
            }
            "--players" => {
                i += 1;
                config.players = args[i].parse().expect("invalid --players value");
            }
            "--max-rounds" => {
                i += 1;
                config.max_rounds = args[i].parse().expect("invalid --max-rounds value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--config" => {
                i += 1;
                let text = fs::read_to_string(&args[i]).expect("failed to read --config file");
                config.engine = match EngineConfig::from_json(&text) {
                    Ok(engine) => engine,
                    Err(err) => {
                        eprintln!("Invalid config {}: {}", args[i], err);
                        std::process::exit(1);
                    }
                };
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if !(2..=6).contains(&config.players) {
        eprintln!("--players must be between 2 and 6, got {}", config.players);
        std::process::exit(1);
    }

    let quiet = config.quiet;
    if !quiet {
        eprintln!(
            "Self-play: {} games, {} players, max {} rounds, {} threads",
            config.num_games, config.players, config.max_rounds, config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !quiet {
        eprintln!(
            "Completed {} games in {:.2}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
            if !quiet {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
        }
    }
}

fn print_usage() {
    eprintln!("Usage: dossier [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --players N      Players per game, 2-6 (default: 4)");
    eprintln!("  --max-rounds N   Round cap before a game is abandoned (default: 30)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE    Engine rules as JSON (default: built-in rules)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
