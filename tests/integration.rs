//! Integration tests for the dossier binary.
//!
//! Spawns the self-play CLI and checks its JSONL output and exit codes.

use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_dossier");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start dossier")
}

fn stdout_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8(output.stdout.clone())
        .expect("stdout is not utf-8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("line is not JSON"))
        .collect()
}

#[test]
fn help_exits_cleanly() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: dossier"));
    assert!(stderr.contains("--max-rounds"));
}

#[test]
fn unknown_flag_fails() {
    let output = run_cli(&["--bogus"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown argument: --bogus"));
}

#[test]
fn player_count_is_validated() {
    let output = run_cli(&["--players", "7", "--quiet"]);
    assert!(!output.status.success());
}

#[test]
fn writes_one_record_per_game() {
    let output = run_cli(&[
        "--games", "3", "--players", "3", "--max-rounds", "8", "--threads", "1", "--seed", "11",
        "--quiet",
    ]);
    assert!(output.status.success());
    let games = stdout_lines(&output);
    assert_eq!(games.len(), 3);
    for (i, game) in games.iter().enumerate() {
        assert_eq!(game["game_id"], i);
        assert_eq!(game["plans"].as_object().unwrap().len(), 3);
        let rounds = game["rounds"].as_array().unwrap();
        assert!(!rounds.is_empty() && rounds.len() <= 8);
        if game["outcome"].is_null() {
            assert_eq!(rounds.len(), 8);
        }
    }
}

#[test]
fn seeded_output_is_reproducible() {
    let args = [
        "--games", "2", "--players", "4", "--max-rounds", "10", "--threads", "2", "--seed", "3",
        "--quiet",
    ];
    let a = run_cli(&args);
    let b = run_cli(&args);
    assert!(a.status.success() && b.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn output_file_receives_jsonl() {
    let path = std::env::temp_dir().join(format!("dossier-it-{}.jsonl", std::process::id()));
    let path_str = path.to_str().unwrap();
    let output = run_cli(&[
        "--games", "2", "--max-rounds", "5", "--threads", "1", "--seed", "9", "--output",
        path_str,
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("=== Self-Play Summary ==="));

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn custom_config_is_applied() {
    let path = std::env::temp_dir().join(format!("dossier-cfg-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"starting_influence": 40}"#).unwrap();
    let output = run_cli(&[
        "--games", "1", "--max-rounds", "1", "--threads", "1", "--seed", "4", "--quiet",
        "--config", path.to_str().unwrap(),
    ]);
    std::fs::remove_file(&path).ok();
    assert!(output.status.success());
    let games = stdout_lines(&output);
    assert_eq!(games.len(), 1);
    let influence = games[0]["final_influence"].as_object().unwrap();
    // A single round cannot drain 30 IP from anyone.
    assert!(influence.values().all(|v| v.as_i64().unwrap() > 10));
}

#[test]
fn malformed_config_is_rejected() {
    let path = std::env::temp_dir().join(format!("dossier-bad-{}.json", std::process::id()));
    std::fs::write(&path, "{not json").unwrap();
    let output = run_cli(&["--config", path.to_str().unwrap(), "--quiet"]);
    std::fs::remove_file(&path).ok();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid config"));
}
