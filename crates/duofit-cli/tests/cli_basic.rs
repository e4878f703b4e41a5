//! Basic CLI E2E tests.
//!
//! Tests invoke the built `duofit` binary and verify its outputs. Every
//! test points `--config` into a temp dir so the user's file is never read.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let config = dir.path().join("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_duofit"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .env_remove("DUOFIT_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Run a CLI command with `input` piped to stdin, then close stdin.
fn run_cli_with_input(dir: &TempDir, args: &[&str], input: &str) -> (i32, String) {
    let config = dir.path().join("config.toml");
    let mut child = Command::new(env!("CARGO_BIN_EXE_duofit"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .env_remove("DUOFIT_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");

    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    drop(stdin);

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    (output.status.code().unwrap_or(-1), stdout)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("Failed to parse JSON line"))
        .collect()
}

#[test]
fn test_simulate_json_event_stream() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        &dir,
        &[
            "timer", "simulate", "--prep", "2", "--workout", "00:05", "--end", "2", "--step",
            "1", "--json",
        ],
    );
    assert_eq!(code, 0, "simulate failed");

    let events = json_lines(&stdout);
    assert_eq!(events[0]["type"], "started");

    let summary: Vec<(String, String)> = events[1..]
        .iter()
        .map(|e| {
            let kind = e["type"].as_str().unwrap().to_string();
            let detail = match kind.as_str() {
                "signal" => format!("{}:{}", e["phase"].as_str().unwrap(), e["strength"].as_str().unwrap()),
                _ => format!("{}:{}", e["phase"].as_str().unwrap(), e["remaining_secs"]),
            };
            (kind, detail)
        })
        .collect();

    let expected = [
        ("updated", "prep:1.0"),
        ("signal", "prep:big"),
        ("updated", "workout:5.0"),
        ("updated", "workout:4.0"),
        ("updated", "workout:3.0"),
        ("signal", "end:small"),
        ("updated", "end:2.0"),
        ("signal", "end:small"),
        ("updated", "end:1.0"),
        ("signal", "end:big"),
        ("updated", "end:0.0"),
    ];
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(k, d)| (k.to_string(), d.to_string()))
        .collect();
    assert_eq!(summary, expected);

    assert_eq!(events.last().unwrap()["t"], 7.0);
}

#[test]
fn test_simulate_text_shows_phases() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        &dir,
        &["timer", "simulate", "--prep", "1", "--workout", "3", "--end", "1"],
    );
    assert_eq!(code, 0, "simulate failed");
    assert!(stdout.contains("PREP complete"));
    assert!(stdout.contains("WORK  00:03"));
    assert!(stdout.contains("END   00:00"));
    assert!(stdout.contains("END complete"));
}

#[test]
fn test_invalid_time_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["timer", "simulate", "--prep", "1:x"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("1:x"));
}

#[test]
fn test_zero_step_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&dir, &["timer", "simulate", "--step", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_real_time_short_session() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        &dir,
        &[
            "timer", "run", "--prep", "0", "--workout", "1", "--end", "0", "--tick-ms", "50",
            "--json",
        ],
    );
    assert_eq!(code, 0, "run failed");
    let events = json_lines(&stdout);
    let last = events.last().unwrap();
    assert_eq!(last["type"], "updated");
    assert_eq!(last["remaining_secs"], 0.0);
    assert!(last["t"].as_f64().unwrap() >= 1.0);
}

#[test]
fn test_run_pauses_on_p() {
    let dir = TempDir::new().unwrap();
    let (code, stdout) = run_cli_with_input(
        &dir,
        &["timer", "run", "--prep", "5", "--workout", "30", "--tick-ms", "10"],
        "p\n",
    );
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("started at 00:05"));
    assert!(stdout.contains("paused at 00:0"));
    assert!(!stdout.contains("PREP complete"));
}

#[test]
fn test_run_resets_on_r_and_quits_on_q() {
    let dir = TempDir::new().unwrap();
    let (code, stdout) = run_cli_with_input(
        &dir,
        &[
            "timer", "run", "--prep", "5", "--workout", "30", "--tick-ms", "10", "--json",
        ],
        "r\nq\n",
    );
    assert_eq!(code, 0, "run failed");
    let events = json_lines(&stdout);
    assert_eq!(events[0]["type"], "started");
    let reset = events.last().unwrap();
    assert_eq!(reset["type"], "reset");
    assert_eq!(reset["snapshot"]["remaining_secs"], 5.0);
}

#[test]
fn test_run_ignores_unknown_input() {
    let dir = TempDir::new().unwrap();
    let (code, stdout) = run_cli_with_input(
        &dir,
        &[
            "timer", "run", "--prep", "0", "--workout", "1", "--end", "0", "--tick-ms", "20",
            "--json",
        ],
        "hello\n",
    );
    assert_eq!(code, 0, "run failed");
    let events = json_lines(&stdout);
    assert_eq!(events.last().unwrap()["remaining_secs"], 0.0);
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[timer]\nprep = 0\nworkout = 2\nend = 1\n\n[palette]\nend = \"red\"\n",
    )
    .unwrap();

    let (code, stdout, _) = run_cli(&dir, &["config", "get", "timer.workout"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2");

    let (code, stdout, _) = run_cli(&dir, &["timer", "simulate"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("red"));
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_show_prints_toml() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[timer]"));
    assert!(stdout.contains("interval_ms = 16"));
}

#[test]
fn test_malformed_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[timer\n").unwrap();
    let (code, _, stderr) = run_cli(&dir, &["config", "show"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to parse configuration"));
}
