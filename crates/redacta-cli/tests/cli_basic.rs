//! Basic CLI E2E tests.
//!
//! Commands run via cargo with HOME pointed at a scratch directory so
//! the real data dir is never touched. Nothing here talks to the
//! network: gateway-backed commands are only exercised for their local
//! failure paths.

use std::path::PathBuf;
use std::process::Command;

fn scratch_home(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("redacta-cli-test-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Run a CLI command against an isolated home and return output.
fn run_cli(home: &PathBuf, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "redacta-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .env("REDACTA_ENV", "dev")
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_stats_show() {
    let home = scratch_home("stats");
    let (stdout, _, code) = run_cli(&home, &["stats", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Nível 1"));
    assert!(stdout.contains("450"));
}

#[test]
fn test_stats_show_json() {
    let home = scratch_home("stats-json");
    let (stdout, _, code) = run_cli(&home, &["stats", "show", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["level"], 1);
    assert_eq!(parsed["next_level_xp"], 100);
}

#[test]
fn test_history_list_empty() {
    let home = scratch_home("history");
    let (stdout, _, code) = run_cli(&home, &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Nenhuma redação"));
}

#[test]
fn test_onboarding_gating() {
    let home = scratch_home("onboarding");
    let (stdout, _, code) = run_cli(&home, &["onboarding", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("onboarding"));

    let (_, _, code) = run_cli(&home, &["onboarding", "accept-terms"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["onboarding", "status"]);
    assert!(stdout.contains("guia"));

    let (_, _, code) = run_cli(&home, &["onboarding", "guide-seen"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["onboarding", "status"]);
    assert!(stdout.contains("início"));
}

#[test]
fn test_config_get_set() {
    let home = scratch_home("config");
    let (stdout, _, code) = run_cli(&home, &["config", "get", "essay.min_length"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "500");

    let (_, _, code) = run_cli(&home, &["config", "set", "simulation.question_count", "5"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "simulation.question_count"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = scratch_home("config-bad");
    let (_, stderr, code) = run_cli(&home, &["config", "get", "nope.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("nope.nope"));
}

#[test]
fn test_chat_show_empty() {
    let home = scratch_home("chat");
    let (stdout, _, code) = run_cli(&home, &["chat", "show", "general"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().is_empty());
}

#[test]
fn test_chat_clear_requires_confirmation() {
    let home = scratch_home("chat-clear");
    let (stdout, _, code) = run_cli(&home, &["chat", "clear", "mindmap"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("--yes"));
}

#[test]
fn test_exam_date_round_trip() {
    let home = scratch_home("exam-date");
    let (_, _, code) = run_cli(&home, &["stats", "exam-date", "2026-11-08"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["stats", "exam-date"]);
    assert!(stdout.contains("2026-11-08"));
}

#[test]
fn test_themes_without_api_key_fails_cleanly() {
    let home = scratch_home("themes");
    let (_, stderr, code) = run_cli(&home, &["themes"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("GEMINI_API_KEY"));
}
