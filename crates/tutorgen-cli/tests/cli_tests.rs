//! Integration tests for the tutorgen CLI.
//!
//! Everything here runs without network access: commands either fail
//! before any provider call or only inspect configuration.

use assert_cmd::Command;
use predicates::prelude::*;

fn tutorgen() -> (Command, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("tutorgen").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("TUTORGEN_PROVIDER")
        .env_remove("TUTORGEN_ANTHROPIC_KEY")
        .env_remove("TUTORGEN_OPENAI_KEY");
    (cmd, dir)
}

#[test]
fn help_lists_subcommands() {
    let (mut cmd, _dir) = tutorgen();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("hint"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("providers"));
}

#[test]
fn generate_without_configuration_fails_fast() {
    let (mut cmd, _dir) = tutorgen();
    cmd.args([
        "generate",
        "--grade",
        "3",
        "--topic",
        "basic addition",
        "--difficulty",
        "basic",
        "--count",
        "3",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not configured"));
}

#[test]
fn generate_rejects_zero_count() {
    let (mut cmd, _dir) = tutorgen();
    cmd.args([
        "generate",
        "--grade",
        "3",
        "--topic",
        "basic addition",
        "--count",
        "0",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("positive"));
}

#[test]
fn generate_rejects_unknown_difficulty() {
    let (mut cmd, _dir) = tutorgen();
    cmd.args([
        "generate",
        "--grade",
        "3",
        "--topic",
        "basic addition",
        "--difficulty",
        "impossible",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown difficulty"));
}

#[test]
fn providers_shows_active_entry() {
    let (mut cmd, dir) = tutorgen();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
active_provider = "ollama"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
model = "llama3.1:8b"
"#,
    )
    .unwrap();

    cmd.args(["providers", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ollama"))
        .stdout(predicate::str::contains("llama3.1:8b"))
        .stdout(predicate::str::contains("ready"));
}

#[test]
fn providers_reports_placeholder_credentials() {
    let (mut cmd, dir) = tutorgen();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
active_provider = "anthropic"

[providers.anthropic]
type = "anthropic"
api_key = "changeme"
"#,
    )
    .unwrap();

    cmd.args(["providers", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("not configured"));
}

#[test]
fn report_with_missing_session_file_fails() {
    let (mut cmd, _dir) = tutorgen();
    cmd.args(["report", "--session", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read session"));
}

#[test]
fn report_with_no_attempts_fails_before_any_call() {
    let (mut cmd, dir) = tutorgen();
    let session_path = dir.path().join("session.json");
    std::fs::write(
        &session_path,
        r#"{
  "id": "6e9f7d1c-0f65-4f0e-9a1c-3f5a8d2b4c6e",
  "created_at": "2026-01-10T10:00:00Z",
  "grade": "3",
  "topic": "basic addition",
  "exercises": [],
  "attempts": []
}"#,
    )
    .unwrap();

    cmd.args(["report", "--session"])
        .arg(&session_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no attempts"));
}
