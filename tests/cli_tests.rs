//! Integration tests for the Fusion CLI
//!
//! These tests run the actual CLI binary in an empty temp directory (so no
//! stray `.env` is picked up) and verify output and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Binary with credentials stripped from the environment
fn fusion_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fusion").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("FUSION_PROVIDER")
        .env_remove("FUSION_MODEL")
        .env("RUST_LOG", "off")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("terminal application shell"))
        .stdout(predicate::str::contains("insights"));
}

#[test]
fn test_views_lists_navigation_table() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .arg("views")
        .assert()
        .success()
        .stdout(predicate::str::contains("/analytics"))
        .stdout(predicate::str::contains("Configurator"));
}

// ============================================================================
// Headless operations
// ============================================================================

#[test]
fn test_insights_with_mock_provider() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .args(["insights", "--provider", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mock response"));
}

#[test]
fn test_missing_api_key_fails_with_fix_hint() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .args(["describe", "--color", "#DC143C"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Gemini API key not configured. This feature is disabled.",
        ))
        .stderr(predicate::str::contains("API_KEY"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .args(["insights", "--provider", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider: 'carrier-pigeon'"));
}

#[test]
fn test_blog_unparseable_answer_prints_fallback_post() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .args(["blog", "Rust async", "--provider", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not generate blog post content."));
}

#[test]
fn test_blank_blog_topic_is_rejected() {
    let dir = TempDir::new().unwrap();
    fusion_cmd(&dir)
        .args(["blog", "   ", "--provider", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be blank"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_dotenv_selects_provider() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "FUSION_PROVIDER=mock\n").unwrap();

    fusion_cmd(&dir)
        .arg("insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using provider: mock"));
}
