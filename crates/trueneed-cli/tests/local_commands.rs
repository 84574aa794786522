//! Integration tests for commands that never reach the backend.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Home with an instant advisor.
fn fast_home() -> TempDir {
    let home = tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "typing_delay_ms = 0\n").unwrap();
    home
}

#[test]
fn test_config_path_command() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let home = tempdir().unwrap();
    let config_path = home.path().join("config.toml");

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("api_base_url ="));
    assert!(contents.contains("typing_delay_ms ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let home = fast_home();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

/// Test: set-api-url rewrites the URL and keeps other settings.
#[test]
fn test_config_set_api_url_keeps_other_values() {
    let home = fast_home();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["config", "set-api-url", "https://api.trueneed.example/api/"])
        .assert()
        .success();

    let contents = fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(contents.contains("api_base_url = \"https://api.trueneed.example/api\""));
    assert!(contents.contains("typing_delay_ms = 0"));
}

/// Test: theme defaults to dark and toggling persists across runs.
#[test]
fn test_theme_toggle_persists() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to light"));

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));
}

#[test]
fn test_theme_set_rejects_unknown() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["theme", "set", "sepia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown theme"));
}

/// Test: chat answers each question and exits on `:q`.
#[test]
fn test_chat_responds_and_exits_on_quit() {
    let home = fast_home();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .arg("chat")
        .write_stdin("Best phone under ₹20,000?\n:new\n\n:q\nnever read\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Let me analyze your requirements"))
        .stdout(predicate::str::contains("Started a new chat."))
        .stderr(predicate::str::contains("Goodbye!"));
}

/// Test: `--sample` replays the first-visit conversation before reading input.
#[test]
fn test_chat_sample_conversation() {
    let home = fast_home();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["chat", "--sample"])
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "> I need a laptop for coding and video editing under ₹80,000",
        ))
        .stdout(predicate::str::contains("Which one has better battery life?"))
        .stdout(predicate::str::contains("MacBook Air M1"));
}

#[test]
fn test_products_lists_catalog() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .arg("products")
        .assert()
        .success()
        .stdout(predicate::str::contains("MacBook Air M1"))
        .stdout(predicate::str::contains("Dell XPS 13"))
        .stdout(predicate::str::contains("Perfect Match"));
}

#[test]
fn test_analyze_prints_placeholder() {
    let home = fast_home();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .args(["analyze", " https://shop.example/item/42 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Product ($99.99)"))
        .stdout(predicate::str::contains("https://shop.example/item/42"));
}

#[test]
fn test_banner_prints_headline() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("trueneed")
        .env("TRUENEED_HOME", home.path())
        .arg("banner")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy What You Need.|"))
        .stdout(predicate::str::contains("Not What They Sell."));
}
