//! Tests for `podx init`, `podx keygen` and project configuration commands.

use crate::support::*;
use std::fs;

#[test]
fn test_keygen_writes_history_and_default_key() {
    let t = Test::new();

    let output = t.keygen();
    assert_success(&output);
    assert_stdout_contains(&output, "age1");

    let history = fs::read_to_string(t.keys_file()).unwrap();
    assert!(history.contains("# created: "));
    assert!(history.contains("# public key: age1"));
    assert_eq!(history.matches("AGE-SECRET-KEY-").count(), 1);

    let public = t.home.path().join(".config/podx/age-recipients/default.txt");
    assert!(fs::read_to_string(public).unwrap().starts_with("age1"));

    assert_success(&t.keygen());
    let history = fs::read_to_string(t.keys_file()).unwrap();
    assert_eq!(history.matches("AGE-SECRET-KEY-").count(), 2);
}

#[test]
fn test_init_creates_config_with_owner() {
    let t = Test::new();
    assert_success(&t.keygen());

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    let config = t.read(".podx.toml");
    assert!(config.starts_with("# PODX project configuration"));
    assert!(config.contains("version = 1"));
    assert!(config.contains("backend = \"age\""));
    assert!(config.contains("name = \"Owner\""));
    assert!(config.contains("\".env\""));

    let gitignore = t.read(".gitignore");
    assert!(gitignore.contains("# podx: decrypted secrets"));
    assert!(gitignore.lines().any(|l| l == ".env"));
}

#[test]
fn test_init_without_identity_warns() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stderr_contains(&output, "no local identity");
    assert!(!t.read(".podx.toml").contains("Owner"));
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_add_recipient() {
    let t = Test::init();

    let output = t.add_recipient("bob", BOB_PUBLIC_KEY);
    assert_success(&output);
    assert_stdout_contains(&output, "added bob");
    assert!(t.read(".podx.toml").contains(BOB_PUBLIC_KEY));

    let output = t.add_recipient("bobby", BOB_PUBLIC_KEY);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_add_recipient_invalid_key() {
    let t = Test::init();

    let output = t.add_recipient("eve", INVALID_PUBLIC_KEY);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid recipient public key");
}

#[test]
fn test_add_secret_updates_gitignore() {
    let t = Test::init();

    assert_success(&t.add_secret("config/*.pem"));
    assert!(t.read(".podx.toml").contains("config/*.pem"));
    assert!(t.read(".gitignore").lines().any(|l| l == "config/*.pem"));

    let output = t.add_secret("config/*.pem");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_status_json() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);

    let status = t.status_json();
    assert_eq!(status["backend"], "age");
    assert_eq!(status["recipients"][0]["name"], "Owner");
    assert_eq!(status["patterns"][0]["pattern"], ".env");
    assert_eq!(status["patterns"][0]["plaintext"], 1);
    assert_eq!(status["patterns"][0]["encrypted"], 0);
}

#[test]
fn test_status_human() {
    let t = Test::init();

    let output = t.run(&["status"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Recipients");
    assert_stdout_contains(&output, "Owner");
}
