//! Tests for error reporting and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.run(&["--help"]);
    assert_success(&output);
    let out = stdout(&output);
    for command in ["init", "encrypt-all", "decrypt-all", "keygen", "env"] {
        assert!(out.contains(command), "help missing {}", command);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();
    assert_failure(&t.run(&["unknown-command"]));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.run(&["--version"]);
    assert_success(&output);
    assert_stdout_contains(&output, "podx");
}

#[test]
fn test_not_initialized_hint() {
    let t = Test::new();

    let output = t.encrypt_all();
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "✗ not initialized");
    assert_stderr_contains(&output, "run: podx init");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::new();
    t.write("notes.txt", "x");

    let output = t.run(&["--verbose", "encrypt", "-i", "notes.txt", "-p", "pw"]);
    assert_success(&output);
    assert_stderr_contains(&output, "encrypted file");
    assert_output_excludes(&output, "\"pw\"");
}

#[test]
fn test_empty_password_rejected() {
    let t = Test::new();
    t.write("notes.txt", "x");

    t.cmd()
        .args(["encrypt", "-i", "notes.txt"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("password"));
    assert!(t.path("notes.txt").exists());
}

#[test]
fn test_corrupt_config_reported() {
    let t = Test::new();
    t.write(".podx.toml", "version = \"one\"\n");

    let output = t.run(&["status"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid .podx.toml");
}
