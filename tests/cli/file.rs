//! Tests for `podx encrypt` and `podx decrypt`.

use crate::support::*;
use std::fs;

#[test]
fn test_encrypt_decrypt_with_flag_password() {
    let t = Test::new();
    t.write("notes.txt", "hello\n");

    let output = t.run(&["encrypt", "-i", "notes.txt", "-p", "pass123"]);
    assert_success(&output);
    assert!(!t.path("notes.txt").exists());
    assert!(t.path("notes.txt.enc").exists());
    assert_output_excludes(&output, "pass123");

    let output = t.run(&["decrypt", "-i", "notes.txt.enc", "-p", "pass123"]);
    assert_success(&output);
    assert_eq!(t.read("notes.txt"), "hello\n");
    assert!(t.path("notes.txt.enc").exists());
}

#[test]
fn test_wrong_password_fails() {
    let t = Test::new();
    t.write("notes.txt", "hello\n");
    assert_success(&t.run(&["encrypt", "-i", "notes.txt", "-p", "pass123"]));

    let output = t.run(&["decrypt", "-i", "notes.txt.enc", "-p", "wrong"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert!(!t.path("notes.txt").exists());
}

#[test]
fn test_chacha_and_explicit_output() {
    let t = Test::new();
    t.write("data.bin", b"\x01\x02\x03");

    let output = t.run(&[
        "encrypt", "-i", "data.bin", "-o", "sealed", "-a", "chacha20", "-p", "pw",
    ]);
    assert_success(&output);
    assert_stdout_contains(&output, "chacha20");

    // Salt is 16 bytes, the algorithm tag follows.
    let sealed = fs::read(t.path("sealed")).unwrap();
    assert_eq!(sealed[16], 1);

    let output = t.run(&["decrypt", "-i", "sealed", "-p", "pw"]);
    assert_success(&output);
    assert_eq!(fs::read(t.path("sealed.dec")).unwrap(), b"\x01\x02\x03");
}

#[test]
fn test_unknown_algorithm_rejected() {
    let t = Test::new();
    t.write("data.bin", b"x");

    let output = t.run(&["encrypt", "-i", "data.bin", "-a", "rot13", "-p", "pw"]);
    assert_failure(&output);
    assert!(t.path("data.bin").exists());
}

#[test]
fn test_password_from_stdin() {
    let t = Test::new();
    t.write("notes.txt", "piped\n");

    t.cmd()
        .args(["encrypt", "-i", "notes.txt"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();

    t.cmd()
        .args(["decrypt", "-i", "notes.txt.enc"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();
    assert_eq!(t.read("notes.txt"), "piped\n");
}

#[test]
fn test_password_from_env() {
    let t = Test::new();
    t.write("notes.txt", "env\n");

    t.cmd()
        .args(["encrypt", "-i", "notes.txt"])
        .env("PODX_PASSWORD", "hunter2")
        .assert()
        .success();

    let output = t.run(&["decrypt", "-i", "notes.txt.enc", "-p", "hunter2"]);
    assert_success(&output);
}

#[test]
fn test_same_input_and_output_rejected() {
    let t = Test::new();
    t.write("notes.txt", "keep\n");

    let output = t.run(&["encrypt", "-i", "notes.txt", "-o", "./notes.txt", "-p", "pw"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "same file");
    assert_eq!(t.read("notes.txt"), "keep\n");
}

#[test]
fn test_truncated_envelope_is_corrupt() {
    let t = Test::new();
    t.write("short.enc", b"tiny");

    let output = t.run(&["decrypt", "-i", "short.enc", "-p", "pw"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "corrupt envelope");
}
