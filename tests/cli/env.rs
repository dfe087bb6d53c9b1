//! Tests for `podx env encrypt` and `podx env decrypt`.

use crate::support::*;

#[test]
fn test_env_roundtrip_preserves_layout() {
    let t = Test::new();
    t.write(".env", SAMPLE_ENV_COMPLEX);

    let output = t.run(&["env", "encrypt", "-i", ".env", "-p", "pass123"]);
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted 6 values");
    assert!(!t.path(".env").exists());

    let sealed = t.read(".env.podx");
    assert!(sealed.starts_with("# PODX_SALT="));
    assert!(sealed.contains("\n# This is a comment\n"));
    assert!(sealed.contains("\nnot a pair\n"));
    assert!(sealed.contains("SIMPLE=ENC[aes-gcm:"));
    assert!(!sealed.contains("p@ssw0rd"));

    let output = t.run(&["env", "decrypt", "-i", ".env.podx", "-p", "pass123"]);
    assert_success(&output);
    assert_eq!(t.read(".env"), SAMPLE_ENV_COMPLEX);
}

#[test]
fn test_env_wrong_password() {
    let t = Test::new();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["env", "encrypt", "-i", ".env", "-p", "pass123"]));

    let output = t.run(&["env", "decrypt", "-i", ".env.podx", "-p", "wrong"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert!(!t.path(".env").exists());
}

#[test]
fn test_env_decrypt_without_salt() {
    let t = Test::new();
    t.write("plain.env", SAMPLE_ENV);

    let output = t.run(&["env", "decrypt", "-i", "plain.env", "-p", "pw"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no salt marker");
    assert!(!t.path("plain.env.dec").exists());
}

#[test]
fn test_env_chacha_cells() {
    let t = Test::new();
    t.write("app.env", SAMPLE_ENV);

    let output = t.run(&[
        "env", "encrypt", "-i", "app.env", "-o", "app.sealed", "-a", "chacha20", "-p", "pw",
    ]);
    assert_success(&output);
    assert!(t.read("app.sealed").contains("API_KEY=ENC[chacha20:"));

    let output = t.run(&["env", "decrypt", "-i", "app.sealed", "-o", "app.env", "-p", "pw"]);
    assert_success(&output);
    assert_eq!(t.read("app.env"), SAMPLE_ENV);
}
