//! Tests for `podx encrypt-all` and `podx decrypt-all`.

use crate::support::*;
use std::fs;

#[test]
fn test_encrypt_all_then_decrypt_all() {
    let t = Test::init();
    assert_success(&t.add_secret("certs/*.pem"));
    t.write(".env", SAMPLE_ENV);
    t.write("certs/server.pem", b"\x00binary\xff");

    let output = t.encrypt_all();
    assert_success(&output);
    assert_stdout_contains(&output, "2 of 2 encrypted");
    assert!(!t.path(".env").exists());
    assert!(!t.path("certs/server.pem").exists());

    let sealed = t.read(".env.podx");
    assert!(sealed.contains("API_KEY=ENC[age:"));
    assert!(sealed.contains("# note"));
    assert_output_excludes(&output, "secret123");

    let output = t.decrypt_all();
    assert_success(&output);
    assert_stdout_contains(&output, "2 of 2 decrypted");
    assert_eq!(t.read(".env"), SAMPLE_ENV);
    assert_eq!(fs::read(t.path("certs/server.pem")).unwrap(), b"\x00binary\xff");
    assert!(t.path(".env.podx").exists());
}

#[test]
fn test_encrypt_all_is_idempotent() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);

    assert_success(&t.encrypt_all());
    let before = t.read(".env.podx");

    let output = t.encrypt_all();
    assert_success(&output);
    assert_stdout_contains(&output, "0 of 0 encrypted");
    assert_eq!(t.read(".env.podx"), before);
}

#[test]
fn test_encrypt_all_without_recipients() {
    let t = Test::new();
    assert_success(&t.init_cmd());
    t.write(".env", SAMPLE_ENV);

    let output = t.encrypt_all();
    assert_failure(&output);
    assert_stderr_contains(&output, "no recipients configured");
    assert_stderr_contains(&output, "podx add-recipient");
    assert_eq!(t.read(".env"), SAMPLE_ENV);
}

#[test]
fn test_decrypt_all_reports_partial_progress() {
    let t = Test::init();
    assert_success(&t.add_secret("*.bin"));
    t.write(".env", SAMPLE_ENV);
    t.write("a.bin", b"a");
    t.write("b.bin", b"b");
    assert_success(&t.encrypt_all());

    t.write("b.bin.podx", b"garbage");

    let output = t.decrypt_all();
    assert_failure(&output);
    assert_stderr_contains(&output, "2 of 3 decrypted");
    assert_stderr_contains(&output, "b.bin.podx");
    assert_stderr_contains(&output, "decryption failed");
    assert!(t.path("a.bin").exists());
    assert!(!t.path("b.bin").exists());
}

#[test]
fn test_new_identity_cannot_decrypt_old_files() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.encrypt_all());

    // The newest key in the history becomes current.
    assert_success(&t.keygen());
    let output = t.decrypt_all();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}

#[test]
fn test_decrypt_all_without_identity() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.encrypt_all());
    fs::remove_file(t.keys_file()).unwrap();

    let output = t.decrypt_all();
    assert_failure(&output);
    assert_stderr_contains(&output, "podx keygen");
}

#[cfg(unix)]
#[test]
fn test_decrypted_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.encrypt_all());
    assert_success(&t.decrypt_all());

    let mode = fs::metadata(t.path(".env")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let mode = fs::metadata(t.path(".env.podx")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}
