//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a podx command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - Colors and inherited passwords disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("podx").expect("failed to find podx binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("PODX_PASSWORD");
        cmd.env_remove("PODX_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run podx with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run podx")
    }

    /// Shortcut for `podx init`.
    pub fn init_cmd(&self) -> Output {
        self.run(&["init"])
    }

    /// Shortcut for `podx keygen`.
    pub fn keygen(&self) -> Output {
        self.run(&["keygen"])
    }

    /// Shortcut for `podx encrypt-all`.
    pub fn encrypt_all(&self) -> Output {
        self.run(&["encrypt-all"])
    }

    /// Shortcut for `podx decrypt-all`.
    pub fn decrypt_all(&self) -> Output {
        self.run(&["decrypt-all"])
    }

    /// Shortcut for `podx add-secret`.
    pub fn add_secret(&self, pattern: &str) -> Output {
        self.run(&["add-secret", pattern])
    }

    /// Shortcut for `podx add-recipient`.
    pub fn add_recipient(&self, name: &str, key: &str) -> Output {
        self.run(&["add-recipient", "--name", name, "--key", key])
    }

    /// Shortcut for `podx status --json`.
    pub fn status_json(&self) -> serde_json::Value {
        let output = self.run(&["status", "--json"]);
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("status output is not JSON")
    }
}
