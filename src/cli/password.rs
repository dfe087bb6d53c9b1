//! Password acquisition.
//!
//! `-p` / `PODX_PASSWORD` wins; otherwise an interactive hidden prompt, or a
//! single line of stdin when no terminal is attached.

use std::io::{self, BufRead};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::error::{ConfigError, Result};

/// Whether the prompt asks twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

/// Resolve the password for a command.
pub fn obtain(given: Option<String>, confirm: Confirm) -> Result<Zeroizing<String>> {
    let password = match given {
        Some(password) => Zeroizing::new(password),
        None if console::user_attended_stderr() => prompt(confirm)?,
        None => read_stdin_line()?,
    };

    if password.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "password",
            reason: "cannot be empty".to_string(),
        }
        .into());
    }
    Ok(password)
}

fn prompt(confirm: Confirm) -> Result<Zeroizing<String>> {
    let mut prompt = Password::new().with_prompt("Password");
    if confirm == Confirm::Yes {
        prompt = prompt.with_confirmation("Confirm password", "passwords do not match");
    }
    let password = prompt
        .interact()
        .map_err(|e| io::Error::other(e.to_string()))?;
    Ok(Zeroizing::new(password))
}

fn read_stdin_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}
