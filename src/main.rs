//! Podx - encrypt secret files so they can live in version control.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use podx::cli::output;
use podx::cli::{execute, Cli};
use podx::error::{CipherError, ConfigError, Error, StoreError};

fn hint_for(error: &Error) -> Option<&'static str> {
    match error.root() {
        Error::Config(ConfigError::NotInitialized) => Some("run: podx init"),
        Error::Config(ConfigError::NoRecipients) => {
            Some("run: podx add-recipient --name <name> --key <age1...>")
        }
        Error::Store(StoreError::NoIdentity(_)) | Error::Store(StoreError::NoPublicKey(_)) => {
            Some("run: podx keygen")
        }
        Error::Cipher(CipherError::MissingSalt) => {
            Some("the file was not written by: podx env encrypt")
        }
        Error::PathCollision(_) => Some("pass a different --output"),
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("PODX_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("podx=debug")
        } else {
            EnvFilter::new("podx=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = hint_for(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
