//! Command-line interface.

pub mod env;
pub mod file;
pub mod init;
pub mod keygen;
pub mod lock;
pub mod output;
pub mod password;
pub mod recipient;
pub mod secret;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::cipher::Algorithm;

/// Podx - encrypt secret files so they can live in version control.
#[derive(Parser)]
#[command(
    name = "podx",
    about = "Encrypt secret files and .env values so they can live in version control",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize podx in the current directory
    Init,

    /// Authorize a public key to decrypt project secrets
    AddRecipient {
        /// Display name for the recipient
        #[arg(short, long)]
        name: String,
        /// age public key (age1...)
        #[arg(short, long)]
        key: String,
    },

    /// Declare a glob pattern of secret files
    AddSecret {
        /// Pattern relative to the project root (e.g. config/*.pem)
        pattern: String,
    },

    /// Encrypt every secret file for all recipients
    EncryptAll,

    /// Decrypt every secret file with your identity
    DecryptAll,

    /// Show recipients and secret file counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a new age identity
    Keygen,

    /// Encrypt a single file with a password
    Encrypt(EncryptArgs),

    /// Decrypt a single password-encrypted file
    Decrypt(DecryptArgs),

    /// Encrypt or decrypt the values of a .env file with a password
    Env {
        #[command(subcommand)]
        action: EnvAction,
    },
}

/// `.env` subcommands.
#[derive(Subcommand)]
pub enum EnvAction {
    /// Encrypt values, keeping keys and comments readable
    Encrypt(EncryptArgs),
    /// Decrypt values and drop the salt marker
    Decrypt(DecryptArgs),
}

#[derive(clap::Args)]
pub struct EncryptArgs {
    /// File to encrypt (removed afterwards)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// AEAD algorithm (aes-gcm, chacha20)
    #[arg(short, long, default_value_t = Algorithm::AesGcm)]
    pub algorithm: Algorithm,
    /// Password; prompted for when omitted
    #[arg(short, long, env = "PODX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(clap::Args)]
pub struct DecryptArgs {
    /// File to decrypt (kept)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Password; prompted for when omitted
    #[arg(short, long, env = "PODX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Init => init::execute(),
        AddRecipient { name, key } => recipient::add(&name, &key),
        AddSecret { pattern } => secret::add(&pattern),
        EncryptAll => lock::encrypt_all(),
        DecryptAll => lock::decrypt_all(),
        Status { json } => status::execute(json),
        Keygen => keygen::execute(),
        Encrypt(args) => file::encrypt(args),
        Decrypt(args) => file::decrypt(args),
        Env { action } => match action {
            EnvAction::Encrypt(args) => env::encrypt(args),
            EnvAction::Decrypt(args) => env::decrypt(args),
        },
    }
}
