//! Error types.
//!
//! Errors are grouped by concern and wrapped by the top-level [`Error`].
//! None of the messages ever include a password or key material.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("input and output resolve to the same file: {}", .0.display())]
    PathCollision(PathBuf),

    /// A single file failed inside a batch or file operation.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid secret pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cryptographic failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("unknown algorithm: {0} (supported: aes-gcm, chacha20)")]
    UnknownAlgorithm(String),

    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("corrupt envelope: {0}")]
    CorruptEnvelope(String),

    /// Authentication failure. Wrong password and tampering look the same.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("invalid recipient public key: {0}")]
    InvalidRecipient(String),

    #[error("invalid age identity")]
    InvalidIdentity,

    #[error("no salt marker found in encrypted env file")]
    MissingSalt,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Project configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: no .podx.toml found")]
    NotInitialized,

    #[error("project already initialized (.podx.toml exists)")]
    AlreadyInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(std::io::Error),

    #[error("invalid .podx.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no recipients configured")]
    NoRecipients,

    #[error("recipient with key {0} already exists")]
    DuplicateRecipient(String),

    #[error("secret pattern already exists: {0}")]
    DuplicateSecretPattern(String),

    #[error("backend '{0}' is not supported for batch operations")]
    UnsupportedBackend(String),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Identity storage failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no age identity found in {0}")]
    NoIdentity(String),

    #[error("no default public key found in {0}")]
    NoPublicKey(String),

    #[error("failed to read key file: {0}")]
    ReadFailed(std::io::Error),

    #[error("failed to write key file: {0}")]
    WriteFailed(std::io::Error),

    #[error("unable to determine home directory")]
    HomeDirUnavailable,
}

impl Error {
    /// Attach the path of the file being processed.
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping file context.
    pub fn root(&self) -> &Error {
        match self {
            Error::File { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
