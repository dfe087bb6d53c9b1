//! Project-wide secret orchestration.
//!
//! A project is a directory holding `.podx.toml`. Its secret patterns are
//! expanded under the project root and every match is encrypted to the full
//! recipient list. Env-shaped files keep their structure with `ENC[age:...]`
//! cells; anything else becomes a raw age envelope.
//!
//! Batches are best-effort then abort: unreadable matches are skipped with a
//! warning, but the first cryptographic or write failure stops the batch and
//! is returned in the [`BatchReport`] alongside the files already done.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::core::cipher::{self, Age, Cipher, Identity, Recipient as AgeRecipient};
use crate::core::config::{self, Backend, ProjectConfig, Recipient};
use crate::core::constants;
use crate::core::env::EnvFile;
use crate::core::file::{strip_suffix, with_suffix, write_with_mode};
use crate::core::store::KeyStore;
use crate::core::types::SecretPattern;
use crate::error::{CipherError, ConfigError, Error, Result};

/// How a secret file is transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `KEY=VALUE` text with per-value cells.
    Env,
    /// Whole-file age envelope.
    Binary,
}

impl FileKind {
    /// Env-shaped when the file name starts or ends with `.env`.
    pub fn of(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if name.starts_with(".env") || name.ends_with(".env") {
            FileKind::Env
        } else {
            FileKind::Binary
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Env => f.write_str("env"),
            FileKind::Binary => f.write_str("binary"),
        }
    }
}

/// A file transformed by a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub source: PathBuf,
    pub output: PathBuf,
    pub kind: FileKind,
}

/// The failure that stopped a batch.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of encrypt-all or decrypt-all.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Completed files, in processing order.
    pub processed: Vec<Processed>,
    /// Matches left alone with a logged warning.
    pub skipped: Vec<PathBuf>,
    /// Set when the batch aborted; later files were left untouched.
    pub failure: Option<Failure>,
    /// Number of files the batch planned to process.
    pub total: usize,
}

impl BatchReport {
    /// Number of files processed.
    pub fn count(&self) -> usize {
        self.processed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Turn an aborted batch into its error, naming the failing file.
    pub fn into_result(self) -> Result<Self> {
        match self.failure {
            Some(Failure { path, error }) => Err(error.at(path)),
            None => Ok(self),
        }
    }
}

/// Per-pattern file counts.
#[derive(Debug, Clone, Serialize)]
pub struct PatternStatus {
    pub pattern: SecretPattern,
    pub plaintext: usize,
    pub encrypted: usize,
}

/// Typed project summary.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub root: PathBuf,
    pub backend: Backend,
    pub recipients: Vec<Recipient>,
    pub patterns: Vec<PatternStatus>,
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Create `.podx.toml` in `root`.
    ///
    /// The local public key, when the store has one, becomes the first
    /// recipient. A failure to update `.gitignore` is only logged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if the project exists.
    pub fn init(root: impl Into<PathBuf>, store: &dyn KeyStore) -> Result<Self> {
        let root = root.into();
        if ProjectConfig::exists(&root) {
            return Err(ConfigError::AlreadyInitialized.into());
        }

        let mut config = ProjectConfig::default();
        match store.load_public_key() {
            Ok(key) => config.add_recipient(constants::DEFAULT_RECIPIENT_NAME, &key)?,
            Err(e) => debug!(error = %e, "no local public key, starting without recipients"),
        }

        let project = Self { root, config };
        project.save()?;
        if let Err(e) = project.update_gitignore() {
            warn!(error = %e, "failed to update .gitignore");
        }

        info!(root = %project.root.display(), "initialized project");
        Ok(project)
    }

    /// Load the project rooted at `root`.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = ProjectConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn save(&self) -> Result<()> {
        self.config.save(&self.root)
    }

    /// Add and persist a recipient.
    pub fn add_recipient(&mut self, name: &str, key: &str) -> Result<()> {
        self.config.add_recipient(name, key)?;
        self.save()
    }

    /// Add and persist a secret pattern, then refresh `.gitignore`.
    pub fn add_secret(&mut self, pattern: &str) -> Result<()> {
        self.config.add_secret(pattern)?;
        self.save()?;
        if let Err(e) = self.update_gitignore() {
            warn!(error = %e, "failed to update .gitignore");
        }
        Ok(())
    }

    /// Append missing secret patterns to `.gitignore`.
    pub fn update_gitignore(&self) -> Result<usize> {
        config::update_gitignore(&self.root, &self.config.secrets)
    }

    /// Encrypt every plaintext match of every secret pattern.
    ///
    /// # Errors
    ///
    /// Returns `NoRecipients`, `UnsupportedBackend` or `InvalidRecipient`
    /// before touching any file. Per-file failures are reported in the
    /// returned [`BatchReport`].
    pub fn encrypt_all(&self) -> Result<BatchReport> {
        self.config.require_age_backend()?;
        if self.config.recipients.is_empty() {
            return Err(ConfigError::NoRecipients.into());
        }
        let recipients = cipher::parse_recipients(&self.config.recipient_keys())?;

        let mut report = BatchReport::default();
        let plan = self.plan(None, &mut report);
        report.total = plan.len();
        debug!(files = report.total, "planned encryption");

        for source in plan {
            let output = with_suffix(&source, constants::ENCRYPTED_EXT);
            let kind = FileKind::of(&source);

            let plaintext = match fs::read(&source) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "skipping unreadable file");
                    report.skipped.push(source);
                    continue;
                }
            };

            let written = seal(kind, &plaintext, &recipients)
                .and_then(|sealed| write_with_mode(&output, &sealed, constants::PUBLIC_MODE));
            if let Err(error) = written {
                report.failure = Some(Failure {
                    path: source,
                    error,
                });
                break;
            }

            if let Err(e) = fs::remove_file(&source) {
                warn!(path = %source.display(), error = %e, "failed to remove plaintext");
            }
            trace!(path = %source.display(), %kind, "encrypted");
            report.processed.push(Processed {
                source,
                output,
                kind,
            });
        }

        info!(
            processed = report.count(),
            total = report.total,
            "encrypt-all finished"
        );
        Ok(report)
    }

    /// Decrypt every `<match>.podx` with the local identity.
    ///
    /// Plaintext siblings are written owner-only; ciphertext is kept.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedBackend` or `NoIdentity` before touching any file.
    pub fn decrypt_all(&self, store: &dyn KeyStore) -> Result<BatchReport> {
        self.config.require_age_backend()?;
        let identity = store.load_identity()?;

        let mut report = BatchReport::default();
        let plan = self.plan(Some(constants::ENCRYPTED_EXT), &mut report);
        report.total = plan.len();
        debug!(files = report.total, "planned decryption");

        for source in plan {
            let Some(output) = strip_suffix(&source, constants::ENCRYPTED_EXT) else {
                warn!(path = %source.display(), "skipping ciphertext with no plaintext name");
                report.skipped.push(source);
                continue;
            };
            let kind = FileKind::of(&output);

            let sealed = match fs::read(&source) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "skipping unreadable file");
                    report.skipped.push(source);
                    continue;
                }
            };

            let written = open(kind, &sealed, &identity)
                .and_then(|plain| write_with_mode(&output, &plain, constants::PRIVATE_MODE));
            if let Err(error) = written {
                report.failure = Some(Failure {
                    path: source,
                    error,
                });
                break;
            }

            trace!(path = %source.display(), %kind, "decrypted");
            report.processed.push(Processed {
                source,
                output,
                kind,
            });
        }

        info!(
            processed = report.count(),
            total = report.total,
            "decrypt-all finished"
        );
        Ok(report)
    }

    /// Summarize recipients and per-pattern file counts.
    pub fn status(&self) -> Status {
        let patterns = self
            .config
            .secrets
            .iter()
            .map(|pattern| {
                let plaintext = self
                    .matches(pattern)
                    .into_iter()
                    .filter(|p| !is_ciphertext(p))
                    .count();
                let encrypted = self
                    .matches(&format!("{}{}", pattern, constants::ENCRYPTED_EXT))
                    .len();
                PatternStatus {
                    pattern: pattern.clone(),
                    plaintext,
                    encrypted,
                }
            })
            .collect();

        Status {
            root: self.root.clone(),
            backend: self.config.backend,
            recipients: self.config.recipients.clone(),
            patterns,
        }
    }

    /// Files matching `pattern` under the root; errors are logged.
    fn matches(&self, pattern: &str) -> Vec<PathBuf> {
        self.expand(pattern, &mut Vec::new())
    }

    fn expand(&self, pattern: &str, skipped: &mut Vec<PathBuf>) -> Vec<PathBuf> {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            pattern
        );

        let paths = match glob::glob(&full) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(pattern, error = %e, "skipping invalid pattern");
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => found.push(path),
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e, "skipping unreadable match");
                    skipped.push(e.path().to_path_buf());
                }
            }
        }
        found
    }

    /// Expand every pattern (with `suffix` appended) into a deduplicated plan.
    fn plan(&self, suffix: Option<&str>, report: &mut BatchReport) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut plan = Vec::new();

        for pattern in &self.config.secrets {
            let pattern = match suffix {
                Some(suffix) => format!("{}{}", pattern, suffix),
                None => pattern.clone(),
            };
            for path in self.expand(&pattern, &mut report.skipped) {
                if suffix.is_none() && is_ciphertext(&path) {
                    trace!(path = %path.display(), "already encrypted");
                    continue;
                }
                if seen.insert(path.clone()) {
                    plan.push(path);
                }
            }
        }
        plan
    }
}

fn is_ciphertext(path: &Path) -> bool {
    path.to_string_lossy().ends_with(constants::ENCRYPTED_EXT)
}

fn seal(kind: FileKind, plaintext: &[u8], recipients: &[AgeRecipient]) -> Result<Vec<u8>> {
    match kind {
        FileKind::Env => {
            let text = std::str::from_utf8(plaintext).map_err(|_| {
                CipherError::EncryptionFailed("env file is not valid UTF-8".to_string())
            })?;
            let mut env = EnvFile::parse(text);
            env.encrypt_for_recipients(recipients)?;
            Ok(env.render().into_bytes())
        }
        FileKind::Binary => Age.encrypt(plaintext, recipients),
    }
}

fn open(kind: FileKind, sealed: &[u8], identity: &Identity) -> Result<Vec<u8>> {
    match kind {
        FileKind::Env => {
            let text = std::str::from_utf8(sealed).map_err(|_| {
                CipherError::CorruptEnvelope("env ciphertext is not valid UTF-8".to_string())
            })?;
            let mut env = EnvFile::parse(text);
            env.decrypt_with_identity(identity)?;
            Ok(env.render().into_bytes())
        }
        FileKind::Binary => Age.decrypt(sealed, identity),
    }
}
