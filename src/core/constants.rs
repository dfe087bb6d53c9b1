//! Constants used throughout podx.
//!
//! Centralizes magic strings and configuration values.

/// Project configuration file name (.podx.toml).
pub const CONFIG_FILE: &str = ".podx.toml";

/// Banner written above the serialized project configuration.
pub const CONFIG_HEADER: &str = "# PODX project configuration\n# Commit this file together with the *.podx ciphertexts.\n\n";

/// Extension appended to project ciphertext files.
pub const ENCRYPTED_EXT: &str = ".podx";

/// Extension appended by single-file password encryption.
pub const PASSWORD_EXT: &str = ".enc";

/// Suffix used when a decrypt output cannot be derived from the input name.
pub const DECRYPTED_EXT: &str = ".dec";

/// Default secret pattern for new projects.
pub const DEFAULT_SECRET_PATTERN: &str = ".env";

/// Recipient name given to the local public key on `init`.
pub const DEFAULT_RECIPIENT_NAME: &str = "Owner";

/// Current configuration schema version.
pub const CONFIG_VERSION: u32 = 1;

/// Key storage directory relative to HOME (~/.config/podx).
pub const KEY_DIR: &str = ".config/podx";

/// Append-only private key history inside [`KEY_DIR`].
pub const KEYS_FILE: &str = "age-keys.txt";

/// Directory holding public recipient files inside [`KEY_DIR`].
pub const RECIPIENTS_DIR: &str = "age-recipients";

/// Default public key file inside [`RECIPIENTS_DIR`].
pub const DEFAULT_RECIPIENT_FILE: &str = "default.txt";

/// Comment marker carrying the Argon2id salt of a password-encrypted .env.
pub const SALT_MARKER: &str = "PODX_SALT";

/// Salt marker written by older ironvault releases; accepted on read only.
pub const LEGACY_SALT_MARKER: &str = "IRONVAULT_SALT";

/// Header line written before secret patterns in `.gitignore`.
pub const GITIGNORE_HEADER: &str = "# podx: decrypted secrets (do not commit)";

/// Gitignore file name.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// File mode for decrypted plaintext and private keys.
pub const PRIVATE_MODE: u32 = 0o600;

/// File mode for ciphertext, config and public key artifacts.
pub const PUBLIC_MODE: u32 = 0o644;

/// Directory mode for the key directory.
pub const KEY_DIR_MODE: u32 = 0o700;
