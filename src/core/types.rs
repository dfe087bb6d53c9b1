//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An age public key string (starts with "age1...").
///
/// Used for encrypting secrets for specific recipients.
pub type PublicKey = String;

/// A recipient display name.
pub type MemberName = String;

/// A glob pattern relative to the project root (e.g. `.env`, `config/*.pem`).
pub type SecretPattern = String;
