//! Podx - encrypt secret files so they can be committed to version control.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Initialize a project (.podx.toml)
//! │   ├── lock          # encrypt-all / decrypt-all
//! │   ├── file          # Single-file password encryption
//! │   ├── env           # Format-preserving .env encryption
//! │   └── keygen        # age identity generation
//! └── core/             # Core library components
//!     ├── cipher/       # Encryption primitives
//!     │   ├── algorithm # AES-256-GCM / ChaCha20-Poly1305
//!     │   ├── kdf       # Argon2id password derivation
//!     │   ├── envelope  # salt ∥ tag ∥ ciphertext container
//!     │   ├── age       # Multi-recipient x25519 envelopes
//!     │   └── field     # Per-value sealers for .env cells
//!     ├── env           # .env parsing and per-field codec
//!     ├── config        # .podx.toml model
//!     ├── store/        # Identity storage backends
//!     ├── file          # Single-file password flows
//!     └── project       # Batch orchestration over secret patterns
//! ```
//!
//! # Features
//!
//! - Password envelopes with Argon2id and a choice of two AEADs
//! - Team encryption for many age recipients
//! - `.env` files keep comments, blank lines and ordering; only values change
//! - Plaintext is removed once ciphertext is written

pub mod cli;
pub mod core;
pub mod error;
