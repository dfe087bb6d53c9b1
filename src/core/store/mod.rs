//! Local identity storage.
//!
//! The orchestrator never reaches for key files directly; it is handed a
//! [`KeyStore`]. The binary uses [`Filesystem`], tests use [`Memory`].
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `KeyStore` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use crate::core::cipher::Identity;
use crate::core::types::PublicKey;
use crate::error::Result;

mod fs;
mod memory;

pub use fs::Filesystem;
pub use memory::Memory;

/// Key storage trait.
pub trait KeyStore {
    /// Load the current private identity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoIdentity` if no identity has been generated.
    fn load_identity(&self) -> Result<Identity>;

    /// Load the default public key of the local user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoPublicKey` if none is stored.
    fn load_public_key(&self) -> Result<PublicKey>;

    /// Generate a new identity, persist it as the current one, and return
    /// both halves.
    fn generate(&self) -> Result<(PublicKey, Identity)>;

    /// Whether an identity is available.
    fn has_identity(&self) -> bool {
        self.load_identity().is_ok()
    }
}
