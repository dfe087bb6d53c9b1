//! In-memory key storage for tests and embedding.

use std::cell::RefCell;

use super::KeyStore;
use crate::core::cipher::{self, Identity};
use crate::core::types::PublicKey;
use crate::error::{Result, StoreError};

/// Identity history kept in memory; the last entry is current.
#[derive(Default)]
pub struct Memory {
    history: RefCell<Vec<String>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing identity.
    pub fn with_identity(identity: &Identity) -> Self {
        let (secret, _) = cipher::encode_identity(identity);
        Self {
            history: RefCell::new(vec![secret]),
        }
    }

    fn current(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }
}

impl KeyStore for Memory {
    fn load_identity(&self) -> Result<Identity> {
        let secret = self
            .current()
            .ok_or_else(|| StoreError::NoIdentity("memory".to_string()))?;
        cipher::parse_identity(&secret)
    }

    fn load_public_key(&self) -> Result<PublicKey> {
        self.load_identity()
            .map(|identity| identity.to_public().to_string())
            .map_err(|_| StoreError::NoPublicKey("memory".to_string()).into())
    }

    fn generate(&self) -> Result<(PublicKey, Identity)> {
        let identity = cipher::generate_identity();
        let (secret, public) = cipher::encode_identity(&identity);
        self.history.borrow_mut().push(secret);
        Ok((public, identity))
    }
}
