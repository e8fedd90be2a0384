//! The secure messaging service of a running node.
//!
//! The service tracks the identities (hex encoded public keys) messages are decrypted for. Selecting an account makes its key the only identity; logging out clears all of them.
//!
//! A service handed out before its node stopped is shut down and refuses to operate.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::RwLock;

/// Errors returned by the [`MessagingService`].
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// The identity is not a `0x` prefixed hex string.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
    /// The node this service belonged to was stopped.
    #[error("messaging service is shut down")]
    ShutDown,
}

/// Identities of the messaging subsystem.
#[derive(Debug)]
pub struct MessagingService {
    identities: RwLock<BTreeSet<String>>,
    running: AtomicBool,
}

impl Default for MessagingService {
    fn default() -> Self {
        Self {
            identities: RwLock::default(),
            running: AtomicBool::new(true),
        }
    }
}

impl MessagingService {
    /// Registers `public_key` as identity. Registering twice is a no-op.
    pub fn add_identity(&self, public_key: &str) -> Result<(), MessagingError> {
        self.ensure_running()?;
        let identity = Self::parse_identity(public_key)?;
        self.identities.write().insert(identity);
        Ok(())
    }

    /// Makes `public_key` the only registered identity.
    pub fn select_identity(&self, public_key: &str) -> Result<(), MessagingError> {
        self.ensure_running()?;
        let identity = Self::parse_identity(public_key)?;
        let mut identities = self.identities.write();
        identities.clear();
        identities.insert(identity);
        Ok(())
    }

    /// Returns `true` iff `public_key` is a registered identity.
    pub fn has_identity(&self, public_key: &str) -> bool {
        self.identities
            .read()
            .contains(&public_key.to_ascii_lowercase())
    }

    /// Returns all registered identities, sorted.
    pub fn identities(&self) -> Vec<String> {
        self.identities.read().iter().cloned().collect()
    }

    /// Removes all identities and returns how many were registered.
    pub fn clear_identities(&self) -> Result<usize, MessagingError> {
        self.ensure_running()?;
        let removed = std::mem::take(&mut *self.identities.write());
        tracing::debug!("cleared {} messaging identities", removed.len());
        Ok(removed.len())
    }

    /// Shuts the service down. All identities are dropped.
    pub(crate) fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.identities.write().clear();
    }

    fn parse_identity(public_key: &str) -> Result<String, MessagingError> {
        let is_hex = public_key
            .strip_prefix("0x")
            .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if is_hex {
            Ok(public_key.to_ascii_lowercase())
        } else {
            Err(MessagingError::InvalidIdentity(public_key.to_owned()))
        }
    }

    fn ensure_running(&self) -> Result<(), MessagingError> {
        if self.running.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MessagingError::ShutDown)
        }
    }
}
