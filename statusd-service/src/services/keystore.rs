//! This module provides the [`NativeAccountManager`] of a running node and the [`KeyStore`] backend it is usually configured with.
//!
//! A native account manager aggregates [`AccountBackend`]s of different [`BackendKind`]s. Callers that need the keystore ask for the backends of kind [`BackendKind::KeyStore`] and downcast the first one.
//!
//! The keystore keeps keys in memory only.

use std::{any::Any, collections::HashMap, fmt, sync::Arc};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use parking_lot::RwLock;
use secrecy::{ExposeSecret as _, SecretString};
use subtle::ConstantTimeEq as _;

/// The kinds of account backends a node may be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Password protected keys managed by the node.
    KeyStore,
    /// Keys held outside of the node (e.g. a hardware wallet).
    External,
}

/// A source of accounts.
pub trait AccountBackend: Send + Sync {
    /// The kind of this backend.
    fn kind(&self) -> BackendKind;

    /// The accounts this backend holds.
    fn accounts(&self) -> Vec<Address>;

    /// Upcast used to recover the concrete backend type.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// The account manager of a running node.
pub struct NativeAccountManager {
    backends: Vec<Arc<dyn AccountBackend>>,
}

impl NativeAccountManager {
    /// Creates an account manager over the given backends.
    pub fn new(backends: Vec<Arc<dyn AccountBackend>>) -> Self {
        Self { backends }
    }

    /// Returns all backends of `kind` in registration order.
    pub fn backends(&self, kind: BackendKind) -> Vec<Arc<dyn AccountBackend>> {
        self.backends
            .iter()
            .filter(|backend| backend.kind() == kind)
            .cloned()
            .collect()
    }

    /// Returns the accounts of all backends.
    pub fn accounts(&self) -> Vec<Address> {
        self.backends
            .iter()
            .flat_map(|backend| backend.accounts())
            .collect()
    }
}

impl fmt::Debug for NativeAccountManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeAccountManager")
            .field(
                "backends",
                &self
                    .backends
                    .iter()
                    .map(|backend| backend.kind())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Errors returned by the [`KeyStore`].
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    /// A key for this address is already stored.
    #[error("account {0} already exists")]
    AlreadyExists(Address),
    /// There is no key for this address.
    #[error("no key for address {0}")]
    UnknownAddress(Address),
    /// The password does not match the stored key.
    #[error("could not decrypt key with given password")]
    InvalidPassword,
}

struct StoredKey {
    signer: PrivateKeySigner,
    password: SecretString,
}

/// Password protected keys, indexed by address.
#[derive(Default)]
pub struct KeyStore {
    keys: RwLock<HashMap<Address, StoredKey>>,
}

impl KeyStore {
    /// Stores `signer` under its address, protected by `password`.
    pub fn import(
        &self,
        signer: PrivateKeySigner,
        password: &str,
    ) -> Result<Address, KeyStoreError> {
        let address = signer.address();
        let mut keys = self.keys.write();
        if keys.contains_key(&address) {
            return Err(KeyStoreError::AlreadyExists(address));
        }
        keys.insert(
            address,
            StoredKey {
                signer,
                password: SecretString::from(password.to_owned()),
            },
        );
        tracing::debug!("imported account {address}");
        Ok(address)
    }

    /// Returns the signer of `address` if `password` matches.
    pub fn unlock(
        &self,
        address: Address,
        password: &str,
    ) -> Result<PrivateKeySigner, KeyStoreError> {
        let keys = self.keys.read();
        let stored = keys
            .get(&address)
            .ok_or(KeyStoreError::UnknownAddress(address))?;
        let matches: bool = stored
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();
        if !matches {
            return Err(KeyStoreError::InvalidPassword);
        }
        Ok(stored.signer.clone())
    }

    /// Returns `true` iff a key for `address` is stored.
    pub fn has_address(&self, address: Address) -> bool {
        self.keys.read().contains_key(&address)
    }

    /// Returns the amount of stored keys.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Returns `true` iff the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl AccountBackend for KeyStore {
    fn kind(&self) -> BackendKind {
        BackendKind::KeyStore
    }

    fn accounts(&self) -> Vec<Address> {
        let mut accounts = self.keys.read().keys().copied().collect::<Vec<_>>();
        accounts.sort();
        accounts
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("accounts", &self.len())
            .finish()
    }
}
