//! The service provider: a lazy, memoized and resettable registry of the subsystem managers of a node.
//!
//! The provider is built around the one mandatory collaborator, the [`NodeManagerService`]. Every other manager is derived from it on first access and cached until [`ServiceProvider::reset`] is called. Resets happen whenever a node is started or stopped (see [`crate::backend::StatusBackend`]), so handles that were bound to a previous node never leak into the next one.
//!
//! # Concurrency
//!
//! All accessors are safe to call concurrently. Each cached handle sits behind its own lock which is held during construction, so concurrent first accesses construct a handle exactly once. A provider-wide reset guard is held shared by accessors and exclusively by [`ServiceProvider::reset`], which makes a reset atomic with respect to every accessor: an accessor either returns the handle cached before the reset or one constructed after it.
//!
//! Failed constructions are never cached; the next call tries again.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    metrics::METRICS_ID_PROVIDER_RESET,
    provider::lazy_handle::LazyHandle,
    services::{
        account::AccountManager,
        jail::JailManager,
        keystore::{BackendKind, KeyStore, NativeAccountManager},
        messaging::MessagingService,
        node_manager::{NodeError, NodeManagerService, RunningNode},
        tx_queue::TxQueueManager,
    },
};

mod lazy_handle;

/// Errors returned by the [`ServiceProvider`] when resolving the account keystore.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The native account manager of the node cannot be obtained.
    #[error("could not retrieve account manager: {0}")]
    InvalidAccountManager(#[source] NodeError),
    /// The node has no keystore backend.
    #[error("account keystore is not set")]
    KeyStoreMissing,
}

/// Lazy registry of the subsystem managers of a node.
pub struct ServiceProvider {
    node_manager: NodeManagerService,
    fcm_server_key: RwLock<Option<SecretString>>,
    reset_guard: RwLock<()>,
    native_account_manager: LazyHandle<NativeAccountManager>,
    messaging: LazyHandle<MessagingService>,
    account_manager: LazyHandle<AccountManager>,
    jail_manager: LazyHandle<JailManager>,
    tx_queue_manager: LazyHandle<TxQueueManager>,
}

impl ServiceProvider {
    /// Creates a provider around `node_manager`. No handle is materialized yet.
    pub fn new(node_manager: NodeManagerService) -> Self {
        Self {
            node_manager,
            fcm_server_key: RwLock::default(),
            reset_guard: RwLock::default(),
            native_account_manager: LazyHandle::new("native_account_manager"),
            messaging: LazyHandle::new("messaging"),
            account_manager: LazyHandle::new("account_manager"),
            jail_manager: LazyHandle::new("jail_manager"),
            tx_queue_manager: LazyHandle::new("tx_queue_manager"),
        }
    }

    /// Stores the FCM server key. Survives resets.
    pub fn set_fcm_server_key(&self, key: SecretString) {
        *self.fcm_server_key.write() = Some(key);
    }

    /// The FCM server key, if one was set.
    pub fn fcm_server_key(&self) -> Option<SecretString> {
        self.fcm_server_key
            .read()
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_owned()))
    }

    /// The node lifecycle manager. Never changes over the lifetime of the provider.
    pub fn node_manager(&self) -> &NodeManagerService {
        &self.node_manager
    }

    /// The running node. Not cached.
    pub fn node(&self) -> Result<Arc<RunningNode>, NodeError> {
        self.node_manager.node()
    }

    /// The native account manager of the running node.
    pub fn native_account_manager(&self) -> Result<Arc<NativeAccountManager>, NodeError> {
        let _guard = self.reset_guard.read_recursive();
        self.native_account_manager
            .get_or_try_init(|| Ok(self.node()?.account_manager()))
    }

    /// The keystore backend of the native account manager. Not cached.
    ///
    /// Fails with [`ProviderError::KeyStoreMissing`] if the node has no backend of kind [`BackendKind::KeyStore`] or the first one is not a [`KeyStore`].
    pub fn account_key_store(&self) -> Result<Arc<KeyStore>, ProviderError> {
        let native_account_manager = self
            .native_account_manager()
            .map_err(ProviderError::InvalidAccountManager)?;
        native_account_manager
            .backends(BackendKind::KeyStore)
            .into_iter()
            .next()
            .and_then(|backend| backend.into_any().downcast::<KeyStore>().ok())
            .ok_or(ProviderError::KeyStoreMissing)
    }

    /// The messaging service of the running node.
    pub fn messaging(&self) -> Result<Arc<MessagingService>, NodeError> {
        let _guard = self.reset_guard.read_recursive();
        self.messaging
            .get_or_try_init(|| self.node_manager.messaging_service())
    }

    /// The account manager. It refers back to this provider without keeping it alive.
    pub fn account_manager(self: &Arc<Self>) -> Arc<AccountManager> {
        let _guard = self.reset_guard.read_recursive();
        self.account_manager
            .get_or_init(|| Arc::new(AccountManager::new(Arc::downgrade(self))))
    }

    /// The jail manager.
    pub fn jail_manager(&self) -> Arc<JailManager> {
        let _guard = self.reset_guard.read_recursive();
        self.jail_manager
            .get_or_init(|| Arc::new(JailManager::new(Arc::clone(&self.node_manager))))
    }

    /// The transaction queue manager, sending from the account selected at [`Self::account_manager`].
    pub fn tx_queue_manager(self: &Arc<Self>) -> Arc<TxQueueManager> {
        let _guard = self.reset_guard.read_recursive();
        self.tx_queue_manager.get_or_init(|| {
            Arc::new(TxQueueManager::new(
                Arc::clone(&self.node_manager),
                self.account_manager(),
            ))
        })
    }

    /// Drops all cached handles. The node manager and the FCM server key are kept.
    pub fn reset(&self) {
        let _guard = self.reset_guard.write();
        self.native_account_manager.clear();
        self.messaging.clear();
        self.account_manager.clear();
        self.jail_manager.clear();
        self.tx_queue_manager.clear();
        tracing::info!("service provider reset");
        ::metrics::counter!(METRICS_ID_PROVIDER_RESET).increment(1);
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("node_running", &self.node_manager.is_running())
            .field("fcm_server_key", &self.fcm_server_key.read().is_some())
            .field("native_account_manager", &self.native_account_manager)
            .field("messaging", &self.messaging)
            .field("account_manager", &self.account_manager)
            .field("jail_manager", &self.jail_manager)
            .field("tx_queue_manager", &self.tx_queue_manager)
            .finish()
    }
}
