//! The backend the `Status` RPC service forwards to.
//!
//! [`StatusBackend`] owns the shared [`ServiceProvider`] and implements the node and account lifecycle on top of it. Starting or stopping a node resets the provider, so no handle of the previous node survives.

use std::sync::Arc;

use crate::{
    provider::ServiceProvider,
    services::{
        account::{AccountError, CreatedAccount, SelectedAccount},
        node_config::NodeConfig,
        node_manager::{LocalNodeManager, NodeError, NodeManagerService},
    },
};

/// Node and account lifecycle on top of a [`ServiceProvider`].
#[derive(Debug, Clone)]
pub struct StatusBackend {
    provider: Arc<ServiceProvider>,
}

impl Default for StatusBackend {
    fn default() -> Self {
        Self::with_node_manager(Arc::new(LocalNodeManager::new()))
    }
}

impl StatusBackend {
    /// Creates a backend around `provider`.
    pub fn new(provider: Arc<ServiceProvider>) -> Self {
        Self { provider }
    }

    /// Creates a backend with a fresh provider around `node_manager`.
    pub fn with_node_manager(node_manager: NodeManagerService) -> Self {
        Self::new(Arc::new(ServiceProvider::new(node_manager)))
    }

    /// The provider of this backend.
    pub fn provider(&self) -> &Arc<ServiceProvider> {
        &self.provider
    }

    /// Starts a node with `config` and resets the provider.
    pub fn start_node(&self, config: NodeConfig) -> Result<(), NodeError> {
        self.provider.node_manager().start_node(config)?;
        self.provider.reset();
        Ok(())
    }

    /// Stops the running node and resets the provider.
    pub fn stop_node(&self) -> Result<(), NodeError> {
        self.provider.node_manager().stop_node()?;
        self.provider.reset();
        Ok(())
    }

    /// Creates an account protected by `password`.
    pub fn create_account(&self, password: &str) -> Result<CreatedAccount, AccountError> {
        self.provider.account_manager().create_account(password)
    }

    /// Selects the account `address` after unlocking it with `password`.
    pub fn select_account(
        &self,
        address: &str,
        password: &str,
    ) -> Result<SelectedAccount, AccountError> {
        self.provider
            .account_manager()
            .select_account(address, password)
    }

    /// Clears all messaging identities and the selected account.
    pub fn logout(&self) -> Result<(), AccountError> {
        let cleared = self.provider.messaging()?.clear_identities()?;
        tracing::debug!("cleared {cleared} identities on logout");
        self.provider.account_manager().logout();
        Ok(())
    }
}
