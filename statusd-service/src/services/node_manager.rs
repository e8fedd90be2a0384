//! Node lifecycle management.
//!
//! This module defines the [`NodeManager`] trait, the mandatory collaborator of the [`crate::provider::ServiceProvider`]. A node manager starts and stops the node and hands out the [`RunningNode`] while one is up.
//!
//! [`LocalNodeManager`] is the in-process implementation used by the `statusd` binary. Starting it reserves the configured listen address, creates an in-memory [`KeyStore`] backend and, if enabled, a [`MessagingService`].

use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{
    metrics::METRICS_ID_NODE_RUNNING,
    services::{
        keystore::{AccountBackend, KeyStore, NativeAccountManager},
        messaging::MessagingService,
        node_config::NodeConfig,
    },
};

/// Dynamic trait object for the node manager.
///
/// Must be `Send + Sync` to be shared between concurrent RPC calls.
pub type NodeManagerService = Arc<dyn NodeManager + Send + Sync>;

/// Errors of the node lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// `start_node` was called while a node is running.
    #[error("node is already running")]
    AlreadyRunning,
    /// The operation needs a running node.
    #[error("node is not running")]
    NotRunning,
    /// The listen address cannot be bound.
    #[error("cannot bind node to {addr}: {source}")]
    Bind {
        /// The configured listen address.
        addr: SocketAddr,
        /// The error returned by the OS.
        #[source]
        source: std::io::Error,
    },
    /// The running node has no messaging service.
    #[error("messaging service is not available")]
    NoMessagingService,
}

/// Trait that implementations of node lifecycle managers must provide.
pub trait NodeManager {
    /// Starts a node with `config`.
    fn start_node(&self, config: NodeConfig) -> Result<(), NodeError>;

    /// Stops the running node.
    fn stop_node(&self) -> Result<(), NodeError>;

    /// Returns the running node.
    fn node(&self) -> Result<Arc<RunningNode>, NodeError>;

    /// Returns the messaging service of the running node.
    fn messaging_service(&self) -> Result<Arc<MessagingService>, NodeError>;

    /// Returns `true` iff a node is running.
    fn is_running(&self) -> bool {
        self.node().is_ok()
    }
}

/// Handle to a started node.
#[derive(Debug)]
pub struct RunningNode {
    config: NodeConfig,
    account_manager: Arc<NativeAccountManager>,
    messaging: Option<Arc<MessagingService>>,
}

impl RunningNode {
    /// Creates the handle of a node started with `config`.
    pub fn new(
        config: NodeConfig,
        account_manager: NativeAccountManager,
        messaging: Option<Arc<MessagingService>>,
    ) -> Self {
        Self {
            config,
            account_manager: Arc::new(account_manager),
            messaging,
        }
    }

    /// The config the node was started with.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The native account manager of the node.
    pub fn account_manager(&self) -> Arc<NativeAccountManager> {
        Arc::clone(&self.account_manager)
    }

    /// The messaging service, if the node runs one.
    pub fn messaging(&self) -> Option<Arc<MessagingService>> {
        self.messaging.clone()
    }
}

struct LocalNode {
    node: Arc<RunningNode>,
    listener: TcpListener,
}

/// In-process [`NodeManager`].
#[derive(Default)]
pub struct LocalNodeManager {
    current: Mutex<Option<LocalNode>>,
}

impl LocalNodeManager {
    /// Creates a manager with no node running.
    pub fn new() -> Self {
        Self::default()
    }

    /// The address the running node is bound to.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.current
            .lock()
            .as_ref()
            .and_then(|local| local.listener.local_addr().ok())
    }
}

impl NodeManager for LocalNodeManager {
    fn start_node(&self, config: NodeConfig) -> Result<(), NodeError> {
        let mut current = self.current.lock();
        if current.is_some() {
            return Err(NodeError::AlreadyRunning);
        }
        let addr = config.listen_addr;
        let listener = TcpListener::bind(addr).map_err(|source| NodeError::Bind { addr, source })?;
        let key_store: Arc<dyn AccountBackend> = Arc::new(KeyStore::default());
        let messaging = config
            .messaging_config
            .enabled
            .then(|| Arc::new(MessagingService::default()));
        tracing::info!(
            "started node {} (network {}) on {}",
            config.name,
            config.network_id,
            listener
                .local_addr()
                .map(|x| x.to_string())
                .unwrap_or(String::from("invalid addr"))
        );
        let node = RunningNode::new(config, NativeAccountManager::new(vec![key_store]), messaging);
        *current = Some(LocalNode {
            node: Arc::new(node),
            listener,
        });
        ::metrics::gauge!(METRICS_ID_NODE_RUNNING).set(1.0);
        Ok(())
    }

    fn stop_node(&self) -> Result<(), NodeError> {
        let local = self.current.lock().take().ok_or(NodeError::NotRunning)?;
        if let Some(messaging) = local.node.messaging() {
            messaging.shutdown();
        }
        tracing::info!("stopped node {}", local.node.config().name);
        ::metrics::gauge!(METRICS_ID_NODE_RUNNING).set(0.0);
        Ok(())
    }

    fn node(&self) -> Result<Arc<RunningNode>, NodeError> {
        self.current
            .lock()
            .as_ref()
            .map(|local| Arc::clone(&local.node))
            .ok_or(NodeError::NotRunning)
    }

    fn messaging_service(&self) -> Result<Arc<MessagingService>, NodeError> {
        self.node()?.messaging().ok_or(NodeError::NoMessagingService)
    }
}
