#![deny(missing_docs)]
//! This crate provides the control-plane of a statusd node.
//!
//! At its core sits the [`ServiceProvider`], a lazy and resettable registry of the subsystem managers a node is operated with: the node itself, its native account manager and keystore, the messaging service, the account manager, the jail and the transaction queue. The provider is built around one mandatory collaborator, a [`NodeManagerService`]; everything else is derived from it on first access and dropped on [`ServiceProvider::reset`].
//!
//! On top of the provider, the [`StatusBackend`] implements the node and account lifecycle, and the [`api`] module exposes it together with host introspection as two JSON-RPC services (`Admin` and `Status`) on a single `axum` endpoint.
//!
//! The main entry point for hosting applications is [`init`]. It wires the provider, backend and services together, optionally starts a node from a config file and returns the `axum::Router` to serve:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use clap::Parser as _;
//! # use statusd_service::{config::StatusdConfig, services::node_manager::LocalNodeManager};
//! # fn main() -> eyre::Result<()> {
//! let config = StatusdConfig::parse();
//! let (router, _backend) = statusd_service::init(
//!     &config,
//!     Arc::new(LocalNodeManager::new()),
//!     statusd_service::StartedServices::new(),
//! )?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::Ordering;

use axum::Router;
use eyre::Context as _;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{
    api::{admin::AdminService, status::StatusService},
    config::StatusdConfig,
    services::node_config::NodeConfig,
};

pub mod api;
pub mod backend;
pub mod config;
pub mod metrics;
pub mod provider;
pub mod services;

pub use backend::StatusBackend;
pub use nodes_common::StartedServices;
pub use provider::ServiceProvider;
pub use services::node_manager::NodeManagerService;

/// Initializes the statusd service.
///
/// 1. Creates the [`ServiceProvider`] around `node_manager` and hands it the FCM server key, if configured.
/// 2. Starts a node from [`StatusdConfig::node_config`], if set.
/// 3. Sets up the `Admin` and `Status` services and the routes serving them.
///
/// The boot is registered at `started_services`, so `/health` reports `healthy` only after the node autostart.
pub fn init(
    config: &StatusdConfig,
    node_manager: NodeManagerService,
    started_services: StartedServices,
) -> eyre::Result<(Router, StatusBackend)> {
    let booted = started_services.new_service();

    tracing::info!("init service provider..");
    let backend = StatusBackend::with_node_manager(node_manager);
    if let Some(fcm_server_key) = &config.fcm_server_key {
        backend
            .provider()
            .set_fcm_server_key(SecretString::from(fcm_server_key.expose_secret().to_owned()));
    }

    if let Some(path) = &config.node_config {
        tracing::info!("starting node from {}..", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("while reading node config {}", path.display()))?;
        let node_config = NodeConfig::load(&raw).context("while parsing node config")?;
        backend
            .start_node(node_config)
            .context("while starting node")?;
    }

    let router = api::routes(
        AdminService,
        StatusService::with_backend(backend.clone()),
        started_services,
    );
    booted.store(true, Ordering::Relaxed);
    Ok((router, backend))
}
