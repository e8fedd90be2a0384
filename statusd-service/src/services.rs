//! The subsystem managers a statusd node is operated with.
//!
//! The [`crate::provider::ServiceProvider`] hands these out lazily. Most of them are thin in-process implementations so the control-plane can run and be tested on its own.
//!
//! # Services overview
//!
//! - [`node_config`] – parsing and validation of the JSON node configuration.
//! - [`node_manager`] – the node lifecycle manager ([`node_manager::NodeManager`]) and its in-process implementation.
//! - [`keystore`] – the native account manager with its keystore backends.
//! - [`account`] – the higher-level account manager (create, select, logout).
//! - [`messaging`] – the secure messaging service and its identities.
//! - [`jail`] – the sandbox cell registry.
//! - [`tx_queue`] – the queue of pending transactions.

pub mod account;
pub mod jail;
pub mod keystore;
pub mod messaging;
pub mod node_config;
pub mod node_manager;
pub mod tx_queue;
