#![deny(missing_docs)]
//! Core type definitions shared by the statusd service and its clients.
//!
//! This crate groups together the argument and reply structures of the
//! control-plane RPC and the envelope they travel in. It provides:
//!
//! * The per-method argument/reply carriers (see [`api`] module). Field names
//!   serialize in PascalCase so Go `net/rpc/jsonrpc` clients can talk to the
//!   service unchanged.
//! * The JSON-RPC 1.0 style request/response envelope and the closed set of
//!   method names the service dispatches on (see [`rpc`] module).

pub mod api;
pub mod rpc;

pub use rpc::{RpcMethod, RpcRequest, RpcResponse};
