//! API module for the statusd service.
//!
//! This module defines all HTTP endpoints of the control-plane and organizes them into submodules:
//!
//! - [`admin`] – the `Admin` RPC service (host introspection).
//! - [`status`] – the `Status` RPC service (node and account lifecycle).
//! - [`rpc`] – the JSON-RPC endpoint (`/rpc`) dispatching to the two services.
//! - [`errors`] – the errors RPC methods report.
//! - [`info`] – health and version endpoints (`/health`, `/version`).

use axum::Router;
use nodes_common::StartedServices;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod errors;
pub(crate) mod info;
pub mod rpc;
pub mod status;

/// Builds the main API router of the statusd service.
///
/// This function sets up:
///
/// - The JSON-RPC endpoint from [`rpc`], serving the given services.
/// - The health and version endpoints from [`info`].
/// - An HTTP trace layer via [`TraceLayer`].
pub fn routes(
    admin: admin::AdminService,
    status: status::StatusService,
    started_services: StartedServices,
) -> Router {
    Router::new()
        .merge(rpc::routes(rpc::RpcDispatcher::new(admin, status)))
        .merge(info::routes(started_services))
        .layer(TraceLayer::new_for_http())
}
