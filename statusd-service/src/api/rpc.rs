//! The JSON-RPC endpoint.
//!
//! - `/rpc` – dispatches a [`RpcRequest`] to the `Admin` or `Status` service
//!
//! Service calls are synchronous and run on the blocking thread pool. Errors are reported in the `error` field of the [`RpcResponse`], the HTTP status is `200 OK` for every request that parsed.

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use statusd_types::{RpcMethod, RpcRequest, RpcResponse};
use tracing::instrument;

use crate::{
    api::{admin::AdminService, errors::Error, status::StatusService},
    metrics::{METRICS_ID_RPC_DURATION, METRICS_ID_RPC_ERRORS, METRICS_ID_RPC_REQUESTS},
};

/// Routes requests to the method of the service they name.
#[derive(Debug, Clone, Default)]
pub struct RpcDispatcher {
    admin: AdminService,
    status: StatusService,
}

impl RpcDispatcher {
    /// Creates a dispatcher over the two services.
    pub fn new(admin: AdminService, status: StatusService) -> Self {
        Self { admin, status }
    }

    /// The `Status` service.
    pub fn status(&self) -> &StatusService {
        &self.status
    }

    /// Calls the method named by `request` and returns its serialized reply.
    pub fn dispatch(&self, request: &RpcRequest) -> Result<Value, Error> {
        match request.method.parse::<RpcMethod>()? {
            RpcMethod::GetAddresses => reply(self.admin.get_addresses(args(request)?)?),
            RpcMethod::StartNode => reply(self.status.start_node(args(request)?)?),
            RpcMethod::StopNode => reply(self.status.stop_node(args(request)?)?),
            RpcMethod::CreateAccount => reply(self.status.create_account(args(request)?)?),
            RpcMethod::SelectAccount => reply(self.status.select_account(args(request)?)?),
            RpcMethod::Logout => reply(self.status.logout(args(request)?)?),
        }
    }
}

fn args<Args: DeserializeOwned>(request: &RpcRequest) -> Result<Args, Error> {
    request.args().map_err(Error::InvalidParams)
}

fn reply<Reply: Serialize>(reply: Reply) -> Result<Value, Error> {
    serde_json::to_value(reply).map_err(Error::Reply)
}

/// Create a router containing the RPC endpoint.
pub(crate) fn routes(dispatcher: RpcDispatcher) -> Router {
    Router::new()
        .route("/rpc", post(rpc))
        .with_state(dispatcher)
}

#[instrument(level = "debug", skip_all, fields(method = %request.method))]
async fn rpc(
    State(dispatcher): State<RpcDispatcher>,
    Json(request): Json<RpcRequest>,
) -> Json<RpcResponse> {
    let start = Instant::now();
    let method = request
        .method
        .parse::<RpcMethod>()
        .map(|method| method.as_str())
        .unwrap_or("unknown");
    ::metrics::counter!(METRICS_ID_RPC_REQUESTS, "method" => method).increment(1);

    let id = request.id.clone();
    let result = tokio::task::spawn_blocking(move || dispatcher.dispatch(&request)).await;
    let response = match result {
        Ok(Ok(result)) => RpcResponse::success(id, result),
        Ok(Err(err)) => {
            tracing::debug!("{method} failed: {err:?}");
            ::metrics::counter!(METRICS_ID_RPC_ERRORS, "method" => method).increment(1);
            RpcResponse::failure(id, err.to_string())
        }
        Err(err) => {
            tracing::error!("{method} did not finish: {err:?}");
            ::metrics::counter!(METRICS_ID_RPC_ERRORS, "method" => method).increment(1);
            RpcResponse::failure(id, "internal error")
        }
    };
    ::metrics::histogram!(METRICS_ID_RPC_DURATION).record(start.elapsed().as_millis() as f64);
    Json(response)
}
