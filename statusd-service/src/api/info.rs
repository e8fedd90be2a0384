//! Health and version endpoints.
//!
//! - `/health` – `200 healthy` once the service finished booting, `503 starting` before
//! - `/version` – cargo package name, version and git hash of the build
//!
//! Both carry `Cache-Control: no-cache`.

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use nodes_common::StartedServices;
use tower_http::set_header::SetResponseHeaderLayer;

/// Create a router containing the health and version endpoints.
pub(crate) fn routes(started_services: StartedServices) -> Router {
    Router::new()
        .route("/health", get(move || health(started_services)))
        .route("/version", get(version))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
}

/// Booting includes the node autostart, if one is configured.
async fn health(started_services: StartedServices) -> impl IntoResponse {
    if started_services.all_started() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "starting")
    }
}

async fn version() -> impl IntoResponse {
    (StatusCode::OK, nodes_common::version_info!())
}
