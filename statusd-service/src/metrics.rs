//! Metrics definitions for the statusd service.
//!
//! This module defines all metrics keys used by the service and
//! provides a helper [`describe_metrics`] to set metadata for
//! each metric using the `metrics` crate.

/// Metrics key for counting materializations of lazy provider handles. Labeled with `handle`.
pub const METRICS_ID_PROVIDER_HANDLE_INIT: &str = "statusd.provider.handle.init";
/// Metrics key for counting provider resets.
pub const METRICS_ID_PROVIDER_RESET: &str = "statusd.provider.reset";
/// Metrics key for counting RPC requests. Labeled with `method`.
pub const METRICS_ID_RPC_REQUESTS: &str = "statusd.rpc.requests";
/// Metrics key for counting failed RPC requests. Labeled with `method`.
pub const METRICS_ID_RPC_ERRORS: &str = "statusd.rpc.errors";
/// Metrics key for the duration of RPC requests
pub const METRICS_ID_RPC_DURATION: &str = "statusd.rpc.duration";
/// Metrics key for whether a node is running (1) or not (0).
pub const METRICS_ID_NODE_RUNNING: &str = "statusd.node.running";

/// Describe all metrics used by the service.
///
/// This calls the `describe_*` functions from the `metrics` crate to set metadata on the different metrics.
pub fn describe_metrics() {
    metrics::describe_counter!(
        METRICS_ID_PROVIDER_HANDLE_INIT,
        metrics::Unit::Count,
        "Number of lazily constructed provider handles"
    );

    metrics::describe_counter!(
        METRICS_ID_PROVIDER_RESET,
        metrics::Unit::Count,
        "Number of service provider resets"
    );

    metrics::describe_counter!(
        METRICS_ID_RPC_REQUESTS,
        metrics::Unit::Count,
        "Number of RPC requests"
    );

    metrics::describe_counter!(
        METRICS_ID_RPC_ERRORS,
        metrics::Unit::Count,
        "Number of RPC requests that returned an error"
    );

    metrics::describe_histogram!(
        METRICS_ID_RPC_DURATION,
        metrics::Unit::Milliseconds,
        "Duration of RPC requests"
    );

    metrics::describe_gauge!(
        METRICS_ID_NODE_RUNNING,
        metrics::Unit::Count,
        "Whether a node is currently running"
    );
}
