//! statusd Binary
//!
//! This is the main entry point for the statusd control-plane.
//! It initializes tracing and metrics, and serves the `Admin` and `Status`
//! RPC services with configuration from command-line arguments or environment variables.

use std::{
    process::ExitCode,
    sync::{Arc, atomic::Ordering},
};

use clap::Parser;
use eyre::Context as _;
use statusd_service::{
    StartedServices, config::StatusdConfig, services::node_manager::LocalNodeManager,
};

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    nodes_observability::install_tracing("statusd=trace,statusd_service=debug,info");
    statusd_service::metrics::describe_metrics();
    tracing::info!("{}", nodes_common::version_info!());

    let config = StatusdConfig::parse();
    match start_service(config, nodes_common::default_shutdown_signal()).await {
        Ok(true) => {
            tracing::info!("good night!");
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(err) => {
            // we don't want to double print the error therefore we just return FAILURE
            tracing::error!("{err:?}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Serves the control-plane until `shutdown_signal` fires. Returns whether the shutdown was graceful.
async fn start_service(
    config: StatusdConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> eyre::Result<bool> {
    tracing::info!("starting statusd with config: {config:#?}");
    let (cancellation_token, is_graceful_shutdown) =
        nodes_common::spawn_shutdown_task(shutdown_signal);

    let (router, backend) = statusd_service::init(
        &config,
        Arc::new(LocalNodeManager::new()),
        StartedServices::new(),
    )
    .context("while initiating statusd service")?;

    tracing::info!("binding to {}", config.bind_addr);
    let tcp_listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("while binding tcp-listener")?;

    let axum_cancel_token = cancellation_token.clone();
    let server = tokio::spawn(async move {
        tracing::info!(
            "starting axum server on {}",
            tcp_listener
                .local_addr()
                .map(|x| x.to_string())
                .unwrap_or(String::from("invalid addr"))
        );
        let axum_shutdown_signal = axum_cancel_token.clone();
        let axum_result = axum::serve(tcp_listener, router)
            .with_graceful_shutdown(async move { axum_shutdown_signal.cancelled().await })
            .await;
        tracing::info!("axum server shutdown");
        if let Err(err) = axum_result {
            tracing::error!("got error from axum: {err:?}");
        }
        // we cancel the token in case axum encountered an error to shutdown the service
        axum_cancel_token.cancel();
    });

    tracing::info!("everything started successfully - now waiting for shutdown...");
    cancellation_token.cancelled().await;

    tracing::info!(
        "waiting for shutdown of services (max wait time {:?})..",
        config.max_wait_time_shutdown
    );
    match tokio::time::timeout(config.max_wait_time_shutdown, server).await {
        Ok(_) => tracing::info!("successfully finished shutdown in time"),
        Err(_) => {
            is_graceful_shutdown.store(false, Ordering::Relaxed);
            tracing::warn!("could not finish shutdown in time")
        }
    }

    if backend.provider().node_manager().is_running() {
        tracing::info!("stopping node..");
        if let Err(err) = backend.stop_node() {
            is_graceful_shutdown.store(false, Ordering::Relaxed);
            tracing::error!("could not stop node: {err:?}");
        }
    }

    Ok(is_graceful_shutdown.load(Ordering::Relaxed))
}
