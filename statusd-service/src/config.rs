//! Configuration types and CLI/environment parsing for a statusd process.
//!
//! This is the configuration of the hosting process. The configuration of the node itself arrives as JSON over `Status.StartNode` (or from the file in [`StatusdConfig::node_config`]) and is parsed by [`crate::services::node_config`].

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use secrecy::SecretString;

/// The configuration for the statusd control-plane.
///
/// It can be configured via environment variables or command line arguments using `clap`.
#[derive(Parser, Debug)]
pub struct StatusdConfig {
    /// The bind addr of the AXUM server
    #[clap(long, env = "STATUSD_BIND_ADDR", default_value = "127.0.0.1:8545")]
    pub bind_addr: SocketAddr,

    /// The FCM server key handed to the notification subsystem.
    #[clap(long, env = "STATUSD_FCM_SERVER_KEY")]
    pub fcm_server_key: Option<SecretString>,

    /// Path to a JSON node config. If set, a node is started with it during boot.
    #[clap(long, env = "STATUSD_NODE_CONFIG")]
    pub node_config: Option<PathBuf>,

    /// Max wait time the service waits for its workers during shutdown.
    #[clap(
        long,
        env = "STATUSD_MAX_WAIT_TIME_SHUTDOWN",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    pub max_wait_time_shutdown: Duration,
}
