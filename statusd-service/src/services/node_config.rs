//! Loading of the node configuration.
//!
//! Nodes are configured with a JSON document whose keys are PascalCase, e.g.
//!
//! ```json
//! {"NetworkId": 3, "DataDir": "/tmp/statusd", "ListenAddr": "127.0.0.1:30303"}
//! ```
//!
//! `NetworkId` and `DataDir` are required, everything else has a default.

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error when loading a [`NodeConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("cannot parse node config: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but a value is not acceptable.
    #[error("invalid node config: {0}")]
    Invalid(&'static str),
}

/// The structured configuration a node is started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeConfig {
    /// Network identifier, must not be `0`.
    pub network_id: u64,
    /// Data directory of the node, must not be empty.
    pub data_dir: PathBuf,
    /// Name of the node.
    #[serde(default = "default_name")]
    pub name: String,
    /// The address the node listens on for peers.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Log level of the node.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Configuration of the messaging subsystem.
    #[serde(default)]
    pub messaging_config: MessagingConfig,
}

/// Configuration of the messaging subsystem of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessagingConfig {
    /// Whether the node runs a messaging service.
    #[serde(default = "default_messaging_enabled")]
    pub enabled: bool,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: default_messaging_enabled(),
        }
    }
}

fn default_name() -> String {
    "statusd".to_owned()
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 30303))
}

fn default_log_level() -> String {
    "INFO".to_owned()
}

fn default_messaging_enabled() -> bool {
    true
}

impl NodeConfig {
    /// Parses and validates the raw JSON configuration.
    pub fn load(raw: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<NodeConfig>(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network_id == 0 {
            return Err(ConfigError::Invalid("NetworkId must not be 0"));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("DataDir must not be empty"));
        }
        Ok(())
    }
}

impl FromStr for NodeConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(s)
    }
}
