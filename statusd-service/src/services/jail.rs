//! The jail: a registry of sandbox cells, one per chat.
//!
//! Cells are bound to the node of the [`NodeManagerService`] the jail was created with; creating a cell requires a running node.

use std::{collections::HashMap, time::Instant};

use parking_lot::RwLock;

use crate::services::node_manager::{NodeError, NodeManagerService};

/// Errors returned by the [`JailManager`].
#[derive(Debug, thiserror::Error)]
pub enum JailError {
    /// There already is a cell for this chat.
    #[error("cell for chat {0} already exists")]
    CellExists(String),
    /// Cells can only be created on a running node.
    #[error(transparent)]
    Node(#[from] NodeError),
}

#[derive(Debug)]
struct JailCell {
    network_id: u64,
    created_at: Instant,
}

/// Registry of sandbox cells.
pub struct JailManager {
    node_manager: NodeManagerService,
    cells: RwLock<HashMap<String, JailCell>>,
}

impl JailManager {
    /// Creates an empty jail bound to `node_manager`.
    pub fn new(node_manager: NodeManagerService) -> Self {
        Self {
            node_manager,
            cells: RwLock::default(),
        }
    }

    /// The node manager the jail is bound to.
    pub fn node_manager(&self) -> &NodeManagerService {
        &self.node_manager
    }

    /// Creates the cell of `chat_id` on the running node.
    pub fn create_cell(&self, chat_id: &str) -> Result<(), JailError> {
        let node = self.node_manager.node()?;
        let mut cells = self.cells.write();
        if cells.contains_key(chat_id) {
            return Err(JailError::CellExists(chat_id.to_owned()));
        }
        cells.insert(
            chat_id.to_owned(),
            JailCell {
                network_id: node.config().network_id,
                created_at: Instant::now(),
            },
        );
        tracing::debug!("created jail cell for chat {chat_id}");
        Ok(())
    }

    /// Returns the network the cell of `chat_id` was created on.
    pub fn cell_network(&self, chat_id: &str) -> Option<u64> {
        self.cells.read().get(chat_id).map(|cell| cell.network_id)
    }

    /// Removes the cell of `chat_id`. Returns how long it lived.
    pub fn remove_cell(&self, chat_id: &str) -> Option<std::time::Duration> {
        self.cells
            .write()
            .remove(chat_id)
            .map(|cell| cell.created_at.elapsed())
    }

    /// Returns the amount of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.read().len()
    }
}
