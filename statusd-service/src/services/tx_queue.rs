//! The queue of transactions waiting for the user's confirmation.
//!
//! Transactions are always sent from the account currently selected at the [`AccountManager`].

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use alloy::primitives::{Address, U256};
use parking_lot::Mutex;

use crate::services::{
    account::AccountManager,
    node_manager::{NodeError, NodeManagerService},
};

/// Errors returned by the [`TxQueueManager`].
#[derive(Debug, thiserror::Error)]
pub enum TxQueueError {
    /// No account is selected to send from.
    #[error("no account is selected")]
    NoSelectedAccount,
    /// Transactions can only be queued on a running node.
    #[error(transparent)]
    Node(#[from] NodeError),
}

/// A transaction waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTransaction {
    /// Id of the transaction, unique per queue.
    pub id: u64,
    /// The sender.
    pub from: Address,
    /// The recipient.
    pub to: Address,
    /// The value in wei.
    pub value: U256,
}

/// Queue of pending transactions.
pub struct TxQueueManager {
    node_manager: NodeManagerService,
    account_manager: Arc<AccountManager>,
    next_id: AtomicU64,
    queue: Mutex<VecDeque<QueuedTransaction>>,
}

impl TxQueueManager {
    /// Creates an empty queue.
    pub fn new(node_manager: NodeManagerService, account_manager: Arc<AccountManager>) -> Self {
        Self {
            node_manager,
            account_manager,
            next_id: AtomicU64::new(1),
            queue: Mutex::default(),
        }
    }

    /// The account manager transactions are sent with.
    pub fn account_manager(&self) -> &Arc<AccountManager> {
        &self.account_manager
    }

    /// Queues a transfer of `value` to `to` from the selected account. Returns the id of the queued transaction.
    pub fn enqueue(&self, to: Address, value: U256) -> Result<u64, TxQueueError> {
        self.node_manager.node()?;
        let from = self
            .account_manager
            .selected_account()
            .ok_or(TxQueueError::NoSelectedAccount)?
            .address;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.queue.lock().push_back(QueuedTransaction {
            id,
            from,
            to,
            value,
        });
        tracing::debug!("queued transaction {id} from {from} to {to}");
        Ok(id)
    }

    /// Removes the transaction with `id`. Returns it if it was queued.
    pub fn discard(&self, id: u64) -> Option<QueuedTransaction> {
        let mut queue = self.queue.lock();
        let position = queue.iter().position(|tx| tx.id == id)?;
        queue.remove(position)
    }

    /// Returns all queued transactions, oldest first.
    pub fn pending(&self) -> Vec<QueuedTransaction> {
        self.queue.lock().iter().cloned().collect()
    }
}
