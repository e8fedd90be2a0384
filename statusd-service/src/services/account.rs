//! Account management on top of the node's keystore.
//!
//! The [`AccountManager`] creates BIP-39 backed accounts in the [`KeyStore`](crate::services::keystore::KeyStore) of the running node, selects one of them as the active account and logs it out again.
//!
//! It reaches the node through the [`ServiceProvider`] it was created by. The provider only holds a [`Weak`] reference back to itself here so that dropping the provider drops the account manager as well.

use std::sync::Weak;

use alloy::{
    primitives::{Address, hex},
    signers::local::{
        LocalSignerError, MnemonicBuilder, PrivateKeySigner,
        coins_bip39::{English, Mnemonic},
    },
};
use k256::elliptic_curve::sec1::ToEncodedPoint as _;
use parking_lot::RwLock;

use crate::{
    provider::{ProviderError, ServiceProvider},
    services::{
        keystore::KeyStoreError, messaging::MessagingError, node_manager::NodeError,
    },
};

const MNEMONIC_WORD_COUNT: usize = 12;

/// Errors returned by the [`AccountManager`].
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The provider that created this manager was dropped.
    #[error("service provider is gone")]
    ProviderDropped,
    /// The keystore cannot be resolved.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The operation needs a running node.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// The mnemonic cannot be generated.
    #[error("cannot generate mnemonic: {0}")]
    Mnemonic(String),
    /// The key cannot be derived from the mnemonic.
    #[error(transparent)]
    Derivation(#[from] LocalSignerError),
    /// The keystore rejected the operation.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
    /// The given string is not an address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// The identity cannot be registered at the messaging service.
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

/// A freshly created account.
#[derive(Clone)]
pub struct CreatedAccount {
    /// The address of the account.
    pub address: Address,
    /// Hex encoded uncompressed public key.
    pub public_key: String,
    /// The mnemonic the key was derived from.
    pub mnemonic: String,
}

impl std::fmt::Debug for CreatedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

/// The account currently logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAccount {
    /// The address of the account.
    pub address: Address,
    /// Hex encoded uncompressed public key, registered as messaging identity.
    pub public_key: String,
}

/// Creates, selects and logs out accounts.
#[derive(Debug)]
pub struct AccountManager {
    provider: Weak<ServiceProvider>,
    selected: RwLock<Option<SelectedAccount>>,
}

impl AccountManager {
    /// Creates an account manager that resolves its collaborators through `provider`.
    pub fn new(provider: Weak<ServiceProvider>) -> Self {
        Self {
            provider,
            selected: RwLock::default(),
        }
    }

    fn provider(&self) -> Result<std::sync::Arc<ServiceProvider>, AccountError> {
        self.provider.upgrade().ok_or(AccountError::ProviderDropped)
    }

    /// Generates a new mnemonic, derives the first account from it and stores the key protected by `password`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn create_account(&self, password: &str) -> Result<CreatedAccount, AccountError> {
        let key_store = self.provider()?.account_key_store()?;
        let mnemonic =
            Mnemonic::<English>::new_with_count(&mut rand::thread_rng(), MNEMONIC_WORD_COUNT)
                .map_err(|err| AccountError::Mnemonic(err.to_string()))?
                .to_phrase();
        let signer = MnemonicBuilder::<English>::default()
            .phrase(mnemonic.as_str())
            .password(password)
            .build()?;
        let public_key = public_key_hex(&signer);
        let address = key_store.import(signer, password)?;
        tracing::info!("created account {address}");
        Ok(CreatedAccount {
            address,
            public_key,
            mnemonic,
        })
    }

    /// Unlocks `address` with `password`, makes its key the only messaging identity and makes it the selected account.
    #[tracing::instrument(level = "debug", skip(self, password))]
    pub fn select_account(
        &self,
        address: &str,
        password: &str,
    ) -> Result<SelectedAccount, AccountError> {
        let address: Address = address
            .parse()
            .map_err(|_| AccountError::InvalidAddress(address.to_owned()))?;
        let provider = self.provider()?;
        let signer = provider.account_key_store()?.unlock(address, password)?;
        let public_key = public_key_hex(&signer);
        provider.messaging()?.select_identity(&public_key)?;
        let selected = SelectedAccount {
            address,
            public_key,
        };
        *self.selected.write() = Some(selected.clone());
        tracing::info!("selected account {address}");
        Ok(selected)
    }

    /// The account currently selected, if any.
    pub fn selected_account(&self) -> Option<SelectedAccount> {
        self.selected.read().clone()
    }

    /// Drops the selection. Returns the account that was selected.
    pub fn logout(&self) -> Option<SelectedAccount> {
        let previous = self.selected.write().take();
        if let Some(account) = &previous {
            tracing::info!("logged out account {}", account.address);
        }
        previous
    }
}

fn public_key_hex(signer: &PrivateKeySigner) -> String {
    let public_key = k256::PublicKey::from(signer.credential().verifying_key());
    hex::encode_prefixed(public_key.to_encoded_point(false).as_bytes())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::{
        node_config::NodeConfig,
        node_manager::{LocalNodeManager, NodeManager as _},
    };

    fn running_provider() -> Arc<ServiceProvider> {
        let provider = Arc::new(ServiceProvider::new(Arc::new(LocalNodeManager::new())));
        provider
            .node_manager()
            .start_node(
                NodeConfig::load(
                    r#"{"NetworkId": 1, "DataDir": "/tmp", "ListenAddr": "127.0.0.1:0"}"#,
                )
                .expect("valid config"),
            )
            .expect("can start");
        provider
    }

    #[test]
    fn test_create_account() {
        let provider = running_provider();
        let account_manager = provider.account_manager();
        let created = account_manager.create_account("pw").expect("can create");
        assert_eq!(created.mnemonic.split_whitespace().count(), 12);
        assert!(created.public_key.starts_with("0x04"));
        // 0x + 65 bytes
        assert_eq!(created.public_key.len(), 132);
        assert!(
            provider
                .account_key_store()
                .expect("has keystore")
                .has_address(created.address)
        );

        let other = account_manager.create_account("pw").expect("can create");
        assert_ne!(created.address, other.address);
        assert_ne!(created.mnemonic, other.mnemonic);
    }

    #[test]
    fn test_select_and_logout() {
        let provider = running_provider();
        let account_manager = provider.account_manager();
        let created = account_manager.create_account("pw").expect("can create");
        assert!(account_manager.selected_account().is_none());

        let selected = account_manager
            .select_account(&created.address.to_string(), "pw")
            .expect("can select");
        assert_eq!(selected.address, created.address);
        assert_eq!(selected.public_key, created.public_key);
        assert_eq!(account_manager.selected_account(), Some(selected));
        assert!(
            provider
                .messaging()
                .expect("enabled")
                .has_identity(&created.public_key)
        );

        assert!(account_manager.logout().is_some());
        assert!(account_manager.selected_account().is_none());
        assert!(account_manager.logout().is_none());
    }

    #[test]
    fn test_switching_accounts_replaces_identity() {
        let provider = running_provider();
        let account_manager = provider.account_manager();
        let first = account_manager.create_account("pw").expect("can create");
        let second = account_manager.create_account("pw").expect("can create");
        account_manager
            .select_account(&first.address.to_string(), "pw")
            .expect("can select");
        account_manager
            .select_account(&second.address.to_string(), "pw")
            .expect("can select");

        let messaging = provider.messaging().expect("enabled");
        assert_eq!(messaging.identities(), vec![second.public_key.clone()]);
        assert!(!messaging.has_identity(&first.public_key));
        assert_eq!(
            account_manager.selected_account().map(|account| account.address),
            Some(second.address)
        );
    }

    #[test]
    fn test_select_errors() {
        let provider = running_provider();
        let account_manager = provider.account_manager();
        let created = account_manager.create_account("pw").expect("can create");
        assert!(matches!(
            account_manager.select_account(&created.address.to_string(), "wrong"),
            Err(AccountError::KeyStore(KeyStoreError::InvalidPassword))
        ));
        assert!(matches!(
            account_manager.select_account(&Address::repeat_byte(7).to_string(), "pw"),
            Err(AccountError::KeyStore(KeyStoreError::UnknownAddress(_)))
        ));
        assert!(matches!(
            account_manager.select_account("not-an-address", "pw"),
            Err(AccountError::InvalidAddress(_))
        ));
        assert!(account_manager.selected_account().is_none());
    }

    #[test]
    fn test_create_without_node() {
        let provider = Arc::new(ServiceProvider::new(Arc::new(LocalNodeManager::new())));
        assert!(matches!(
            provider.account_manager().create_account("pw"),
            Err(AccountError::Provider(ProviderError::InvalidAccountManager(
                NodeError::NotRunning
            )))
        ));
    }
}
