//! This module defines the [`Error`] an RPC call may return. Its display string is what ends up in the `error` field of the response.

use statusd_types::rpc::UnknownMethod;

use crate::services::{
    account::AccountError, keystore::KeyStoreError, node_config::ConfigError,
    node_manager::NodeError,
};

/// All errors the `Admin` and `Status` services may return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host's network interfaces cannot be listed.
    #[error("cannot enumerate interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),
    /// The node config cannot be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// Starting or stopping the node failed.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// The account cannot be created.
    #[error("could not create account: {0}")]
    AccountCreation(#[source] AccountError),
    /// The password does not unlock the account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// There is no account with this address.
    #[error("unknown address: {0}")]
    UnknownAddress(String),
    /// The account cannot be selected for another reason.
    #[error("could not select account: {0}")]
    SelectAccount(#[source] AccountError),
    /// Clearing identities or the selected account failed.
    #[error("could not logout: {0}")]
    LogoutFailed(#[source] AccountError),
    /// The argument of the call does not match the method.
    #[error("invalid params: {0}")]
    InvalidParams(#[source] serde_json::Error),
    /// The reply cannot be serialized.
    #[error("cannot serialize reply: {0}")]
    Reply(#[source] serde_json::Error),
    /// No service exposes the method.
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethod),
}

impl Error {
    /// Maps the failure of selecting `address` to the error reported to the caller.
    pub(crate) fn select_account(address: &str, err: AccountError) -> Self {
        match err {
            AccountError::KeyStore(KeyStoreError::InvalidPassword) => Error::InvalidCredentials,
            AccountError::KeyStore(KeyStoreError::UnknownAddress(_))
            | AccountError::InvalidAddress(_) => Error::UnknownAddress(address.to_owned()),
            err => Error::SelectAccount(err),
        }
    }
}
