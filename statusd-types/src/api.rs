//! This module defines the argument and reply payloads of every RPC method.
//!
//! The carriers have no lifecycle of their own: they are constructed per call, consumed once and dropped after the reply is sent.
//!
//! Types holding credentials or key material implement `Debug` by hand so they never end up in logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Arguments of methods that take none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoArgs {}

/// Reply of methods that return nothing besides success or failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoReply {}

/// Arguments of `Status.StartNode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigArgs {
    /// The raw node configuration (JSON).
    pub config: String,
}

/// Arguments of `Status.CreateAccount` and `Status.SelectAccount`.
///
/// `CreateAccount` only reads the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountArgs {
    /// Hex encoded account address.
    pub address: String,
    /// The password protecting the account.
    pub password: String,
}

/// Reply of `Admin.GetAddresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringsReply {
    /// The strings, in the order they were produced.
    pub strings: Vec<String>,
}

/// Reply of `Status.CreateAccount`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountReply {
    /// Hex encoded (checksummed) address of the new account.
    pub address: String,
    /// Hex encoded uncompressed public key of the new account.
    pub public_key: String,
    /// The BIP-39 mnemonic the account key was derived from.
    pub mnemonic: String,
}

impl fmt::Debug for AccountArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountArgs")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AccountReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountReply")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}
