//! The JSON-RPC 1.0 envelope used by the control-plane endpoint.
//!
//! This mirrors the codec of Go's `net/rpc/jsonrpc`: a request names the method as `Service.Method`, carries its single argument as the first element of `params`, and gets back the same `id` with either a `result` or an `error` string.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// The methods the service dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    /// `Admin.GetAddresses`
    GetAddresses,
    /// `Status.StartNode`
    StartNode,
    /// `Status.StopNode`
    StopNode,
    /// `Status.CreateAccount`
    CreateAccount,
    /// `Status.SelectAccount`
    SelectAccount,
    /// `Status.Logout`
    Logout,
}

/// Error when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rpc: can't find method {0}")]
pub struct UnknownMethod(pub String);

impl RpcMethod {
    /// All methods, Admin service first.
    pub const ALL: [RpcMethod; 6] = [
        RpcMethod::GetAddresses,
        RpcMethod::StartNode,
        RpcMethod::StopNode,
        RpcMethod::CreateAccount,
        RpcMethod::SelectAccount,
        RpcMethod::Logout,
    ];

    /// The qualified `Service.Method` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::GetAddresses => "Admin.GetAddresses",
            RpcMethod::StartNode => "Status.StartNode",
            RpcMethod::StopNode => "Status.StopNode",
            RpcMethod::CreateAccount => "Status.CreateAccount",
            RpcMethod::SelectAccount => "Status.SelectAccount",
            RpcMethod::Logout => "Status.Logout",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_owned()))
    }
}

/// A call to one of the exposed services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// The qualified `Service.Method` name.
    pub method: String,
    /// The argument wrapped in a one-element array. Empty for methods without arguments.
    #[serde(default)]
    pub params: Vec<Value>,
    /// Opaque id echoed back in the response.
    #[serde(default)]
    pub id: Value,
}

/// The answer to an [`RpcRequest`].
///
/// Exactly one of `result` and `error` is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// The id of the request.
    pub id: Value,
    /// The serialized reply on success.
    pub result: Value,
    /// The error message on failure.
    pub error: Option<String>,
}

impl RpcRequest {
    /// Builds a request for `method` with the given argument.
    pub fn new<Args: Serialize>(
        method: RpcMethod,
        args: &Args,
        id: impl Into<Value>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            method: method.as_str().to_owned(),
            params: vec![serde_json::to_value(args)?],
            id: id.into(),
        })
    }

    /// Deserializes the argument. A missing argument is read as an empty object.
    pub fn args<Args: DeserializeOwned>(&self) -> serde_json::Result<Args> {
        match self.params.first() {
            Some(Value::Null) | None => serde_json::from_value(Value::Object(Default::default())),
            Some(value) => Args::deserialize(value),
        }
    }
}

impl RpcResponse {
    /// A successful response carrying `result`.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result,
            error: None,
        }
    }

    /// A failed response carrying `error`.
    pub fn failure(id: Value, error: impl Into<String>) -> Self {
        Self {
            id,
            result: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Deserializes the reply, or returns the error string of a failed call.
    pub fn into_result<Reply: DeserializeOwned>(self) -> Result<Reply, String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        serde_json::from_value(self.result).map_err(|err| err.to_string())
    }
}
