use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::JsonError;

pub const JSON_RPC_VERSION: &str = "2.0";

/// Outgoing JSON-RPC 2.0 call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMethodCall {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl RpcMethodCall {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self { jsonrpc: JSON_RPC_VERSION.to_string(), method: method.into(), params, id }
    }
}

/// Incoming JSON-RPC 2.0 response. Exactly one of `result` and `error` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: JSON_RPC_VERSION.to_string(), id, result: Some(result), error: None }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self { jsonrpc: JSON_RPC_VERSION.to_string(), id, result: None, error: Some(error) }
    }

    /// Unwraps the envelope. A response carrying neither field is treated as a `null` result.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match (self.error, self.result) {
            (Some(error), _) => Err(error),
            (None, Some(result)) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64),
}

impl ErrorCode {
    pub const CONTRACT_NOT_FOUND: ErrorCode = ErrorCode::ServerError(20);
    pub const BLOCK_NOT_FOUND: ErrorCode = ErrorCode::ServerError(24);
    pub const CLASS_HASH_NOT_FOUND: ErrorCode = ErrorCode::ServerError(28);
    pub const TRANSACTION_HASH_NOT_FOUND: ErrorCode = ErrorCode::ServerError(29);
    pub const CONTRACT_ERROR: ErrorCode = ErrorCode::ServerError(40);
    pub const TRANSACTION_EXECUTION_ERROR: ErrorCode = ErrorCode::ServerError(41);
    pub const CLASS_ALREADY_DECLARED: ErrorCode = ErrorCode::ServerError(51);
    pub const INVALID_TRANSACTION_NONCE: ErrorCode = ErrorCode::ServerError(52);
    pub const VALIDATION_FAILURE: ErrorCode = ErrorCode::ServerError(55);

    pub fn code(&self) -> i64 {
        match *self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(code) => code,
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            other => ErrorCode::ServerError(other),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(ErrorCode::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Message followed by the node-supplied data, if any. Revert reasons and validation
    /// failures usually live in `data`.
    pub fn reason(&self) -> String {
        match &self.data {
            None | Some(Value::Null) => self.message.clone(),
            Some(Value::String(data)) => format!("{}: {data}", self.message),
            Some(data) => format!("{}: {data}", self.message),
        }
    }
}

impl Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code.code(), self.reason())
    }
}

impl std::error::Error for RpcError {}

/// Deserializes the `result` member of a successful response.
pub fn parse_result<T: serde::de::DeserializeOwned>(result: Value) -> Result<T, JsonError> {
    serde_json::from_value(result).map_err(JsonError::SerdeJsonError)
}
