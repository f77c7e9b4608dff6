use starknet_rs_core::types::Felt;
use thiserror::Error;
use ztarknet_types::error::{ConversionError, JsonError};
use ztarknet_types::json_rpc::RpcError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Key generation failed: secure random source unavailable: {msg}")]
    EntropyError { msg: String },
    #[error("{operation}: network error: {source}")]
    NetworkError {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("{operation}: no contract deployed at address {address:#x}")]
    AccountNotFound { operation: &'static str, address: Felt },
    #[error("Invalid calldata item #{index} ({value:?}): {reason}")]
    InvalidCalldata { index: usize, value: String, reason: String },
    #[error("{operation}: account {address:#x} has no signer bound")]
    UnsignedAccount { operation: &'static str, address: Felt },
    #[error("{operation}: transaction from {sender:#x} rejected at submission: {reason}")]
    RejectedAtSubmission { operation: &'static str, sender: Felt, reason: String },
    #[error(
        "Transaction {hash:#x} rejected at execution: {}",
        reason.as_deref().unwrap_or("no reason supplied")
    )]
    RejectedAtExecution { hash: Felt, reason: Option<String> },
    #[error(
        "Transaction {hash:#x} not confirmed within {attempts} status checks; it may still be \
         accepted later"
    )]
    TimedOut { hash: Felt, attempts: u32 },
    #[error("Waiting for transaction {hash:#x} was cancelled; the transaction itself was not")]
    WaitCancelled { hash: Felt },
    #[error("Invalid fee specification: {msg}")]
    InvalidFeeSpec { msg: String },
    #[error("{operation}: signing failed: {msg}")]
    Signing { operation: &'static str, msg: String },
    #[error("Failed to load contract class from {path}: {msg}")]
    ContractClassLoad { path: String, msg: String },
    #[error("{operation}: unexpected response from node: {msg}")]
    UnexpectedRpcResponse { operation: &'static str, msg: String },
    #[error("Missing configuration: {msg}")]
    MissingConfiguration { msg: String },
    #[error("{operation}: {source}")]
    RpcError {
        operation: &'static str,
        #[source]
        source: RpcError,
    },
    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),
    #[error(transparent)]
    JsonError(#[from] JsonError),
}

/// Failure below the JSON-RPC layer: connection, HTTP status or an undecodable body
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("Response is not valid JSON-RPC: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("{msg}")]
    Custom { msg: String },
}

/// What a single JSON-RPC call can fail with
#[derive(Error, Debug)]
pub enum RpcClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl RpcClientError {
    /// Attaches the failing operation to a client error. Node-side errors keep their code so
    /// callers can still match on them.
    pub fn into_error(self, operation: &'static str) -> Error {
        match self {
            RpcClientError::Transport(source) => Error::NetworkError { operation, source },
            RpcClientError::Rpc(source) => Error::RpcError { operation, source },
        }
    }
}

impl Error {
    /// Whether the error leaves the outcome of a submitted transaction undecided
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::TimedOut { .. } | Error::WaitCancelled { .. } | Error::NetworkError { .. }
        )
    }
}

pub type ZtarknetResult<T, E = Error> = Result<T, E>;
