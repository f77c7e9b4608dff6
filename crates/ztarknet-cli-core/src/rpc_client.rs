use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use starknet_rs_core::types::Felt;
use tracing::{debug, trace};
use url::Url;
use ztarknet_types::block_id::BlockId;
use ztarknet_types::felt::{ClassHash, ContractAddress, Nonce, TransactionHash};
use ztarknet_types::json_rpc::{RpcMethodCall, RpcResponse};
use ztarknet_types::transaction_receipt::TransactionReceipt;
use ztarknet_types::transaction_status::TransactionStatus;
use ztarknet_types::transactions::{AddTransactionResult, BroadcastedTransaction, FunctionCall};

use crate::error::{RpcClientError, TransportError};

/// Sends one JSON-RPC call and returns the `result` member of the response
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send_request(&self, method: &str, params: Value) -> Result<Value, RpcClientError>;
}

/// JSON-RPC 2.0 over HTTP POST
#[derive(Debug)]
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: Url) -> Self {
        Self { url, client: reqwest::Client::new(), next_id: AtomicU64::new(1) }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send_request(&self, method: &str, params: Value) -> Result<Value, RpcClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcMethodCall::new(id, method, params);
        trace!("Sending {method} (id {id}) to {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(TransportError::Reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Custom {
                msg: format!("{} responded with HTTP status {status}", self.url),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(TransportError::Reqwest)?;
        let rpc_response: RpcResponse =
            serde_json::from_slice(&bytes).map_err(TransportError::InvalidResponse)?;

        rpc_response.into_result().map_err(|err| {
            debug!("{method} returned error: {err}");
            RpcClientError::Rpc(err)
        })
    }
}

/// Typed Starknet methods on top of a transport
#[derive(Debug)]
pub struct StarknetClient<T> {
    transport: T,
}

impl<T: RpcTransport> StarknetClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, RpcClientError> {
        let result = self.transport.send_request(method, params).await?;
        serde_json::from_value(result).map_err(|err| TransportError::InvalidResponse(err).into())
    }

    pub async fn chain_id(&self) -> Result<Felt, RpcClientError> {
        self.request("starknet_chainId", json!([])).await
    }

    pub async fn get_nonce(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> Result<Nonce, RpcClientError> {
        self.request(
            "starknet_getNonce",
            json!({ "block_id": block_id, "contract_address": contract_address }),
        )
        .await
    }

    pub async fn get_class_hash_at(
        &self,
        block_id: BlockId,
        contract_address: ContractAddress,
    ) -> Result<ClassHash, RpcClientError> {
        self.request(
            "starknet_getClassHashAt",
            json!({ "block_id": block_id, "contract_address": contract_address }),
        )
        .await
    }

    pub async fn call(
        &self,
        request: &FunctionCall,
        block_id: BlockId,
    ) -> Result<Vec<Felt>, RpcClientError> {
        self.request("starknet_call", json!({ "request": request, "block_id": block_id })).await
    }

    /// Broadcasts a signed transaction through the `starknet_add*Transaction` method matching
    /// its kind
    pub async fn add_transaction(
        &self,
        transaction: &BroadcastedTransaction,
    ) -> Result<AddTransactionResult, RpcClientError> {
        let (method, param_name) = match transaction {
            BroadcastedTransaction::Invoke(_) => {
                ("starknet_addInvokeTransaction", "invoke_transaction")
            }
            BroadcastedTransaction::Declare(_) => {
                ("starknet_addDeclareTransaction", "declare_transaction")
            }
            BroadcastedTransaction::DeployAccount(_) => {
                ("starknet_addDeployAccountTransaction", "deploy_account_transaction")
            }
        };

        self.request(method, json!({ param_name: transaction })).await
    }

    /// Executes the transactions without broadcasting them. Signatures and nonces are validated.
    pub async fn simulate_transactions(
        &self,
        block_id: BlockId,
        transactions: &[BroadcastedTransaction],
    ) -> Result<Value, RpcClientError> {
        self.request(
            "starknet_simulateTransactions",
            json!({
                "block_id": block_id,
                "transactions": transactions,
                "simulation_flags": [],
            }),
        )
        .await
    }

    pub async fn get_transaction_status(
        &self,
        transaction_hash: TransactionHash,
    ) -> Result<TransactionStatus, RpcClientError> {
        self.request(
            "starknet_getTransactionStatus",
            json!({ "transaction_hash": transaction_hash }),
        )
        .await
    }

    pub async fn get_transaction_receipt(
        &self,
        transaction_hash: TransactionHash,
    ) -> Result<TransactionReceipt, RpcClientError> {
        self.request(
            "starknet_getTransactionReceipt",
            json!({ "transaction_hash": transaction_hash }),
        )
        .await
    }
}
