use tracing::{debug, info, warn};
use ztarknet_types::block_id::BlockId;
use ztarknet_types::felt::{ClassHash, ContractAddress, TransactionHash};
use ztarknet_types::json_rpc::{ErrorCode, RpcError};
use ztarknet_types::transactions::TransactionKind;

use crate::error::{Error, RpcClientError, TransportError, ZtarknetResult};
use crate::rpc_client::{RpcTransport, StarknetClient};
use crate::transaction_builder::SignedTransaction;

/// Returned right after broadcasting; says nothing about inclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHandle {
    pub hash: TransactionHash,
    pub kind: TransactionKind,
    pub class_hash: Option<ClassHash>,
    pub contract_address: Option<ContractAddress>,
}

/// Node error codes that mean the transaction itself was refused
fn is_admission_error(code: ErrorCode) -> bool {
    [
        ErrorCode::CLASS_ALREADY_DECLARED,
        ErrorCode::INVALID_TRANSACTION_NONCE,
        ErrorCode::VALIDATION_FAILURE,
        ErrorCode::TRANSACTION_EXECUTION_ERROR,
        ErrorCode::CONTRACT_ERROR,
        ErrorCode::InvalidParams,
    ]
    .contains(&code)
        || matches!(code, ErrorCode::ServerError(50..=69))
}

/// Broadcasts signed transactions
pub struct SubmissionClient<'a, T> {
    client: &'a StarknetClient<T>,
    skip_validate: bool,
}

impl<'a, T: RpcTransport> SubmissionClient<'a, T> {
    /// With `skip_validate` off, every transaction is simulated before it is broadcast
    pub fn new(client: &'a StarknetClient<T>, skip_validate: bool) -> Self {
        Self { client, skip_validate }
    }

    pub fn skips_validation(&self) -> bool {
        self.skip_validate
    }

    fn rejection(operation: &'static str, tx: &SignedTransaction, err: &RpcError) -> Error {
        let mut reason = err.reason();
        if let (ErrorCode::CLASS_ALREADY_DECLARED, Some(class_hash)) = (err.code, tx.class_hash) {
            reason = format!("{reason} (class hash {class_hash:#x})");
        }

        Error::RejectedAtSubmission { operation, sender: tx.sender_address(), reason }
    }

    async fn validate(&self, tx: &SignedTransaction, block_id: BlockId) -> ZtarknetResult<()> {
        const OPERATION: &str = "simulateTransactions";
        debug!("Simulating {} transaction {:#x} at {block_id}", tx.kind, tx.hash);

        match self
            .client
            .simulate_transactions(block_id, std::slice::from_ref(&tx.transaction))
            .await
        {
            Ok(_) => Ok(()),
            Err(RpcClientError::Rpc(err)) if is_admission_error(err.code) => {
                Err(Self::rejection(OPERATION, tx, &err))
            }
            Err(RpcClientError::Rpc(err)) if err.code == ErrorCode::MethodNotFound => {
                Err(Error::NetworkError {
                    operation: OPERATION,
                    source: TransportError::Custom {
                        msg: format!(
                            "node does not support transaction simulation ({}); retry with \
                             --skip-validate",
                            err.reason()
                        ),
                    },
                })
            }
            Err(other) => Err(other.into_error(OPERATION)),
        }
    }

    pub async fn submit(
        &self,
        tx: &SignedTransaction,
        block_id: BlockId,
    ) -> ZtarknetResult<TransactionHandle> {
        const OPERATION: &str = "addTransaction";

        if self.skip_validate {
            warn!(
                "Skipping validation of {} transaction {:#x}; only the node's admission checks \
                 apply",
                tx.kind, tx.hash
            );
        } else {
            self.validate(tx, block_id).await?;
        }

        let result = match self.client.add_transaction(&tx.transaction).await {
            Ok(result) => result,
            Err(RpcClientError::Rpc(err)) if is_admission_error(err.code) => {
                return Err(Self::rejection(OPERATION, tx, &err));
            }
            Err(other) => return Err(other.into_error(OPERATION)),
        };

        if result.transaction_hash != tx.hash {
            warn!(
                "Node reported hash {:#x} for {} transaction, locally computed {:#x}",
                result.transaction_hash, tx.kind, tx.hash
            );
        }

        let class_hash = result.class_hash.or(tx.class_hash);
        let contract_address = result.contract_address.or(tx.contract_address);
        info!("Submitted {} transaction {:#x}", tx.kind, result.transaction_hash);

        Ok(TransactionHandle {
            hash: result.transaction_hash,
            kind: tx.kind,
            class_hash,
            contract_address,
        })
    }
}
