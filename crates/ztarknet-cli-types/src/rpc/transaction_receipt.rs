use serde::{Deserialize, Serialize};

use super::transaction_status::{TransactionExecutionStatus, TransactionFinalityStatus};
use crate::felt::{BlockHash, ContractAddress, TransactionHash};

/// Subset of `starknet_getTransactionReceipt` the toolkit reads. Unknown fields (events,
/// messages, execution resources) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TransactionHash,
    pub finality_status: TransactionFinalityStatus,
    pub execution_status: TransactionExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<BlockHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<ContractAddress>,
}
