use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionFinalityStatus {
    Received,
    Candidate,
    PreConfirmed,
    AcceptedOnL2,
    AcceptedOnL1,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionExecutionStatus {
    Succeeded,
    Reverted,
}

/// Result of `starknet_getTransactionStatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub finality_status: TransactionFinalityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_status: Option<TransactionExecutionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl TransactionStatus {
    pub fn is_reverted(&self) -> bool {
        self.execution_status == Some(TransactionExecutionStatus::Reverted)
    }
}
