use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ztarknet_types::felt::{BlockHash, TransactionHash};
use ztarknet_types::json_rpc::ErrorCode;
use ztarknet_types::transaction_status::{TransactionFinalityStatus, TransactionStatus};

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS};
use crate::error::{Error, RpcClientError, ZtarknetResult};
use crate::rpc_client::{RpcTransport, StarknetClient};
use crate::submission::TransactionHandle;

/// How far a transaction must get before it counts as accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmationDepth {
    PreConfirmed,
    #[default]
    AcceptedOnL2,
    AcceptedOnL1,
}

impl ConfirmationDepth {
    fn is_reached_by(&self, finality_status: TransactionFinalityStatus) -> bool {
        use TransactionFinalityStatus::*;
        match self {
            ConfirmationDepth::PreConfirmed => {
                matches!(finality_status, PreConfirmed | AcceptedOnL2 | AcceptedOnL1)
            }
            ConfirmationDepth::AcceptedOnL2 => {
                matches!(finality_status, AcceptedOnL2 | AcceptedOnL1)
            }
            ConfirmationDepth::AcceptedOnL1 => finality_status == AcceptedOnL1,
        }
    }
}

impl FromStr for ConfirmationDepth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "pre-confirmed" => Ok(ConfirmationDepth::PreConfirmed),
            "accepted-on-l2" | "l2" => Ok(ConfirmationDepth::AcceptedOnL2),
            "accepted-on-l1" | "l1" => Ok(ConfirmationDepth::AcceptedOnL1),
            other => Err(Error::MissingConfiguration {
                msg: format!(
                    "unknown confirmation depth {other:?}; expected pre-confirmed, \
                     accepted-on-l2 or accepted-on-l1"
                ),
            }),
        }
    }
}

impl Display for ConfirmationDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfirmationDepth::PreConfirmed => "pre-confirmed",
            ConfirmationDepth::AcceptedOnL2 => "accepted-on-l2",
            ConfirmationDepth::AcceptedOnL1 => "accepted-on-l1",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub retry_interval: Duration,
    /// Number of status checks before giving up
    pub max_retries: u32,
    pub depth: ConfirmationDepth,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            depth: ConfirmationDepth::default(),
        }
    }
}

/// States a handle moves through while being observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Submitted,
    Pending,
    Accepted,
    Rejected,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Accepted,
    Rejected,
    /// Budget exhausted; the transaction may still be accepted later
    TimedOut,
    /// Observation stopped by the caller; the transaction is unaffected
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockInfo {
    pub block_number: Option<u64>,
    pub block_hash: Option<BlockHash>,
}

/// Terminal outcome of waiting on one handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResult {
    pub hash: TransactionHash,
    pub status: ConfirmationStatus,
    pub finality_status: Option<TransactionFinalityStatus>,
    pub block_info: Option<BlockInfo>,
    pub revert_reason: Option<String>,
    /// Status checks performed
    pub attempts: u32,
}

impl ConfirmationResult {
    pub fn is_accepted(&self) -> bool {
        self.status == ConfirmationStatus::Accepted
    }

    /// Turns every outcome other than acceptance into the matching error
    pub fn into_result(self) -> ZtarknetResult<Self> {
        match self.status {
            ConfirmationStatus::Accepted => Ok(self),
            ConfirmationStatus::Rejected => {
                Err(Error::RejectedAtExecution { hash: self.hash, reason: self.revert_reason })
            }
            ConfirmationStatus::TimedOut => {
                Err(Error::TimedOut { hash: self.hash, attempts: self.attempts })
            }
            ConfirmationStatus::Cancelled => Err(Error::WaitCancelled { hash: self.hash }),
        }
    }
}

enum Observation {
    Pending(TransactionFinalityStatus),
    Accepted(TransactionFinalityStatus),
    Rejected(TransactionFinalityStatus, Option<String>),
}

fn observe(status: TransactionStatus, depth: ConfirmationDepth) -> Observation {
    if status.finality_status == TransactionFinalityStatus::Rejected || status.is_reverted() {
        return Observation::Rejected(status.finality_status, status.failure_reason);
    }

    if depth.is_reached_by(status.finality_status) {
        Observation::Accepted(status.finality_status)
    } else {
        Observation::Pending(status.finality_status)
    }
}

/// Runs `future` unless the token fires first
async fn unless_cancelled<F: Future>(
    cancellation: &CancellationToken,
    future: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => None,
        output = future => Some(output),
    }
}

/// Polls the status of submitted transactions until they reach a terminal state
pub struct ConfirmationWaiter<'a, T> {
    client: &'a StarknetClient<T>,
    config: WaitConfig,
}

impl<'a, T: RpcTransport> ConfirmationWaiter<'a, T> {
    pub fn new(client: &'a StarknetClient<T>, config: WaitConfig) -> Self {
        Self { client, config }
    }

    pub async fn wait(&self, handle: &TransactionHandle) -> ConfirmationResult {
        self.wait_with_cancellation(handle, &CancellationToken::new()).await
    }

    /// Cancelling the token stops the polling loop at its next suspension point and reports
    /// `Cancelled` with the hash.
    pub async fn wait_with_cancellation(
        &self,
        handle: &TransactionHandle,
        cancellation: &CancellationToken,
    ) -> ConfirmationResult {
        let hash = handle.hash;
        let max_retries = self.config.max_retries.max(1);
        let mut state = WaitState::Submitted;
        let mut last_finality = None;
        debug!("Waiting for {} transaction {hash:#x} ({})", handle.kind, self.config.depth);

        let finish = |status, attempts, finality_status, revert_reason, block_info| {
            ConfirmationResult {
                hash,
                status,
                finality_status,
                block_info,
                revert_reason,
                attempts,
            }
        };

        for attempt in 1..=max_retries {
            let response = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    info!("Stopped waiting for transaction {hash:#x}; it may still be accepted");
                    let attempts = attempt - 1;
                    return finish(ConfirmationStatus::Cancelled, attempts, last_finality, None, None);
                }
                response = self.client.get_transaction_status(hash) => response,
            };

            match response {
                Ok(status) => match observe(status, self.config.depth) {
                    Observation::Accepted(finality) => {
                        info!("Transaction {hash:#x}: {state:?} -> Accepted ({finality:?})");
                        let Some(block_info) =
                            unless_cancelled(cancellation, self.fetch_block_info(hash)).await
                        else {
                            info!("Stopped waiting for receipt of accepted transaction {hash:#x}");
                            return finish(
                                ConfirmationStatus::Cancelled,
                                attempt,
                                Some(finality),
                                None,
                                None,
                            );
                        };
                        return finish(
                            ConfirmationStatus::Accepted,
                            attempt,
                            Some(finality),
                            None,
                            block_info,
                        );
                    }
                    Observation::Rejected(finality, reason) => {
                        let reason = match reason {
                            Some(reason) => Some(reason),
                            None => match unless_cancelled(
                                cancellation,
                                self.fetch_revert_reason(hash),
                            )
                            .await
                            {
                                Some(reason) => reason,
                                None => {
                                    info!(
                                        "Stopped waiting for revert reason of transaction \
                                         {hash:#x}"
                                    );
                                    return finish(
                                        ConfirmationStatus::Cancelled,
                                        attempt,
                                        Some(finality),
                                        None,
                                        None,
                                    );
                                }
                            },
                        };
                        warn!(
                            "Transaction {hash:#x}: {state:?} -> Rejected: {}",
                            reason.as_deref().unwrap_or("no reason supplied")
                        );
                        return finish(
                            ConfirmationStatus::Rejected,
                            attempt,
                            Some(finality),
                            reason,
                            None,
                        );
                    }
                    Observation::Pending(finality) => {
                        last_finality = Some(finality);
                        if state != WaitState::Pending {
                            info!("Transaction {hash:#x}: {state:?} -> Pending ({finality:?})");
                            state = WaitState::Pending;
                        }
                    }
                },
                Err(RpcClientError::Rpc(err))
                    if err.code == ErrorCode::TRANSACTION_HASH_NOT_FOUND =>
                {
                    debug!("Transaction {hash:#x} not yet known to the node ({state:?})");
                }
                Err(err) => {
                    warn!(
                        "Status check {attempt}/{max_retries} of transaction {hash:#x} failed: \
                         {err}"
                    );
                }
            }

            if attempt == max_retries {
                break;
            }

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    info!("Stopped waiting for transaction {hash:#x}; it may still be accepted");
                    return finish(ConfirmationStatus::Cancelled, attempt, last_finality, None, None);
                }
                _ = tokio::time::sleep(self.config.retry_interval) => {}
            }
        }

        warn!(
            "Transaction {hash:#x}: {state:?} -> {:?} after {max_retries} status checks",
            WaitState::TimedOut
        );
        finish(ConfirmationStatus::TimedOut, max_retries, last_finality, None, None)
    }

    async fn fetch_block_info(&self, hash: TransactionHash) -> Option<BlockInfo> {
        match self.client.get_transaction_receipt(hash).await {
            Ok(receipt) => Some(BlockInfo {
                block_number: receipt.block_number,
                block_hash: receipt.block_hash,
            }),
            Err(err) => {
                debug!("Receipt of accepted transaction {hash:#x} unavailable: {err}");
                None
            }
        }
    }

    async fn fetch_revert_reason(&self, hash: TransactionHash) -> Option<String> {
        let receipt = self.client.get_transaction_receipt(hash).await.ok()?;
        receipt.revert_reason
    }
}
