use serde::{Deserialize, Serialize};

use super::{pedersen_hash_on_elements, BroadcastedTransactionCommon, PREFIX_INVOKE};
use crate::felt::{Calldata, ContractAddress, Felt};
use crate::traits::TransactionHashProducer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedInvokeTransactionV1 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommon,
    pub sender_address: ContractAddress,
    pub calldata: Calldata,
}

impl TransactionHashProducer for BroadcastedInvokeTransactionV1 {
    /// Computes the transaction hash as follows:
    /// h("invoke", version, sender_address, 0, h(calldata), max_fee, chain_id, nonce) with
    /// pedersen hash on elements
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        pedersen_hash_on_elements(&[
            PREFIX_INVOKE,
            self.common.version,
            self.sender_address,
            Felt::ZERO,
            pedersen_hash_on_elements(&self.calldata),
            self.common.max_fee,
            chain_id,
            self.common.nonce,
        ])
    }
}
