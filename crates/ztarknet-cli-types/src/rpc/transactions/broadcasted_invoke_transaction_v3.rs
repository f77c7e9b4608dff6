use serde::{Deserialize, Serialize};
use starknet_types_core::hash::{Poseidon, StarkHash};

use super::{BroadcastedTransactionCommonV3, PREFIX_INVOKE};
use crate::felt::{Calldata, ContractAddress, Felt};
use crate::traits::TransactionHashProducer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedInvokeTransactionV3 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommonV3,
    pub sender_address: ContractAddress,
    pub calldata: Calldata,
    pub account_deployment_data: Vec<Felt>,
}

impl TransactionHashProducer for BroadcastedInvokeTransactionV3 {
    /// Computes the transaction hash as follows:
    /// h(common_tx_fields, h(account_deployment_data), h(calldata)) with poseidon hash
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        let mut fields =
            self.common.common_fields_for_hash(PREFIX_INVOKE, chain_id, self.sender_address);
        fields.push(Poseidon::hash_array(&self.account_deployment_data));
        fields.push(Poseidon::hash_array(&self.calldata));

        Poseidon::hash_array(&fields)
    }
}
