use serde::{Deserialize, Serialize};
use starknet_types_core::hash::{Poseidon, StarkHash};

use super::{BroadcastedTransactionCommonV3, PREFIX_DECLARE};
use crate::felt::{ClassHash, CompiledClassHash, ContractAddress, Felt};
use crate::rpc::contract_class::SierraContractClass;
use crate::traits::TransactionHashProducer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedDeclareTransactionV3 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommonV3,
    pub contract_class: SierraContractClass,
    pub sender_address: ContractAddress,
    pub compiled_class_hash: CompiledClassHash,
    pub account_deployment_data: Vec<Felt>,
    /// Not part of the wire format; the node recomputes it from `contract_class`
    #[serde(skip)]
    pub class_hash: ClassHash,
}

impl TransactionHashProducer for BroadcastedDeclareTransactionV3 {
    /// Computes the transaction hash as follows:
    /// h(common_tx_fields, h(account_deployment_data), class_hash, compiled_class_hash) with
    /// poseidon hash
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        let mut fields =
            self.common.common_fields_for_hash(PREFIX_DECLARE, chain_id, self.sender_address);
        fields.push(Poseidon::hash_array(&self.account_deployment_data));
        fields.push(self.class_hash);
        fields.push(self.compiled_class_hash);

        Poseidon::hash_array(&fields)
    }
}
