use serde::{Deserialize, Serialize};

use super::{pedersen_hash_on_elements, BroadcastedTransactionCommon, PREFIX_DECLARE};
use crate::felt::{ClassHash, CompiledClassHash, ContractAddress, Felt};
use crate::rpc::contract_class::SierraContractClass;
use crate::traits::TransactionHashProducer;

/// Sierra declaration paid with a legacy max fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedDeclareTransactionV2 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommon,
    pub contract_class: SierraContractClass,
    pub sender_address: ContractAddress,
    pub compiled_class_hash: CompiledClassHash,
    #[serde(skip)]
    pub class_hash: ClassHash,
}

impl TransactionHashProducer for BroadcastedDeclareTransactionV2 {
    /// Computes the transaction hash as follows:
    /// h("declare", version, sender_address, 0, h(class_hash), max_fee, chain_id, nonce,
    /// compiled_class_hash) with pedersen hash on elements
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        pedersen_hash_on_elements(&[
            PREFIX_DECLARE,
            self.common.version,
            self.sender_address,
            Felt::ZERO,
            pedersen_hash_on_elements(&[self.class_hash]),
            self.common.max_fee,
            chain_id,
            self.common.nonce,
            self.compiled_class_hash,
        ])
    }
}
