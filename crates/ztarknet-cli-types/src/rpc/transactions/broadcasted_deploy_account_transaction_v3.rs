use serde::{Deserialize, Serialize};
use starknet_types_core::hash::{Poseidon, StarkHash};

use super::{BroadcastedTransactionCommonV3, PREFIX_DEPLOY_ACCOUNT};
use crate::felt::{Calldata, ClassHash, ContractAddress, ContractAddressSalt, Felt};
use crate::traits::TransactionHashProducer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedDeployAccountTransactionV3 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommonV3,
    pub contract_address_salt: ContractAddressSalt,
    pub constructor_calldata: Calldata,
    pub class_hash: ClassHash,
    /// Derived from salt, class hash and calldata; not part of the wire format
    #[serde(skip)]
    pub contract_address: ContractAddress,
}

impl BroadcastedDeployAccountTransactionV3 {
    pub fn contract_address(&self) -> ContractAddress {
        self.contract_address
    }
}

impl TransactionHashProducer for BroadcastedDeployAccountTransactionV3 {
    /// Computes the transaction hash as follows:
    /// h(common_tx_fields, h(constructor_calldata), class_hash, contract_address_salt) with
    /// poseidon hash
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        let mut fields = self.common.common_fields_for_hash(
            PREFIX_DEPLOY_ACCOUNT,
            chain_id,
            self.contract_address,
        );
        fields.push(Poseidon::hash_array(&self.constructor_calldata));
        fields.push(self.class_hash);
        fields.push(self.contract_address_salt);

        Poseidon::hash_array(&fields)
    }
}
