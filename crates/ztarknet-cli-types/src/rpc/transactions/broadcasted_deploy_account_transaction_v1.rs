use serde::{Deserialize, Serialize};

use super::{pedersen_hash_on_elements, BroadcastedTransactionCommon, PREFIX_DEPLOY_ACCOUNT};
use crate::felt::{Calldata, ClassHash, ContractAddress, ContractAddressSalt, Felt};
use crate::traits::TransactionHashProducer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedDeployAccountTransactionV1 {
    #[serde(flatten)]
    pub common: BroadcastedTransactionCommon,
    pub contract_address_salt: ContractAddressSalt,
    pub constructor_calldata: Calldata,
    pub class_hash: ClassHash,
    #[serde(skip)]
    pub contract_address: ContractAddress,
}

impl BroadcastedDeployAccountTransactionV1 {
    pub fn contract_address(&self) -> ContractAddress {
        self.contract_address
    }
}

impl TransactionHashProducer for BroadcastedDeployAccountTransactionV1 {
    /// Computes the transaction hash as follows:
    /// h("deploy_account", version, contract_address, 0,
    /// h(class_hash, contract_address_salt, constructor_calldata), max_fee, chain_id, nonce)
    /// with pedersen hash on elements
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        let constructor_elements = [
            [self.class_hash, self.contract_address_salt].as_slice(),
            self.constructor_calldata.as_slice(),
        ]
        .concat();

        pedersen_hash_on_elements(&[
            PREFIX_DEPLOY_ACCOUNT,
            self.common.version,
            self.contract_address,
            Felt::ZERO,
            pedersen_hash_on_elements(&constructor_elements),
            self.common.max_fee,
            chain_id,
            self.common.nonce,
        ])
    }
}
