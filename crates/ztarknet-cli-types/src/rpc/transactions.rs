pub mod broadcasted_declare_transaction_v2;
pub mod broadcasted_declare_transaction_v3;
pub mod broadcasted_deploy_account_transaction_v1;
pub mod broadcasted_deploy_account_transaction_v3;
pub mod broadcasted_invoke_transaction_v1;
pub mod broadcasted_invoke_transaction_v3;

use std::fmt::Display;

use broadcasted_declare_transaction_v2::BroadcastedDeclareTransactionV2;
use broadcasted_declare_transaction_v3::BroadcastedDeclareTransactionV3;
use broadcasted_deploy_account_transaction_v1::BroadcastedDeployAccountTransactionV1;
use broadcasted_deploy_account_transaction_v3::BroadcastedDeployAccountTransactionV3;
use broadcasted_invoke_transaction_v1::BroadcastedInvokeTransactionV1;
use broadcasted_invoke_transaction_v3::BroadcastedInvokeTransactionV3;
use serde::{Deserialize, Serialize};
use starknet_types_core::hash::{Pedersen, Poseidon, StarkHash};

use crate::felt::{
    Calldata, ClassHash, ContractAddress, EntryPointSelector, Felt, Nonce, TransactionHash,
    TransactionSignature,
};
use crate::serde_helpers::hex_string::{
    deserialize_prefixed_hex_string_to_u128, deserialize_prefixed_hex_string_to_u64,
    serialize_u128_to_prefixed_hex, serialize_u64_to_prefixed_hex,
};
use crate::traits::TransactionHashProducer;

/// Cairo short string "invoke"
pub const PREFIX_INVOKE: Felt = Felt::from_hex_unchecked("0x696e766f6b65");
/// Cairo short string "declare"
pub const PREFIX_DECLARE: Felt = Felt::from_hex_unchecked("0x6465636c617265");
/// Cairo short string "deploy_account"
pub const PREFIX_DEPLOY_ACCOUNT: Felt =
    Felt::from_hex_unchecked("0x6465706c6f795f6163636f756e74");

/// Resource names as packed into the fee commitment of V3 hashes
const L1_GAS_RESOURCE_NAME: &[u8; 7] = b"\0L1_GAS";
const L2_GAS_RESOURCE_NAME: &[u8; 7] = b"\0L2_GAS";
const L1_DATA_GAS_RESOURCE_NAME: &[u8; 7] = b"L1_DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Declare,
    Deploy,
    DeployAccount,
    Invoke,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransactionKind::Declare => "declare",
            TransactionKind::Deploy => "deploy",
            TransactionKind::DeployAccount => "deploy_account",
            TransactionKind::Invoke => "invoke",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    L1Gas,
    L2Gas,
    L1DataGas,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBounds {
    #[serde(
        serialize_with = "serialize_u64_to_prefixed_hex",
        deserialize_with = "deserialize_prefixed_hex_string_to_u64"
    )]
    pub max_amount: u64,
    #[serde(
        serialize_with = "serialize_u128_to_prefixed_hex",
        deserialize_with = "deserialize_prefixed_hex_string_to_u128"
    )]
    pub max_price_per_unit: u128,
}

impl ResourceBounds {
    pub fn new(max_amount: u64, max_price_per_unit: u128) -> Self {
        Self { max_amount, max_price_per_unit }
    }

    /// `0 || name (7 bytes) || max_amount (8 bytes BE) || max_price_per_unit (16 bytes BE)`
    fn pack(&self, resource_name: &[u8; 7]) -> Felt {
        let mut bytes = [0_u8; 32];
        bytes[1..8].copy_from_slice(resource_name);
        bytes[8..16].copy_from_slice(&self.max_amount.to_be_bytes());
        bytes[16..32].copy_from_slice(&self.max_price_per_unit.to_be_bytes());
        Felt::from_bytes_be(&bytes)
    }
}

/// Per-resource fee ceilings of a V3 transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBoundsMapping {
    pub l1_gas: ResourceBounds,
    pub l1_data_gas: ResourceBounds,
    pub l2_gas: ResourceBounds,
}

impl ResourceBoundsMapping {
    pub fn new(
        l1_gas_max_amount: u64,
        l1_gas_max_price_per_unit: u128,
        l1_data_gas_max_amount: u64,
        l1_data_gas_max_price_per_unit: u128,
        l2_gas_max_amount: u64,
        l2_gas_max_price_per_unit: u128,
    ) -> Self {
        Self {
            l1_gas: ResourceBounds::new(l1_gas_max_amount, l1_gas_max_price_per_unit),
            l1_data_gas: ResourceBounds::new(
                l1_data_gas_max_amount,
                l1_data_gas_max_price_per_unit,
            ),
            l2_gas: ResourceBounds::new(l2_gas_max_amount, l2_gas_max_price_per_unit),
        }
    }

    pub fn get(&self, resource: Resource) -> &ResourceBounds {
        match resource {
            Resource::L1Gas => &self.l1_gas,
            Resource::L2Gas => &self.l2_gas,
            Resource::L1DataGas => &self.l1_data_gas,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut ResourceBounds {
        match resource {
            Resource::L1Gas => &mut self.l1_gas,
            Resource::L2Gas => &mut self.l2_gas,
            Resource::L1DataGas => &mut self.l1_data_gas,
        }
    }

    /// Upper bound of the fee this mapping allows, tip excluded
    pub fn max_total_fee(&self) -> u128 {
        [&self.l1_gas, &self.l2_gas, &self.l1_data_gas]
            .into_iter()
            .map(|bound| u128::from(bound.max_amount).saturating_mul(bound.max_price_per_unit))
            .fold(0_u128, u128::saturating_add)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataAvailabilityMode {
    #[default]
    L1,
    L2,
}

impl DataAvailabilityMode {
    fn as_u64(&self) -> u64 {
        match self {
            DataAvailabilityMode::L1 => 0,
            DataAvailabilityMode::L2 => 1,
        }
    }
}

/// Common fields for all transaction types of version 3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedTransactionCommonV3 {
    pub version: Felt,
    pub signature: TransactionSignature,
    pub nonce: Nonce,
    pub resource_bounds: ResourceBoundsMapping,
    #[serde(
        serialize_with = "serialize_u64_to_prefixed_hex",
        deserialize_with = "deserialize_prefixed_hex_string_to_u64"
    )]
    pub tip: u64,
    pub paymaster_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

impl BroadcastedTransactionCommonV3 {
    /// Unsigned common part with L1 data availability and no paymaster
    pub fn new(nonce: Nonce, resource_bounds: ResourceBoundsMapping, tip: u64) -> Self {
        Self {
            version: Felt::THREE,
            signature: vec![],
            nonce,
            resource_bounds,
            tip,
            paymaster_data: vec![],
            nonce_data_availability_mode: DataAvailabilityMode::L1,
            fee_data_availability_mode: DataAvailabilityMode::L1,
        }
    }

    /// Returns the array of Felts that reflects the common fields of a V3 transaction:
    /// prefix, version, address, h(tip, resource_bounds), h(paymaster_data), chain_id, nonce,
    /// data availability modes
    pub(crate) fn common_fields_for_hash(
        &self,
        tx_prefix: Felt,
        chain_id: Felt,
        address: Felt,
    ) -> Vec<Felt> {
        vec![
            tx_prefix,
            self.version,
            address,
            Poseidon::hash_array(&self.get_resource_bounds_array()),
            Poseidon::hash_array(&self.paymaster_data),
            chain_id,
            self.nonce,
            self.get_data_availability_modes_felt(),
        ]
    }

    /// (tip, L1_GAS, L2_GAS, L1_DATA) words
    pub(crate) fn get_resource_bounds_array(&self) -> Vec<Felt> {
        vec![
            Felt::from(self.tip),
            self.resource_bounds.l1_gas.pack(L1_GAS_RESOURCE_NAME),
            self.resource_bounds.l2_gas.pack(L2_GAS_RESOURCE_NAME),
            self.resource_bounds.l1_data_gas.pack(L1_DATA_GAS_RESOURCE_NAME),
        ]
    }

    /// nonce_data_availability_mode << 32 | fee_data_availability_mode
    fn get_data_availability_modes_felt(&self) -> Felt {
        Felt::from(
            (self.nonce_data_availability_mode.as_u64() << 32)
                + self.fee_data_availability_mode.as_u64(),
        )
    }
}

/// Common fields of the legacy (max-fee) transaction versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastedTransactionCommon {
    pub max_fee: Felt,
    pub version: Felt,
    pub signature: TransactionSignature,
    pub nonce: Nonce,
}

impl BroadcastedTransactionCommon {
    pub fn new(version: Felt, nonce: Nonce, max_fee: u128) -> Self {
        Self { max_fee: Felt::from(max_fee), version, signature: vec![], nonce }
    }
}

/// `compute_hash_on_elements` of the legacy hashing scheme
pub(crate) fn pedersen_hash_on_elements(elements: &[Felt]) -> Felt {
    Pedersen::hash_array(elements)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BroadcastedInvokeTransaction {
    V3(BroadcastedInvokeTransactionV3),
    V1(BroadcastedInvokeTransactionV1),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BroadcastedDeclareTransaction {
    V3(Box<BroadcastedDeclareTransactionV3>),
    V2(Box<BroadcastedDeclareTransactionV2>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BroadcastedDeployAccountTransaction {
    V3(BroadcastedDeployAccountTransactionV3),
    V1(BroadcastedDeployAccountTransactionV1),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BroadcastedTransaction {
    Invoke(BroadcastedInvokeTransaction),
    Declare(BroadcastedDeclareTransaction),
    DeployAccount(BroadcastedDeployAccountTransaction),
}

impl BroadcastedTransaction {
    pub fn signature(&self) -> &TransactionSignature {
        match self {
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(tx)) => {
                &tx.common.signature
            }
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(tx)) => {
                &tx.common.signature
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(tx)) => {
                &tx.common.signature
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(tx)) => {
                &tx.common.signature
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(tx)) => {
                &tx.common.signature
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V1(tx)) => {
                &tx.common.signature
            }
        }
    }

    pub(crate) fn signature_mut(&mut self) -> &mut TransactionSignature {
        match self {
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(tx)) => {
                &mut tx.common.signature
            }
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(tx)) => {
                &mut tx.common.signature
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(tx)) => {
                &mut tx.common.signature
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(tx)) => {
                &mut tx.common.signature
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(tx)) => {
                &mut tx.common.signature
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V1(tx)) => {
                &mut tx.common.signature
            }
        }
    }

    /// Returns the transaction with the given signature attached
    pub fn with_signature(mut self, signature: TransactionSignature) -> Self {
        *self.signature_mut() = signature;
        self
    }

    pub fn nonce(&self) -> Nonce {
        match self {
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(tx)) => tx.common.nonce,
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(tx)) => tx.common.nonce,
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(tx)) => {
                tx.common.nonce
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(tx)) => {
                tx.common.nonce
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(tx)) => {
                tx.common.nonce
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V1(tx)) => {
                tx.common.nonce
            }
        }
    }

    /// Address the transaction is sent from; for deploy-account this is the new account itself
    pub fn sender_address(&self) -> ContractAddress {
        match self {
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(tx)) => {
                tx.sender_address
            }
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(tx)) => {
                tx.sender_address
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(tx)) => {
                tx.sender_address
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(tx)) => {
                tx.sender_address
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(tx)) => {
                tx.contract_address()
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V1(tx)) => {
                tx.contract_address()
            }
        }
    }

    pub fn is_v3(&self) -> bool {
        matches!(
            self,
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(_))
                | BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(_))
                | BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(_))
        )
    }
}

impl TransactionHashProducer for BroadcastedTransaction {
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt {
        match self {
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
            BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
            BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V3(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
            BroadcastedTransaction::DeployAccount(BroadcastedDeployAccountTransaction::V1(tx)) => {
                tx.calculate_transaction_hash(chain_id)
            }
        }
    }
}

/// Request body of `starknet_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub contract_address: ContractAddress,
    pub entry_point_selector: EntryPointSelector,
    pub calldata: Calldata,
}

/// Result of the `starknet_add*Transaction` family. Declare results carry the class hash,
/// deploy-account results the new address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTransactionResult {
    pub transaction_hash: TransactionHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_hash: Option<ClassHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<ContractAddress>,
}
