use starknet_rs_core::types::Felt;
use starknet_types_core::hash::{Pedersen, Poseidon, StarkHash};
use ztarknet_types::felt::{ClassHash, ContractAddress, ContractAddressSalt};

use crate::constants::{ADDR_BOUND, CONTRACT_ADDRESS_PREFIX};

/// Computes the address a contract receives when `deployer_address` deploys `class_hash` with
/// the given salt and constructor calldata. Self-deployed accounts use a zero deployer.
///
/// `pedersen("STARKNET_CONTRACT_ADDRESS", deployer, salt, class_hash, pedersen(calldata))`
/// reduced modulo `2**251 - 256`.
pub fn compute_address(
    salt: ContractAddressSalt,
    class_hash: ClassHash,
    constructor_calldata: &[Felt],
    deployer_address: ContractAddress,
) -> ContractAddress {
    let raw = Pedersen::hash_array(&[
        CONTRACT_ADDRESS_PREFIX,
        deployer_address,
        salt,
        class_hash,
        Pedersen::hash_array(constructor_calldata),
    ]);

    normalize_address(raw)
}

/// The hash is below the field prime, which is less than twice the bound, so one subtraction is
/// enough.
fn normalize_address(raw: Felt) -> ContractAddress {
    if raw >= ADDR_BOUND { raw - ADDR_BOUND } else { raw }
}

/// Which Universal Deployer Contract a factory deploy goes through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UdcVariant {
    /// Cairo 1 UDC, `deploy_contract(class_hash, salt, not_from_zero, calldata)`
    #[default]
    Current,
    /// Cairo 0 UDC, `deployContract(class_hash, salt, unique, calldata)`
    Legacy,
}

impl UdcVariant {
    pub fn address(&self) -> ContractAddress {
        match self {
            UdcVariant::Current => crate::constants::UDC_CONTRACT_ADDRESS,
            UdcVariant::Legacy => crate::constants::LEGACY_UDC_CONTRACT_ADDRESS,
        }
    }

    pub fn entrypoint(&self) -> &'static str {
        match self {
            UdcVariant::Current => crate::constants::UDC_ENTRYPOINT,
            UdcVariant::Legacy => crate::constants::LEGACY_UDC_ENTRYPOINT,
        }
    }

    /// Address a UDC deploy ends up at. A unique deploy mixes the sender into the salt and
    /// uses the UDC as deployer; otherwise the deployer is zero.
    pub fn deployed_address(
        &self,
        sender_address: ContractAddress,
        salt: ContractAddressSalt,
        unique: bool,
        class_hash: ClassHash,
        constructor_calldata: &[Felt],
    ) -> ContractAddress {
        if !unique {
            return compute_address(salt, class_hash, constructor_calldata, Felt::ZERO);
        }

        let effective_salt = match self {
            UdcVariant::Current => Poseidon::hash_array(&[sender_address, salt]),
            UdcVariant::Legacy => Pedersen::hash(&sender_address, &salt),
        };
        compute_address(effective_salt, class_hash, constructor_calldata, self.address())
    }
}
