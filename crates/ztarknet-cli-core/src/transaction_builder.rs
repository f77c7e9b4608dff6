use starknet_rs_core::types::Felt;
use starknet_rs_core::utils::get_selector_from_name;
use tracing::{info, warn};
use ztarknet_types::chain_id::ChainId;
use ztarknet_types::felt::{
    Calldata, ClassHash, ContractAddress, ContractAddressSalt, EntryPointSelector, Nonce,
    TransactionHash,
};
use ztarknet_types::traits::TransactionHashProducer;
use ztarknet_types::transactions::broadcasted_declare_transaction_v2::BroadcastedDeclareTransactionV2;
use ztarknet_types::transactions::broadcasted_declare_transaction_v3::BroadcastedDeclareTransactionV3;
use ztarknet_types::transactions::broadcasted_deploy_account_transaction_v1::BroadcastedDeployAccountTransactionV1;
use ztarknet_types::transactions::broadcasted_deploy_account_transaction_v3::BroadcastedDeployAccountTransactionV3;
use ztarknet_types::transactions::broadcasted_invoke_transaction_v1::BroadcastedInvokeTransactionV1;
use ztarknet_types::transactions::broadcasted_invoke_transaction_v3::BroadcastedInvokeTransactionV3;
use ztarknet_types::transactions::{
    BroadcastedDeclareTransaction, BroadcastedDeployAccountTransaction,
    BroadcastedInvokeTransaction, BroadcastedTransaction, BroadcastedTransactionCommon,
    BroadcastedTransactionCommonV3, TransactionKind,
};

use crate::account::AccountIdentity;
use crate::address::{compute_address, UdcVariant};
use crate::contract_class::DeclarableClass;
use crate::error::{Error, ZtarknetResult};
use crate::fee::FeeSpec;

/// A single contract call inside an account's `__execute__`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub to: ContractAddress,
    pub selector: EntryPointSelector,
    pub calldata: Calldata,
}

impl Call {
    pub fn new(to: ContractAddress, entrypoint: &str, calldata: Calldata) -> ZtarknetResult<Self> {
        Ok(Self { to, selector: selector_from_name(entrypoint)?, calldata })
    }
}

pub fn selector_from_name(entrypoint: &str) -> ZtarknetResult<EntryPointSelector> {
    get_selector_from_name(entrypoint).map_err(|err| Error::InvalidCalldata {
        index: 0,
        value: entrypoint.to_string(),
        reason: err.to_string(),
    })
}

/// Cairo 1 account multicall encoding: `[n_calls, (to, selector, len, ...calldata)*]`
pub fn encode_multicall(calls: &[Call]) -> Calldata {
    let mut encoded = vec![Felt::from(calls.len())];
    for call in calls {
        encoded.push(call.to);
        encoded.push(call.selector);
        encoded.push(Felt::from(call.calldata.len()));
        encoded.extend_from_slice(&call.calldata);
    }

    encoded
}

/// Calldata of a UDC deploy call
pub fn udc_calldata(
    class_hash: ClassHash,
    salt: ContractAddressSalt,
    unique: bool,
    constructor_calldata: &[Felt],
) -> Calldata {
    let mut calldata = vec![
        class_hash,
        salt,
        if unique { Felt::ONE } else { Felt::ZERO },
        Felt::from(constructor_calldata.len()),
    ];
    calldata.extend_from_slice(constructor_calldata);
    calldata
}

/// Signed transaction, ready to broadcast. Not modified after signing.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    pub kind: TransactionKind,
    pub transaction: BroadcastedTransaction,
    /// Locally computed hash the signature covers
    pub hash: TransactionHash,
    /// Declared class of a declare transaction
    pub class_hash: Option<ClassHash>,
    /// Address a deploy or deploy-account transaction creates
    pub contract_address: Option<ContractAddress>,
}

impl SignedTransaction {
    pub fn sender_address(&self) -> ContractAddress {
        self.transaction.sender_address()
    }
}

/// Builds and signs transactions. Performs no network calls; nonces are supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct TransactionBuilder {
    chain_id: ChainId,
}

impl TransactionBuilder {
    pub fn new(chain_id: ChainId) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn sign(
        &self,
        operation: &'static str,
        kind: TransactionKind,
        signer: &AccountIdentity,
        unsigned: BroadcastedTransaction,
    ) -> ZtarknetResult<SignedTransaction> {
        let hash = unsigned.calculate_transaction_hash(self.chain_id.to_felt());
        let signature = signer.sign_hash(operation, &hash)?;
        info!("Built {kind} transaction {hash:#x} (nonce {:#x})", unsigned.nonce());

        Ok(SignedTransaction {
            kind,
            transaction: unsigned.with_signature(signature),
            hash,
            class_hash: None,
            contract_address: None,
        })
    }

    /// `__execute__` invoke carrying the given calls
    pub fn build_invoke_calls(
        &self,
        account: &AccountIdentity,
        calls: &[Call],
        nonce: Nonce,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        self.build_execute(TransactionKind::Invoke, account, calls, nonce, fee)
    }

    pub fn build_invoke(
        &self,
        account: &AccountIdentity,
        target: ContractAddress,
        entrypoint: &str,
        calldata: Calldata,
        nonce: Nonce,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        let call = Call::new(target, entrypoint, calldata)?;
        self.build_invoke_calls(account, &[call], nonce, fee)
    }

    fn build_execute(
        &self,
        kind: TransactionKind,
        account: &AccountIdentity,
        calls: &[Call],
        nonce: Nonce,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        let calldata = encode_multicall(calls);
        let unsigned = match *fee {
            FeeSpec::ResourceBounds { bounds, tip } => {
                BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V3(
                    BroadcastedInvokeTransactionV3 {
                        common: BroadcastedTransactionCommonV3::new(nonce, bounds, tip),
                        sender_address: account.address,
                        calldata,
                        account_deployment_data: vec![],
                    },
                ))
            }
            FeeSpec::LegacyMaxFee(max_fee) => {
                BroadcastedTransaction::Invoke(BroadcastedInvokeTransaction::V1(
                    BroadcastedInvokeTransactionV1 {
                        common: BroadcastedTransactionCommon::new(Felt::ONE, nonce, max_fee),
                        sender_address: account.address,
                        calldata,
                    },
                ))
            }
        };

        self.sign("invoke", kind, account, unsigned)
    }

    /// Factory deploy through the Universal Deployer Contract. The returned transaction carries
    /// the address the contract will be deployed at.
    #[allow(clippy::too_many_arguments)]
    pub fn build_deploy(
        &self,
        account: &AccountIdentity,
        udc: UdcVariant,
        class_hash: ClassHash,
        constructor_calldata: &[Felt],
        salt: ContractAddressSalt,
        unique: bool,
        nonce: Nonce,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        let call = Call::new(
            udc.address(),
            udc.entrypoint(),
            udc_calldata(class_hash, salt, unique, constructor_calldata),
        )?;
        let contract_address =
            udc.deployed_address(account.address, salt, unique, class_hash, constructor_calldata);

        let mut signed =
            self.build_execute(TransactionKind::Deploy, account, &[call], nonce, fee)?;
        signed.contract_address = Some(contract_address);
        Ok(signed)
    }

    pub fn build_declare(
        &self,
        account: &AccountIdentity,
        class: DeclarableClass,
        nonce: Nonce,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        let class_hash = class.class_hash;
        let unsigned = match *fee {
            FeeSpec::ResourceBounds { bounds, tip } => {
                BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V3(Box::new(
                    BroadcastedDeclareTransactionV3 {
                        common: BroadcastedTransactionCommonV3::new(nonce, bounds, tip),
                        contract_class: class.contract_class,
                        sender_address: account.address,
                        compiled_class_hash: class.compiled_class_hash,
                        account_deployment_data: vec![],
                        class_hash,
                    },
                )))
            }
            FeeSpec::LegacyMaxFee(max_fee) => {
                BroadcastedTransaction::Declare(BroadcastedDeclareTransaction::V2(Box::new(
                    BroadcastedDeclareTransactionV2 {
                        common: BroadcastedTransactionCommon::new(Felt::TWO, nonce, max_fee),
                        contract_class: class.contract_class,
                        sender_address: account.address,
                        compiled_class_hash: class.compiled_class_hash,
                        class_hash,
                    },
                )))
            }
        };

        let mut signed = self.sign("declare", TransactionKind::Declare, account, unsigned)?;
        signed.class_hash = Some(class_hash);
        Ok(signed)
    }

    /// Self-deployment of a new account. `new_account` must hold the new account's key; the
    /// address is derived from salt, class hash and calldata with a zero deployer.
    pub fn build_deploy_account(
        &self,
        new_account: &AccountIdentity,
        class_hash: ClassHash,
        constructor_calldata: Calldata,
        salt: ContractAddressSalt,
        fee: &FeeSpec,
    ) -> ZtarknetResult<SignedTransaction> {
        let contract_address = compute_address(salt, class_hash, &constructor_calldata, Felt::ZERO);
        if contract_address != new_account.address {
            warn!(
                "Account address {:#x} differs from the derived address {contract_address:#x}; \
                 deploying at the derived address",
                new_account.address
            );
        }

        let unsigned = match *fee {
            FeeSpec::ResourceBounds { bounds, tip } => BroadcastedTransaction::DeployAccount(
                BroadcastedDeployAccountTransaction::V3(BroadcastedDeployAccountTransactionV3 {
                    common: BroadcastedTransactionCommonV3::new(Felt::ZERO, bounds, tip),
                    contract_address_salt: salt,
                    constructor_calldata,
                    class_hash,
                    contract_address,
                }),
            ),
            FeeSpec::LegacyMaxFee(max_fee) => BroadcastedTransaction::DeployAccount(
                BroadcastedDeployAccountTransaction::V1(BroadcastedDeployAccountTransactionV1 {
                    common: BroadcastedTransactionCommon::new(Felt::ONE, Felt::ZERO, max_fee),
                    contract_address_salt: salt,
                    constructor_calldata,
                    class_hash,
                    contract_address,
                }),
            ),
        };

        let mut signed =
            self.sign("deployAccount", TransactionKind::DeployAccount, new_account, unsigned)?;
        signed.contract_address = Some(contract_address);
        Ok(signed)
    }
}
