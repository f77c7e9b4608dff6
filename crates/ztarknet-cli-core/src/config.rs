use url::Url;
use ztarknet_types::chain_id::ChainId;
use ztarknet_types::felt::{ClassHash, ContractAddress};

use crate::account::{AccountIdentity, PrivateKey};
use crate::address::UdcVariant;
use crate::confirmation::WaitConfig;
use crate::error::{Error, ZtarknetResult};
use crate::fee::{FeeOverrides, FeePolicy, TransactionVersion};

/// The account that sends transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountConfig {
    pub address: Option<ContractAddress>,
    pub private_key: Option<PrivateKey>,
}

impl AccountConfig {
    /// Identity of the configured account. A missing key yields an identity that can only be
    /// used for queries.
    pub fn identity(&self) -> ZtarknetResult<AccountIdentity> {
        let address = self.address.ok_or_else(|| Error::MissingConfiguration {
            msg: "account address is not set (ACCOUNT_ADDRESS)".to_string(),
        })?;

        Ok(AccountIdentity::new(address, self.private_key))
    }
}

/// Token contracts known to the toolkit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenConfig {
    /// Token fees are paid in; used for minting and account funding
    pub fee_token: Option<ContractAddress>,
    pub strk_token: Option<ContractAddress>,
}

impl TokenConfig {
    pub fn fee_token(&self) -> ZtarknetResult<ContractAddress> {
        self.fee_token.or(self.strk_token).ok_or_else(|| Error::MissingConfiguration {
            msg: "fee token address is not set (FEE_TOKEN)".to_string(),
        })
    }

    pub fn strk_token(&self) -> ZtarknetResult<ContractAddress> {
        self.strk_token.or(self.fee_token).ok_or_else(|| Error::MissingConfiguration {
            msg: "STRK token address is not set (STRK_TOKEN)".to_string(),
        })
    }
}

/// Addresses and classes the operations fall back to when not given explicitly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractDefaults {
    pub account_class_hash: Option<ClassHash>,
    pub counter_address: Option<ContractAddress>,
    pub counter_class_hash: Option<ClassHash>,
}

/// Complete toolkit configuration. Built once by the caller and passed by value; nothing in the
/// core reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitConfig {
    pub rpc_url: Url,
    pub chain_id: ChainId,
    pub account: AccountConfig,
    pub tokens: TokenConfig,
    pub contracts: ContractDefaults,
    pub tx_version: TransactionVersion,
    pub fee_policy: FeePolicy,
    pub fee_overrides: FeeOverrides,
    pub udc: UdcVariant,
    /// Broadcast without simulating first
    pub skip_validate: bool,
    pub wait: WaitConfig,
}

impl ToolkitConfig {
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            chain_id: ChainId::default(),
            account: AccountConfig::default(),
            tokens: TokenConfig::default(),
            contracts: ContractDefaults::default(),
            tx_version: TransactionVersion::default(),
            fee_policy: FeePolicy::default(),
            fee_overrides: FeeOverrides::default(),
            udc: UdcVariant::default(),
            skip_validate: false,
            wait: WaitConfig::default(),
        }
    }
}
