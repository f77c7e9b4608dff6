use std::path::Path;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use rand::Rng;
use starknet_rs_core::types::Felt;
use starknet_rs_core::utils::parse_cairo_short_string;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ztarknet_types::block_id::BlockId;
use ztarknet_types::felt::{
    join_u256, Calldata, ClassHash, CompiledClassHash, ContractAddress, ContractAddressSalt,
    Nonce, TransactionHash,
};
use ztarknet_types::json_rpc::ErrorCode;
use ztarknet_types::num_bigint::BigUint;
use ztarknet_types::transactions::FunctionCall;

use crate::account::{AccountIdentity, KeyPair};
use crate::address::compute_address;
use crate::calldata::u256_calldata;
use crate::config::{AccountConfig, ToolkitConfig};
use crate::confirmation::{ConfirmationResult, ConfirmationWaiter};
use crate::constants::{
    BALANCE_OF_ENTRYPOINT, DECIMALS_ENTRYPOINT, DEFAULT_ACCOUNT_FUNDING_AMOUNT,
    DEFAULT_MINT_AMOUNT, DEFAULT_TOKEN_DECIMALS, DEFAULT_TOKEN_SYMBOL, MINT_ENTRYPOINT,
    SYMBOL_ENTRYPOINT, TRANSFER_ENTRYPOINT,
};
use crate::contract_class::{load_declarable_class, CompiledClassSource};
use crate::error::{Error, RpcClientError, ZtarknetResult};
use crate::fee::FeeSpec;
use crate::nonce::NonceResolver;
use crate::rpc_client::{HttpTransport, RpcTransport, StarknetClient};
use crate::submission::{SubmissionClient, TransactionHandle};
use crate::transaction_builder::{selector_from_name, SignedTransaction, TransactionBuilder};

#[derive(Debug, Clone)]
pub struct DeclareOutput {
    pub transaction_hash: TransactionHash,
    pub class_hash: ClassHash,
    pub compiled_class_hash: CompiledClassHash,
    pub confirmation: ConfirmationResult,
}

#[derive(Debug, Clone)]
pub struct DeployOutput {
    pub transaction_hash: TransactionHash,
    pub contract_address: ContractAddress,
    pub class_hash: ClassHash,
    pub salt: ContractAddressSalt,
    pub confirmation: ConfirmationResult,
}

/// Outcome of any single-call invoke: plain invokes, transfers and mints
#[derive(Debug, Clone)]
pub struct InvokeOutput {
    pub transaction_hash: TransactionHash,
    pub contract_address: ContractAddress,
    pub confirmation: ConfirmationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceOutput {
    pub account: ContractAddress,
    pub token: ContractAddress,
    pub raw: BigUint,
    pub symbol: String,
    pub decimals: u8,
}

impl BalanceOutput {
    /// Balance scaled by the token decimals, e.g. `1.500000000000000000`
    pub fn formatted(&self) -> String {
        BigDecimal::new(BigInt::from(self.raw.clone()), i64::from(self.decimals)).to_string()
    }
}

/// A freshly created and deployed account. Holds the only copy of the private key.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub address: ContractAddress,
    pub key_pair: KeyPair,
    pub class_hash: ClassHash,
    pub funding_transaction_hash: TransactionHash,
    pub deploy_transaction_hash: TransactionHash,
    pub confirmation: ConfirmationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountStatus {
    pub address: ContractAddress,
    pub nonce: Nonce,
    pub class_hash: ClassHash,
}

/// The operations of the CLI, each one a complete flow: resolve nonce, build, submit and wait
pub struct Toolkit<T> {
    client: StarknetClient<T>,
    config: ToolkitConfig,
    builder: TransactionBuilder,
    cancellation: CancellationToken,
}

impl Toolkit<HttpTransport> {
    pub fn connect(config: ToolkitConfig) -> Self {
        let transport = HttpTransport::new(config.rpc_url.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: RpcTransport> Toolkit<T> {
    pub fn with_transport(config: ToolkitConfig, transport: T) -> Self {
        let builder = TransactionBuilder::new(config.chain_id);
        Self {
            client: StarknetClient::new(transport),
            config,
            builder,
            cancellation: CancellationToken::new(),
        }
    }

    /// Cancelling `token` stops any confirmation wait in progress. Submitted transactions are
    /// not affected.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn client(&self) -> &StarknetClient<T> {
        &self.client
    }

    fn fee_spec(&self) -> ZtarknetResult<FeeSpec> {
        let fee = self
            .config
            .fee_policy
            .build_fee_spec(self.config.tx_version, &self.config.fee_overrides)?;
        debug!("Using {} fee spec {fee:?}", self.config.tx_version);
        Ok(fee)
    }

    fn sender(&self) -> ZtarknetResult<AccountIdentity> {
        self.config.account.identity()
    }

    async fn pre_confirmed_nonce(&self, address: ContractAddress) -> ZtarknetResult<Nonce> {
        NonceResolver::new(&self.client).get_nonce(address, BlockId::PRE_CONFIRMED).await
    }

    async fn submit_and_wait(
        &self,
        tx: &SignedTransaction,
    ) -> ZtarknetResult<(TransactionHandle, ConfirmationResult)> {
        let handle = SubmissionClient::new(&self.client, self.config.skip_validate)
            .submit(tx, BlockId::PRE_CONFIRMED)
            .await?;

        let confirmation = ConfirmationWaiter::new(&self.client, self.config.wait)
            .wait_with_cancellation(&handle, &self.cancellation)
            .await
            .into_result()?;

        Ok((handle, confirmation))
    }

    pub async fn declare(
        &self,
        sierra_path: &Path,
        compiled_class: &CompiledClassSource,
    ) -> ZtarknetResult<DeclareOutput> {
        let account = self.sender()?;
        let class = load_declarable_class(sierra_path, compiled_class)?;
        let (class_hash, compiled_class_hash) = (class.class_hash, class.compiled_class_hash);
        info!("Declaring class {class_hash:#x} (compiled class hash {compiled_class_hash:#x})");

        let fee = self.fee_spec()?;
        let nonce = self.pre_confirmed_nonce(account.address).await?;
        let tx = self.builder.build_declare(&account, class, nonce, &fee)?;
        let (handle, confirmation) = self.submit_and_wait(&tx).await?;

        if let Some(reported) = handle.class_hash.filter(|reported| *reported != class_hash) {
            warn!("Node reported class hash {reported:#x}, computed {class_hash:#x}");
        }

        Ok(DeclareOutput {
            transaction_hash: handle.hash,
            class_hash,
            compiled_class_hash,
            confirmation,
        })
    }

    /// Deploys through the configured UDC. Without a salt a random one is drawn.
    pub async fn deploy(
        &self,
        class_hash: Option<ClassHash>,
        constructor_calldata: Calldata,
        salt: Option<ContractAddressSalt>,
        unique: bool,
    ) -> ZtarknetResult<DeployOutput> {
        let account = self.sender()?;
        let class_hash = match class_hash.or(self.config.contracts.counter_class_hash) {
            Some(class_hash) => class_hash,
            None => {
                return Err(Error::MissingConfiguration {
                    msg: "class hash to deploy is not set (COUNTER_CLASS_HASH)".to_string(),
                });
            }
        };
        let salt = salt.unwrap_or_else(random_salt);

        let fee = self.fee_spec()?;
        let nonce = self.pre_confirmed_nonce(account.address).await?;
        let tx = self.builder.build_deploy(
            &account,
            self.config.udc,
            class_hash,
            &constructor_calldata,
            salt,
            unique,
            nonce,
            &fee,
        )?;
        let expected_address = tx.contract_address.ok_or(Error::UnexpectedRpcResponse {
            operation: "deploy",
            msg: "deploy transaction carries no contract address".to_string(),
        })?;
        info!("Deploying class {class_hash:#x} to {expected_address:#x} (salt {salt:#x})");

        let (handle, confirmation) = self.submit_and_wait(&tx).await?;

        Ok(DeployOutput {
            transaction_hash: handle.hash,
            contract_address: expected_address,
            class_hash,
            salt,
            confirmation,
        })
    }

    /// Invokes `function` on `contract`, or on the configured counter contract. `nonce` forces
    /// a nonce instead of reading it from the node.
    pub async fn invoke(
        &self,
        contract: Option<ContractAddress>,
        function: &str,
        calldata: Calldata,
        nonce: Option<Nonce>,
    ) -> ZtarknetResult<InvokeOutput> {
        let account = self.sender()?;
        let contract = self.target_contract(contract)?;
        self.invoke_as(&account, contract, function, calldata, nonce).await
    }

    async fn invoke_as(
        &self,
        account: &AccountIdentity,
        contract: ContractAddress,
        function: &str,
        calldata: Calldata,
        nonce: Option<Nonce>,
    ) -> ZtarknetResult<InvokeOutput> {
        let fee = self.fee_spec()?;
        let nonce = NonceResolver::new(&self.client)
            .resolve(account.address, BlockId::PRE_CONFIRMED, nonce)
            .await?;
        let tx = self.builder.build_invoke(account, contract, function, calldata, nonce, &fee)?;
        let (handle, confirmation) = self.submit_and_wait(&tx).await?;

        Ok(InvokeOutput { transaction_hash: handle.hash, contract_address: contract, confirmation })
    }

    fn target_contract(
        &self,
        contract: Option<ContractAddress>,
    ) -> ZtarknetResult<ContractAddress> {
        contract.or(self.config.contracts.counter_address).ok_or_else(|| {
            Error::MissingConfiguration {
                msg: "contract address is not set (COUNTER_CONTRACT_ADDRESS)".to_string(),
            }
        })
    }

    /// Calls a view function without sending a transaction
    pub async fn read(
        &self,
        contract: Option<ContractAddress>,
        function: &str,
        calldata: Calldata,
        block_id: BlockId,
    ) -> ZtarknetResult<Vec<Felt>> {
        let contract = self.target_contract(contract)?;
        self.call(contract, function, calldata, block_id).await
    }

    async fn call(
        &self,
        contract_address: ContractAddress,
        function: &str,
        calldata: Calldata,
        block_id: BlockId,
    ) -> ZtarknetResult<Vec<Felt>> {
        let request = FunctionCall {
            contract_address,
            entry_point_selector: selector_from_name(function)?,
            calldata,
        };

        let result = self.client.call(&request, block_id).await.map_err(|err| match err {
            RpcClientError::Rpc(rpc_err) if rpc_err.code == ErrorCode::CONTRACT_NOT_FOUND => {
                Error::AccountNotFound { operation: "call", address: contract_address }
            }
            other => other.into_error("call"),
        })?;
        debug!(
            "{function} on {contract_address:#x} at {block_id} returned {} felts",
            result.len()
        );
        Ok(result)
    }

    /// The account given on the command line, or the configured one
    fn sender_or(&self, account: Option<&AccountConfig>) -> ZtarknetResult<AccountIdentity> {
        match account {
            Some(account) => account.identity(),
            None => self.sender(),
        }
    }

    /// ERC-20 `transfer(recipient, u256)`. The token defaults to STRK and the sender to the
    /// configured account.
    pub async fn transfer(
        &self,
        recipient: ContractAddress,
        amount: &BigUint,
        token: Option<ContractAddress>,
        sender: Option<&AccountConfig>,
    ) -> ZtarknetResult<InvokeOutput> {
        let account = self.sender_or(sender)?;
        let token = match token {
            Some(token) => token,
            None => self.config.tokens.strk_token()?,
        };

        let [low, high] = u256_calldata(amount)?;
        info!(
            "Transferring {amount} of token {token:#x} from {:#x} to {recipient:#x}",
            account.address
        );
        self.invoke_as(&account, token, TRANSFER_ENTRYPOINT, vec![recipient, low, high], None).await
    }

    /// `mint(recipient, u256)` on the fee token, signed by `minter` or the configured account.
    /// The recipient defaults to the minting account.
    pub async fn mint(
        &self,
        recipient: Option<ContractAddress>,
        amount: Option<BigUint>,
        token: Option<ContractAddress>,
        minter: Option<&AccountConfig>,
    ) -> ZtarknetResult<InvokeOutput> {
        let account = self.sender_or(minter)?;
        let recipient = recipient.unwrap_or(account.address);
        let amount = amount.unwrap_or_else(|| BigUint::from(DEFAULT_MINT_AMOUNT));
        let token = match token {
            Some(token) => token,
            None => self.config.tokens.fee_token()?,
        };

        let [low, high] = u256_calldata(&amount)?;
        info!(
            "Minting {amount} of token {token:#x} to {recipient:#x} as {:#x}",
            account.address
        );
        self.invoke_as(&account, token, MINT_ENTRYPOINT, vec![recipient, low, high], None).await
    }

    /// `balanceOf` of `account` (the configured account by default). Symbol and decimals are
    /// read when the token exposes them.
    pub async fn balance(
        &self,
        account: Option<ContractAddress>,
        token: Option<ContractAddress>,
    ) -> ZtarknetResult<BalanceOutput> {
        let account = match account {
            Some(account) => account,
            None => self.sender()?.address,
        };
        let token = match token {
            Some(token) => token,
            None => self.config.tokens.strk_token()?,
        };

        let result =
            self.call(token, BALANCE_OF_ENTRYPOINT, vec![account], BlockId::LATEST).await?;
        let raw = match result.as_slice() {
            [low, high, ..] => join_u256(*low, *high)?,
            [single] => single.to_biguint(),
            [] => {
                return Err(Error::UnexpectedRpcResponse {
                    operation: "balanceOf",
                    msg: format!("empty result from token {token:#x}"),
                });
            }
        };

        let symbol = self
            .optional_call(token, SYMBOL_ENTRYPOINT)
            .await
            .and_then(|felt| parse_cairo_short_string(&felt).ok())
            .unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string());
        let decimals = self
            .optional_call(token, DECIMALS_ENTRYPOINT)
            .await
            .and_then(|felt| u8::try_from(felt.to_biguint()).ok())
            .unwrap_or(DEFAULT_TOKEN_DECIMALS);

        Ok(BalanceOutput { account, token, raw, symbol, decimals })
    }

    async fn optional_call(&self, token: ContractAddress, function: &str) -> Option<Felt> {
        match self.call(token, function, vec![], BlockId::LATEST).await {
            Ok(result) => result.first().copied(),
            Err(err) => {
                debug!("Token {token:#x} has no usable {function}: {err}");
                None
            }
        }
    }

    /// Generates a key, funds the derived address from the configured account and deploys the
    /// account there. Funding is confirmed before the deployment is built.
    pub async fn create_account(
        &self,
        class_hash: Option<ClassHash>,
        funding_amount: Option<BigUint>,
    ) -> ZtarknetResult<CreatedAccount> {
        let funder = self.sender()?;
        let class_hash = match class_hash.or(self.config.contracts.account_class_hash) {
            Some(class_hash) => class_hash,
            None => {
                return Err(Error::MissingConfiguration {
                    msg: "account class hash is not set (ZTARKNET_ACCOUNT_CLASS_HASH)".to_string(),
                });
            }
        };
        let fee_token = self.config.tokens.fee_token()?;
        let funding_amount =
            funding_amount.unwrap_or_else(|| BigUint::from(DEFAULT_ACCOUNT_FUNDING_AMOUNT));

        let key_pair = KeyPair::generate()?;
        let public_key = key_pair.public_key;
        let constructor_calldata = vec![public_key];
        let address = compute_address(public_key, class_hash, &constructor_calldata, Felt::ZERO);
        info!("New account address {address:#x} (class {class_hash:#x})");

        let [low, high] = u256_calldata(&funding_amount)?;
        let funding = self
            .invoke_as(&funder, fee_token, TRANSFER_ENTRYPOINT, vec![address, low, high], None)
            .await?;
        info!("Funded {address:#x} with {funding_amount} in {:#x}", funding.transaction_hash);

        let new_account = AccountIdentity::new(address, Some(key_pair.private_key));
        let fee = self.fee_spec()?;
        let tx = self.builder.build_deploy_account(
            &new_account,
            class_hash,
            constructor_calldata,
            public_key,
            &fee,
        )?;
        let (handle, confirmation) = self.submit_and_wait(&tx).await?;

        if let Some(reported) = handle.contract_address.filter(|reported| *reported != address) {
            warn!("Node reported account address {reported:#x}, derived {address:#x}");
        }

        Ok(CreatedAccount {
            address,
            key_pair,
            class_hash,
            funding_transaction_hash: funding.transaction_hash,
            deploy_transaction_hash: handle.hash,
            confirmation,
        })
    }

    /// Nonce and class hash of a deployed account, the configured one by default
    pub async fn check_account(
        &self,
        address: Option<ContractAddress>,
    ) -> ZtarknetResult<AccountStatus> {
        let address = match address {
            Some(address) => address,
            None => self.sender()?.address,
        };

        let nonce = NonceResolver::new(&self.client).get_nonce(address, BlockId::LATEST).await?;
        let class_hash =
            self.client.get_class_hash_at(BlockId::LATEST, address).await.map_err(|err| {
                match err {
                    RpcClientError::Rpc(rpc_err)
                        if rpc_err.code == ErrorCode::CONTRACT_NOT_FOUND =>
                    {
                        Error::AccountNotFound { operation: "getClassHashAt", address }
                    }
                    other => other.into_error("getClassHashAt"),
                }
            })?;

        Ok(AccountStatus { address, nonce, class_hash })
    }
}

fn random_salt() -> ContractAddressSalt {
    let bytes: [u8; 32] = rand::rng().random();
    Felt::from_bytes_be(&bytes)
}
