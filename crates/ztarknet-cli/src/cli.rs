use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use url::Url;
use ztarknet_core::account::PrivateKey;
use ztarknet_core::address::UdcVariant;
use ztarknet_core::config::{AccountConfig, ContractDefaults, TokenConfig, ToolkitConfig};
use ztarknet_core::confirmation::{ConfirmationDepth, WaitConfig};
use ztarknet_core::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS, DEFAULT_RPC_URL};
use ztarknet_core::fee::{FeeOverrides, FeePolicy, TransactionVersion};
use ztarknet_types::block_id::BlockId;
use ztarknet_types::chain_id::ChainId;
use ztarknet_types::felt::{parse_felt, parse_u256_amount, Felt};
use ztarknet_types::num_bigint::BigUint;

/// Declare, deploy and interact with contracts on a Starknet-compatible network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) command: Command,

    #[arg(long = "rpc-url", global = true)]
    #[arg(env = "RPC_URL")]
    #[arg(value_name = "URL")]
    #[arg(default_value = DEFAULT_RPC_URL)]
    #[arg(help = "Specify the JSON-RPC endpoint of the node;")]
    rpc_url: Url,

    #[arg(long = "chain-id", global = true)]
    #[arg(env = "CHAIN_ID")]
    #[arg(value_name = "CHAIN_ID")]
    #[arg(default_value = "ZTARKNET")]
    #[arg(help = "Specify the chain ID as hex or short string;")]
    chain_id: ChainId,

    #[arg(long = "account-address", global = true)]
    #[arg(env = "ACCOUNT_ADDRESS")]
    #[arg(value_name = "ADDRESS")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the address of the sending account;")]
    account_address: Option<Felt>,

    #[arg(long = "private-key", global = true)]
    #[arg(env = "ACCOUNT_PRIVATE_KEY")]
    #[arg(value_name = "PRIVATE_KEY")]
    #[arg(value_parser = parse_felt)]
    #[arg(hide_env_values = true)]
    #[arg(help = "Specify the private key of the sending account;")]
    private_key: Option<Felt>,

    #[arg(long = "fee-token", global = true)]
    #[arg(env = "FEE_TOKEN")]
    #[arg(value_name = "ADDRESS")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the token fees are paid in, used for minting and account funding;")]
    fee_token: Option<Felt>,

    #[arg(long = "strk-token", global = true)]
    #[arg(env = "STRK_TOKEN")]
    #[arg(value_name = "ADDRESS")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the STRK token address;")]
    strk_token: Option<Felt>,

    #[arg(long = "account-class-hash", global = true)]
    #[arg(env = "ZTARKNET_ACCOUNT_CLASS_HASH")]
    #[arg(value_name = "CLASS_HASH")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the class of newly created accounts;")]
    account_class_hash: Option<Felt>,

    #[arg(long = "counter-address", global = true)]
    #[arg(env = "COUNTER_CONTRACT_ADDRESS")]
    #[arg(value_name = "ADDRESS")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the contract invoke and read target by default;")]
    counter_address: Option<Felt>,

    #[arg(long = "counter-class-hash", global = true)]
    #[arg(env = "COUNTER_CLASS_HASH")]
    #[arg(value_name = "CLASS_HASH")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the class deployed by default;")]
    counter_class_hash: Option<Felt>,

    #[arg(long = "tx-version", global = true)]
    #[arg(env = "TX_VERSION")]
    #[arg(value_name = "VERSION")]
    #[arg(default_value = "v3")]
    #[arg(help = "Specify the transaction version: v3 (resource bounds) or v1 (max fee);")]
    tx_version: TransactionVersion,

    #[arg(long = "legacy-udc", global = true)]
    #[arg(env = "LEGACY_UDC")]
    #[arg(help = "Deploy through the legacy Universal Deployer Contract;")]
    legacy_udc: bool,

    #[arg(long = "skip-validate", global = true)]
    #[arg(env = "SKIP_VALIDATE")]
    #[arg(help = "Broadcast without simulating first; only for permissive development networks;")]
    skip_validate: bool,

    #[arg(long = "retry-interval-ms", global = true)]
    #[arg(env = "RETRY_INTERVAL_MS")]
    #[arg(value_name = "MILLISECONDS")]
    #[arg(default_value_t = DEFAULT_RETRY_INTERVAL_MS)]
    #[arg(help = "Specify the interval between transaction status checks;")]
    retry_interval_ms: u64,

    #[arg(long = "max-retries", global = true)]
    #[arg(env = "MAX_RETRIES")]
    #[arg(value_name = "COUNT")]
    #[arg(default_value_t = DEFAULT_MAX_RETRIES)]
    #[arg(help = "Specify the number of status checks before giving up;")]
    max_retries: u32,

    #[arg(long = "confirmation", global = true)]
    #[arg(env = "CONFIRMATION_DEPTH")]
    #[arg(value_name = "DEPTH")]
    #[arg(default_value = "accepted-on-l2")]
    #[arg(help = "Specify when a transaction counts as accepted: pre-confirmed, accepted-on-l2 \
                  or accepted-on-l1;")]
    confirmation: ConfirmationDepth,

    #[command(flatten)]
    fee: FeeArgs,
}

#[derive(clap::Args, Debug, Default)]
struct FeeArgs {
    #[arg(long = "max-fee", global = true)]
    #[arg(value_name = "AMOUNT")]
    #[arg(value_parser = parse_u128)]
    #[arg(conflicts_with_all = [
        "l1_gas", "l1_gas_price", "l2_gas", "l2_gas_price", "l1_data_gas", "l1_data_gas_price",
        "tip",
    ])]
    #[arg(help = "Specify the max fee of v1 transactions;")]
    max_fee: Option<u128>,

    #[arg(long = "l1-gas", global = true)]
    #[arg(value_name = "AMOUNT")]
    #[arg(value_parser = parse_u64)]
    l1_gas: Option<u64>,

    #[arg(long = "l1-gas-price", global = true)]
    #[arg(value_name = "PRICE")]
    #[arg(value_parser = parse_u128)]
    l1_gas_price: Option<u128>,

    #[arg(long = "l2-gas", global = true)]
    #[arg(value_name = "AMOUNT")]
    #[arg(value_parser = parse_u64)]
    l2_gas: Option<u64>,

    #[arg(long = "l2-gas-price", global = true)]
    #[arg(value_name = "PRICE")]
    #[arg(value_parser = parse_u128)]
    l2_gas_price: Option<u128>,

    #[arg(long = "l1-data-gas", global = true)]
    #[arg(value_name = "AMOUNT")]
    #[arg(value_parser = parse_u64)]
    l1_data_gas: Option<u64>,

    #[arg(long = "l1-data-gas-price", global = true)]
    #[arg(value_name = "PRICE")]
    #[arg(value_parser = parse_u128)]
    l1_data_gas_price: Option<u128>,

    #[arg(long = "tip", global = true)]
    #[arg(value_name = "TIP")]
    #[arg(value_parser = parse_u64)]
    tip: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Declare a Sierra contract class
    Declare {
        #[arg(long = "sierra-path")]
        #[arg(value_name = "PATH")]
        #[arg(help = "Specify the path of the Sierra contract class artifact;")]
        sierra_path: PathBuf,

        #[arg(long = "casm-path")]
        #[arg(value_name = "PATH")]
        #[arg(required_unless_present = "compiled_class_hash")]
        #[arg(help = "Specify the path of the compiled (CASM) class artifact;")]
        casm_path: Option<PathBuf>,

        #[arg(long = "compiled-class-hash")]
        #[arg(value_name = "HASH")]
        #[arg(value_parser = parse_felt)]
        #[arg(conflicts_with = "casm_path")]
        #[arg(help = "Specify the compiled class hash instead of a CASM artifact;")]
        compiled_class_hash: Option<Felt>,
    },
    /// Deploy an instance of a declared class through the Universal Deployer Contract
    Deploy {
        #[arg(long = "class-hash")]
        #[arg(value_name = "CLASS_HASH")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the class to deploy; defaults to COUNTER_CLASS_HASH;")]
        class_hash: Option<Felt>,

        #[arg(long = "calldata")]
        #[arg(value_name = "FELTS")]
        #[arg(default_value = "")]
        #[arg(help = "Specify comma separated constructor arguments;")]
        calldata: String,

        #[arg(long = "salt")]
        #[arg(value_name = "SALT")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the deployment salt; random if not provided;")]
        salt: Option<Felt>,

        #[arg(long = "not-unique")]
        #[arg(help = "Derive the address independently of the deploying account;")]
        not_unique: bool,
    },
    /// Invoke a state-changing function
    Invoke {
        #[arg(long = "contract")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the target contract; defaults to COUNTER_CONTRACT_ADDRESS;")]
        contract: Option<Felt>,

        #[arg(long = "function")]
        #[arg(value_name = "NAME")]
        #[arg(default_value = "increment")]
        function: String,

        #[arg(long = "calldata")]
        #[arg(value_name = "FELTS")]
        #[arg(default_value = "")]
        #[arg(help = "Specify comma separated function arguments;")]
        calldata: String,

        #[arg(long = "nonce")]
        #[arg(value_name = "NONCE")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Force a nonce instead of reading it from the node;")]
        nonce: Option<Felt>,
    },
    /// Call a view function
    Read {
        #[arg(long = "contract")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the target contract; defaults to COUNTER_CONTRACT_ADDRESS;")]
        contract: Option<Felt>,

        #[arg(long = "function")]
        #[arg(value_name = "NAME")]
        #[arg(default_value = "get_counter")]
        function: String,

        #[arg(long = "calldata")]
        #[arg(value_name = "FELTS")]
        #[arg(default_value = "")]
        calldata: String,

        #[arg(long = "block")]
        #[arg(value_name = "BLOCK_ID")]
        #[arg(default_value = "latest")]
        #[arg(help = "Specify the block: latest, pre_confirmed, a number or a hash;")]
        block: BlockId,
    },
    /// Transfer ERC-20 tokens
    Transfer {
        #[arg(long = "to")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        recipient: Felt,

        #[arg(long = "amount")]
        #[arg(value_name = "DECIMAL_VALUE")]
        #[arg(value_parser = parse_u256_amount)]
        amount: BigUint,

        #[arg(long = "token")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the token; defaults to STRK;")]
        token: Option<Felt>,

        #[arg(long = "from-address")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(requires = "from_key")]
        #[arg(help = "Send from this account instead of the configured one;")]
        from_address: Option<Felt>,

        #[arg(long = "from-key")]
        #[arg(value_name = "PRIVATE_KEY")]
        #[arg(value_parser = parse_felt)]
        #[arg(requires = "from_address")]
        from_key: Option<Felt>,
    },
    /// Mint tokens on a token contract that allows it
    Mint {
        #[arg(long = "to")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the recipient; defaults to the configured account;")]
        recipient: Option<Felt>,

        #[arg(long = "amount")]
        #[arg(value_name = "DECIMAL_VALUE")]
        #[arg(value_parser = parse_u256_amount)]
        amount: Option<BigUint>,

        #[arg(long = "token")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the token; defaults to the fee token;")]
        token: Option<Felt>,

        #[arg(long = "from-address")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        #[arg(requires = "from_key")]
        #[arg(help = "Mint from this account instead of the configured one;")]
        from_address: Option<Felt>,

        #[arg(long = "from-key")]
        #[arg(value_name = "PRIVATE_KEY")]
        #[arg(value_parser = parse_felt)]
        #[arg(requires = "from_address")]
        from_key: Option<Felt>,
    },
    /// Show the token balance of an account
    Balance {
        #[arg(long = "account")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        account: Option<Felt>,

        #[arg(long = "token")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        token: Option<Felt>,
    },
    /// Generate a key, fund the derived address and deploy a new account there
    CreateAccount {
        #[arg(long = "class-hash")]
        #[arg(value_name = "CLASS_HASH")]
        #[arg(value_parser = parse_felt)]
        #[arg(help = "Specify the account class; defaults to ZTARKNET_ACCOUNT_CLASS_HASH;")]
        class_hash: Option<Felt>,

        #[arg(long = "funding-amount")]
        #[arg(value_name = "DECIMAL_VALUE")]
        #[arg(value_parser = parse_u256_amount)]
        funding_amount: Option<BigUint>,
    },
    /// Show nonce and class hash of a deployed account
    CheckAccount {
        #[arg(long = "address")]
        #[arg(value_name = "ADDRESS")]
        #[arg(value_parser = parse_felt)]
        address: Option<Felt>,
    },
}

fn parse_u64(s: &str) -> Result<u64, String> {
    match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|err| format!("{s}: {err}"))
}

fn parse_u128(s: &str) -> Result<u128, String> {
    match s.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|err| format!("{s}: {err}"))
}

impl Args {
    pub(crate) fn to_config(&self) -> Result<ToolkitConfig, anyhow::Error> {
        let private_key = self.private_key.map(PrivateKey::new).transpose()?;

        Ok(ToolkitConfig {
            rpc_url: self.rpc_url.clone(),
            chain_id: self.chain_id,
            account: AccountConfig { address: self.account_address, private_key },
            tokens: TokenConfig {
                fee_token: self.fee_token,
                strk_token: self.strk_token,
            },
            contracts: ContractDefaults {
                account_class_hash: self.account_class_hash,
                counter_address: self.counter_address,
                counter_class_hash: self.counter_class_hash,
            },
            tx_version: self.tx_version,
            fee_policy: FeePolicy::default(),
            fee_overrides: FeeOverrides {
                max_fee: self.fee.max_fee,
                l1_gas: self.fee.l1_gas,
                l1_gas_price: self.fee.l1_gas_price,
                l2_gas: self.fee.l2_gas,
                l2_gas_price: self.fee.l2_gas_price,
                l1_data_gas: self.fee.l1_data_gas,
                l1_data_gas_price: self.fee.l1_data_gas_price,
                tip: self.fee.tip,
            },
            udc: if self.legacy_udc { UdcVariant::Legacy } else { UdcVariant::Current },
            skip_validate: self.skip_validate,
            wait: WaitConfig {
                retry_interval: Duration::from_millis(self.retry_interval_ms),
                max_retries: self.max_retries,
                depth: self.confirmation,
            },
        })
    }
}
