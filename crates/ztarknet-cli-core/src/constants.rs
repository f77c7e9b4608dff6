use starknet_rs_core::types::Felt;

pub const DEFAULT_RPC_URL: &str = "http://localhost:9944";

/// Cairo short string "STARKNET_CONTRACT_ADDRESS"
pub const CONTRACT_ADDRESS_PREFIX: Felt =
    Felt::from_hex_unchecked("0x535441524b4e45545f434f4e54524143545f41444452455353");

/// 2**251 - 256
pub const ADDR_BOUND: Felt =
    Felt::from_hex_unchecked("0x7ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff00");

/// Order of the STARK curve generator
pub const EC_ORDER: Felt =
    Felt::from_hex_unchecked("0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f");

/// Universal Deployer Contract exposing `deploy_contract` (Cairo 1)
pub const UDC_CONTRACT_ADDRESS: Felt =
    Felt::from_hex_unchecked("0x02ceed65a4bd731034c01113685c831b01c15d7d432f71afb1cf1634b53a2125");
pub const UDC_ENTRYPOINT: &str = "deploy_contract";

/// Legacy Universal Deployer Contract exposing `deployContract` (Cairo 0)
pub const LEGACY_UDC_CONTRACT_ADDRESS: Felt =
    Felt::from_hex_unchecked("0x041a78e741e5af2fec34b695679bc6891742439f7afb8484ecd7766661ad02bf");
pub const LEGACY_UDC_ENTRYPOINT: &str = "deployContract";

pub const ACCOUNT_EXECUTE_ENTRYPOINT: &str = "__execute__";
pub const TRANSFER_ENTRYPOINT: &str = "transfer";
pub const MINT_ENTRYPOINT: &str = "mint";
pub const BALANCE_OF_ENTRYPOINT: &str = "balanceOf";
pub const SYMBOL_ENTRYPOINT: &str = "symbol";
pub const DECIMALS_ENTRYPOINT: &str = "decimals";

// V3 resource bound defaults
pub const DEFAULT_L1_GAS_MAX_AMOUNT: u64 = 0x1000;
pub const DEFAULT_L1_GAS_MAX_PRICE_PER_UNIT: u128 = 0x5f5e100;
pub const DEFAULT_L2_GAS_MAX_AMOUNT: u64 = 0x100000;
pub const DEFAULT_L2_GAS_MAX_PRICE_PER_UNIT: u128 = 0x5f5e100;
pub const DEFAULT_L1_DATA_GAS_MAX_AMOUNT: u64 = 0x1000;
pub const DEFAULT_L1_DATA_GAS_MAX_PRICE_PER_UNIT: u128 = 0x5f5e100;
pub const DEFAULT_TIP: u64 = 0;

/// 10**15
pub const DEFAULT_LEGACY_MAX_FEE: u128 = 1_000_000_000_000_000;

/// 10**19
pub const DEFAULT_MINT_AMOUNT: u128 = 10_000_000_000_000_000_000;
/// 10**17
pub const DEFAULT_ACCOUNT_FUNDING_AMOUNT: u128 = 100_000_000_000_000_000;

pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;
pub const DEFAULT_TOKEN_SYMBOL: &str = "tokens";

pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_RETRIES: u32 = 600;
