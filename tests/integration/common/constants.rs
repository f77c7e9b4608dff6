use starknet_rs_core::types::Felt;

pub const PREDEPLOYED_ACCOUNT_ADDRESS: Felt =
    Felt::from_hex_unchecked("0x34ba56f92265f0868c57d3fe72ecab144fc96f97954bbbc4252cef8e8a979ba");
pub const PREDEPLOYED_ACCOUNT_PRIVATE_KEY: Felt =
    Felt::from_hex_unchecked("0xb137668388dbe9acdfa3bc734cc2c469");

pub const ACCOUNT_CLASS_HASH: Felt =
    Felt::from_hex_unchecked("0x061dac032f228abef9c6626f995015233097ae253a7f72d68552db02f2971b8f");
pub const COUNTER_CLASS_HASH: Felt = Felt::from_hex_unchecked("0xc0a7e4");
pub const COUNTER_CONTRACT_ADDRESS: Felt = Felt::from_hex_unchecked("0xc0a7e4add4e55");

pub const ERC20_CLASS_HASH: Felt = Felt::from_hex_unchecked("0xe2c20");
pub const UDC_CLASS_HASH: Felt = Felt::from_hex_unchecked("0x0dc");

pub const STRK_TOKEN_ADDRESS: Felt =
    Felt::from_hex_unchecked("0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d");
pub const STRK_SYMBOL: &str = "STRK";
pub const TOKEN_DECIMALS: u8 = 18;

/// 10**21
pub const PREDEPLOYED_ACCOUNT_INITIAL_BALANCE: u128 = 1_000_000_000_000_000_000_000;

/// Smallest Sierra class the class hash computation accepts
pub const MINIMAL_SIERRA: &str = r#"{
    "sierra_program": ["0x1", "0x2", "0x3", "0x4"],
    "sierra_program_debug_info": { "type_names": [], "libfunc_names": [], "user_func_names": [] },
    "contract_class_version": "0.1.0",
    "entry_points_by_type": { "EXTERNAL": [], "L1_HANDLER": [], "CONSTRUCTOR": [] },
    "abi": []
}"#;
