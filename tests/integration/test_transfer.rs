use starknet_rs_core::types::Felt;
use starknet_rs_core::utils::get_selector_from_name;
use ztarknet_core::account::PrivateKey;
use ztarknet_core::config::AccountConfig;
use ztarknet_core::Error;
use ztarknet_types::num_bigint::BigUint;

use crate::common::background_node::BackgroundNode;
use crate::common::constants::{
    PREDEPLOYED_ACCOUNT_ADDRESS, PREDEPLOYED_ACCOUNT_INITIAL_BALANCE, STRK_SYMBOL,
    STRK_TOKEN_ADDRESS, TOKEN_DECIMALS,
};
use crate::common::utils::invoke_calldata;

const RECIPIENT: Felt = Felt::from_hex_unchecked("0x5eed");

#[tokio::test]
async fn transfer_moves_balance_and_encodes_u256_limbs() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let amount = BigUint::from(10_u64.pow(18));

    let output = toolkit.transfer(RECIPIENT, &amount, None, None).await.unwrap();
    assert!(output.confirmation.is_accepted());
    assert_eq!(output.contract_address, STRK_TOKEN_ADDRESS);

    let sent = &devnet.node.requests("starknet_addInvokeTransaction")[0];
    assert_eq!(
        invoke_calldata(sent),
        vec![
            Felt::ONE,
            STRK_TOKEN_ADDRESS,
            get_selector_from_name("transfer").unwrap(),
            Felt::from(3_u8),
            RECIPIENT,
            Felt::from(10_u64.pow(18)),
            Felt::ZERO,
        ]
    );

    assert_eq!(devnet.node.balance(STRK_TOKEN_ADDRESS, RECIPIENT), amount);
    assert_eq!(
        devnet.node.balance(STRK_TOKEN_ADDRESS, PREDEPLOYED_ACCOUNT_ADDRESS),
        BigUint::from(PREDEPLOYED_ACCOUNT_INITIAL_BALANCE) - &amount
    );
}

#[tokio::test]
async fn amounts_above_u128_use_the_high_limb() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let two_pow_128 = BigUint::from(1_u8) << 128_u32;

    toolkit.mint(None, Some(&two_pow_128 * 2_u8), None, None).await.unwrap();

    let amount = &two_pow_128 + 5_u8;
    toolkit.transfer(RECIPIENT, &amount, None, None).await.unwrap();

    let sent = &devnet.node.requests("starknet_addInvokeTransaction")[1];
    let calldata = invoke_calldata(sent);
    assert_eq!(&calldata[5..], &[Felt::from(5_u8), Felt::ONE]);
    assert_eq!(devnet.node.balance(STRK_TOKEN_ADDRESS, RECIPIENT), amount);
}

#[tokio::test]
async fn insufficient_balance_is_rejected_at_execution() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let too_much = BigUint::from(PREDEPLOYED_ACCOUNT_INITIAL_BALANCE) * 10_u8;

    match toolkit.transfer(RECIPIENT, &too_much, None, None).await {
        Err(Error::RejectedAtExecution { hash, reason }) => {
            assert_eq!(hash, devnet.node.last_transaction_hash().unwrap());
            assert_eq!(reason.as_deref(), Some("u256_sub Overflow"));
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    // the reverted transaction still consumed its nonce
    assert_eq!(devnet.node.nonce(PREDEPLOYED_ACCOUNT_ADDRESS), Felt::ONE);
    assert_eq!(devnet.node.balance(STRK_TOKEN_ADDRESS, RECIPIENT), BigUint::default());
}

#[tokio::test]
async fn transfer_from_undeployed_sender_is_reported() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let sender = AccountConfig {
        address: Some(Felt::from(0xabcdef_u32)),
        private_key: Some(PrivateKey::new(Felt::from(0x42_u8)).unwrap()),
    };

    match toolkit.transfer(RECIPIENT, &BigUint::from(1_u8), None, Some(&sender)).await {
        Err(Error::AccountNotFound { operation, address }) => {
            assert_eq!(operation, "getNonce");
            assert_eq!(address, Felt::from(0xabcdef_u32));
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(devnet.node.count("starknet_addInvokeTransaction"), 0);
}

#[tokio::test]
async fn mint_defaults_to_own_account_and_balance_reads_metadata() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    toolkit.mint(None, None, None, None).await.unwrap();

    let balance = toolkit.balance(None, None).await.unwrap();
    assert_eq!(balance.account, PREDEPLOYED_ACCOUNT_ADDRESS);
    assert_eq!(balance.token, STRK_TOKEN_ADDRESS);
    assert_eq!(balance.symbol, STRK_SYMBOL);
    assert_eq!(balance.decimals, TOKEN_DECIMALS);
    assert_eq!(
        balance.raw,
        BigUint::from(PREDEPLOYED_ACCOUNT_INITIAL_BALANCE) + BigUint::from(10_u128.pow(19))
    );
}

#[tokio::test]
async fn mint_signed_by_created_account() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let created = toolkit.create_account(None, None).await.unwrap();
    let nonce_before = devnet.node.nonce(PREDEPLOYED_ACCOUNT_ADDRESS);

    let minter = AccountConfig {
        address: Some(created.address),
        private_key: Some(created.key_pair.private_key),
    };
    let amount = BigUint::from(42_u8);
    toolkit.mint(Some(RECIPIENT), Some(amount.clone()), None, Some(&minter)).await.unwrap();

    assert_eq!(devnet.node.nonce(created.address), Felt::TWO);
    assert_eq!(devnet.node.nonce(PREDEPLOYED_ACCOUNT_ADDRESS), nonce_before);
    assert_eq!(devnet.node.balance(STRK_TOKEN_ADDRESS, RECIPIENT), amount);
}

#[tokio::test]
async fn balance_of_fresh_address_is_zero() {
    let devnet = BackgroundNode::spawn().await;
    let balance = devnet.toolkit().balance(Some(RECIPIENT), None).await.unwrap();

    assert_eq!(balance.raw, BigUint::default());
    assert_eq!(balance.account, RECIPIENT);
}
