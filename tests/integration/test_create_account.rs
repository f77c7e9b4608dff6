use starknet_rs_core::types::Felt;
use ztarknet_core::account::{AccountIdentity, KeyPair};
use ztarknet_core::address::compute_address;
use ztarknet_core::config::AccountConfig;
use ztarknet_core::fee::{FeeOverrides, FeePolicy, TransactionVersion};
use ztarknet_core::rpc_client::{HttpTransport, StarknetClient};
use ztarknet_core::submission::SubmissionClient;
use ztarknet_core::transaction_builder::TransactionBuilder;
use ztarknet_core::{Error, Toolkit};
use ztarknet_types::block_id::BlockId;
use ztarknet_types::chain_id::ChainId;
use ztarknet_types::num_bigint::BigUint;

use crate::common::background_node::BackgroundNode;
use crate::common::constants::{
    ACCOUNT_CLASS_HASH, PREDEPLOYED_ACCOUNT_ADDRESS, PREDEPLOYED_ACCOUNT_INITIAL_BALANCE,
    STRK_TOKEN_ADDRESS,
};
use crate::common::utils::felt_at;

#[tokio::test]
async fn created_account_is_funded_deployed_and_usable() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    let created = toolkit.create_account(None, None).await.unwrap();
    let public_key = created.key_pair.public_key;
    assert_eq!(created.class_hash, ACCOUNT_CLASS_HASH);
    assert_eq!(
        created.address,
        compute_address(public_key, ACCOUNT_CLASS_HASH, &[public_key], Felt::ZERO)
    );
    assert!(created.confirmation.is_accepted());

    assert_eq!(devnet.node.class_hash_at(created.address), Some(ACCOUNT_CLASS_HASH));
    assert_eq!(devnet.node.nonce(created.address), Felt::ONE);
    assert_eq!(
        devnet.node.balance(STRK_TOKEN_ADDRESS, created.address),
        BigUint::from(10_u128.pow(17))
    );

    let status = toolkit.check_account(Some(created.address)).await.unwrap();
    assert_eq!(status.nonce, Felt::ONE);
    assert_eq!(status.class_hash, ACCOUNT_CLASS_HASH);

    // the new account signs its own transactions
    let mut config = devnet.config();
    config.account = AccountConfig {
        address: Some(created.address),
        private_key: Some(created.key_pair.private_key),
    };
    let output = Toolkit::connect(config).invoke(None, "increment", vec![], None).await.unwrap();
    assert!(output.confirmation.is_accepted());
    assert_eq!(devnet.node.nonce(created.address), Felt::TWO);
}

#[tokio::test]
async fn deployment_waits_for_confirmed_funding() {
    let devnet = BackgroundNode::spawn().await;
    let created = devnet.toolkit().create_account(None, None).await.unwrap();

    let history = devnet.node.history();
    let position = |method: &str| history.iter().position(|(name, _)| name == method).unwrap();
    let funding_sent = position("starknet_addInvokeTransaction");
    let deployment_sent = position("starknet_addDeployAccountTransaction");
    assert!(funding_sent < deployment_sent);

    let funding_checks: Vec<usize> = history
        .iter()
        .enumerate()
        .filter(|(_, (name, params))| {
            name == "starknet_getTransactionStatus"
                && felt_at(&params["transaction_hash"]) == created.funding_transaction_hash
        })
        .map(|(index, _)| index)
        .collect();
    assert!(!funding_checks.is_empty());
    assert!(funding_checks.iter().all(|index| *index > funding_sent && *index < deployment_sent));

    let deployment = &history[deployment_sent].1["deploy_account_transaction"];
    assert_eq!(felt_at(&deployment["nonce"]), Felt::ZERO);
    assert_eq!(felt_at(&deployment["contract_address_salt"]), created.key_pair.public_key);
}

#[tokio::test]
async fn failed_funding_stops_before_deployment() {
    let devnet = BackgroundNode::spawn().await;
    let too_much = BigUint::from(PREDEPLOYED_ACCOUNT_INITIAL_BALANCE) + 1_u8;

    match devnet.toolkit().create_account(None, Some(too_much)).await {
        Err(Error::RejectedAtExecution { reason, .. }) => {
            assert_eq!(reason.as_deref(), Some("u256_sub Overflow"))
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(devnet.node.count("starknet_addDeployAccountTransaction"), 0);
}

#[tokio::test]
async fn unfunded_deployment_is_rejected_at_submission() {
    let devnet = BackgroundNode::spawn().await;
    let client = StarknetClient::new(HttpTransport::new(devnet.url.clone()));

    let key_pair = KeyPair::generate().unwrap();
    let public_key = key_pair.public_key;
    let address = compute_address(public_key, ACCOUNT_CLASS_HASH, &[public_key], Felt::ZERO);
    let fee = FeePolicy::default()
        .build_fee_spec(TransactionVersion::V3, &FeeOverrides::default())
        .unwrap();
    let tx = TransactionBuilder::new(ChainId::Ztarknet)
        .build_deploy_account(
            &AccountIdentity::new(address, Some(key_pair.private_key)),
            ACCOUNT_CLASS_HASH,
            vec![public_key],
            public_key,
            &fee,
        )
        .unwrap();

    match SubmissionClient::new(&client, false).submit(&tx, BlockId::PRE_CONFIRMED).await {
        Err(Error::RejectedAtSubmission { sender, reason, .. }) => {
            assert_eq!(sender, address);
            assert!(reason.contains("no balance"), "{reason}");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(devnet.node.class_hash_at(address), None);
}

#[tokio::test]
async fn checking_undeployed_account_reports_not_found() {
    let devnet = BackgroundNode::spawn().await;
    let undeployed = Felt::from(0xbeef_u32);

    match devnet.toolkit().check_account(Some(undeployed)).await {
        Err(Error::AccountNotFound { address, .. }) => assert_eq!(address, undeployed),
        other => panic!("Unexpected result: {other:?}"),
    }

    let status = devnet.toolkit().check_account(None).await.unwrap();
    assert_eq!(status.address, PREDEPLOYED_ACCOUNT_ADDRESS);
    assert_eq!(status.nonce, Felt::ZERO);
}

#[tokio::test]
async fn missing_account_class_is_a_configuration_error() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.contracts.account_class_hash = None;

    assert!(matches!(
        Toolkit::connect(config).create_account(None, None).await,
        Err(Error::MissingConfiguration { .. })
    ));
    assert!(devnet.node.history().is_empty());
}
