use starknet_rs_core::types::Felt;
use ztarknet_core::account::PrivateKey;
use ztarknet_core::fee::TransactionVersion;
use ztarknet_core::{Error, Toolkit};
use ztarknet_types::block_id::BlockId;

use crate::common::background_node::BackgroundNode;
use crate::common::constants::{COUNTER_CONTRACT_ADDRESS, PREDEPLOYED_ACCOUNT_ADDRESS};
use crate::common::utils::felt_at;

#[tokio::test]
async fn increment_is_visible_to_read() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    let before = toolkit.read(None, "get_counter", vec![], BlockId::LATEST).await.unwrap();
    assert_eq!(before, vec![Felt::ZERO]);

    let output = toolkit.invoke(None, "increment", vec![], None).await.unwrap();
    assert!(output.confirmation.is_accepted());
    assert_eq!(output.contract_address, COUNTER_CONTRACT_ADDRESS);
    assert!(output.confirmation.block_info.and_then(|info| info.block_number).is_some());

    let after = toolkit.read(None, "get_counter", vec![], BlockId::LATEST).await.unwrap();
    assert_eq!(after, vec![Felt::ONE]);
    assert_eq!(devnet.node.nonce(PREDEPLOYED_ACCOUNT_ADDRESS), Felt::ONE);
}

#[tokio::test]
async fn consecutive_invokes_read_a_fresh_nonce_each_time() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    for _ in 0..3 {
        toolkit.invoke(None, "increment", vec![], None).await.unwrap();
    }

    let nonces: Vec<Felt> = devnet
        .node
        .requests("starknet_addInvokeTransaction")
        .iter()
        .map(|params| felt_at(&params["invoke_transaction"]["nonce"]))
        .collect();
    assert_eq!(nonces, vec![Felt::ZERO, Felt::ONE, Felt::TWO]);
    assert_eq!(devnet.node.count("starknet_getNonce"), 3);
}

#[tokio::test]
async fn reused_nonce_is_rejected_before_broadcast() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    toolkit.invoke(None, "increment", vec![], None).await.unwrap();

    match toolkit.invoke(None, "increment", vec![], Some(Felt::ZERO)).await {
        Err(Error::RejectedAtSubmission { operation, sender, reason }) => {
            assert_eq!(operation, "simulateTransactions");
            assert_eq!(sender, PREDEPLOYED_ACCOUNT_ADDRESS);
            assert!(reason.contains("nonce"), "{reason}");
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    assert_eq!(devnet.node.count("starknet_addInvokeTransaction"), 1);
    assert_eq!(devnet.node.nonce(PREDEPLOYED_ACCOUNT_ADDRESS), Felt::ONE);
}

#[tokio::test]
async fn reused_nonce_without_validation_is_refused_by_the_node() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.skip_validate = true;
    let toolkit = Toolkit::connect(config);

    toolkit.invoke(None, "increment", vec![], None).await.unwrap();

    match toolkit.invoke(None, "increment", vec![], Some(Felt::ZERO)).await {
        Err(Error::RejectedAtSubmission { operation, reason, .. }) => {
            assert_eq!(operation, "addTransaction");
            assert!(reason.contains("Account nonce: 0x1"), "{reason}");
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    assert_eq!(devnet.node.count("starknet_simulateTransactions"), 0);
    let counter = toolkit.read(None, "get_counter", vec![], BlockId::LATEST).await.unwrap();
    assert_eq!(counter, vec![Felt::ONE]);
}

#[tokio::test]
async fn wrong_key_fails_validation() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.account.private_key = Some(PrivateKey::new(Felt::from(0x1234_u32)).unwrap());
    let toolkit = Toolkit::connect(config);

    match toolkit.invoke(None, "increment", vec![], None).await {
        Err(Error::RejectedAtSubmission { reason, .. }) => {
            assert!(reason.contains("invalid signature"), "{reason}")
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    assert_eq!(devnet.node.count("starknet_addInvokeTransaction"), 0);
    assert_eq!(devnet.node.count("starknet_getTransactionStatus"), 0);
}

#[tokio::test]
async fn account_without_key_cannot_invoke() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.account.private_key = None;
    let toolkit = Toolkit::connect(config);

    assert!(matches!(
        toolkit.invoke(None, "increment", vec![], None).await,
        Err(Error::UnsignedAccount { .. })
    ));
    assert_eq!(devnet.node.count("starknet_simulateTransactions"), 0);
}

#[tokio::test]
async fn legacy_invoke_is_accepted() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.tx_version = TransactionVersion::LegacyV1;
    let toolkit = Toolkit::connect(config);

    toolkit.invoke(None, "increment", vec![], None).await.unwrap();

    let sent = &devnet.node.requests("starknet_addInvokeTransaction")[0]["invoke_transaction"];
    assert_eq!(felt_at(&sent["version"]), Felt::ONE);
    assert!(sent.get("max_fee").is_some());
    assert!(sent.get("resource_bounds").is_none());

    let counter = toolkit.read(None, "get_counter", vec![], BlockId::LATEST).await.unwrap();
    assert_eq!(counter, vec![Felt::ONE]);
}

#[tokio::test]
async fn reading_unknown_contract_reports_address() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let unknown = Felt::from(0xdead_u32);

    match toolkit.read(Some(unknown), "get_counter", vec![], BlockId::LATEST).await {
        Err(Error::AccountNotFound { address, .. }) => assert_eq!(address, unknown),
        other => panic!("Unexpected result: {other:?}"),
    }
}
