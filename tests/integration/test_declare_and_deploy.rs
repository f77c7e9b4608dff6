use std::path::Path;

use starknet_rs_core::types::contract::SierraClass;
use starknet_rs_core::types::Felt;
use ztarknet_core::address::{compute_address, UdcVariant};
use ztarknet_core::contract_class::CompiledClassSource;
use ztarknet_core::fee::TransactionVersion;
use ztarknet_core::{Error, Toolkit};
use ztarknet_types::block_id::BlockId;

use crate::common::background_node::BackgroundNode;
use crate::common::constants::{COUNTER_CLASS_HASH, MINIMAL_SIERRA, PREDEPLOYED_ACCOUNT_ADDRESS};
use crate::common::utils::UniqueAutoDeletableFile;

const COMPILED_CLASS_HASH: Felt = Felt::from_hex_unchecked("0xcafe");

fn expected_class_hash() -> Felt {
    serde_json::from_str::<SierraClass>(MINIMAL_SIERRA).unwrap().class_hash().unwrap()
}

#[tokio::test]
async fn declare_registers_class_and_duplicate_is_rejected() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let sierra = UniqueAutoDeletableFile::with_content("declare.sierra.json", MINIMAL_SIERRA);
    let compiled = CompiledClassSource::Hash(COMPILED_CLASS_HASH);

    let output = toolkit.declare(sierra.path(), &compiled).await.unwrap();
    assert_eq!(output.class_hash, expected_class_hash());
    assert_eq!(output.compiled_class_hash, COMPILED_CLASS_HASH);
    assert!(output.confirmation.is_accepted());
    assert!(devnet.node.is_declared(output.class_hash));

    let sent = &devnet.node.requests("starknet_addDeclareTransaction")[0]["declare_transaction"];
    assert_eq!(sent["type"], "DECLARE");
    assert!(sent.get("class_hash").is_none());

    match toolkit.declare(sierra.path(), &compiled).await {
        Err(Error::RejectedAtSubmission { reason, .. }) => {
            assert!(reason.contains("already declared"), "{reason}");
            assert!(reason.contains(&format!("{:#x}", output.class_hash)), "{reason}");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert_eq!(devnet.node.count("starknet_addDeclareTransaction"), 1);
}

#[tokio::test]
async fn legacy_declare_is_accepted() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.tx_version = TransactionVersion::LegacyV1;
    let sierra = UniqueAutoDeletableFile::with_content("legacy.sierra.json", MINIMAL_SIERRA);

    let output = Toolkit::connect(config)
        .declare(sierra.path(), &CompiledClassSource::Hash(COMPILED_CLASS_HASH))
        .await
        .unwrap();
    assert!(devnet.node.is_declared(output.class_hash));
}

#[tokio::test]
async fn missing_sierra_file_fails_before_any_request() {
    let devnet = BackgroundNode::spawn().await;
    let compiled = CompiledClassSource::Hash(COMPILED_CLASS_HASH);

    let result =
        devnet.toolkit().declare(Path::new("/nonexistent/counter.sierra.json"), &compiled).await;
    assert!(matches!(result, Err(Error::ContractClassLoad { .. })));
    assert!(devnet.node.history().is_empty());
}

#[tokio::test]
async fn declared_class_is_deployed_at_reported_address() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();
    let sierra = UniqueAutoDeletableFile::with_content("deploy.sierra.json", MINIMAL_SIERRA);

    let declared = toolkit
        .declare(sierra.path(), &CompiledClassSource::Hash(COMPILED_CLASS_HASH))
        .await
        .unwrap();

    let salt = Felt::from(0x7b_u8);
    let output = toolkit.deploy(Some(declared.class_hash), vec![], Some(salt), true).await.unwrap();
    assert_eq!(output.salt, salt);
    assert_eq!(
        output.contract_address,
        UdcVariant::Current.deployed_address(
            PREDEPLOYED_ACCOUNT_ADDRESS,
            salt,
            true,
            declared.class_hash,
            &[]
        )
    );
    assert_eq!(devnet.node.class_hash_at(output.contract_address), Some(declared.class_hash));

    let counter = toolkit
        .read(Some(output.contract_address), "get_counter", vec![], BlockId::LATEST)
        .await
        .unwrap();
    assert_eq!(counter, vec![Felt::ZERO]);
}

#[tokio::test]
async fn legacy_udc_deploy_without_uniqueness() {
    let devnet = BackgroundNode::spawn().await;
    let mut config = devnet.config();
    config.udc = UdcVariant::Legacy;
    let toolkit = Toolkit::connect(config);

    let salt = Felt::from(0x15_u8);
    let calldata = vec![Felt::from(5_u8)];
    let output = toolkit.deploy(None, calldata.clone(), Some(salt), false).await.unwrap();

    assert_eq!(output.class_hash, COUNTER_CLASS_HASH);
    assert_eq!(
        output.contract_address,
        compute_address(salt, COUNTER_CLASS_HASH, &calldata, Felt::ZERO)
    );
    assert_eq!(devnet.node.class_hash_at(output.contract_address), Some(COUNTER_CLASS_HASH));
}

#[tokio::test]
async fn deploying_undeclared_class_reverts() {
    let devnet = BackgroundNode::spawn().await;
    let undeclared = Felt::from(0x404_u32);

    match devnet.toolkit().deploy(Some(undeclared), vec![], None, true).await {
        Err(Error::RejectedAtExecution { reason: Some(reason), .. }) => {
            assert!(reason.contains("not declared"), "{reason}")
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn random_salts_give_distinct_addresses() {
    let devnet = BackgroundNode::spawn().await;
    let toolkit = devnet.toolkit();

    let first = toolkit.deploy(None, vec![], None, true).await.unwrap();
    let second = toolkit.deploy(None, vec![], None, true).await.unwrap();
    assert_ne!(first.salt, second.salt);
    assert_ne!(first.contract_address, second.contract_address);
}
