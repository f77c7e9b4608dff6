use std::time::Duration;

use starknet_rs_core::types::Felt;
use tokio_util::sync::CancellationToken;
use ztarknet_core::confirmation::{
    ConfirmationDepth, ConfirmationStatus, ConfirmationWaiter, WaitConfig,
};
use ztarknet_core::submission::TransactionHandle;
use ztarknet_core::{Error, Toolkit};
use ztarknet_types::json_rpc::{ErrorCode, RpcError};
use ztarknet_types::transactions::TransactionKind;

use crate::common::background_node::BackgroundNode;
use crate::common::mock_node::Acceptance;

const STATUS_METHOD: &str = "starknet_getTransactionStatus";

fn handle(hash: Felt) -> TransactionHandle {
    TransactionHandle {
        hash,
        kind: TransactionKind::Invoke,
        class_hash: None,
        contract_address: None,
    }
}

#[tokio::test]
async fn never_finalized_transaction_times_out_after_budget() {
    let devnet = BackgroundNode::spawn().await;
    devnet.node.set_acceptance(Acceptance::Never);
    let mut config = devnet.config();
    config.wait.max_retries = 2;
    let toolkit = Toolkit::connect(config);

    let err = toolkit.invoke(None, "increment", vec![], None).await.unwrap_err();
    match &err {
        Error::TimedOut { hash, attempts } => {
            assert_eq!(*attempts, 2);
            assert_eq!(Some(*hash), devnet.node.last_transaction_hash());
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    assert!(err.is_recoverable());
    assert_eq!(devnet.node.count(STATUS_METHOD), 2);
}

#[tokio::test]
async fn timed_out_transaction_can_still_be_confirmed_later() {
    let devnet = BackgroundNode::spawn().await;
    devnet.node.set_acceptance(Acceptance::Never);
    let mut config = devnet.config();
    config.wait.max_retries = 1;
    let toolkit = Toolkit::connect(config);

    let Err(Error::TimedOut { hash, .. }) = toolkit.invoke(None, "increment", vec![], None).await
    else {
        panic!("Expected a timeout");
    };

    devnet.node.set_acceptance(Acceptance::AfterChecks(0));
    let waiter = ConfirmationWaiter::new(toolkit.client(), devnet.config().wait);
    let result = waiter.wait(&handle(hash)).await;
    assert_eq!(result.status, ConfirmationStatus::Accepted);
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn cancelled_wait_reports_hash_and_leaves_transaction_alone() {
    let devnet = BackgroundNode::spawn().await;
    devnet.node.set_acceptance(Acceptance::Never);
    let cancellation = CancellationToken::new();
    let toolkit = devnet.toolkit().with_cancellation(cancellation.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancellation.cancel();
    });

    let err = toolkit.invoke(None, "increment", vec![], None).await.unwrap_err();
    canceller.await.unwrap();

    let Error::WaitCancelled { hash } = err else {
        panic!("Unexpected error: {err:?}");
    };
    assert_eq!(Some(hash), devnet.node.last_transaction_hash());
    let checks_at_cancellation = devnet.node.count(STATUS_METHOD);
    assert!(checks_at_cancellation < 50);

    // the transaction stays with the node and can be observed again
    devnet.node.set_acceptance(Acceptance::AfterChecks(0));
    let waiter = ConfirmationWaiter::new(toolkit.client(), devnet.config().wait);
    assert!(waiter.wait(&handle(hash)).await.is_accepted());
}

#[tokio::test]
async fn unknown_hash_and_unavailable_node_do_not_abort_the_wait() {
    let devnet = BackgroundNode::spawn().await;
    devnet.node.set_acceptance(Acceptance::AfterChecks(0));
    devnet.node.fail_next(
        STATUS_METHOD,
        RpcError::new(ErrorCode::TRANSACTION_HASH_NOT_FOUND, "Transaction hash not found"),
    );
    devnet.node.make_unavailable(STATUS_METHOD, 2);

    let output = devnet.toolkit().invoke(None, "increment", vec![], None).await.unwrap();
    assert!(output.confirmation.is_accepted());
    assert_eq!(output.confirmation.attempts, 4);
    assert_eq!(devnet.node.count(STATUS_METHOD), 4);
}

#[tokio::test]
async fn l1_depth_is_not_reached_by_l2_acceptance() {
    let devnet = BackgroundNode::spawn().await;
    devnet.node.set_acceptance(Acceptance::AfterChecks(3));

    let mut config = devnet.config();
    config.wait = WaitConfig {
        retry_interval: Duration::from_millis(1),
        max_retries: 10,
        depth: ConfirmationDepth::AcceptedOnL1,
    };
    let toolkit = Toolkit::connect(config);

    // the node never reaches L1, so the strictest depth runs out of checks
    match toolkit.invoke(None, "increment", vec![], None).await {
        Err(Error::TimedOut { attempts, .. }) => assert_eq!(attempts, 10),
        other => panic!("Unexpected result: {other:?}"),
    }
}
