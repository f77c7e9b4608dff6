use std::time::Duration;

use tokio::task::JoinHandle;
use url::Url;
use ztarknet_core::account::PrivateKey;
use ztarknet_core::config::{AccountConfig, ContractDefaults, TokenConfig, ToolkitConfig};
use ztarknet_core::confirmation::{ConfirmationDepth, WaitConfig};
use ztarknet_core::rpc_client::HttpTransport;
use ztarknet_core::Toolkit;

use super::constants::{
    ACCOUNT_CLASS_HASH, COUNTER_CLASS_HASH, COUNTER_CONTRACT_ADDRESS, PREDEPLOYED_ACCOUNT_ADDRESS,
    PREDEPLOYED_ACCOUNT_PRIVATE_KEY, STRK_TOKEN_ADDRESS,
};
use super::mock_node::MockNode;

/// A [`MockNode`] served over HTTP on a random local port. The server stops when this is
/// dropped.
pub struct BackgroundNode {
    pub url: Url,
    pub node: MockNode,
    server: JoinHandle<()>,
}

impl BackgroundNode {
    pub async fn spawn() -> Self {
        Self::spawn_with_node(MockNode::default()).await
    }

    pub async fn spawn_with_node(node: MockNode) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let router = node.router();

        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                eprintln!("Mock node stopped: {err}");
            }
        });

        let url = Url::parse(&format!("http://{address}")).unwrap();
        Self { url, node, server }
    }

    /// Configuration pointing at this node, sending from the predeployed account. Status
    /// polling is fast and bounded.
    pub fn config(&self) -> ToolkitConfig {
        let mut config = ToolkitConfig::new(self.url.clone());
        config.account = AccountConfig {
            address: Some(PREDEPLOYED_ACCOUNT_ADDRESS),
            private_key: Some(PrivateKey::new(PREDEPLOYED_ACCOUNT_PRIVATE_KEY).unwrap()),
        };
        config.tokens = TokenConfig {
            fee_token: Some(STRK_TOKEN_ADDRESS),
            strk_token: Some(STRK_TOKEN_ADDRESS),
        };
        config.contracts = ContractDefaults {
            account_class_hash: Some(ACCOUNT_CLASS_HASH),
            counter_address: Some(COUNTER_CONTRACT_ADDRESS),
            counter_class_hash: Some(COUNTER_CLASS_HASH),
        };
        config.wait = WaitConfig {
            retry_interval: Duration::from_millis(10),
            max_retries: 50,
            depth: ConfirmationDepth::AcceptedOnL2,
        };
        config
    }

    pub fn toolkit(&self) -> Toolkit<HttpTransport> {
        Toolkit::connect(self.config())
    }
}

impl Drop for BackgroundNode {
    fn drop(&mut self) {
        self.server.abort();
    }
}
