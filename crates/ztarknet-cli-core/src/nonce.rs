use tracing::{debug, info};
use ztarknet_types::block_id::BlockId;
use ztarknet_types::felt::{ContractAddress, Nonce};
use ztarknet_types::json_rpc::ErrorCode;

use crate::error::{Error, RpcClientError, ZtarknetResult};
use crate::rpc_client::{RpcTransport, StarknetClient};

const OPERATION: &str = "getNonce";

/// Reads account nonces from the node. The node is the only authority; nothing is cached
/// between calls.
pub struct NonceResolver<'a, T> {
    client: &'a StarknetClient<T>,
}

impl<'a, T: RpcTransport> NonceResolver<'a, T> {
    pub fn new(client: &'a StarknetClient<T>) -> Self {
        Self { client }
    }

    pub async fn get_nonce(
        &self,
        address: ContractAddress,
        block_id: BlockId,
    ) -> ZtarknetResult<Nonce> {
        let nonce = self.client.get_nonce(block_id, address).await.map_err(|err| match err {
            RpcClientError::Rpc(rpc_err) if rpc_err.code == ErrorCode::CONTRACT_NOT_FOUND => {
                Error::AccountNotFound { operation: OPERATION, address }
            }
            other => other.into_error(OPERATION),
        })?;

        info!("Nonce of {address:#x} at {block_id}: {nonce:#x}");
        Ok(nonce)
    }

    /// Uses `explicit` when the caller forces a nonce, otherwise asks the node
    pub async fn resolve(
        &self,
        address: ContractAddress,
        block_id: BlockId,
        explicit: Option<Nonce>,
    ) -> ZtarknetResult<Nonce> {
        match explicit {
            Some(nonce) => {
                debug!("Using caller supplied nonce {nonce:#x} for {address:#x}");
                Ok(nonce)
            }
            None => self.get_nonce(address, block_id).await,
        }
    }
}
