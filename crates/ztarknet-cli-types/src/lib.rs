pub mod chain_id;
pub mod error;
pub mod felt;
pub mod rpc;
pub mod serde_helpers;
pub mod traits;

// Re export libraries
pub use num_bigint;
pub use rpc::{
    block_id, contract_class, json_rpc, transaction_receipt, transaction_status, transactions,
};
