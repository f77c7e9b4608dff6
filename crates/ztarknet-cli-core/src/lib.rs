pub mod account;
pub mod address;
pub mod calldata;
pub mod confirmation;
pub mod config;
pub mod constants;
pub mod contract_class;
pub mod error;
pub mod fee;
pub mod nonce;
pub mod rpc_client;
pub mod submission;
pub mod toolkit;
pub mod transaction_builder;

pub use error::{Error, ZtarknetResult};
pub use toolkit::Toolkit;
