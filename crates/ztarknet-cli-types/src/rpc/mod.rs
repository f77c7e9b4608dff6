pub mod block_id;
pub mod contract_class;
pub mod json_rpc;
pub mod transaction_receipt;
pub mod transaction_status;
pub mod transactions;
