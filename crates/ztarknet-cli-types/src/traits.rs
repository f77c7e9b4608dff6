use crate::felt::Felt;

/// Produces the canonical hash a transaction is signed over.
pub trait TransactionHashProducer {
    fn calculate_transaction_hash(&self, chain_id: Felt) -> Felt;
}
