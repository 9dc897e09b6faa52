use idx_codec::InternalTransaction;
use idx_db::Repositories;

use crate::{MessageProcessor, ProcessorError};

/// spec.md §4.5's key schema has no counter for traces — a
/// transaction's internal_transaction/transaction_action messages
/// are fanned out independently of the log counter, so this
/// processor is insert-only (the DB has no foreign keys to violate;
/// spec.md §5).
pub struct InternalTransactionProcessor {
    repos: Repositories,
}

impl InternalTransactionProcessor {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for InternalTransactionProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let internal_tx: InternalTransaction = serde_json::from_slice(payload)?;
        self.repos.internal_transaction.insert(&internal_tx).await?;
        Ok(())
    }
}
