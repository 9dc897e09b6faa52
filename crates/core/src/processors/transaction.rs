use idx_codec::Transaction;
use idx_db::Repositories;
use idx_kv::keys;

use crate::{MessageProcessor, ProcessorError, SharedCoordinator};

/// spec.md §4.5.2: wait for the parent block's transaction counter,
/// insert, decrement, then seed this transaction's own log counter.
pub struct TransactionProcessor {
    repos: Repositories,
    kv: SharedCoordinator,
}

impl TransactionProcessor {
    pub fn new(repos: Repositories, kv: SharedCoordinator) -> Self {
        Self { repos, kv }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for TransactionProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let transaction: Transaction = serde_json::from_slice(payload)?;
        let key = keys::block_transaction_count(transaction.block_hash);

        let mut kv = self.kv.lock().await;
        if kv.get_int(&key).await? == 0 {
            return Err(ProcessorError::ReferentialNotReady(key));
        }

        self.repos.transaction.insert(&transaction).await?;
        kv.decrement_and_maybe_delete(&key).await?;

        if transaction.logs_count > 0 {
            kv.set_int(&keys::transaction_logs_count(transaction.hash), transaction.logs_count as i64).await?;
        }

        Ok(())
    }
}
