use idx_codec::TransactionLog;
use idx_db::Repositories;
use idx_kv::keys;

use crate::{MessageProcessor, ProcessorError, SharedCoordinator};

/// spec.md §4.5.3: wait for the parent transaction's log counter,
/// insert the log and its topics in one DB transaction, decrement.
pub struct TransactionLogProcessor {
    repos: Repositories,
    kv: SharedCoordinator,
}

impl TransactionLogProcessor {
    pub fn new(repos: Repositories, kv: SharedCoordinator) -> Self {
        Self { repos, kv }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for TransactionLogProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let log: TransactionLog = serde_json::from_slice(payload)?;
        let key = keys::transaction_logs_count(log.transaction_hash);

        let mut kv = self.kv.lock().await;
        if kv.get_int(&key).await? == 0 {
            return Err(ProcessorError::ReferentialNotReady(key));
        }

        self.repos.transaction_log.insert(&log).await?;
        kv.decrement_and_maybe_delete(&key).await?;

        Ok(())
    }
}
