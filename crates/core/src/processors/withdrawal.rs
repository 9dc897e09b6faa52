use idx_codec::Withdrawal;
use idx_db::Repositories;
use idx_kv::keys;

use crate::{MessageProcessor, ProcessorError, SharedCoordinator};

/// spec.md §4.5.4: analogous to TransactionProcessor's counter
/// check/insert/decrement, keyed on the parent block's withdrawal
/// count.
pub struct WithdrawalProcessor {
    repos: Repositories,
    kv: SharedCoordinator,
}

impl WithdrawalProcessor {
    pub fn new(repos: Repositories, kv: SharedCoordinator) -> Self {
        Self { repos, kv }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for WithdrawalProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let withdrawal: Withdrawal = serde_json::from_slice(payload)?;
        let key = keys::block_withdrawal_count(withdrawal.block_hash);

        let mut kv = self.kv.lock().await;
        if kv.get_int(&key).await? == 0 {
            return Err(ProcessorError::ReferentialNotReady(key));
        }

        self.repos.withdrawal.insert(&withdrawal).await?;
        kv.decrement_and_maybe_delete(&key).await?;

        Ok(())
    }
}
