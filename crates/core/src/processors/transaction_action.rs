use idx_codec::TransactionAction;
use idx_db::Repositories;

use crate::{MessageProcessor, ProcessorError};

/// See [`super::InternalTransactionProcessor`]: no counter governs
/// trace-derived topics, so this is insert-only.
pub struct TransactionActionProcessor {
    repos: Repositories,
}

impl TransactionActionProcessor {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for TransactionActionProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let action: TransactionAction = serde_json::from_slice(payload)?;
        self.repos.transaction_action.insert(&action).await?;
        Ok(())
    }
}
