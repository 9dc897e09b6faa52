use idx_codec::Block;
use idx_db::Repositories;
use idx_kv::keys;

use crate::{MessageProcessor, ProcessorError, SharedCoordinator};

/// spec.md §4.5.1: insert the block row, then seed the reference
/// counters its children will decrement.
pub struct BlockProcessor {
    repos: Repositories,
    kv: SharedCoordinator,
}

impl BlockProcessor {
    pub fn new(repos: Repositories, kv: SharedCoordinator) -> Self {
        Self { repos, kv }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for BlockProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let block: Block = serde_json::from_slice(payload)?;

        self.repos.block.insert(&block).await?;

        let mut kv = self.kv.lock().await;

        // A block with zero transactions/withdrawals never sets that
        // counter at all (see idx-kv::Coordinator::set_int's doc
        // comment): no transaction/withdrawal message for this block
        // will ever exist to check it, so there is nothing to skip.
        if block.transactions_count > 0 {
            kv.set_int(&keys::block_transaction_count(block.hash), block.transactions_count as i64).await?;
        }
        if block.withdrawals_count > 0 {
            kv.set_int(&keys::block_withdrawal_count(block.hash), block.withdrawals_count as i64).await?;
        }
        // Every block has exactly one Reward message (spec.md §4.5.4).
        kv.set_int(&keys::block_reward_count(block.hash), 1).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage_payload() {
        let result: Result<Block, _> = serde_json::from_slice(b"not json");
        assert!(result.is_err());
    }
}
