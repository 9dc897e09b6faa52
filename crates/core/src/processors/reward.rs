use idx_codec::Reward;
use idx_db::Repositories;
use idx_kv::keys;

use crate::{MessageProcessor, ProcessorError, SharedCoordinator};

/// spec.md §4.5.4: the reward counter is always seeded to 1 at block
/// insert (one Reward message per block), so a single decrement
/// drains it.
pub struct RewardProcessor {
    repos: Repositories,
    kv: SharedCoordinator,
}

impl RewardProcessor {
    pub fn new(repos: Repositories, kv: SharedCoordinator) -> Self {
        Self { repos, kv }
    }
}

#[async_trait::async_trait]
impl MessageProcessor for RewardProcessor {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError> {
        let reward: Reward = serde_json::from_slice(payload)?;
        let key = keys::block_reward_count(reward.block_hash);

        let mut kv = self.kv.lock().await;
        if kv.get_int(&key).await? == 0 {
            return Err(ProcessorError::ReferentialNotReady(key));
        }

        self.repos.reward.insert(&reward).await?;
        kv.decrement_and_maybe_delete(&key).await?;

        Ok(())
    }
}
