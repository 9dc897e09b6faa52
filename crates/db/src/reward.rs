use idx_codec::Reward;
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, reward: &Reward) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO reward (block_hash, address, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (block_hash, address) DO NOTHING
            "#,
        )
        .bind(reward.block_hash.to_string())
        .bind(reward.address.to_string())
        .bind(reward.amount.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
