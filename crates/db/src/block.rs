use idx_codec::Block;
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct BlockRepository {
    pool: PgPool,
}

impl BlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a Block row. `hash` is the table's unique key
    /// (spec.md §3); a redelivered `block` message is a no-op.
    pub async fn insert(&self, block: &Block) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO block (
                hash, number, parent_hash, miner, gas_limit, gas_used, nonce,
                size, difficulty, base_fee_per_gas, is_pos, timestamp,
                transactions_count, withdrawals_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (hash) DO NOTHING
            "#,
        )
        .bind(block.hash.to_string())
        .bind(block.number as i64)
        .bind(block.parent_hash.to_string())
        .bind(block.miner.to_string())
        .bind(block.gas_limit as i64)
        .bind(block.gas_used as i64)
        .bind(block.nonce as i64)
        .bind(block.size as i64)
        .bind(block.difficulty.to_string())
        .bind(block.base_fee_per_gas.map(|v| v.to_string()))
        .bind(block.is_pos)
        .bind(block.timestamp as i64)
        .bind(block.transactions_count as i32)
        .bind(block.withdrawals_count as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
