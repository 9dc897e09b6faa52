use idx_codec::Withdrawal;
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct WithdrawalRepository {
    pool: PgPool,
}

impl WithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, withdrawal: &Withdrawal) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO withdrawal (block_hash, index, address, validator_index, amount)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (block_hash, index) DO NOTHING
            "#,
        )
        .bind(withdrawal.block_hash.to_string())
        .bind(withdrawal.index as i32)
        .bind(withdrawal.address.to_string())
        .bind(withdrawal.validator_index as i64)
        .bind(withdrawal.amount.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
