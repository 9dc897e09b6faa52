use idx_codec::{Transaction, TransactionStatus};
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, transaction: &Transaction) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO transaction (
                hash, block_hash, index, status, gas, gas_used, input, value,
                from_address, to_address, nonce, timestamp, logs_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (hash) DO NOTHING
            "#,
        )
        .bind(transaction.hash.to_string())
        .bind(transaction.block_hash.to_string())
        .bind(transaction.index as i32)
        .bind(status_str(transaction.status))
        .bind(transaction.gas as i64)
        .bind(transaction.gas_used as i64)
        .bind(hex::encode(&transaction.input))
        .bind(transaction.value.to_string())
        .bind(transaction.from.to_string())
        .bind(transaction.to.map(|a| a.to_string()))
        .bind(transaction.nonce as i64)
        .bind(transaction.timestamp as i64)
        .bind(transaction.logs_count as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn status_str(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Failed => "failed",
        TransactionStatus::Succeeded => "succeeded",
    }
}
