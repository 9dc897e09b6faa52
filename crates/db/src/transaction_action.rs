use idx_codec::{TransactionAction, TransactionStatus};
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct TransactionActionRepository {
    pool: PgPool,
}

impl TransactionActionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, action: &TransactionAction) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO transaction_action (
                transaction_hash, log_index, selector, type, from_address,
                to_address, value, input, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (transaction_hash, log_index) DO NOTHING
            "#,
        )
        .bind(action.transaction_hash.to_string())
        .bind(action.log_index as i32)
        .bind(&action.selector)
        .bind(&action.kind)
        .bind(action.from.to_string())
        .bind(action.to.map(|a| a.to_string()))
        .bind(action.value.to_string())
        .bind(hex::encode(&action.input))
        .bind(status_str(action.status))
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
