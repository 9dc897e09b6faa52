use idx_codec::{InternalTransaction, InternalTransactionType, TransactionStatus};
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct InternalTransactionRepository {
    pool: PgPool,
}

impl InternalTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, internal_tx: &InternalTransaction) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO internal_transaction (
                transaction_hash, index, type, from_address, to_address, value,
                gas, gas_used, input, output, contract_address, status, error_msg
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (transaction_hash, index) DO NOTHING
            "#,
        )
        .bind(internal_tx.transaction_hash.to_string())
        .bind(internal_tx.index as i32)
        .bind(kind_str(internal_tx.kind))
        .bind(internal_tx.from.to_string())
        .bind(internal_tx.to.map(|a| a.to_string()))
        .bind(internal_tx.value.to_string())
        .bind(internal_tx.gas as i64)
        .bind(internal_tx.gas_used as i64)
        .bind(hex::encode(&internal_tx.input))
        .bind(hex::encode(&internal_tx.output))
        .bind(internal_tx.contract_address.map(|a| a.to_string()))
        .bind(status_str(internal_tx.status))
        .bind(&internal_tx.error_msg)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn kind_str(kind: InternalTransactionType) -> &'static str {
    match kind {
        InternalTransactionType::Call => "call",
        InternalTransactionType::Create => "create",
        InternalTransactionType::Selfdestruct => "selfdestruct",
        InternalTransactionType::Log => "log",
    }
}

fn status_str(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Failed => "failed",
        TransactionStatus::Succeeded => "succeeded",
    }
}
