use idx_codec::TransactionLog;
use sqlx::PgPool;

use crate::DbError;

#[derive(Clone)]
pub struct TransactionLogRepository {
    pool: PgPool,
}

impl TransactionLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the log row plus one `transaction_log_topic` row per
    /// topic (spec.md §5's canonical schema keeps topics in their own
    /// table rather than an inline array column).
    pub async fn insert(&self, log: &TransactionLog) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transaction_log (transaction_hash, index, address, data, block_hash, transaction_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (transaction_hash, index) DO NOTHING
            "#,
        )
        .bind(log.transaction_hash.to_string())
        .bind(log.index as i32)
        .bind(log.address.to_string())
        .bind(hex::encode(&log.data))
        .bind(log.block_hash.to_string())
        .bind(log.transaction_index as i32)
        .execute(&mut *tx)
        .await?;

        for (topic_index, topic) in log.topics.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO transaction_log_topic (transaction_hash, log_index, topic_index, topic)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (transaction_hash, log_index, topic_index) DO NOTHING
                "#,
            )
            .bind(log.transaction_hash.to_string())
            .bind(log.index as i32)
            .bind(topic_index as i32)
            .bind(topic.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
