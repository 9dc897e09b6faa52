//! RDBMS repositories (spec.md §4.5, §5 "RDBMS schema (canonical)").
//!
//! Grounded on
//! `original_source/core/internal/infrastructure/repository/*.go`'s
//! one-struct-per-entity shape, reworked onto `sqlx::PgPool` (runtime
//! query checking, never the `query!` macro, since there is no
//! `DATABASE_URL`/offline cache to check against in this workspace).
//! No foreign keys are declared at the DB level; referential
//! integrity across topics is enforced application-side via
//! `idx-kv`'s Coordinator (spec.md §5).

mod internal_transaction;
mod reward;
mod token;
mod transaction;
mod transaction_action;
mod transaction_log;
mod withdrawal;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use internal_transaction::InternalTransactionRepository;
pub use reward::RewardRepository;
pub use token::{SupplyDelta, TokenRepository, TokenSupplyError};
pub use transaction::TransactionRepository;
pub use transaction_action::TransactionActionRepository;
pub use transaction_log::TransactionLogRepository;
pub use withdrawal::WithdrawalRepository;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to RDBMS at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("RDBMS connectivity probe timed out after {0:?}")]
    ProbeTimeout(Duration),
    #[error("RDBMS query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(source: sqlx::Error) -> Self {
        DbError::Query(source)
    }
}

mod block;
pub use block::BlockRepository;

/// Aggregates one repository per entity over a shared pool, so each
/// Core processor (spec.md §4.5) depends only on the repository it
/// needs.
#[derive(Clone)]
pub struct Repositories {
    pub block: BlockRepository,
    pub transaction: TransactionRepository,
    pub transaction_log: TransactionLogRepository,
    pub withdrawal: WithdrawalRepository,
    pub reward: RewardRepository,
    pub internal_transaction: InternalTransactionRepository,
    pub transaction_action: TransactionActionRepository,
    pub token: TokenRepository,
}

impl Repositories {
    /// Connects and probes with `SELECT 1` within one second
    /// (spec.md §5 "1-second startup probe").
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|source| DbError::Connect { url: url.to_string(), source })?;

        tokio::time::timeout(Duration::from_secs(1), sqlx::query("SELECT 1").execute(&pool))
            .await
            .map_err(|_| DbError::ProbeTimeout(Duration::from_secs(1)))?
            .map_err(DbError::Query)?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            block: BlockRepository::new(pool.clone()),
            transaction: TransactionRepository::new(pool.clone()),
            transaction_log: TransactionLogRepository::new(pool.clone()),
            withdrawal: WithdrawalRepository::new(pool.clone()),
            reward: RewardRepository::new(pool.clone()),
            internal_transaction: InternalTransactionRepository::new(pool.clone()),
            transaction_action: TransactionActionRepository::new(pool.clone()),
            token: TokenRepository::new(pool),
        }
    }
}
