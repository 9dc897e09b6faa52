//! Core Processors and Worker Pools (spec.md §4.5, SPEC_FULL.md §5.8-5.9).
//!
//! Grounded on `original_source/core/internal/api/service/*.go`'s
//! `MessageProcessor` interface and `worker_pool.go`'s
//! pull-delivery/ack-or-nack skeleton, generalized across the eight
//! topics declared in `idx-broker`.

pub mod pool;
pub mod processors;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use pool::spawn as spawn_processor_pool;
pub use processors::{
    BlockProcessor, InternalTransactionProcessor, RewardProcessor, TokenProcessor,
    TransactionActionProcessor, TransactionLogProcessor, TransactionProcessor,
    WithdrawalProcessor,
};

/// A `Coordinator` is shared by every worker in a processor's pool
/// (spec.md §4.3's "channels are not thread-safe" applies equally
/// here to the single Redis connection; `redis::aio::MultiplexedConnection`
/// is `Clone`+pipelined, but `Coordinator`'s methods take `&mut self`,
/// so callers serialize through a mutex rather than clone it per
/// worker).
pub type SharedCoordinator = Arc<Mutex<idx_kv::Coordinator>>;

/// Transient infrastructure failure (KV or RDBMS); always retried,
/// same as every other non-decode error (spec.md §4.5 has no DLQ).
/// Kept distinct from [`ProcessorError::Integrity`] so a future
/// metrics layer can tell "store hiccuped" from "data genuinely
/// violates an invariant" without string inspection.
#[derive(Debug, thiserror::Error)]
pub enum TransientError {
    #[error(transparent)]
    Db(#[from] idx_db::DbError),
    #[error(transparent)]
    Kv(#[from] idx_kv::KvError),
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("malformed message payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parent reference-counter not yet set; the message arrived
    /// before its parent (spec.md §4.4's ordering assumption does not
    /// hold under broker redelivery/out-of-order consumption) and
    /// must be nack+requeued rather than treated as a fatal error.
    #[error("parent counter {0} not yet set, message not ready")]
    ReferentialNotReady(String),
    #[error(transparent)]
    Transient(#[from] TransientError),
    /// A real data-integrity violation (spec.md §4.5.5's "decrease
    /// below zero is a fatal per-message error"), as opposed to a
    /// transient store failure. Still nack+requeued, same as every
    /// other case — spec.md has no DLQ — but distinguished for
    /// logging/alerting.
    #[error(transparent)]
    Integrity(idx_db::TokenSupplyError),
}

impl From<idx_db::DbError> for ProcessorError {
    fn from(source: idx_db::DbError) -> Self {
        ProcessorError::Transient(TransientError::Db(source))
    }
}

impl From<idx_kv::KvError> for ProcessorError {
    fn from(source: idx_kv::KvError) -> Self {
        ProcessorError::Transient(TransientError::Kv(source))
    }
}

/// A missing parent Token row (mint/burn arrived before the deploying
/// transfer) is the same "arrived early" situation spec.md §4.4 calls
/// referential-not-ready for every other topic, not a genuine
/// data-integrity violation — only `NegativeSupply` is that. Kept as
/// a plain `From` rather than `#[from]` so this distinction can't be
/// bypassed by an unqualified `?`.
impl From<idx_db::TokenSupplyError> for ProcessorError {
    fn from(source: idx_db::TokenSupplyError) -> Self {
        match source {
            idx_db::TokenSupplyError::NotFound { address } => {
                ProcessorError::ReferentialNotReady(format!("token:{address}"))
            }
            idx_db::TokenSupplyError::Db(error) => ProcessorError::Transient(TransientError::Db(error)),
            other @ idx_db::TokenSupplyError::NegativeSupply { .. } => ProcessorError::Integrity(other),
        }
    }
}

impl ProcessorError {
    /// `true` for the expected "arrived early" case (debug-level,
    /// always requeued); `false` for genuine failures (error-level,
    /// still requeued — spec.md §4.5 has no DLQ, retries are infinite
    /// by design).
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ProcessorError::ReferentialNotReady(_))
    }
}

/// Implemented by every Core processor (spec.md §4.5's shared
/// skeleton: decode → process → ack/nack). `process` never touches
/// the delivery's ack/nack itself — that is the pool's job (spec.md
/// §4.5.6), so a processor is exercised identically from tests and
/// from the pool.
#[async_trait::async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn process(&self, payload: &[u8]) -> Result<(), ProcessorError>;
}
