//! Coordinator: atomic reference-counters over Redis (spec.md §4.4).
//!
//! Grounded on `original_source/core/pkg/redis/redis.go`'s `Client`
//! (`Get`/`Set`/`Delete`/`Ping`), extended with the two operations
//! spec.md §4.4 actually needs beyond plain get/set: `set_int` (`SET
//! key value NX`, race-free creation) and `decrement_and_maybe_delete`
//! (a server-side Lua script, so the decrement-then-maybe-delete pair
//! is indivisible against concurrent callers).

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("failed to connect to KV store at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("KV connectivity probe timed out after {0:?}")]
    ProbeTimeout(Duration),
    #[error("KV command failed: {0}")]
    Command(#[source] redis::RedisError),
}

/// `local v = redis.call('DECR', KEYS[1]); if v <= 0 then
/// redis.call('DEL', KEYS[1]) end; return v` — spec.md §4.4's
/// atomicity contract for `decrement_and_maybe_delete`.
fn decrement_and_maybe_delete_script() -> &'static Script {
    use std::sync::OnceLock;
    static SCRIPT: OnceLock<Script> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        Script::new(
            r"
            local v = redis.call('DECR', KEYS[1])
            if v <= 0 then
                redis.call('DEL', KEYS[1])
            end
            return v
            ",
        )
    })
}

pub struct Coordinator {
    connection: MultiplexedConnection,
}

impl Coordinator {
    /// Connects and probes with `PING`, failing startup if the store
    /// does not answer within 5 seconds (spec.md §5).
    pub async fn connect(url: &str) -> Result<Self, KvError> {
        let client = Client::open(url).map_err(|source| KvError::Connect { url: url.to_string(), source })?;
        let connection = tokio::time::timeout(Duration::from_secs(5), client.get_multiplexed_async_connection())
            .await
            .map_err(|_| KvError::ProbeTimeout(Duration::from_secs(5)))?
            .map_err(|source| KvError::Connect { url: url.to_string(), source })?;

        let mut coordinator = Self { connection };
        tokio::time::timeout(Duration::from_secs(5), coordinator.ping())
            .await
            .map_err(|_| KvError::ProbeTimeout(Duration::from_secs(5)))??;

        Ok(coordinator)
    }

    async fn ping(&mut self) -> Result<(), KvError> {
        redis::cmd("PING")
            .query_async::<String>(&mut self.connection)
            .await
            .map_err(KvError::Command)?;
        Ok(())
    }

    /// `SET key value NX` — creates `key` iff absent; no-op otherwise.
    ///
    /// Callers must never pass `value == 0` for a counter a child will
    /// later check with [`Self::get_int`]: zero and absent are
    /// indistinguishable on read, so a zero-count parent (e.g. a block
    /// with no transactions) should simply not create the key at all
    /// (see DESIGN.md).
    pub async fn set_int(&mut self, key: &str, value: i64) -> Result<(), KvError> {
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .query_async(&mut self.connection)
            .await
            .map_err(KvError::Command)?;
        Ok(())
    }

    pub async fn get_int(&mut self, key: &str) -> Result<i64, KvError> {
        let value: Option<i64> = self.connection.get(key).await.map_err(KvError::Command)?;
        Ok(value.unwrap_or(0))
    }

    pub async fn delete(&mut self, key: &str) -> Result<(), KvError> {
        let _: () = self.connection.del(key).await.map_err(KvError::Command)?;
        Ok(())
    }

    pub async fn decrement_and_maybe_delete(&mut self, key: &str) -> Result<i64, KvError> {
        decrement_and_maybe_delete_script()
            .key(key)
            .invoke_async(&mut self.connection)
            .await
            .map_err(KvError::Command)
    }
}

/// Key-schema helpers (spec.md §4.4 "Key schema").
pub mod keys {
    use alloy_primitives::B256;

    pub fn block_transaction_count(block_hash: B256) -> String {
        format!("block:{block_hash}:transaction")
    }

    pub fn block_withdrawal_count(block_hash: B256) -> String {
        format!("block:{block_hash}:withdrawal")
    }

    pub fn block_reward_count(block_hash: B256) -> String {
        format!("block:{block_hash}:reward")
    }

    pub fn transaction_logs_count(tx_hash: B256) -> String {
        format!("transaction:{tx_hash}:logs")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn keys_are_namespaced_by_kind() {
            let hash = B256::repeat_byte(0xAB);
            assert!(block_transaction_count(hash).starts_with("block:"));
            assert!(block_transaction_count(hash).ends_with(":transaction"));
            assert!(transaction_logs_count(hash).starts_with("transaction:"));
            assert_ne!(block_transaction_count(hash), block_withdrawal_count(hash));
        }
    }
}
