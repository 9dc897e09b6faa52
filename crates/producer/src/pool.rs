//! Producer Worker Pool (spec.md §4.3): bounded concurrency over the
//! Block Stream, one broker channel per worker. Grounded on
//! `original_source/producer/internal/server/server.go`'s
//! `worker`/`startWorkerPool` (one `amqp.Channel` per goroutine,
//! `for block := range blocks`).

use std::sync::Arc;

use idx_broker::Publisher;
use idx_chain::{ChainClient, RpcBlock};
use tokio::sync::{mpsc, Mutex};

use crate::aggregate::aggregate_block;

/// Spawns `worker_count` workers, each owning one broker channel
/// (channels are not thread-safe — spec.md §4.3), pulling from the
/// shared Block Stream receiver until it closes.
pub fn spawn(
    worker_count: usize,
    chain: Arc<ChainClient>,
    broker_url: String,
    blocks: mpsc::Receiver<RpcBlock>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let blocks = Arc::new(Mutex::new(blocks));

    (0..worker_count)
        .map(|id| {
            let chain = chain.clone();
            let blocks = blocks.clone();
            let broker_url = broker_url.clone();
            tokio::spawn(async move { worker_loop(id, chain, broker_url, blocks).await })
        })
        .collect()
}

async fn worker_loop(
    id: usize,
    chain: Arc<ChainClient>,
    broker_url: String,
    blocks: Arc<Mutex<mpsc::Receiver<RpcBlock>>>,
) {
    let (_connection, channel) = match idx_broker::connect(&broker_url).await {
        Ok(pair) => pair,
        Err(error) => {
            tracing::error!(worker = id, %error, "failed to open broker channel, worker exiting");
            return;
        }
    };
    let publisher = Publisher::new(channel);

    loop {
        let block = {
            let mut guard = blocks.lock().await;
            guard.recv().await
        };

        let Some(block) = block else {
            tracing::info!(worker = id, "block stream closed, worker exiting");
            return;
        };

        let number = block.number;
        tracing::info!(worker = id, number, "processing block");

        if let Err(error) = aggregate_block(&chain, &publisher, block).await {
            tracing::error!(worker = id, number, %error, "error aggregating block");
        } else {
            tracing::info!(worker = id, number, "finished processing block");
        }
    }
}
