//! Core Worker Pool (spec.md §4.5.6): one pool per topic, each worker
//! owning its own broker channel and consumer tag, pulling deliveries
//! and running them through a shared [`MessageProcessor`]. Grounded
//! on `original_source/core/internal/api/service/worker_pool.go`'s
//! `WorkerPool.worker` (`for msg := range msgs { process; ack/nack }`).

use std::sync::Arc;

use idx_broker::Topic;
use tokio_util::sync::CancellationToken;

use crate::MessageProcessor;

/// Spawns `worker_count` workers consuming `topic`'s queue, each
/// dialing its own channel (spec.md §4.3's "channels are not
/// thread-safe" rule, restated for Core in §4.5.6). `cancel` is
/// checked between deliveries so shutdown doesn't wait on the next
/// message to arrive (SPEC_FULL.md §6 "Graceful shutdown").
pub fn spawn(
    topic: Topic,
    worker_count: usize,
    broker_url: String,
    processor: Arc<dyn MessageProcessor>,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<()>> {
    (0..worker_count)
        .map(|id| {
            let broker_url = broker_url.clone();
            let processor = processor.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { worker_loop(id, topic, broker_url, processor, cancel).await })
        })
        .collect()
}

/// spec.md §4.5: "A processor that fails to `nack` is a fatal error
/// (broker state inconsistency)"; §7 puts ack/nack failure under
/// "Fatal process — process exits." A failed ack/nack means the
/// broker and this worker now disagree about delivery state, which
/// no amount of in-process retry can repair, so the whole process
/// exits rather than silently dropping the ack/nack and continuing.
fn fatal_ack_failure(id: usize, topic: Topic, op: &str, error: &idx_broker::BrokerError) {
    tracing::error!(worker = id, ?topic, op, %error, "failed to ack/nack delivery, broker state inconsistent, exiting");
    std::process::exit(1);
}

async fn worker_loop(id: usize, topic: Topic, broker_url: String, processor: Arc<dyn MessageProcessor>, cancel: CancellationToken) {
    let (_connection, channel) = match idx_broker::connect(&broker_url).await {
        Ok(pair) => pair,
        Err(error) => {
            tracing::error!(worker = id, ?topic, %error, "failed to open broker channel, worker exiting");
            return;
        }
    };

    if let Err(error) = idx_broker::declare_topology(&channel, topic).await {
        tracing::error!(worker = id, ?topic, %error, "failed to declare topology, worker exiting");
        return;
    }

    let consumer_tag = format!("{}-{id}", topic.queue());
    let mut consumer = match idx_broker::Consumer::new(&channel, topic, &consumer_tag).await {
        Ok(consumer) => consumer,
        Err(error) => {
            tracing::error!(worker = id, ?topic, %error, "failed to start consuming, worker exiting");
            return;
        }
    };

    loop {
        let delivery = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(worker = id, ?topic, "cancellation requested, worker exiting");
                return;
            }
            delivery = consumer.recv() => delivery,
        };

        let Some(delivery) = delivery else {
            tracing::info!(worker = id, ?topic, "consumer closed, worker exiting");
            return;
        };

        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(error) => {
                tracing::error!(worker = id, ?topic, %error, "failed to receive delivery");
                continue;
            }
        };

        match processor.process(delivery.payload()).await {
            Ok(()) => {
                if let Err(error) = delivery.ack().await {
                    fatal_ack_failure(id, topic, "ack", &error);
                }
            }
            Err(error) if error.is_not_ready() => {
                tracing::debug!(worker = id, ?topic, %error, "message not ready, requeuing");
                if let Err(nack_error) = delivery.nack_requeue().await {
                    fatal_ack_failure(id, topic, "nack", &nack_error);
                }
            }
            Err(error) => {
                tracing::error!(worker = id, ?topic, %error, "failed to process message, requeuing");
                if let Err(nack_error) = delivery.nack_requeue().await {
                    fatal_ack_failure(id, topic, "nack", &nack_error);
                }
            }
        }
    }
}
