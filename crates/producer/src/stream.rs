//! Block Stream (spec.md §4.1): merges a historical back-fill with a
//! live head subscription into one bounded, best-effort-ordered
//! channel of full blocks.
//!
//! Grounded on
//! `original_source/producer/internal/blockchain/blockchain_processor.go::ListenNewBlocks`'s
//! `select { sub.Err() | headers }` loop, generalized with the
//! pivot-latch + concurrent-backfill algorithm spec.md §4.1 adds on
//! top of that simpler live-only version.

use std::sync::Arc;

use futures::StreamExt;
use idx_chain::{ChainClient, RpcBlock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Output channel capacity (spec.md §4.1 step 4: "bounded, capacity 100").
const CHANNEL_CAPACITY: usize = 100;

pub fn spawn(chain: Arc<ChainClient>, start: u64, cancel: CancellationToken) -> mpsc::Receiver<RpcBlock> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(run(chain, start, tx, cancel));
    rx
}

async fn run(chain: Arc<ChainClient>, start: u64, tx: mpsc::Sender<RpcBlock>, cancel: CancellationToken) {
    let mut heads = match chain.subscribe_new_heads().await {
        Ok(stream) => stream,
        Err(error) => {
            tracing::error!(%error, "failed to subscribe to new heads, block stream closing");
            return;
        }
    };

    let pivot = tokio::select! {
        _ = cancel.cancelled() => return,
        head = heads.next() => match head {
            Some(Ok(head)) => head,
            _ => {
                tracing::error!("head subscription closed before first head arrived");
                return;
            }
        },
    };

    tracing::info!(pivot = pivot.number, "latched pivot, starting historical backfill and live forwarding");

    let historical = backfill(chain.clone(), start, pivot.number, tx.clone(), cancel.clone());
    let live = forward_live(chain.clone(), pivot.number, heads, tx, cancel);

    tokio::join!(historical, live);
}

/// Fetches `[start, pivot)` sequentially. A per-block fetch error is
/// logged and skipped rather than stopping the backfill (spec.md
/// §4.1 "Failure semantics"; see DESIGN.md for the open question this
/// resolves).
async fn backfill(chain: Arc<ChainClient>, start: u64, pivot: u64, tx: mpsc::Sender<RpcBlock>, cancel: CancellationToken) {
    for number in start..pivot {
        if cancel.is_cancelled() {
            return;
        }

        match chain.block_by_number(number).await {
            Ok(block) => {
                if tx.send(block).await.is_err() {
                    return;
                }
            }
            Err(error) => {
                tracing::warn!(number, %error, "failed to fetch historical block, skipping");
            }
        }
    }
}

/// Forwards the pivot itself, then every subsequent head,
/// re-dereferenced by number (not hash) to avoid returning
/// reorg-dropped blocks (spec.md §4.1 step 3).
async fn forward_live(
    chain: Arc<ChainClient>,
    pivot_number: u64,
    mut heads: impl futures::Stream<Item = Result<idx_chain::RpcHead, idx_chain::ChainError>> + Unpin,
    tx: mpsc::Sender<RpcBlock>,
    cancel: CancellationToken,
) {
    match chain.block_by_number(pivot_number).await {
        Ok(block) => {
            if tx.send(block).await.is_err() {
                return;
            }
        }
        Err(error) => {
            tracing::warn!(number = pivot_number, %error, "failed to fetch pivot block, skipping");
        }
    }

    loop {
        let head = tokio::select! {
            _ = cancel.cancelled() => return,
            head = heads.next() => head,
        };

        match head {
            None => {
                tracing::info!("head subscription closed, block stream closing");
                return;
            }
            Some(Err(error)) => {
                tracing::error!(%error, "head subscription error, block stream closing");
                return;
            }
            Some(Ok(head)) => match chain.block_by_number(head.number).await {
                Ok(block) => {
                    if tx.send(block).await.is_err() {
                        return;
                    }
                }
                Err(error) => {
                    tracing::warn!(number = head.number, %error, "failed to fetch live block, skipping");
                }
            },
        }
    }
}
