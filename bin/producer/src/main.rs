//! Producer service entrypoint: wiring + CLI + signal handling
//! (SPEC_FULL.md §2, §6). Grounded on `bin/dex-reth/src/main.rs`'s
//! CLI/tracing-init/signal-handling shape, with `tokio::signal::ctrl_c`
//! extended to also listen for `SIGTERM` since this is a long-running
//! server, not an interactive tool.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use idx_config::{ProducerConfig, Stage};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "producer", about = "EVM chain indexing Producer service")]
struct Args {
    #[arg(long, default_value = "config/producer.yaml")]
    config: PathBuf,

    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = ProducerConfig::load(&args.config, &args.env_file)?;
    init_tracing(config.server.stage);

    tracing::info!(worker_count = config.server.worker_count, "starting producer service");

    let start = config
        .server
        .block_start_number
        .as_deref()
        .ok_or_else(|| eyre::eyre!("server.block_start_number missing after config validation"))?
        .parse::<u64>()
        .map_err(|error| eyre::eyre!("invalid server.block_start_number: {error}"))?;

    let http_url = config.eth_node.http_url.as_deref().unwrap_or_default();
    let ws_url = config.eth_node.ws_url.as_deref().unwrap_or_default();
    let chain = idx_chain::ChainClient::connect(
        http_url,
        ws_url,
        config.eth_node.api_key.as_deref(),
        config.eth_node.trace_enabled,
    )
    .await?;
    let chain = Arc::new(chain);

    let broker_url = config.broker.url.clone().unwrap_or_default();
    let cancel = CancellationToken::new();

    let blocks = idx_producer::spawn_block_stream(chain.clone(), start, cancel.clone());
    let workers = idx_producer::spawn_worker_pool(config.server.worker_count as usize, chain, broker_url, blocks);

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, cancelling in-flight work");
    cancel.cancel();

    for worker in workers {
        let _ = worker.await;
    }

    tracing::info!("producer service stopped");
    Ok(())
}

/// Mirrors the teacher's `tokio::signal::ctrl_c().await?` in
/// `bin/dex-reth/src/main.rs`, extended with a `SIGTERM` listener
/// (spec.md §9's "Graceful shutdown" redesign flag) since this binary
/// runs as a long-lived server rather than an interactive CLI.
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn init_tracing(stage: Stage) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match stage {
        Stage::Dev => EnvFilter::new("debug"),
        Stage::Prod => EnvFilter::new("info"),
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match stage {
        Stage::Dev => subscriber.pretty().init(),
        Stage::Prod => subscriber.json().init(),
    }
}
