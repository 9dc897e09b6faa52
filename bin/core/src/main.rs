//! Core service entrypoint: wiring + CLI + signal handling
//! (SPEC_FULL.md §2, §6). One `idx_core::pool` per broker topic, all
//! sharing one `Repositories` (pooled `PgPool`) and one
//! `SharedCoordinator` (mutex-serialized Redis connection).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use idx_broker::Topic;
use idx_config::{CoreConfig, Stage};
use idx_core::MessageProcessor;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "core", about = "EVM chain indexing Core service")]
struct Args {
    #[arg(long, default_value = "config/core.yaml")]
    config: PathBuf,

    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = CoreConfig::load(&args.config, &args.env_file)?;
    init_tracing(config.server.stage);

    tracing::info!(worker_count = config.server.worker_count, "starting core service");

    let rdbms_url = config.rdbms.url.as_deref().unwrap_or_default();
    let repos = idx_db::Repositories::connect(rdbms_url, 10).await?;

    let kv_url = config.kv.url.as_deref().unwrap_or_default();
    let coordinator = idx_kv::Coordinator::connect(kv_url).await?;
    let kv: idx_core::SharedCoordinator = Arc::new(Mutex::new(coordinator));

    let broker_url = config.broker.url.clone().unwrap_or_default();
    let worker_count = config.server.worker_count as usize;
    let cancel = CancellationToken::new();

    let pools: Vec<(Topic, Arc<dyn MessageProcessor>)> = vec![
        (Topic::Block, Arc::new(idx_core::BlockProcessor::new(repos.clone(), kv.clone()))),
        (Topic::Transaction, Arc::new(idx_core::TransactionProcessor::new(repos.clone(), kv.clone()))),
        (Topic::TransactionLog, Arc::new(idx_core::TransactionLogProcessor::new(repos.clone(), kv.clone()))),
        (Topic::Withdrawal, Arc::new(idx_core::WithdrawalProcessor::new(repos.clone(), kv.clone()))),
        (Topic::Reward, Arc::new(idx_core::RewardProcessor::new(repos.clone(), kv.clone()))),
        (Topic::TokenEvent, Arc::new(idx_core::TokenProcessor::new(repos.clone()))),
        (Topic::InternalTransaction, Arc::new(idx_core::InternalTransactionProcessor::new(repos.clone()))),
        (Topic::TransactionAction, Arc::new(idx_core::TransactionActionProcessor::new(repos.clone()))),
    ];

    let mut workers = Vec::new();
    for (topic, processor) in pools {
        workers.extend(idx_core::spawn_processor_pool(
            topic,
            worker_count,
            broker_url.clone(),
            processor,
            cancel.clone(),
        ));
    }

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, cancelling in-flight work");
    cancel.cancel();

    for worker in workers {
        let _ = worker.await;
    }

    tracing::info!("core service stopped");
    Ok(())
}

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
