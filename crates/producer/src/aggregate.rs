//! Aggregator (spec.md §4.2): per-block fan-out to the broker.
//! Grounded on `original_source/producer/internal/server/aggregators.go`'s
//! `aggregateBlock`/`aggregateTransactions`/`aggregateWithdrawals`/
//! `aggregateReward` sequence, with ABI decoding delegated to `idx-abi`.

use alloy_primitives::U256;
use idx_abi::{decode_transfer, fetch_bytecode, fetch_metadata, TokenStandard};
use idx_broker::{BrokerError, Publisher, Topic};
use idx_chain::{ChainClient, ChainError, RpcBlock, RpcTraceEntry};
use idx_codec::{
    Block, InternalTransaction, InternalTransactionType, Reward, Transaction, TransactionAction,
    TransactionLog, TransactionStatus, TokenEvent, Uint256, Withdrawal,
};

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Runs the full per-block sequence described in spec.md §4.2,
/// publishing each message in order on `publisher`'s channel.
pub async fn aggregate_block(
    chain: &ChainClient,
    publisher: &Publisher,
    raw: RpcBlock,
) -> Result<(), AggregateError> {
    let block = Block {
        hash: raw.hash,
        number: raw.number,
        parent_hash: raw.parent_hash,
        miner: raw.miner,
        gas_limit: raw.gas_limit,
        gas_used: raw.gas_used,
        nonce: u64::from_be_bytes(raw.nonce.as_slice().try_into().unwrap()),
        size: raw.size,
        difficulty: Uint256::from_u256(raw.difficulty),
        base_fee_per_gas: raw.base_fee_per_gas.map(Uint256::from_u256),
        is_pos: raw.is_proof_of_stake(),
        timestamp: raw.timestamp,
        transactions_count: raw.transactions.len() as u32,
        withdrawals_count: raw.withdrawals.len() as u32,
    };
    publisher.publish(Topic::Block, &block).await?;

    // spec.md §9 flags `Σ cumulative_gas_used` as dimensionally wrong
    // (a gas quantity, not a fee in wei); the reward amount is the
    // sum of each transaction's own `gas_used × effective_gas_price`.
    let mut total_gas_fees = U256::ZERO;

    for (index, tx) in raw.transactions.iter().enumerate() {
        let receipt = chain.transaction_receipt(tx.hash).await?;

        let status = if receipt.succeeded() { TransactionStatus::Succeeded } else { TransactionStatus::Failed };
        let transaction = Transaction {
            hash: tx.hash,
            block_hash: raw.hash,
            index: index as u32,
            status,
            gas: tx.gas,
            gas_used: receipt.gas_used,
            input: tx.input.clone(),
            value: Uint256::from_u256(tx.value),
            from: tx.from,
            to: tx.to,
            nonce: tx.nonce,
            timestamp: raw.timestamp,
            logs_count: receipt.logs.len() as u32,
        };
        publisher.publish(Topic::Transaction, &transaction).await?;

        let effective_gas_price = receipt.effective_gas_price.unwrap_or(U256::ZERO);
        total_gas_fees += U256::from(receipt.gas_used) * effective_gas_price;

        // spec.md §4.2 steps 2d/2e/2f are a strict ordering contract
        // ("the above ordering is strict on a single broker channel"):
        // all transaction_log, then all internal_transaction/
        // transaction_action, then all token_event, one pass each.
        for log in &receipt.logs {
            let transaction_log = TransactionLog {
                transaction_hash: log.transaction_hash,
                index: log.log_index as u32,
                address: log.address,
                topics: log.topics.clone(),
                data: log.data.clone(),
                block_hash: log.block_hash,
                transaction_index: log.transaction_index as u32,
            };
            publisher.publish(Topic::TransactionLog, &transaction_log).await?;
        }

        if chain.trace_enabled() {
            let traces = chain.trace_transaction(tx.hash).await?;
            for (trace_index, trace) in traces.iter().enumerate() {
                let (internal_transaction, transaction_action) = convert_trace(tx.hash, trace_index as u32, trace, status);
                publisher.publish(Topic::InternalTransaction, &internal_transaction).await?;
                publisher.publish(Topic::TransactionAction, &transaction_action).await?;
            }
        }

        for log in &receipt.logs {
            if let Some(token_event) = build_token_event(chain, &receipt, tx.hash, log).await {
                publisher.publish(Topic::TokenEvent, &token_event).await?;
            }
        }
    }

    let reward = Reward {
        block_hash: raw.hash,
        address: raw.miner,
        amount: Uint256::from_u256(total_gas_fees),
    };
    publisher.publish(Topic::Reward, &reward).await?;

    for (index, withdrawal) in raw.withdrawals.iter().enumerate() {
        let message = Withdrawal {
            block_hash: raw.hash,
            index: index as u32,
            address: withdrawal.address,
            validator_index: withdrawal.validator_index,
            amount: Uint256::from_u256(withdrawal.amount),
        };
        publisher.publish(Topic::Withdrawal, &message).await?;
    }

    Ok(())
}

/// Decodes one receipt log into a `TokenEvent` (spec.md §4.2 step f),
/// fetching on-chain metadata for the token contract. Returns `None`
/// for logs that aren't a recognized Transfer/TransferSingle event.
async fn build_token_event(
    chain: &ChainClient,
    receipt: &idx_chain::RpcReceipt,
    transaction_hash: idx_codec::Hash32,
    log: &idx_chain::RpcLog,
) -> Option<TokenEvent> {
    let decoded = decode_transfer(&log.topics, &log.data)?;

    let token_id = match decoded.standard {
        TokenStandard::Erc20 => U256::ZERO,
        _ => decoded.token_id,
    };

    let smart_contract_deployed = receipt.contract_address == Some(log.address);
    let mut metadata = fetch_metadata(chain, log.address, (!token_id.is_zero()).then_some(token_id)).await;
    if smart_contract_deployed {
        metadata.bytecode = fetch_bytecode(chain, log.address).await;
    }

    Some(TokenEvent {
        address: log.address,
        transaction_hash,
        log_index: log.log_index as u32,
        from: decoded.from,
        to: decoded.to,
        value: Uint256::from_u256(decoded.value),
        token_id: Uint256::from_u256(token_id),
        metadata,
        is_mint: decoded.is_mint(),
        is_burn: decoded.is_burn(),
        smart_contract_deployed,
    })
}

/// Maps one `trace_transaction` entry onto an `InternalTransaction`
/// and a `TransactionAction` (spec.md §4.2 step e). The exact
/// trace-kind → `InternalTransactionType` rule isn't pinned down any
/// further by the spec text it refers to ("rules below" is left
/// blank); treated as an open question, resolved in DESIGN.md by
/// mapping `call`/`create`/`suicide` call types directly and
/// defaulting anything else to `Call`.
fn convert_trace(
    transaction_hash: idx_codec::Hash32,
    index: u32,
    trace: &RpcTraceEntry,
    status: TransactionStatus,
) -> (InternalTransaction, TransactionAction) {
    let kind = match trace.action.call_type.as_deref() {
        Some("create") => InternalTransactionType::Create,
        Some("suicide") | Some("selfdestruct") => InternalTransactionType::Selfdestruct,
        _ => InternalTransactionType::Call,
    };

    let from = trace.action.from.unwrap_or_default();
    let to = trace.action.to;
    let value = trace.action.value.map(Uint256::from_u256).unwrap_or(Uint256::ZERO);
    let input = trace.action.input.clone().unwrap_or_default();
    let output = trace.result.as_ref().and_then(|r| r.output.clone()).unwrap_or_default();
    let gas = trace.action.gas.unwrap_or(0);
    let gas_used = trace.result.as_ref().and_then(|r| r.gas_used).unwrap_or(0);
    let contract_address = trace.result.as_ref().and_then(|r| r.address);

    let internal_transaction = InternalTransaction {
        transaction_hash,
        index,
        kind,
        from,
        to,
        value,
        gas,
        gas_used,
        input: input.clone(),
        output,
        contract_address,
        status,
        error_msg: trace.error.clone(),
    };

    let selector = if input.len() >= 4 { hex::encode(&input[0..4]) } else { String::new() };
    let transaction_action = TransactionAction {
        transaction_hash,
        log_index: index,
        selector,
        kind: trace.kind.clone(),
        from,
        to,
        value,
        input,
        status,
    };

    (internal_transaction, transaction_action)
}
