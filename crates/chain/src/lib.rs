//! Chain Source: the EVM JSON-RPC client boundary (spec.md §4.1,
//! SPEC_FULL.md §5.1).

mod client;
mod hexnum;
mod rpc_types;

pub use client::{ChainClient, ChainError};
pub use rpc_types::{
    RpcBlock, RpcHead, RpcLog, RpcReceipt, RpcTraceAction, RpcTraceEntry, RpcTraceResult,
    RpcTransaction, RpcWithdrawal,
};
