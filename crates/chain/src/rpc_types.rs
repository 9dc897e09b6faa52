//! Raw EVM JSON-RPC response shapes. Kept distinct from
//! [`idx_codec`]'s domain entities: conversion into domain types
//! happens in the Aggregator (spec.md §4.2), not here.

use alloy_primitives::{Address, Bytes, B256, B64, U256};
use serde::Deserialize;

use crate::hexnum::{
    deserialize_hex_u256, deserialize_hex_u64, deserialize_opt_hex_u256, deserialize_opt_hex_u64,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub hash: B256,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub number: u64,
    pub parent_hash: B256,
    pub miner: Address,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_limit: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_used: u64,
    pub nonce: B64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub size: u64,
    #[serde(deserialize_with = "deserialize_hex_u256")]
    pub difficulty: U256,
    #[serde(default, deserialize_with = "deserialize_opt_hex_u256")]
    pub base_fee_per_gas: Option<U256>,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub timestamp: u64,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
    #[serde(default)]
    pub withdrawals: Vec<RpcWithdrawal>,
}

impl RpcBlock {
    /// Post-merge chains set `difficulty` to zero; used to populate
    /// `Block.is_pos` (spec.md §3).
    pub fn is_proof_of_stake(&self) -> bool {
        self.difficulty.is_zero()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: B256,
    pub block_hash: Option<B256>,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub transaction_index: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas: u64,
    #[serde(deserialize_with = "deserialize_hex_u256")]
    pub value: U256,
    pub input: Bytes,
    pub from: Address,
    pub to: Option<Address>,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub nonce: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcWithdrawal {
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub index: u64,
    #[serde(rename = "validatorIndex", deserialize_with = "deserialize_hex_u64")]
    pub validator_index: u64,
    pub address: Address,
    /// Withdrawal amount, denominated in Gwei per the EVM JSON-RPC spec.
    #[serde(deserialize_with = "deserialize_hex_u256")]
    pub amount: U256,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub status: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub gas_used: u64,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub cumulative_gas_used: u64,
    #[serde(default, deserialize_with = "deserialize_opt_hex_u256")]
    pub effective_gas_price: Option<U256>,
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

impl RpcReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == 1
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub log_index: u64,
    pub transaction_hash: B256,
    pub block_hash: B256,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub transaction_index: u64,
}

/// One entry of a `trace_transaction`/`trace_block` response
/// (spec.md GLOSSARY "Trace").
#[derive(Debug, Clone, Deserialize)]
pub struct RpcTraceEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: RpcTraceAction,
    pub result: Option<RpcTraceResult>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "traceAddress", default)]
    pub trace_address: Vec<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcTraceAction {
    #[serde(rename = "callType", default)]
    pub call_type: Option<String>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    #[serde(default, deserialize_with = "deserialize_opt_hex_u256")]
    pub value: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_opt_hex_u64")]
    pub gas: Option<u64>,
    pub input: Option<Bytes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTraceResult {
    #[serde(default, deserialize_with = "deserialize_opt_hex_u64")]
    pub gas_used: Option<u64>,
    pub output: Option<Bytes>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcHead {
    pub hash: B256,
    #[serde(deserialize_with = "deserialize_hex_u64")]
    pub number: u64,
}
