//! Domain entities (spec.md §3). Canonical JSON: 256-bit values as
//! decimal strings via [`crate::Uint256`], hashes/addresses/bytes as
//! `0x`-hex via `alloy_primitives`'s own `serde` support.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::metadata::TokenMetadata;
use crate::uint256::Uint256;

/// Hash type alias kept distinct from `Address20` for readability at
/// call sites, even though both are `0x`-hex `alloy_primitives` types.
pub type Hash32 = B256;
pub type Address20 = Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: Hash32,
    pub number: u64,
    pub parent_hash: Hash32,
    pub miner: Address20,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub nonce: u64,
    pub size: u64,
    pub difficulty: Uint256,
    pub base_fee_per_gas: Option<Uint256>,
    pub is_pos: bool,
    pub timestamp: u64,
    pub transactions_count: u32,
    pub withdrawals_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: Hash32,
    pub block_hash: Hash32,
    pub index: u32,
    pub status: TransactionStatus,
    pub gas: u64,
    pub gas_used: u64,
    pub input: Bytes,
    pub value: Uint256,
    pub from: Address20,
    pub to: Option<Address20>,
    pub nonce: u64,
    pub timestamp: u64,
    /// Set by the Aggregator from `len(receipt.logs)` (spec.md §4.2).
    pub logs_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    pub transaction_hash: Hash32,
    pub index: u32,
    pub address: Address20,
    /// Up to three indexed topics beyond the event signature topic,
    /// i.e. `topics[1..4]`; the signature itself is `topics[0]`.
    pub topics: Vec<Hash32>,
    pub data: Bytes,
    pub block_hash: Hash32,
    pub transaction_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub block_hash: Hash32,
    pub index: u32,
    pub address: Address20,
    pub validator_index: u64,
    pub amount: Uint256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub block_hash: Hash32,
    pub address: Address20,
    pub amount: Uint256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalTransactionType {
    Call,
    Create,
    Selfdestruct,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalTransaction {
    pub transaction_hash: Hash32,
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: InternalTransactionType,
    pub from: Address20,
    pub to: Option<Address20>,
    pub value: Uint256,
    pub gas: u64,
    pub gas_used: u64,
    pub input: Bytes,
    pub output: Bytes,
    pub contract_address: Option<Address20>,
    pub status: TransactionStatus,
    pub error_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAction {
    pub transaction_hash: Hash32,
    pub log_index: u32,
    pub selector: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: Address20,
    pub to: Option<Address20>,
    pub value: Uint256,
    pub input: Bytes,
    pub status: TransactionStatus,
}

/// Transient message emitted by the Aggregator and consumed by
/// `TokenProcessor`; never persisted verbatim (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEvent {
    pub address: Address20,
    pub transaction_hash: Hash32,
    pub log_index: u32,
    pub from: Address20,
    pub to: Address20,
    pub value: Uint256,
    pub token_id: Uint256,
    pub metadata: TokenMetadata,
    pub is_mint: bool,
    pub is_burn: bool,
    pub smart_contract_deployed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address20,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Uint256,
    pub holder_count: u64,
    pub fiat_value: Option<Uint256>,
    pub circulation_market_cap: Option<Uint256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInstance {
    pub token_contract_address: Address20,
    pub token_id: Uint256,
    pub owner_address: Address20,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub transaction_hash: Hash32,
    pub log_index: u32,
    pub from: Address20,
    pub to: Address20,
    pub token_contract_address: Address20,
    pub amount: Uint256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContract {
    pub address: Address20,
    pub name: Option<String>,
    pub compiler_version: Option<String>,
    pub source_code: Option<String>,
    pub abi: Option<String>,
    pub verified_by_eth: bool,
    pub evm_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_round_trips_through_json() {
        let block = Block {
            hash: Hash32::repeat_byte(0xAA),
            number: 1,
            parent_hash: Hash32::ZERO,
            miner: Address20::repeat_byte(0x01),
            gas_limit: 30_000_000,
            gas_used: 21_000,
            nonce: 0,
            size: 1024,
            difficulty: Uint256::ZERO,
            base_fee_per_gas: Some(Uint256::from(7u64)),
            is_pos: true,
            timestamp: 1_700_000_000,
            transactions_count: 0,
            withdrawals_count: 0,
        };

        let json = serde_json::to_string(&block).unwrap();
        let decoded: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn transaction_log_preserves_topic_order() {
        let log = TransactionLog {
            transaction_hash: Hash32::repeat_byte(0x11),
            index: 0,
            address: Address20::repeat_byte(0x22),
            topics: vec![Hash32::repeat_byte(0x33), Hash32::repeat_byte(0x44)],
            data: Bytes::from_static(&[0xDE, 0xAD]),
            block_hash: Hash32::repeat_byte(0x55),
            transaction_index: 0,
        };

        let json = serde_json::to_string(&log).unwrap();
        let decoded: TransactionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.topics, log.topics);
    }
}
