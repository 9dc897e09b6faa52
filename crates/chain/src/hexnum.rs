//! Deserialization helpers for EVM JSON-RPC's `0x`-prefixed hex
//! quantities. Distinct from [`idx_codec::Uint256`]'s decimal-string
//! encoding: that one is this pipeline's own wire/storage format,
//! this one is the upstream chain's.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer};

pub fn deserialize_hex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_hex_u64(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_opt_hex_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_hex_u64(&s)).transpose().map_err(serde::de::Error::custom)
}

pub fn deserialize_hex_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_hex_u256(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_opt_hex_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_hex_u256(&s)).transpose().map_err(serde::de::Error::custom)
}

fn parse_hex_u64(raw: &str) -> Result<u64, String> {
    let trimmed = raw.strip_prefix("0x").unwrap_or(raw);
    if trimmed.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(trimmed, 16).map_err(|e| format!("invalid hex quantity {raw:?}: {e}"))
}

fn parse_hex_u256(raw: &str) -> Result<U256, String> {
    let trimmed = raw.strip_prefix("0x").unwrap_or(raw);
    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(trimmed, 16).map_err(|e| format!("invalid hex quantity {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_u64() {
        assert_eq!(parse_hex_u64("0x1b4").unwrap(), 436);
        assert_eq!(parse_hex_u64("0x0").unwrap(), 0);
    }

    #[test]
    fn parses_hex_u256() {
        assert_eq!(parse_hex_u256("0x64").unwrap(), U256::from(100u64));
    }
}
