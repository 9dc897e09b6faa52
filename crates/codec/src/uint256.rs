//! 256-bit integer value with lossless decimal-string JSON encoding.
//!
//! `alloy_primitives::U256`'s own `serde` impl is not guaranteed to emit
//! plain base-10 digits, so the wire/storage form required by the data
//! model (spec I4) is implemented by hand here instead of derived.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 256-bit unsigned integer that always (de)serializes as a decimal
/// digit string, e.g. `"1000000000000000000"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint256(U256);

impl Uint256 {
    pub const ZERO: Self = Self(U256::ZERO);

    pub fn from_u256(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parses a decimal or `0x`-prefixed hex string into a value.
    pub fn parse(input: &str) -> Result<Self, Uint256ParseError> {
        let value = if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
            U256::from_str_radix(hex, 16).map_err(|_| Uint256ParseError(input.to_string()))?
        } else {
            U256::from_str(input).map_err(|_| Uint256ParseError(input.to_string()))?
        };
        Ok(Self(value))
    }

    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Bytes-to-value conversion used for log `data` fields (big-endian).
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(U256::from_be_slice(bytes))
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Uint256 {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid 256-bit integer literal: {0}")]
pub struct Uint256ParseError(String);

impl Serialize for Uint256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl Visitor<'_> for DecimalVisitor {
            type Value = Uint256;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal digit string encoding a 256-bit unsigned integer")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                U256::from_str(value)
                    .map(Uint256)
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let values = [
            Uint256::ZERO,
            Uint256::from(1u64),
            Uint256::from(u64::MAX),
            Uint256::parse("115792089237316195423570985008687907853269984665640564039457584007913129639935").unwrap(),
        ];

        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            assert!(json.chars().all(|c| c == '"' || c.is_ascii_digit()));
            let decoded: Uint256 = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn parses_hex_literal() {
        let value = Uint256::parse("0x64").unwrap();
        assert_eq!(value, Uint256::from(100u64));
    }

    #[test]
    fn rejects_malformed_literal() {
        assert!(Uint256::parse("not-a-number").is_err());
    }

    #[test]
    fn checked_sub_below_zero_is_none() {
        let zero = Uint256::ZERO;
        let one = Uint256::from(1u64);
        assert!(zero.checked_sub(&one).is_none());
    }
}
