//! Typed replacement for the source's `map[string]interface{}` token
//! metadata (spec.md §9 redesign flag). Every field is explicitly
//! optional; absence is `None`, never a sentinel empty string.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub uri: Option<String>,
    /// Contract bytecode, populated only when the emitting address was
    /// created in the same transaction (spec.md §4.2.1).
    pub bytecode: Option<Bytes>,
}

impl TokenMetadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.symbol.is_none()
            && self.decimals.is_none()
            && self.uri.is_none()
            && self.bytecode.is_none()
    }
}
