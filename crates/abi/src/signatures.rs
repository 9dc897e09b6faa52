//! Standard event-signature hashes (spec.md §4.2.1), computed once.
//!
//! Avoids a build-time `lazy_static`/`const` hack for `keccak256`
//! (not `const fn`): a `OnceLock` per signature, matching the
//! teacher's avoidance of runtime globals outside `tracing`'s own
//! machinery.

use std::sync::OnceLock;

use alloy_primitives::{keccak256, B256};

/// `Transfer(address,address,uint256)` — shared by ERC-20 and
/// ERC-721; the two are told apart by topic count (spec.md §4.2.1).
pub fn transfer_signature() -> B256 {
    static SIG: OnceLock<B256> = OnceLock::new();
    *SIG.get_or_init(|| keccak256(b"Transfer(address,address,uint256)"))
}

/// `TransferSingle(address,address,address,uint256,uint256)` (ERC-1155).
pub fn transfer_single_signature() -> B256 {
    static SIG: OnceLock<B256> = OnceLock::new();
    *SIG.get_or_init(|| keccak256(b"TransferSingle(address,address,address,uint256,uint256)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_signature_matches_known_hash() {
        // keccak256("Transfer(address,address,uint256)"), the well-known
        // ERC-20/721 Transfer event topic.
        let expected = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        assert_eq!(hex::encode(transfer_signature()), expected);
    }

    #[test]
    fn transfer_single_signature_matches_known_hash() {
        // keccak256("TransferSingle(address,address,address,uint256,uint256)")
        let expected = "c3d58168c5ae7397731d063d5bbf3d657854427343f4c083240f7aacaa2d0f62";
        assert_eq!(hex::encode(transfer_single_signature()), expected);
    }
}
