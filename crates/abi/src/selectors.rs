//! 4-byte function selectors for the metadata calls spec.md §4.2.1
//! requires (`name`, `symbol`, `decimals`, `uri`, `tokenURI`).

use std::sync::OnceLock;

use alloy_primitives::keccak256;

fn selector(signature: &[u8]) -> [u8; 4] {
    let hash = keccak256(signature);
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[0..4]);
    out
}

pub fn name() -> [u8; 4] {
    static SEL: OnceLock<[u8; 4]> = OnceLock::new();
    *SEL.get_or_init(|| selector(b"name()"))
}

pub fn symbol() -> [u8; 4] {
    static SEL: OnceLock<[u8; 4]> = OnceLock::new();
    *SEL.get_or_init(|| selector(b"symbol()"))
}

pub fn decimals() -> [u8; 4] {
    static SEL: OnceLock<[u8; 4]> = OnceLock::new();
    *SEL.get_or_init(|| selector(b"decimals()"))
}

pub fn token_uri() -> [u8; 4] {
    static SEL: OnceLock<[u8; 4]> = OnceLock::new();
    *SEL.get_or_init(|| selector(b"tokenURI(uint256)"))
}

pub fn uri() -> [u8; 4] {
    static SEL: OnceLock<[u8; 4]> = OnceLock::new();
    *SEL.get_or_init(|| selector(b"uri(uint256)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_selector_matches_known_value() {
        assert_eq!(hex::encode(name()), "06fdde03");
    }

    #[test]
    fn symbol_selector_matches_known_value() {
        assert_eq!(hex::encode(symbol()), "95d89b41");
    }

    #[test]
    fn decimals_selector_matches_known_value() {
        assert_eq!(hex::encode(decimals()), "313ce567");
    }
}
