//! Token transfer event decoding (spec.md §4.2.1). Pure functions over
//! raw log topics/data — no chain I/O, no side effects, so replaying
//! the same log always yields the same [`DecodedTransfer`] (spec.md
//! §8 property 5).

use alloy_primitives::{Address, Bytes, B256, U256};

use crate::signatures::{transfer_signature, transfer_single_signature};

/// Which standard produced a [`DecodedTransfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStandard {
    Erc20,
    Erc721,
    Erc1155Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransfer {
    pub standard: TokenStandard,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub token_id: U256,
}

impl DecodedTransfer {
    pub fn is_mint(&self) -> bool {
        self.from == Address::ZERO
    }

    pub fn is_burn(&self) -> bool {
        self.to == Address::ZERO
    }
}

/// Decodes one receipt log per spec.md §4.2.1's ordered rule set.
/// Returns `None` for logs that match none of the standard shapes.
pub fn decode_transfer(topics: &[B256], data: &Bytes) -> Option<DecodedTransfer> {
    let signature = *topics.first()?;

    if signature == transfer_signature() {
        if topics.len() >= 4 {
            // ERC-721: from, to indexed; tokenId indexed (topics[3]).
            return Some(DecodedTransfer {
                standard: TokenStandard::Erc721,
                from: address_from_topic(topics[1]),
                to: address_from_topic(topics[2]),
                value: U256::ZERO,
                token_id: U256::from_be_slice(topics[3].as_slice()),
            });
        }
        if topics.len() >= 3 {
            // ERC-20: from, to indexed; value in data.
            return Some(DecodedTransfer {
                standard: TokenStandard::Erc20,
                from: address_from_topic(topics[1]),
                to: address_from_topic(topics[2]),
                value: u256_from_data(data, 0)?,
                token_id: U256::ZERO,
            });
        }
        return None;
    }

    if signature == transfer_single_signature() && data.len() >= 64 {
        // TransferSingle(operator, from, to, id, value): operator is
        // topics[1], from/to are topics[2]/topics[3]; id and value
        // are both unindexed, in `data`.
        if topics.len() < 4 {
            return None;
        }
        return Some(DecodedTransfer {
            standard: TokenStandard::Erc1155Single,
            from: address_from_topic(topics[2]),
            to: address_from_topic(topics[3]),
            token_id: u256_from_data(data, 0)?,
            value: u256_from_data(data, 32)?,
        });
    }

    None
}

fn address_from_topic(topic: B256) -> Address {
    Address::from_slice(&topic.as_slice()[12..32])
}

fn u256_from_data(data: &Bytes, offset: usize) -> Option<U256> {
    let chunk = data.get(offset..offset + 32)?;
    Some(U256::from_be_slice(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_from_address(address: Address) -> B256 {
        let mut bytes = [0u8; 32];
        bytes[12..32].copy_from_slice(address.as_slice());
        B256::from(bytes)
    }

    fn topic_from_u256(value: U256) -> B256 {
        B256::from(value.to_be_bytes::<32>())
    }

    /// S4 — ERC-20 transfer: value 100, three topics.
    #[test]
    fn decodes_erc20_transfer() {
        let from = Address::repeat_byte(0xAA);
        let to = Address::repeat_byte(0xBB);
        let topics = vec![transfer_signature(), topic_from_address(from), topic_from_address(to)];
        let data = Bytes::from(U256::from(100u64).to_be_bytes::<32>().to_vec());

        let decoded = decode_transfer(&topics, &data).unwrap();
        assert_eq!(decoded.standard, TokenStandard::Erc20);
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.value, U256::from(100u64));
        assert!(!decoded.is_mint());
        assert!(!decoded.is_burn());
    }

    /// S5 — ERC-721 mint: from = zero address, token id 1, four topics.
    #[test]
    fn decodes_erc721_mint() {
        let to = Address::repeat_byte(0xCC);
        let topics = vec![
            transfer_signature(),
            topic_from_address(Address::ZERO),
            topic_from_address(to),
            topic_from_u256(U256::from(1u64)),
        ];
        let data = Bytes::new();

        let decoded = decode_transfer(&topics, &data).unwrap();
        assert_eq!(decoded.standard, TokenStandard::Erc721);
        assert_eq!(decoded.token_id, U256::from(1u64));
        assert!(decoded.is_mint());
        assert!(!decoded.is_burn());
    }

    #[test]
    fn decodes_erc1155_transfer_single() {
        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);
        let operator = Address::repeat_byte(0x33);
        let topics = vec![
            transfer_single_signature(),
            topic_from_address(operator),
            topic_from_address(from),
            topic_from_address(to),
        ];
        let mut data = U256::from(7u64).to_be_bytes::<32>().to_vec();
        data.extend(U256::from(42u64).to_be_bytes::<32>());

        let decoded = decode_transfer(&topics, &Bytes::from(data)).unwrap();
        assert_eq!(decoded.standard, TokenStandard::Erc1155Single);
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.token_id, U256::from(7u64));
        assert_eq!(decoded.value, U256::from(42u64));
    }

    #[test]
    fn unrelated_event_signature_decodes_to_none() {
        let topics = vec![B256::repeat_byte(0xFF)];
        assert!(decode_transfer(&topics, &Bytes::new()).is_none());
    }

    #[test]
    fn batch_transfer_is_not_decoded() {
        // ERC-1155 TransferBatch is out of scope (spec.md §9); any
        // signature other than TransferSingle/Transfer yields None
        // even with a plausible topic/data shape.
        let topics = vec![B256::repeat_byte(0xAB), B256::ZERO, B256::ZERO, B256::ZERO];
        let data = vec![0u8; 128];
        assert!(decode_transfer(&topics, &Bytes::from(data)).is_none());
    }
}
