//! Token metadata reads via `eth_call` (spec.md §4.2.1). Every field
//! is best-effort: a revert, a malformed return, or a network error
//! downgrades that one field to `None` rather than failing the whole
//! fetch — matching spec.md's "errors are downgraded to field absent".

use alloy_primitives::{Address, Bytes, U256};
use idx_chain::ChainClient;
use idx_codec::TokenMetadata;

use crate::selectors;

/// Fetches `name`/`symbol`/`decimals`, and either `tokenURI(token_id)`
/// (ERC-721) or `uri(token_id)` (ERC-1155) depending on whether
/// `token_id` is present.
pub async fn fetch_metadata(
    chain: &ChainClient,
    address: Address,
    token_id: Option<U256>,
) -> TokenMetadata {
    let name = call_string(chain, address, &selectors::name(), None).await;
    let symbol = call_string(chain, address, &selectors::symbol(), None).await;
    let decimals = call_uint8(chain, address, &selectors::decimals()).await;

    let uri = match token_id {
        Some(id) => {
            if let Some(value) = call_string(chain, address, &selectors::token_uri(), Some(id)).await {
                Some(value)
            } else {
                call_string(chain, address, &selectors::uri(), Some(id)).await
            }
        }
        None => None,
    };

    TokenMetadata { name, symbol, decimals, uri, bytecode: None }
}

/// Fetches bytecode for an address the current transaction deployed,
/// decorating the event with `smart_contract_deployed = true`
/// (spec.md §4.2.1).
pub async fn fetch_bytecode(chain: &ChainClient, address: Address) -> Option<Bytes> {
    chain.code_at(address).await.ok().filter(|code| !code.is_empty())
}

async fn call_string(
    chain: &ChainClient,
    address: Address,
    selector: &[u8; 4],
    arg: Option<U256>,
) -> Option<String> {
    let data = encode_call(selector, arg);
    let output = chain.call(address, data).await.ok()?;
    decode_string(&output)
}

async fn call_uint8(chain: &ChainClient, address: Address, selector: &[u8; 4]) -> Option<u8> {
    let output = chain.call(address, encode_call(selector, None)).await.ok()?;
    decode_uint8(&output)
}

fn encode_call(selector: &[u8; 4], arg: Option<U256>) -> Bytes {
    let mut data = selector.to_vec();
    if let Some(value) = arg {
        data.extend_from_slice(&value.to_be_bytes::<32>());
    }
    Bytes::from(data)
}

/// Decodes a Solidity ABI `string` return value: a 32-byte offset
/// word (ignored, there is only ever one return value here), a
/// 32-byte length word, then the UTF-8 bytes padded to a 32-byte
/// boundary.
fn decode_string(output: &Bytes) -> Option<String> {
    if output.len() < 64 {
        return None;
    }
    let length = U256::from_be_slice(&output[32..64]).to::<usize>();
    let bytes = output.get(64..64 + length)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn decode_uint8(output: &Bytes) -> Option<u8> {
    let word = output.get(0..32)?;
    let value = U256::from_be_slice(word);
    u8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_abi_string(value: &str) -> Bytes {
        let mut out = vec![0u8; 32];
        out[31] = 0x20; // offset = 32
        let mut length_word = vec![0u8; 32];
        let length_bytes = (value.len() as u64).to_be_bytes();
        length_word[24..32].copy_from_slice(&length_bytes);
        out.extend(length_word);
        let mut data = value.as_bytes().to_vec();
        while data.len() % 32 != 0 {
            data.push(0);
        }
        out.extend(data);
        Bytes::from(out)
    }

    #[test]
    fn decodes_abi_string_return() {
        let encoded = encode_abi_string("MyToken");
        assert_eq!(decode_string(&encoded), Some("MyToken".to_string()));
    }

    #[test]
    fn decodes_uint8_return() {
        let mut word = [0u8; 32];
        word[31] = 18;
        assert_eq!(decode_uint8(&Bytes::from(word.to_vec())), Some(18));
    }

    #[test]
    fn truncated_output_decodes_to_none() {
        assert!(decode_string(&Bytes::from_static(&[0u8; 10])).is_none());
    }

    #[test]
    fn encode_call_appends_padded_argument() {
        let data = encode_call(&selectors::token_uri(), Some(U256::from(1u64)));
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[0..4], &selectors::token_uri());
    }
}
