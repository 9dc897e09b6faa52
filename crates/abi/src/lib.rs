//! ABI Decoder: token transfer event decoding and metadata reads
//! (spec.md §4.2.1, SPEC_FULL.md §5.2).

mod decode;
mod metadata;
mod selectors;
mod signatures;

pub use decode::{decode_transfer, DecodedTransfer, TokenStandard};
pub use metadata::{fetch_bytecode, fetch_metadata};
