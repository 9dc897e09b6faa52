//! Domain entity definitions and canonical JSON encoding shared by every
//! other crate in the workspace.

mod entities;
mod metadata;
mod uint256;

pub use entities::{
    Address20, Block, Hash32, InternalTransaction, InternalTransactionType, Reward,
    SmartContract, Token, TokenEvent, TokenInstance, TokenTransfer, Transaction,
    TransactionAction, TransactionLog, TransactionStatus, Withdrawal,
};
pub use metadata::TokenMetadata;
pub use uint256::{Uint256, Uint256ParseError};
