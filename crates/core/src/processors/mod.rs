//! One processor per broker topic (spec.md §4.5.1-§4.5.5).

mod block;
mod internal_transaction;
mod reward;
mod token;
mod transaction;
mod transaction_action;
mod transaction_log;
mod withdrawal;

pub use block::BlockProcessor;
pub use internal_transaction::InternalTransactionProcessor;
pub use reward::RewardProcessor;
pub use token::TokenProcessor;
pub use transaction::TransactionProcessor;
pub use transaction_action::TransactionActionProcessor;
pub use transaction_log::TransactionLogProcessor;
pub use withdrawal::WithdrawalProcessor;
