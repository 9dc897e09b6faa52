//! Producer-side pipeline: Block Stream, Aggregator, Worker Pool
//! (spec.md §4.1-4.3, SPEC_FULL.md §5.5-5.7).

mod aggregate;
mod pool;
mod stream;

pub use aggregate::{aggregate_block, AggregateError};
pub use pool::spawn as spawn_worker_pool;
pub use stream::spawn as spawn_block_stream;
