//! CLI command implementations.

pub mod batch;

pub use batch::{BatchCommand, BatchEntry, BatchSummary};
