//! Constraint-parameterized FP-growth mining.
//!
//! Transactions are compressed into a prefix tree whose nodes carry an
//! occurrence summary, and the recursive growth engine enumerates every
//! itemset accepted by the active [`fp::Constraint`]. Four mining modes share
//! the engine:
//!
//! - frequent itemsets (exact counts),
//! - periodic-frequent itemsets (timestamp interval summaries),
//! - spatially correlated itemsets (neighbor-set intersection plus ratio),
//! - uncertain frequent itemsets (expected-support bound plus exact verification).
//!
//! [`Miner`] is the entry point for labeled transaction databases.

pub mod config;
pub mod database;
pub mod error;
pub mod fp;
pub mod io;

#[cfg(feature = "python")]
mod python;

pub use config::{MinerConfig, Mode, Threshold};
pub use database::{NeighborMap, Occurrence, Transaction, TransactionDatabase};
pub use error::{MiningError, Result};
pub use fp::{MinedPattern, Miner, PatternStats};
