// Occurrence summaries attached to tree nodes and per-item metadata

mod count;
mod interval;
mod probability;
mod uncertain;

use std::fmt::Debug;

pub use count::{CorrelatedCount, Count};
pub use interval::{Interval, IntervalSummary, PeriodParams};
pub use probability::ProbabilityMass;
pub use uncertain::PeriodicMass;

/// Aggregate of the transactions that reach a node (or contain an item).
///
/// Summaries are merged in place as transactions are inserted and as removed
/// nodes are promoted into their parents. `Default` is the empty summary.
pub trait Summary: Clone + Debug + Default + Send + Sync {
    /// Immutable run parameters needed by `merge`.
    type Params: Debug + Sync;
    type Support: Copy + PartialOrd + Debug;

    /// Datum contributed by one occurrence of a single item.
    fn singleton(timestamp: u64, probability: f64) -> Self;

    /// Datum stored at the tail node of an inserted transaction; the
    /// probabilities are those of its retained items in tree order.
    fn tail(timestamp: u64, probabilities: &[f64]) -> Self;

    fn merge(&mut self, other: &Self, params: &Self::Params);

    fn support(&self) -> Self::Support;

    fn is_empty(&self) -> bool;
}

/// Summaries whose search-time support only bounds an expected support, to be
/// replaced by the exact value after verification.
pub trait ExpectedSupport: Summary {
    fn with_expected_support(&self, expected_support: f64) -> Self;
}
