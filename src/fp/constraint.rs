//! Interestingness constraints, one per mining mode.
//!
//! A constraint decides final acceptance of a pattern, prunes branches that
//! cannot yield accepted descendants, and optionally threads a structural
//! context (the running neighbor intersection) through the recursion.

use std::collections::BTreeSet;
use std::fmt::Debug;

use serde::Serialize;

use super::item::Item;
use super::summary::{
    CorrelatedCount, Count, IntervalSummary, PeriodParams, PeriodicMass, ProbabilityMass, Summary,
};

/// Mode-appropriate statistics reported with each pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternStats {
    Frequent { support: u64 },
    Periodic { support: u64, period: u64 },
    Correlated { support: u64, ratio: f64 },
    Uncertain { expected_support: f64 },
    UncertainPeriodic { expected_support: f64, period: u64 },
}

pub trait Constraint: Sync {
    type Summary: Summary;
    type Context: Clone + Debug + Send + Sync;

    fn params(&self) -> &<Self::Summary as Summary>::Params;

    fn root_context(&self) -> Self::Context;

    /// Context after appending `item` to the prefix, or `None` when `item`
    /// may not extend a prefix mined under `context`.
    fn extend(&self, context: &Self::Context, item: Item) -> Option<Self::Context>;

    /// Whether `item` may appear in a conditional pattern base mined under
    /// `context`.
    fn admits(&self, context: &Self::Context, item: Item) -> bool;

    fn accept(&self, pattern: &[Item], summary: &Self::Summary) -> bool;

    /// True when neither `pattern` nor any superset of it can be accepted.
    fn prune(&self, pattern: &[Item], summary: &Self::Summary) -> bool;

    fn stats(&self, pattern: &[Item], summary: &Self::Summary) -> PatternStats;
}

#[derive(Clone, Debug)]
pub struct FrequencyConstraint {
    pub min_support: u64,
}

impl Constraint for FrequencyConstraint {
    type Summary = Count;
    type Context = ();

    fn params(&self) -> &() {
        &()
    }

    fn root_context(&self) {}

    fn extend(&self, _context: &(), _item: Item) -> Option<()> {
        Some(())
    }

    fn admits(&self, _context: &(), _item: Item) -> bool {
        true
    }

    fn accept(&self, _pattern: &[Item], summary: &Count) -> bool {
        summary.0 >= self.min_support
    }

    fn prune(&self, _pattern: &[Item], summary: &Count) -> bool {
        summary.0 < self.min_support
    }

    fn stats(&self, _pattern: &[Item], summary: &Count) -> PatternStats {
        PatternStats::Frequent { support: summary.0 }
    }
}

#[derive(Clone, Debug)]
pub struct PeriodicConstraint {
    pub min_support: u64,
    pub period: PeriodParams,
}

impl Constraint for PeriodicConstraint {
    type Summary = IntervalSummary;
    type Context = ();

    fn params(&self) -> &PeriodParams {
        &self.period
    }

    fn root_context(&self) {}

    fn extend(&self, _context: &(), _item: Item) -> Option<()> {
        Some(())
    }

    fn admits(&self, _context: &(), _item: Item) -> bool {
        true
    }

    fn accept(&self, _pattern: &[Item], summary: &IntervalSummary) -> bool {
        summary.support() >= self.min_support && summary.is_periodic(&self.period)
    }

    // Both conditions are anti-monotone: a superset occurs in a subset of
    // the timestamps, so its support cannot grow and its gaps cannot shrink.
    fn prune(&self, pattern: &[Item], summary: &IntervalSummary) -> bool {
        !self.accept(pattern, summary)
    }

    fn stats(&self, _pattern: &[Item], summary: &IntervalSummary) -> PatternStats {
        PatternStats::Periodic {
            support: summary.support(),
            period: summary.period(&self.period),
        }
    }
}

/// Spatially correlated patterns: every item must lie in the neighborhood of
/// the items added before it, and the pattern support must be a large enough
/// share of the support of its most frequent item.
#[derive(Clone, Debug)]
pub struct CorrelationConstraint {
    pub min_support: u64,
    pub min_ratio: f64,
    /// Global singleton support, indexed by item rank
    supports: Vec<u64>,
    /// Neighbor set per item rank; `None` for items without a neighbor entry
    neighbors: Vec<Option<BTreeSet<Item>>>,
}

impl CorrelationConstraint {
    pub fn new(
        min_support: u64,
        min_ratio: f64,
        supports: Vec<u64>,
        neighbors: Vec<Option<BTreeSet<Item>>>,
    ) -> Self {
        debug_assert_eq!(supports.len(), neighbors.len());
        Self {
            min_support,
            min_ratio,
            supports,
            neighbors,
        }
    }

    fn max_item_support(&self, pattern: &[Item]) -> u64 {
        pattern
            .iter()
            .map(|item| self.supports[item.index()])
            .max()
            .unwrap_or(0)
    }

    pub fn ratio(&self, pattern: &[Item], summary: &CorrelatedCount) -> f64 {
        summary.ratio(self.max_item_support(pattern))
    }
}

impl Constraint for CorrelationConstraint {
    type Summary = CorrelatedCount;
    type Context = BTreeSet<Item>;

    fn params(&self) -> &() {
        &()
    }

    fn root_context(&self) -> BTreeSet<Item> {
        (0..self.supports.len() as u32).map(Item::new).collect()
    }

    fn extend(&self, context: &BTreeSet<Item>, item: Item) -> Option<BTreeSet<Item>> {
        if !context.contains(&item) {
            return None;
        }
        let neighbors = self.neighbors.get(item.index())?.as_ref()?;
        Some(context.intersection(neighbors).copied().collect())
    }

    fn admits(&self, context: &BTreeSet<Item>, item: Item) -> bool {
        context.contains(&item)
    }

    fn accept(&self, pattern: &[Item], summary: &CorrelatedCount) -> bool {
        summary.0 >= self.min_support && self.ratio(pattern, summary) >= self.min_ratio
    }

    // Support shrinks and the largest member support grows along supersets,
    // so the ratio is anti-monotone as well.
    fn prune(&self, pattern: &[Item], summary: &CorrelatedCount) -> bool {
        !self.accept(pattern, summary)
    }

    fn stats(&self, pattern: &[Item], summary: &CorrelatedCount) -> PatternStats {
        PatternStats::Correlated {
            support: summary.0,
            ratio: self.ratio(pattern, summary),
        }
    }
}

/// Expected-support mining over existential probabilities. Acceptance during
/// the search relies on [`ProbabilityMass::bound`] and is provisional until
/// the verification pass recomputes exact expected supports.
#[derive(Clone, Debug)]
pub struct UncertainConstraint {
    pub min_expected_support: f64,
}

impl Constraint for UncertainConstraint {
    type Summary = ProbabilityMass;
    type Context = ();

    fn params(&self) -> &() {
        &()
    }

    fn root_context(&self) {}

    fn extend(&self, _context: &(), _item: Item) -> Option<()> {
        Some(())
    }

    fn admits(&self, _context: &(), _item: Item) -> bool {
        true
    }

    fn accept(&self, pattern: &[Item], summary: &ProbabilityMass) -> bool {
        summary.bound(pattern.len()) >= self.min_expected_support
    }

    fn prune(&self, pattern: &[Item], summary: &ProbabilityMass) -> bool {
        summary.bound(pattern.len()) < self.min_expected_support
    }

    fn stats(&self, _pattern: &[Item], summary: &ProbabilityMass) -> PatternStats {
        PatternStats::Uncertain {
            expected_support: summary.mass,
        }
    }
}

/// Expected-support mining with a bound on the largest gap between the
/// transactions containing the pattern.
#[derive(Clone, Debug)]
pub struct UncertainPeriodicConstraint {
    pub min_expected_support: f64,
    pub period: PeriodParams,
}

impl Constraint for UncertainPeriodicConstraint {
    type Summary = PeriodicMass;
    type Context = ();

    fn params(&self) -> &PeriodParams {
        &self.period
    }

    fn root_context(&self) {}

    fn extend(&self, _context: &(), _item: Item) -> Option<()> {
        Some(())
    }

    fn admits(&self, _context: &(), _item: Item) -> bool {
        true
    }

    fn accept(&self, pattern: &[Item], summary: &PeriodicMass) -> bool {
        summary.mass.bound(pattern.len()) >= self.min_expected_support
            && summary.timestamps.is_periodic(&self.period)
    }

    fn prune(&self, pattern: &[Item], summary: &PeriodicMass) -> bool {
        !self.accept(pattern, summary)
    }

    fn stats(&self, _pattern: &[Item], summary: &PeriodicMass) -> PatternStats {
        PatternStats::UncertainPeriodic {
            expected_support: summary.mass.mass,
            period: summary.timestamps.period(&self.period),
        }
    }
}
