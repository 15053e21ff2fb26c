use std::collections::BTreeSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span};

use super::builder::{Prepared, build_fp_tree};
use super::constraint::{
    Constraint, CorrelationConstraint, FrequencyConstraint, PatternStats, PeriodicConstraint,
    UncertainConstraint, UncertainPeriodicConstraint,
};
use super::growth::Growth;
use super::item::{Item, ItemTable};
use super::storage::PatternStorage;
use super::summary::{
    CorrelatedCount, Count, ExpectedSupport, IntervalSummary, PeriodParams, PeriodicMass,
    ProbabilityMass,
};
use super::tree::FpTree;
use super::verify::verify_expected_support;
use crate::config::{MinerConfig, Mode, Threshold};
use crate::database::{NeighborMap, TransactionDatabase};
use crate::error::{MiningError, Result};

/// A labeled pattern with its mode-specific statistics.
///
/// Items are listed most supported first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MinedPattern {
    pub items: Vec<String>,
    #[serde(flatten)]
    pub stats: PatternStats,
}

/// Entry point for mining a labeled transaction database.
///
/// ```
/// use itemset_growth::{Miner, MinerConfig, Threshold, TransactionDatabase};
///
/// let mut database = TransactionDatabase::new();
/// database.push_items(["bread", "milk"]);
/// database.push_items(["bread", "butter"]);
///
/// let patterns = Miner::new(MinerConfig::frequent(Threshold::Count(2)))
///     .mine(&database)
///     .unwrap();
/// assert_eq!(patterns.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Miner {
    config: MinerConfig,
    neighbors: Option<NeighborMap>,
}

impl Miner {
    pub fn new(config: MinerConfig) -> Self {
        Self {
            config,
            neighbors: None,
        }
    }

    /// Neighbor relation required by correlated mining.
    pub fn with_neighbors(mut self, neighbors: NeighborMap) -> Self {
        self.neighbors = Some(neighbors);
        self
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Runs the configured mode over `database`.
    pub fn mine(&self, database: &TransactionDatabase) -> Result<Vec<MinedPattern>> {
        self.config.validate()?;
        let span = info_span!("mine", mode = self.config.mode.name());
        let _guard = span.enter();

        let started = Instant::now();
        let num_transactions = database.len();
        let (patterns, ranked, nodes) = match &self.config.mode {
            Mode::Frequent => self.mine_frequent(database)?,
            Mode::Periodic { max_period } => {
                self.mine_periodic(database, period_params(max_period, database))?
            }
            Mode::Correlated { min_ratio } => self.mine_correlated(database, *min_ratio)?,
            Mode::Uncertain { max_period: None } => self.mine_uncertain(database)?,
            Mode::Uncertain {
                max_period: Some(max_period),
            } => self.mine_uncertain_periodic(database, period_params(max_period, database))?,
        };

        info!(
            transactions = num_transactions,
            ranked_items = ranked,
            nodes,
            patterns = patterns.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "mining finished"
        );
        Ok(patterns)
    }

    fn mine_frequent(&self, database: &TransactionDatabase) -> Result<Mined> {
        let constraint = FrequencyConstraint {
            min_support: self.config.min_support.at_least(database.len()),
        };
        let prepared: Prepared<Count> =
            build_fp_tree(database, &(), |summary| !constraint.prune(&[], summary));
        Ok(self.run(&constraint, prepared))
    }

    fn mine_periodic(&self, database: &TransactionDatabase, period: PeriodParams) -> Result<Mined> {
        let constraint = PeriodicConstraint {
            min_support: self.config.min_support.at_least(database.len()),
            period,
        };
        let prepared: Prepared<IntervalSummary> =
            build_fp_tree(database, &period, |summary| !constraint.prune(&[], summary));
        Ok(self.run(&constraint, prepared))
    }

    fn mine_correlated(&self, database: &TransactionDatabase, min_ratio: f64) -> Result<Mined> {
        let neighbor_map = self.neighbors.as_ref().ok_or_else(|| {
            MiningError::Configuration("correlated mining requires a neighbor map".to_string())
        })?;
        let min_support = self.config.min_support.at_least(database.len());

        // A single item is always fully correlated with itself.
        let prepared: Prepared<CorrelatedCount> =
            build_fp_tree(database, &(), |summary: &CorrelatedCount| summary.0 >= min_support);
        let supports = prepared.singletons.iter().map(|summary| summary.0).collect();
        let neighbors = rank_neighbors(&prepared.items, neighbor_map);
        let constraint = CorrelationConstraint::new(min_support, min_ratio, supports, neighbors);
        Ok(self.run(&constraint, prepared))
    }

    fn mine_uncertain(&self, database: &TransactionDatabase) -> Result<Mined> {
        let constraint = UncertainConstraint {
            min_expected_support: self.config.min_support.expected(database.len()),
        };
        let prepared: Prepared<ProbabilityMass> =
            build_fp_tree(database, &(), |summary| !constraint.prune(&[], summary));
        Ok(self.run_verified(&constraint, constraint.min_expected_support, database, prepared))
    }

    fn mine_uncertain_periodic(
        &self,
        database: &TransactionDatabase,
        period: PeriodParams,
    ) -> Result<Mined> {
        let constraint = UncertainPeriodicConstraint {
            min_expected_support: self.config.min_support.expected(database.len()),
            period,
        };
        let prepared: Prepared<PeriodicMass> =
            build_fp_tree(database, &period, |summary| !constraint.prune(&[], summary));
        Ok(self.run_verified(&constraint, constraint.min_expected_support, database, prepared))
    }

    fn run<C: Constraint>(&self, constraint: &C, prepared: Prepared<C::Summary>) -> Mined {
        let Prepared { items, tree, .. } = prepared;
        let nodes = tree.len();
        let storage = self.grow(constraint, tree);
        (label_patterns(constraint, &items, &storage), items.len(), nodes)
    }

    /// `run` followed by the exact expected-support pass.
    fn run_verified<C>(
        &self,
        constraint: &C,
        min_expected_support: f64,
        database: &TransactionDatabase,
        prepared: Prepared<C::Summary>,
    ) -> Mined
    where
        C: Constraint,
        C::Summary: ExpectedSupport,
    {
        let Prepared { items, tree, .. } = prepared;
        let nodes = tree.len();

        let candidates = self.grow(constraint, tree);
        let verified = verify_expected_support(
            database,
            &items,
            &candidates,
            min_expected_support,
            self.config.parallel,
        );
        (label_patterns(constraint, &items, &verified), items.len(), nodes)
    }

    fn grow<C: Constraint>(
        &self,
        constraint: &C,
        tree: FpTree<C::Summary>,
    ) -> PatternStorage<C::Summary> {
        Growth::new(constraint)
            .with_max_length(self.config.length_limit())
            .mine(tree, self.config.parallel)
    }
}

fn period_params(max_period: &Threshold, database: &TransactionDatabase) -> PeriodParams {
    PeriodParams {
        max_period: max_period.at_most(database.len()),
        horizon: database.horizon(),
    }
}

/// Labeled patterns, ranked item count and initial tree size.
type Mined = (Vec<MinedPattern>, usize, usize);

fn label_patterns<C: Constraint>(
    constraint: &C,
    items: &ItemTable,
    storage: &PatternStorage<C::Summary>,
) -> Vec<MinedPattern> {
    let mut sorted: Vec<Item> = Vec::new();
    storage
        .iter()
        .map(|(pattern, summary)| {
            sorted.clear();
            sorted.extend_from_slice(pattern);
            sorted.sort_unstable();
            MinedPattern {
                items: items.labels(&sorted).map(str::to_string).collect(),
                stats: constraint.stats(pattern, summary),
            }
        })
        .collect()
}

/// Neighbor sets by item rank. Unranked neighbor labels are ignored; ranked
/// items without an entry get `None` and never join a pattern.
fn rank_neighbors(items: &ItemTable, neighbor_map: &NeighborMap) -> Vec<Option<BTreeSet<Item>>> {
    items
        .items()
        .map(|item| {
            neighbor_map.get(items.label(item)).map(|neighbors| {
                neighbors
                    .iter()
                    .filter_map(|label| items.item(label))
                    .collect()
            })
        })
        .collect()
}
