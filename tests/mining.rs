//! Mining results checked against exhaustive enumeration on small universes.

use std::collections::{BTreeMap, BTreeSet};

use itemset_growth::fp::{
    Constraint, Growth, UncertainConstraint, build_fp_tree, summary::ProbabilityMass,
    verify_expected_support,
};
use itemset_growth::{
    MinedPattern, Miner, MinerConfig, NeighborMap, Occurrence, PatternStats, Threshold,
    Transaction, TransactionDatabase,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const UNIVERSE: usize = 6;

fn label(item: usize) -> String {
    format!("i{item}")
}

fn certain_transactions() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    prop::collection::vec(prop::collection::btree_set(0..UNIVERSE, 0..=UNIVERSE), 0..24)
}

/// Probabilities are multiples of 1/4 so every expected support is exact.
fn uncertain_transactions() -> impl Strategy<Value = Vec<BTreeMap<usize, f64>>> {
    prop::collection::vec(
        prop::collection::btree_map(0..UNIVERSE, (1..=4u32).prop_map(|k| k as f64 / 4.0), 0..=UNIVERSE),
        0..16,
    )
}

/// Undirected neighbor relation over the universe, without self loops.
fn symmetric_neighbors() -> impl Strategy<Value = BTreeSet<(usize, usize)>> {
    prop::collection::btree_set((0..UNIVERSE, 0..UNIVERSE), 0..15).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a != b)
            .flat_map(|(a, b)| [(a, b), (b, a)])
            .collect()
    })
}

fn certain_database(rows: &[BTreeSet<usize>], timestamps: &[u64]) -> TransactionDatabase {
    rows.iter()
        .zip(timestamps)
        .map(|(row, &timestamp)| {
            Transaction::new(
                timestamp,
                row.iter().map(|&item| Occurrence::certain(label(item))).collect(),
            )
        })
        .collect()
}

fn positions(count: usize) -> Vec<u64> {
    (1..=count as u64).collect()
}

/// Strictly increasing timestamps from positive steps.
fn clock(steps: &[u64], count: usize) -> Vec<u64> {
    steps
        .iter()
        .scan(0, |clock, step| {
            *clock += step;
            Some(*clock)
        })
        .take(count)
        .collect()
}

/// Largest gap between ascending occurrences, from the time origin to the
/// horizon.
fn largest_gap(occurrences: &[u64], horizon: u64) -> u64 {
    let mut period = 0;
    let mut previous = 0;
    for &timestamp in occurrences {
        period = period.max(timestamp - previous);
        previous = timestamp;
    }
    period.max(horizon - previous)
}

fn uncertain_database(rows: &[BTreeMap<usize, f64>], timestamps: &[u64]) -> TransactionDatabase {
    rows.iter()
        .zip(timestamps)
        .map(|(row, &timestamp)| {
            Transaction::new(
                timestamp,
                row.iter()
                    .map(|(&item, &probability)| Occurrence::uncertain(label(item), probability))
                    .collect(),
            )
        })
        .collect()
}

fn exact_expected_support(rows: &[BTreeMap<usize, f64>], pattern: &[usize]) -> f64 {
    rows.iter()
        .filter(|row| pattern.iter().all(|item| row.contains_key(item)))
        .map(|row| pattern.iter().map(|item| row[item]).product::<f64>())
        .sum()
}

/// Every non-empty subset of the universe, as sorted item lists.
fn subsets() -> impl Iterator<Item = Vec<usize>> {
    (1u32..(1 << UNIVERSE)).map(|mask| (0..UNIVERSE).filter(|item| mask & (1 << item) != 0).collect())
}

fn key(items: &[usize]) -> Vec<String> {
    let mut labels: Vec<String> = items.iter().copied().map(label).collect();
    labels.sort();
    labels
}

fn keyed(patterns: Vec<MinedPattern>) -> BTreeMap<Vec<String>, PatternStats> {
    let count = patterns.len();
    let map: BTreeMap<_, _> = patterns
        .into_iter()
        .map(|pattern| {
            let mut labels = pattern.items;
            labels.sort();
            (labels, pattern.stats)
        })
        .collect();
    assert_eq!(map.len(), count, "a pattern was reported twice");
    map
}

fn containing<'a>(
    rows: &'a [BTreeSet<usize>],
    pattern: &'a [usize],
) -> impl Iterator<Item = usize> + 'a {
    rows.iter()
        .enumerate()
        .filter(move |(_, row)| pattern.iter().all(|item| row.contains(item)))
        .map(|(index, _)| index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn frequent_matches_enumeration(
        rows in certain_transactions(),
        min_support in 1u64..5,
        max_length in 1usize..=UNIVERSE,
        parallel in any::<bool>(),
    ) {
        let database = certain_database(&rows, &positions(rows.len()));
        let config = MinerConfig::frequent(Threshold::Count(min_support))
            .with_max_pattern_length(max_length)
            .with_parallel(parallel);
        let mined = keyed(Miner::new(config).mine(&database).unwrap());

        let expected: BTreeMap<_, _> = subsets()
            .filter(|pattern| pattern.len() <= max_length)
            .filter_map(|pattern| {
                let support = containing(&rows, &pattern).count() as u64;
                (support >= min_support)
                    .then(|| (key(&pattern), PatternStats::Frequent { support }))
            })
            .collect();
        prop_assert_eq!(mined, expected);
    }

    #[test]
    fn periodic_matches_enumeration(
        rows in certain_transactions(),
        steps in prop::collection::vec(1u64..4, 24),
        min_support in 1u64..4,
        max_period in 1u64..6,
        max_length in 1usize..=UNIVERSE,
        parallel in any::<bool>(),
    ) {
        let timestamps = clock(&steps, rows.len());
        let database = certain_database(&rows, &timestamps);
        let horizon = timestamps.last().copied().unwrap_or(0);

        let config = MinerConfig::periodic(Threshold::Count(min_support), Threshold::Count(max_period))
            .with_max_pattern_length(max_length)
            .with_parallel(parallel);
        let mined = keyed(Miner::new(config).mine(&database).unwrap());

        // Exact support and largest gap of every accepted subset
        let expected: BTreeMap<Vec<String>, (u64, u64)> = subsets()
            .filter(|pattern| pattern.len() <= max_length)
            .filter_map(|pattern| {
                let occurrences: Vec<u64> = containing(&rows, &pattern)
                    .map(|index| timestamps[index])
                    .collect();
                let support = occurrences.len() as u64;
                let period = largest_gap(&occurrences, horizon);
                (support >= min_support && period <= max_period)
                    .then(|| (key(&pattern), (support, period)))
            })
            .collect();

        prop_assert_eq!(
            mined.keys().collect::<Vec<_>>(),
            expected.keys().collect::<Vec<_>>()
        );
        for (pattern, stats) in &mined {
            let (support, exact_period) = expected[pattern];
            // Interleaved branches may widen the reported gap, never past the bound
            match *stats {
                PatternStats::Periodic { support: mined_support, period } => {
                    prop_assert_eq!(mined_support, support);
                    prop_assert!(exact_period <= period && period <= max_period);
                }
                other => prop_assert!(false, "unexpected stats {:?}", other),
            }
        }
    }

    #[test]
    fn correlated_matches_enumeration(
        rows in certain_transactions(),
        edges in symmetric_neighbors(),
        min_support in 1u64..4,
        min_ratio in prop::sample::select(vec![0.0, 0.25, 0.5, 0.75, 1.0]),
        max_length in 1usize..=UNIVERSE,
        parallel in any::<bool>(),
    ) {
        let database = certain_database(&rows, &positions(rows.len()));
        let mut neighbors = NeighborMap::new();
        for item in 0..UNIVERSE {
            neighbors.insert(
                label(item),
                edges.iter().filter(|(a, _)| *a == item).map(|&(_, b)| label(b)),
            );
        }

        let config = MinerConfig::correlated(Threshold::Count(min_support), min_ratio)
            .with_max_pattern_length(max_length)
            .with_parallel(parallel);
        let mined = keyed(Miner::new(config).with_neighbors(neighbors).mine(&database).unwrap());

        let singleton: Vec<u64> = (0..UNIVERSE)
            .map(|item| containing(&rows, &[item]).count() as u64)
            .collect();
        let expected: BTreeMap<_, _> = subsets()
            .filter(|pattern| pattern.len() <= max_length)
            .filter(|pattern| {
                pattern.iter().all(|&a| {
                    pattern.iter().all(|&b| a == b || edges.contains(&(a, b)))
                })
            })
            .filter_map(|pattern| {
                let support = containing(&rows, &pattern).count() as u64;
                let max_item = pattern.iter().map(|&item| singleton[item]).max().unwrap_or(0);
                let ratio = if max_item == 0 { 0.0 } else { support as f64 / max_item as f64 };
                (support >= min_support && ratio >= min_ratio)
                    .then(|| (key(&pattern), PatternStats::Correlated { support, ratio }))
            })
            .collect();
        prop_assert_eq!(mined, expected);
    }

    #[test]
    fn uncertain_matches_enumeration(
        rows in uncertain_transactions(),
        min_support in 1u64..3,
        parallel in any::<bool>(),
    ) {
        let database = uncertain_database(&rows, &positions(rows.len()));

        let config = MinerConfig::uncertain(Threshold::Count(min_support)).with_parallel(parallel);
        let mined = keyed(Miner::new(config).mine(&database).unwrap());

        let expected: BTreeMap<_, _> = subsets()
            .filter_map(|pattern| {
                let expected_support = exact_expected_support(&rows, &pattern);
                (expected_support >= min_support as f64)
                    .then(|| (key(&pattern), PatternStats::Uncertain { expected_support }))
            })
            .collect();
        prop_assert_eq!(mined, expected);
    }

    #[test]
    fn uncertain_periodic_matches_enumeration(
        rows in uncertain_transactions(),
        steps in prop::collection::vec(1u64..4, 16),
        min_support in 0u64..3,
        max_period in 1u64..6,
        max_length in 1usize..=UNIVERSE,
        parallel in any::<bool>(),
    ) {
        let timestamps = clock(&steps, rows.len());
        let database = uncertain_database(&rows, &timestamps);
        let horizon = timestamps.last().copied().unwrap_or(0);

        let config = MinerConfig::uncertain_periodic(
            Threshold::Count(min_support),
            Threshold::Count(max_period),
        )
        .with_max_pattern_length(max_length)
        .with_parallel(parallel);
        let mined = keyed(Miner::new(config).mine(&database).unwrap());

        // Periodicity counts every transaction holding the pattern
        let expected: BTreeMap<Vec<String>, (f64, u64)> = subsets()
            .filter(|pattern| pattern.len() <= max_length)
            .filter_map(|pattern| {
                let occurrences: Vec<u64> = rows
                    .iter()
                    .zip(&timestamps)
                    .filter(|(row, _)| pattern.iter().all(|item| row.contains_key(item)))
                    .map(|(_, &timestamp)| timestamp)
                    .collect();
                if occurrences.is_empty() {
                    return None;
                }
                let expected_support = exact_expected_support(&rows, &pattern);
                let period = largest_gap(&occurrences, horizon);
                (expected_support >= min_support as f64 && period <= max_period)
                    .then(|| (key(&pattern), (expected_support, period)))
            })
            .collect();

        prop_assert_eq!(
            mined.keys().collect::<Vec<_>>(),
            expected.keys().collect::<Vec<_>>()
        );
        for (pattern, stats) in &mined {
            let (expected_support, exact_period) = expected[pattern];
            match *stats {
                PatternStats::UncertainPeriodic { expected_support: mined_support, period } => {
                    prop_assert_eq!(mined_support, expected_support);
                    prop_assert!(exact_period <= period && period <= max_period);
                }
                other => prop_assert!(false, "unexpected stats {:?}", other),
            }
        }
    }

    /// The search bound never discards a pattern the verification pass
    /// would keep, at fractional thresholds too.
    #[test]
    fn uncertain_bound_is_sound(
        rows in uncertain_transactions(),
        min_expected_support in prop::sample::select(vec![0.25, 0.5, 0.75, 1.25]),
    ) {
        let database = uncertain_database(&rows, &positions(rows.len()));
        let constraint = UncertainConstraint { min_expected_support };
        let prepared = build_fp_tree(&database, &(), |summary: &ProbabilityMass| {
            !constraint.prune(&[], summary)
        });
        let items = prepared.items.clone();
        let candidates = Growth::new(&constraint).mine(prepared.tree, false);
        let verified = verify_expected_support(&database, &items, &candidates, min_expected_support, false);

        let found: BTreeSet<Vec<String>> = verified
            .iter()
            .map(|(pattern, _)| {
                let mut labels: Vec<String> = items.labels(pattern).map(str::to_string).collect();
                labels.sort();
                labels
            })
            .collect();
        let expected: BTreeSet<Vec<String>> = subsets()
            .filter(|pattern| exact_expected_support(&rows, pattern) >= min_expected_support)
            .map(|pattern| key(&pattern))
            .collect();
        prop_assert_eq!(found, expected);
    }
}

#[test]
fn test_chain_database_uses_every_subset() {
    // Identical transactions collapse into one strict chain
    let rows = vec![(0..4).collect::<BTreeSet<usize>>(); 3];
    let database = certain_database(&rows, &positions(rows.len()));
    let mined = Miner::new(MinerConfig::frequent(Threshold::Count(3)))
        .mine(&database)
        .unwrap();

    assert_eq!(mined.len(), 15);
    assert!(
        mined
            .iter()
            .all(|pattern| pattern.stats == PatternStats::Frequent { support: 3 })
    );
}
