use rayon::prelude::*;
use tracing::debug;

use super::builder::distinct_occurrences;
use super::item::{Item, ItemTable};
use super::storage::PatternStorage;
use super::summary::ExpectedSupport;
use crate::database::TransactionDatabase;

/// Occurrence list of one item: (transaction index, probability), ascending.
type Occurrences = Vec<(usize, f64)>;

/// Removes the false positives of an uncertain search.
///
/// The database is scanned once into per-item occurrence lists; the exact
/// expected support of a candidate is the sum, over the transactions holding
/// all of its items, of the product of their probabilities. Candidates below
/// `min_expected_support` are dropped, the rest carry the exact value.
pub fn verify_expected_support<S: ExpectedSupport>(
    database: &TransactionDatabase,
    items: &ItemTable,
    candidates: &PatternStorage<S>,
    min_expected_support: f64,
    parallel: bool,
) -> PatternStorage<S> {
    let mut index: Vec<Occurrences> = vec![Vec::new(); items.len()];
    for (tid, transaction) in database.iter().enumerate() {
        for (label, probability) in distinct_occurrences(transaction) {
            if let Some(item) = items.item(label) {
                index[item.index()].push((tid, probability));
            }
        }
    }

    let exact = |(pattern, _): (&[Item], &S)| expected_support(&index, pattern);
    let supports: Vec<f64> = if parallel {
        let candidates: Vec<_> = candidates.iter().collect();
        candidates.into_par_iter().map(exact).collect()
    } else {
        candidates.iter().map(exact).collect()
    };

    let mut verified = PatternStorage::new();
    for ((pattern, summary), expected) in candidates.iter().zip(supports) {
        if expected >= min_expected_support {
            verified.push(pattern, summary.with_expected_support(expected));
        }
    }
    debug!(
        candidates = candidates.len(),
        verified = verified.len(),
        "verified expected supports"
    );
    verified
}

fn expected_support(index: &[Occurrences], pattern: &[Item]) -> f64 {
    let Some((first, rest)) = pattern.split_first() else {
        return 0.0;
    };
    let mut joint: Occurrences = index[first.index()].clone();
    for item in rest {
        joint = join(&joint, &index[item.index()]);
        if joint.is_empty() {
            return 0.0;
        }
    }
    joint.iter().map(|&(_, probability)| probability).sum()
}

/// Merge-join of two occurrence lists, multiplying probabilities.
fn join(left: &[(usize, f64)], right: &[(usize, f64)]) -> Occurrences {
    let mut joined = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].0.cmp(&right[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                joined.push((left[i].0, left[i].1 * right[j].1));
                i += 1;
                j += 1;
            }
        }
    }
    joined
}
