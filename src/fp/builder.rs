use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::constraint::Constraint;
use super::item::{Item, ItemTable};
use super::summary::Summary;
use super::tree::FpTree;
use crate::database::{Transaction, TransactionDatabase};

/// Output of the transactional preprocessor.
#[derive(Debug)]
pub struct Prepared<S> {
    pub items: ItemTable,
    /// Global singleton summary per item, indexed by rank
    pub singletons: Vec<S>,
    pub tree: FpTree<S>,
}

/// Ranks the item universe and builds the initial prefix tree.
///
/// The first pass merges one singleton datum per item occurrence; items
/// rejected by `keep` are dropped, the rest ranked by descending support
/// (ties by label). The second pass inserts every transaction restricted to
/// ranked items, in rank order, with its tail datum.
pub fn build_fp_tree<S, F>(database: &TransactionDatabase, params: &S::Params, keep: F) -> Prepared<S>
where
    S: Summary,
    F: Fn(&S) -> bool,
{
    let mut item_summaries: HashMap<&str, S> = HashMap::new();
    for transaction in database.iter() {
        for (label, probability) in distinct_occurrences(transaction) {
            item_summaries
                .entry(label)
                .or_default()
                .merge(&S::singleton(transaction.timestamp, probability), params);
        }
    }
    let universe = item_summaries.len();

    let mut ranked: Vec<(&str, S)> = item_summaries
        .into_iter()
        .filter(|(_, summary)| keep(summary))
        .collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.support()
            .partial_cmp(&a.1.support())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let items = ItemTable::from_ranked(ranked.iter().map(|(label, _)| label.to_string()));
    let singletons: Vec<S> = ranked.into_iter().map(|(_, summary)| summary).collect();
    debug!(universe, ranked = items.len(), "ranked item universe");

    let metadata = singletons
        .iter()
        .enumerate()
        .map(|(rank, summary)| (Item::new(rank as u32), summary.clone()))
        .collect();
    let mut tree = FpTree::with_metadata(metadata);

    let mut basket: Vec<(Item, f64)> = Vec::new();
    let mut ordered: Vec<Item> = Vec::new();
    let mut probabilities: Vec<f64> = Vec::new();
    for transaction in database.iter() {
        basket.clear();
        basket.extend(
            distinct_occurrences(transaction)
                .filter_map(|(label, probability)| Some((items.item(label)?, probability))),
        );
        if basket.is_empty() {
            continue;
        }
        basket.sort_unstable_by_key(|&(item, _)| item);

        ordered.clear();
        probabilities.clear();
        for &(item, probability) in &basket {
            ordered.push(item);
            probabilities.push(probability);
        }
        let datum = S::tail(transaction.timestamp, &probabilities);
        tree.insert_transaction(&ordered, &datum, params);
    }
    debug!(nodes = tree.len(), "built prefix tree");

    Prepared {
        items,
        singletons,
        tree,
    }
}

/// Occurrences of a transaction with duplicate labels collapsed, keeping the
/// highest probability. Yielded in label order.
pub(crate) fn distinct_occurrences(transaction: &Transaction) -> impl Iterator<Item = (&str, f64)> {
    let mut seen: Vec<(&str, f64)> = transaction
        .items
        .iter()
        .map(|occurrence| (occurrence.label.as_str(), occurrence.probability))
        .collect();
    seen.sort_unstable_by(|a, b| a.0.cmp(b.0).then_with(|| b.1.total_cmp(&a.1)));
    seen.dedup_by(|next, kept| next.0 == kept.0);
    seen.into_iter()
}

/// Builds the conditional tree of `pattern`'s last item from `tree`.
///
/// `context` is the structural context already narrowed by that item; its
/// admitted ancestors form the conditional pattern base. Items whose
/// aggregate over the base is pruned for `pattern + item` are left out.
pub fn build_conditional_fp_tree<C>(
    tree: &FpTree<C::Summary>,
    pattern: &[Item],
    context: &C::Context,
    constraint: &C,
) -> FpTree<C::Summary>
where
    C: Constraint,
{
    let Some(&item) = pattern.last() else {
        return FpTree::new();
    };
    let params = constraint.params();
    let prefix_paths = tree.get_prefix_paths(item, |ancestor| constraint.admits(context, ancestor));

    let mut item_summaries: HashMap<Item, C::Summary> = HashMap::new();
    for (path, summary) in &prefix_paths {
        for &ancestor in path {
            item_summaries
                .entry(ancestor)
                .or_default()
                .merge(summary, params);
        }
    }

    let mut extended = Vec::with_capacity(pattern.len() + 1);
    extended.extend_from_slice(pattern);
    extended.push(item);
    let last = extended.len() - 1;
    let frequent: HashMap<Item, bool> = item_summaries
        .iter()
        .map(|(&ancestor, summary)| {
            extended[last] = ancestor;
            (ancestor, !constraint.prune(&extended, summary))
        })
        .collect();

    let mut conditional_tree: FpTree<C::Summary> = FpTree::new();
    let mut filtered_path = Vec::new();
    for (path, summary) in &prefix_paths {
        filtered_path.clear();
        filtered_path.extend(
            path.iter()
                .copied()
                .filter(|ancestor| frequent.get(ancestor).copied().unwrap_or(false)),
        );
        if !filtered_path.is_empty() {
            conditional_tree.insert_conditional_transaction(&filtered_path, summary, params);
        }
    }

    conditional_tree
}
