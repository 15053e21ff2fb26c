use super::constraint::Constraint;
use super::item::Item;
use super::storage::PatternStorage;
use super::tree::FpTree;

/// Single-path shortcut: enumerates every non-empty selection of `path`
/// appended to `prefix`, in the order the general recursion would emit them.
///
/// Singletons take their summary from the tree metadata; longer selections
/// share the tail summary, the only non-empty one on a strict chain.
#[allow(clippy::too_many_arguments)]
pub fn generate_combinations_from_path<C: Constraint>(
    constraint: &C,
    max_length: usize,
    tree: &FpTree<C::Summary>,
    path: &[Item],
    tail: &C::Summary,
    prefix: &mut Vec<Item>,
    context: &C::Context,
    result: &mut PatternStorage<C::Summary>,
) {
    for k in (0..path.len()).rev() {
        let item = path[k];
        let summary = tree.metadata(item).unwrap_or(tail);
        generate_combinations_recursive(
            constraint, max_length, &path[..k], item, summary, tail, prefix, context, result,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_combinations_recursive<C: Constraint>(
    constraint: &C,
    max_length: usize,
    rest: &[Item],
    item: Item,
    summary: &C::Summary,
    tail: &C::Summary,
    prefix: &mut Vec<Item>,
    context: &C::Context,
    result: &mut PatternStorage<C::Summary>,
) {
    let Some(narrowed) = constraint.extend(context, item) else {
        return;
    };

    prefix.push(item);
    if constraint.accept(prefix, summary) {
        result.push(prefix, summary.clone());
    }
    if prefix.len() < max_length && !constraint.prune(prefix, summary) {
        for k in (0..rest.len()).rev() {
            if constraint.admits(&narrowed, rest[k]) {
                generate_combinations_recursive(
                    constraint, max_length, &rest[..k], rest[k], tail, tail, prefix, &narrowed,
                    result,
                );
            }
        }
    }
    prefix.pop();
}
