use std::mem;

use super::tree::{FpNode, FpTree};
use crate::fp::item::Item;
use crate::fp::summary::Summary;

impl<S: Summary> FpTree<S> {
    /// Inserts one ranked transaction. Items must be in ascending rank
    /// order; `datum` is merged into the node of the last item only.
    pub fn insert_transaction(&mut self, transaction: &[Item], datum: &S, params: &S::Params) {
        if let Some(tail) = self.insert_path(transaction) {
            self.nodes[tail].summary.merge(datum, params);
        }
    }

    /// Inserts one conditional transaction during projection. Besides the
    /// tail node, `datum` is merged into the metadata of every item on the path.
    pub fn insert_conditional_transaction(
        &mut self,
        transaction: &[Item],
        datum: &S,
        params: &S::Params,
    ) {
        let Some(tail) = self.insert_path(transaction) else {
            return;
        };
        self.nodes[tail].summary.merge(datum, params);
        for &item in transaction {
            self.metadata
                .entry(item)
                .or_default()
                .merge(datum, params);
        }
    }

    fn insert_path(&mut self, transaction: &[Item]) -> Option<usize> {
        if transaction.is_empty() {
            return None;
        }
        let mut current_index = self.root_index;

        for &item in transaction {
            if let Some(&child_index) = self.nodes[current_index].children.get(&item) {
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes.push(FpNode::new_item(item, current_index));
                self.nodes[current_index].children.insert(item, new_index);
                self.header_table.entry(item).or_default().push(new_index);
                current_index = new_index;
            }
        }
        Some(current_index)
    }

    /// Conditional pattern base of `item`: for every registry node, the
    /// admitted ancestor items in root-to-node order, paired with the node's
    /// summary. Paths left empty by the filter are dropped.
    pub fn get_prefix_paths<F>(&self, item: Item, admits: F) -> Vec<(Vec<Item>, &S)>
    where
        F: Fn(Item) -> bool,
    {
        self.nodes_for(item)
            .iter()
            .filter_map(|&idx| {
                let mut path = Vec::new();
                let mut current = self.nodes[idx].parent;

                while let Some(i) = current {
                    if let Some(ancestor) = self.nodes[i].item {
                        if admits(ancestor) {
                            path.push(ancestor);
                        }
                    }
                    current = self.nodes[i].parent;
                }

                path.reverse();
                (!path.is_empty()).then_some((path, &self.nodes[idx].summary))
            })
            .collect()
    }

    /// Detaches every node of `item`, promoting its summary into its parent.
    ///
    /// Called once per item, after the item's patterns are emitted and its
    /// conditional tree is mined. Registry nodes are leaves by then, because
    /// every deeper item has already been removed.
    pub fn remove_item(&mut self, item: Item, params: &S::Params) {
        let Some(node_indices) = self.header_table.remove(&item) else {
            return;
        };
        self.metadata.remove(&item);

        for idx in node_indices {
            debug_assert!(self.nodes[idx].children.is_empty());
            let summary = mem::take(&mut self.nodes[idx].summary);
            let Some(parent_index) = self.nodes[idx].parent.take() else {
                continue;
            };
            let parent = &mut self.nodes[parent_index];
            parent.summary.merge(&summary, params);
            parent.children.remove(&item);
        }
    }

    /// The chain below the root when the tree is a single unbranched path
    /// whose only non-empty summary sits on the deepest node.
    pub fn get_single_path(&self) -> Option<(Vec<Item>, &S)> {
        let mut path = Vec::new();
        let mut current_index = self.root_index;

        loop {
            let current_node = &self.nodes[current_index];

            match current_node.children.len() {
                0 => break,
                1 => {}
                _ => return None,
            }
            if current_index != self.root_index && !current_node.summary.is_empty() {
                return None;
            }

            current_index = *current_node.children.values().next()?;
            path.push(self.nodes[current_index].item?);
        }

        if path.is_empty() {
            return None;
        }
        Some((path, &self.nodes[current_index].summary))
    }

    /// Merge of every summary reachable from the root, the root included.
    pub fn total(&self, params: &S::Params) -> S {
        let mut total = S::default();
        let mut stack = vec![self.root_index];
        while let Some(idx) = stack.pop() {
            total.merge(&self.nodes[idx].summary, params);
            stack.extend(self.nodes[idx].children.values().copied());
        }
        total
    }
}
