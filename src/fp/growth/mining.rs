use rayon::prelude::*;
use tracing::{debug, trace};

use crate::fp::builder::build_conditional_fp_tree;
use crate::fp::combinations::generate_combinations_from_path;
use crate::fp::constraint::Constraint;
use crate::fp::item::Item;
use crate::fp::storage::PatternStorage;
use crate::fp::tree::FpTree;

/// Recursive growth engine.
///
/// Holds the immutable run configuration threaded through every recursion
/// frame: the active constraint, the pattern length bound and whether the
/// single-path shortcut is enabled.
#[derive(Debug)]
pub struct Growth<'a, C> {
    constraint: &'a C,
    max_length: usize,
    single_path: bool,
}

type Projection<C> = (FpTree<<C as Constraint>::Summary>, <C as Constraint>::Context);

impl<'a, C: Constraint> Growth<'a, C> {
    pub fn new(constraint: &'a C) -> Self {
        Self {
            constraint,
            max_length: usize::MAX,
            single_path: true,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Disables the single-path shortcut, forcing full projection.
    pub fn without_single_path(mut self) -> Self {
        self.single_path = false;
        self
    }

    /// Mines `tree` to completion, consuming it.
    pub fn mine(&self, mut tree: FpTree<C::Summary>, parallel: bool) -> PatternStorage<C::Summary> {
        let context = self.constraint.root_context();
        let mut result = PatternStorage::new();
        if parallel {
            self.generate_parallel(&mut tree, &context, &mut result);
        } else {
            self.generate(&mut tree, &mut Vec::new(), &context, &mut result);
        }
        debug!(patterns = result.len(), parallel, "growth finished");
        result
    }

    /// Emits every accepted extension of `prefix` found in `tree`.
    ///
    /// Items are expanded least supported first and removed from `tree` once
    /// mined, so the tree is empty when this returns.
    pub fn generate(
        &self,
        tree: &mut FpTree<C::Summary>,
        prefix: &mut Vec<Item>,
        context: &C::Context,
        result: &mut PatternStorage<C::Summary>,
    ) {
        if self.single_path {
            if let Some((path, tail)) = tree.get_single_path() {
                trace!(depth = prefix.len(), length = path.len(), "single path");
                generate_combinations_from_path(
                    self.constraint,
                    self.max_length,
                    tree,
                    &path,
                    tail,
                    prefix,
                    context,
                    result,
                );
                return;
            }
        }

        let params = self.constraint.params();
        for item in tree.header() {
            if let Some((mut conditional_tree, narrowed)) = self.project(tree, item, prefix, context, result) {
                prefix.push(item);
                self.generate(&mut conditional_tree, prefix, &narrowed, result);
                prefix.pop();
            }
            tree.remove_item(item, params);
        }
    }

    /// Root-level variant of `generate`: conditional trees are extracted in
    /// header order, one chunk of pool size at a time, and each chunk is mined
    /// on the rayon pool before the next is extracted. Output order matches
    /// the sequential run.
    fn generate_parallel(
        &self,
        tree: &mut FpTree<C::Summary>,
        context: &C::Context,
        result: &mut PatternStorage<C::Summary>,
    ) {
        if self.single_path && tree.get_single_path().is_some() {
            self.generate(tree, &mut Vec::new(), context, result);
            return;
        }

        let params = self.constraint.params();
        let header = tree.header();
        let chunk_size = rayon::current_num_threads().max(1);
        debug!(items = header.len(), chunk_size, "mining root items in parallel");

        let mut prefix = Vec::with_capacity(1);
        for chunk in header.chunks(chunk_size) {
            let mut jobs = Vec::with_capacity(chunk.len());
            for &item in chunk {
                let mut emitted = PatternStorage::new();
                let projection = self.project(tree, item, &mut prefix, context, &mut emitted);
                jobs.push((item, emitted, projection));
                tree.remove_item(item, params);
            }

            let parts: Vec<PatternStorage<C::Summary>> = jobs
                .into_par_iter()
                .map(|(item, mut emitted, projection)| {
                    if let Some((mut conditional_tree, narrowed)) = projection {
                        let mut prefix = vec![item];
                        self.generate(&mut conditional_tree, &mut prefix, &narrowed, &mut emitted);
                    }
                    emitted
                })
                .collect();

            for part in parts {
                result.append(part);
            }
        }
    }

    /// Emits `prefix + item` when accepted and returns its conditional tree
    /// with the narrowed context when the branch is worth expanding.
    fn project(
        &self,
        tree: &FpTree<C::Summary>,
        item: Item,
        prefix: &mut Vec<Item>,
        context: &C::Context,
        result: &mut PatternStorage<C::Summary>,
    ) -> Option<Projection<C>> {
        let narrowed = self.constraint.extend(context, item)?;
        let summary = tree.metadata(item)?;

        prefix.push(item);
        let pattern: &[Item] = prefix;
        if self.constraint.accept(pattern, summary) {
            result.push(pattern, summary.clone());
        }
        let conditional_tree = if pattern.len() < self.max_length
            && !self.constraint.prune(pattern, summary)
        {
            Some(build_conditional_fp_tree(tree, pattern, &narrowed, self.constraint))
                .filter(|conditional_tree| !conditional_tree.is_empty())
        } else {
            None
        };
        prefix.pop();

        conditional_tree.map(|conditional_tree| (conditional_tree, narrowed))
    }
}
