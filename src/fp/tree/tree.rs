use std::collections::HashMap;

use crate::fp::item::Item;
use crate::fp::summary::Summary;

/// One position in one transaction prefix.
///
/// Nodes live in the owning tree's arena; `parent` and `children` hold arena
/// indices, so the parent link never owns anything.
#[derive(Debug, Clone)]
pub struct FpNode<S> {
    pub item: Option<Item>,
    pub summary: S,
    pub parent: Option<usize>,
    pub children: HashMap<Item, usize>,
}

/// Prefix tree with a per-item node registry and per-item metadata.
///
/// `header_table[x]` lists exactly the attached nodes carrying `x`;
/// `metadata[x]` is the aggregate summary of `x` over the whole tree.
#[derive(Debug, Clone)]
pub struct FpTree<S> {
    pub nodes: Vec<FpNode<S>>,
    pub header_table: HashMap<Item, Vec<usize>>,
    pub metadata: HashMap<Item, S>,
    pub root_index: usize,
}

impl<S: Summary> FpNode<S> {
    pub fn new_root() -> Self {
        Self {
            item: None,
            summary: S::default(),
            parent: None,
            children: HashMap::new(),
        }
    }

    pub fn new_item(item: Item, parent: usize) -> Self {
        Self {
            item: Some(item),
            summary: S::default(),
            parent: Some(parent),
            children: HashMap::new(),
        }
    }
}

impl<S: Summary> Default for FpTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Summary> FpTree<S> {
    pub fn new() -> Self {
        Self {
            nodes: vec![FpNode::new_root()],
            header_table: HashMap::new(),
            metadata: HashMap::new(),
            root_index: 0,
        }
    }

    /// Tree whose per-item metadata is supplied up front, as the preprocessor
    /// does with exact global singleton summaries.
    pub fn with_metadata(metadata: HashMap<Item, S>) -> Self {
        Self {
            metadata,
            ..Self::new()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root_index].children.is_empty()
    }

    pub fn metadata(&self, item: Item) -> Option<&S> {
        self.metadata.get(&item)
    }

    pub fn nodes_for(&self, item: Item) -> &[usize] {
        self.header_table.get(&item).map_or(&[], Vec::as_slice)
    }

    /// Items present in the tree, least supported (deepest) first.
    pub fn header(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.header_table.keys().copied().collect();
        items.sort_unstable_by(|a, b| b.cmp(a));
        items
    }

    /// Number of nodes still attached below the root.
    pub fn len(&self) -> usize {
        self.header_table.values().map(Vec::len).sum()
    }
}
