use std::collections::HashMap;
use std::fmt;

/// Dense item handle. The value is the item's global rank: 0 is the most
/// supported item, ties broken by ascending label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item(u32);

impl Item {
    pub const fn new(rank: u32) -> Self {
        Self(rank)
    }

    pub const fn rank(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lookup between ranked items and their original labels.
#[derive(Clone, Debug, Default)]
pub struct ItemTable {
    labels: Vec<String>,
    index: HashMap<String, Item>,
}

impl ItemTable {
    /// Builds the table from labels already sorted by rank.
    pub fn from_ranked<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let labels: Vec<String> = labels.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(rank, label)| (label.clone(), Item::new(rank as u32)))
            .collect();
        Self { labels, index }
    }

    pub fn item(&self, label: &str) -> Option<Item> {
        self.index.get(label).copied()
    }

    pub fn label(&self, item: Item) -> &str {
        &self.labels[item.index()]
    }

    pub fn labels<'a>(&'a self, items: &'a [Item]) -> impl Iterator<Item = &'a str> + 'a {
        items.iter().map(move |&item| self.label(item))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = Item> {
        (0..self.labels.len() as u32).map(Item::new)
    }
}
