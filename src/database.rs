//! In-memory transaction databases exchanged with the miner

use std::collections::HashMap;

/// One item occurrence inside a transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence {
    pub label: String,
    /// Existential probability; 1.0 for certain data
    pub probability: f64,
}

impl Occurrence {
    pub fn certain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            probability: 1.0,
        }
    }

    pub fn uncertain(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub timestamp: u64,
    pub items: Vec<Occurrence>,
}

impl Transaction {
    pub fn new(timestamp: u64, items: Vec<Occurrence>) -> Self {
        Self { timestamp, items }
    }
}

/// An ordered transaction log.
#[derive(Clone, Debug, Default)]
pub struct TransactionDatabase {
    transactions: Vec<Transaction>,
}

impl TransactionDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Appends a certain transaction stamped with its 1-based position.
    pub fn push_items<I, L>(&mut self, labels: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let timestamp = self.transactions.len() as u64 + 1;
        let items = labels.into_iter().map(Occurrence::certain).collect();
        self.transactions.push(Transaction::new(timestamp, items));
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Largest timestamp in the log, the end of the observation window.
    pub fn horizon(&self) -> u64 {
        self.transactions
            .iter()
            .map(|transaction| transaction.timestamp)
            .max()
            .unwrap_or(0)
    }
}

impl FromIterator<Transaction> for TransactionDatabase {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        Self {
            transactions: iter.into_iter().collect(),
        }
    }
}

/// Static item -> neighbor items relation used by correlation mining.
#[derive(Clone, Debug, Default)]
pub struct NeighborMap {
    neighbors: HashMap<String, Vec<String>>,
}

impl NeighborMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, L>(&mut self, item: impl Into<String>, neighbors: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.neighbors
            .entry(item.into())
            .or_default()
            .extend(neighbors.into_iter().map(Into::into));
    }

    pub fn get(&self, item: &str) -> Option<&[String]> {
        self.neighbors.get(item).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
