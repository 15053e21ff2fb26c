use super::item::Item;

/// Memory-efficient pattern storage using flat arrays.
///
/// Patterns keep their emission order and their items the order in which
/// the growth engine appended them.
#[derive(Debug, Clone)]
pub struct PatternStorage<S> {
    items: Vec<Item>,
    offsets: Vec<(usize, usize)>,
    summaries: Vec<S>,
}

impl<S> Default for PatternStorage<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> PatternStorage<S> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            offsets: Vec::new(),
            summaries: Vec::new(),
        }
    }

    pub fn push(&mut self, pattern: &[Item], summary: S) -> usize {
        let start = self.items.len();
        self.items.extend_from_slice(pattern);
        self.offsets.push((start, pattern.len()));
        self.summaries.push(summary);
        self.offsets.len() - 1
    }

    pub fn get(&self, idx: usize) -> (&[Item], &S) {
        let (start, length) = self.offsets[idx];
        (&self.items[start..start + length], &self.summaries[idx])
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Item], &S)> {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    /// Appends all patterns of `other`, preserving their order.
    pub fn append(&mut self, other: PatternStorage<S>) {
        let base = self.items.len();
        self.items.extend(other.items);
        self.offsets
            .extend(other.offsets.into_iter().map(|(start, length)| (start + base, length)));
        self.summaries.extend(other.summaries);
    }
}
