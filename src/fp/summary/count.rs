use super::Summary;

/// Exact occurrence count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count(pub u64);

impl Summary for Count {
    type Params = ();
    type Support = u64;

    fn singleton(_timestamp: u64, _probability: f64) -> Self {
        Count(1)
    }

    fn tail(_timestamp: u64, _probabilities: &[f64]) -> Self {
        Count(1)
    }

    fn merge(&mut self, other: &Self, _params: &()) {
        self.0 += other.0;
    }

    fn support(&self) -> u64 {
        self.0
    }

    fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Occurrence count of a spatially correlated pattern. The ratio against
/// the most supported member item is derived by the correlation constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrelatedCount(pub u64);

impl CorrelatedCount {
    pub fn ratio(&self, max_item_support: u64) -> f64 {
        if max_item_support == 0 {
            return 0.0;
        }
        self.0 as f64 / max_item_support as f64
    }
}

impl Summary for CorrelatedCount {
    type Params = ();
    type Support = u64;

    fn singleton(_timestamp: u64, _probability: f64) -> Self {
        CorrelatedCount(1)
    }

    fn tail(_timestamp: u64, _probabilities: &[f64]) -> Self {
        CorrelatedCount(1)
    }

    fn merge(&mut self, other: &Self, _params: &()) {
        self.0 += other.0;
    }

    fn support(&self) -> u64 {
        self.0
    }

    fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
