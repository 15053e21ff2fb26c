use super::{ExpectedSupport, IntervalSummary, PeriodParams, ProbabilityMass, Summary};

/// Probability mass paired with the occurrence timestamps, for periodic
/// mining over uncertain transactions.
///
/// Timestamps are those of every transaction containing the items, whatever
/// their probabilities, so periodicity is decided exactly while expected
/// support is bounded like [`ProbabilityMass`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeriodicMass {
    pub mass: ProbabilityMass,
    pub timestamps: IntervalSummary,
}

impl Summary for PeriodicMass {
    type Params = PeriodParams;
    type Support = f64;

    fn singleton(timestamp: u64, probability: f64) -> Self {
        Self {
            mass: ProbabilityMass::singleton(timestamp, probability),
            timestamps: IntervalSummary::point(timestamp),
        }
    }

    fn tail(timestamp: u64, probabilities: &[f64]) -> Self {
        Self {
            mass: ProbabilityMass::tail(timestamp, probabilities),
            timestamps: IntervalSummary::point(timestamp),
        }
    }

    fn merge(&mut self, other: &Self, params: &PeriodParams) {
        self.mass.merge(&other.mass, &());
        self.timestamps.merge(&other.timestamps, params);
    }

    fn support(&self) -> f64 {
        self.mass.support()
    }

    // A one-item transaction leaves no mass at its tail but still a timestamp
    fn is_empty(&self) -> bool {
        self.mass.is_empty() && self.timestamps.is_empty()
    }
}

impl ExpectedSupport for PeriodicMass {
    fn with_expected_support(&self, expected_support: f64) -> Self {
        Self {
            mass: self.mass.with_expected_support(expected_support),
            timestamps: self.timestamps.clone(),
        }
    }
}
