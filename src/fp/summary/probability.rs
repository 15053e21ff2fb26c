use super::{ExpectedSupport, Summary};

/// Expected-support surrogate for uncertain transactions.
///
/// A singleton datum is the occurrence probability itself, so the root
/// metadata holds exact expected supports. A tail datum stores, for one
/// transaction, the product of its two largest probabilities (the largest
/// value of "best preceding probability times current probability" over the
/// path) and the second-largest probability. Both bound from above the
/// probability product of any two or more items of that transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProbabilityMass {
    pub mass: f64,
    pub second: f64,
}

impl ProbabilityMass {
    /// Upper bound on the expected support of a pattern of `length` items.
    pub fn bound(&self, length: usize) -> f64 {
        if length <= 2 {
            self.mass
        } else {
            self.mass * self.second.powi((length - 2) as i32)
        }
    }
}

impl Summary for ProbabilityMass {
    type Params = ();
    type Support = f64;

    fn singleton(_timestamp: u64, probability: f64) -> Self {
        Self {
            mass: probability,
            second: 0.0,
        }
    }

    fn tail(_timestamp: u64, probabilities: &[f64]) -> Self {
        let mut best_prefix: Option<f64> = None;
        let mut mass = 0.0_f64;
        let (mut first, mut second) = (0.0_f64, 0.0_f64);
        for &probability in probabilities {
            if let Some(best) = best_prefix {
                mass = mass.max(best * probability);
            }
            best_prefix = Some(best_prefix.map_or(probability, |best| best.max(probability)));

            if probability > first {
                second = first;
                first = probability;
            } else if probability > second {
                second = probability;
            }
        }
        Self { mass, second }
    }

    fn merge(&mut self, other: &Self, _params: &()) {
        self.mass += other.mass;
        self.second = self.second.max(other.second);
    }

    fn support(&self) -> f64 {
        self.mass
    }

    fn is_empty(&self) -> bool {
        self.mass == 0.0 && self.second == 0.0
    }
}

impl ExpectedSupport for ProbabilityMass {
    fn with_expected_support(&self, expected_support: f64) -> Self {
        Self {
            mass: expected_support,
            second: self.second,
        }
    }
}
