//! Mining configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};

/// A user-supplied bound, either absolute or relative to the database size.
///
/// Textual thresholds containing a `.` are fractions of the transaction
/// count; anything else is an absolute count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Count(u64),
    Fraction(f64),
}

impl Threshold {
    /// Minimum-support resolution: fractions round up.
    pub fn at_least(&self, num_transactions: usize) -> u64 {
        match *self {
            Threshold::Count(count) => count,
            Threshold::Fraction(fraction) => {
                let scaled = fraction * num_transactions as f64;
                (scaled - rounding_slack(scaled)).ceil() as u64
            }
        }
    }

    /// Maximum-period resolution: fractions round down.
    pub fn at_most(&self, num_transactions: usize) -> u64 {
        match *self {
            Threshold::Count(count) => count,
            Threshold::Fraction(fraction) => {
                let scaled = fraction * num_transactions as f64;
                (scaled + rounding_slack(scaled)).floor() as u64
            }
        }
    }

    /// Expected-support resolution for uncertain databases.
    pub fn expected(&self, num_transactions: usize) -> f64 {
        match *self {
            Threshold::Count(count) => count as f64,
            Threshold::Fraction(fraction) => fraction * num_transactions as f64,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        match *self {
            Threshold::Fraction(fraction) if !(0.0..=1.0).contains(&fraction) => {
                Err(MiningError::Configuration(format!(
                    "{name} fraction must lie in [0, 1], got {fraction}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Representation error tolerated when a decimal fraction is scaled to a
/// count, so that 0.07 of 100 resolves to 7 in both directions.
fn rounding_slack(scaled: f64) -> f64 {
    scaled.abs().max(1.0) * f64::EPSILON * 16.0
}

impl FromStr for Threshold {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.contains('.') {
            s.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Threshold::Fraction)
                .ok_or_else(|| MiningError::InvalidThreshold(s.to_string()))
        } else {
            s.parse::<u64>()
                .map(Threshold::Count)
                .map_err(|_| MiningError::InvalidThreshold(s.to_string()))
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Count(count) => write!(f, "{count}"),
            Threshold::Fraction(fraction) => write!(f, "{fraction:?}"),
        }
    }
}

/// Interestingness constraint selected for a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Plain frequency
    Frequent,
    /// Frequency plus a bound on the largest gap between occurrences
    Periodic { max_period: Threshold },
    /// Frequency plus neighbor compatibility and a minimum support ratio
    Correlated { min_ratio: f64 },
    /// Expected support over existential probabilities, optionally with a
    /// bound on the largest gap between occurrences
    Uncertain {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_period: Option<Threshold>,
    },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Frequent => "frequent",
            Mode::Periodic { .. } => "periodic",
            Mode::Correlated { .. } => "correlated",
            Mode::Uncertain { max_period: None } => "uncertain",
            Mode::Uncertain { max_period: Some(_) } => "uncertain_periodic",
        }
    }

    /// Whether the mode reads transaction timestamps.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Mode::Periodic { .. } | Mode::Uncertain { max_period: Some(_) }
        )
    }
}

/// Parameters of one mining run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinerConfig {
    pub min_support: Threshold,
    pub mode: Mode,
    /// Longest pattern emitted; `None` is unbounded
    #[serde(default)]
    pub max_pattern_length: Option<usize>,
    /// Mine root-level conditional trees on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

impl MinerConfig {
    pub fn new(min_support: Threshold, mode: Mode) -> Self {
        Self {
            min_support,
            mode,
            max_pattern_length: None,
            parallel: false,
        }
    }

    pub fn frequent(min_support: Threshold) -> Self {
        Self::new(min_support, Mode::Frequent)
    }

    pub fn periodic(min_support: Threshold, max_period: Threshold) -> Self {
        Self::new(min_support, Mode::Periodic { max_period })
    }

    pub fn correlated(min_support: Threshold, min_ratio: f64) -> Self {
        Self::new(min_support, Mode::Correlated { min_ratio })
    }

    pub fn uncertain(min_support: Threshold) -> Self {
        Self::new(min_support, Mode::Uncertain { max_period: None })
    }

    pub fn uncertain_periodic(min_support: Threshold, max_period: Threshold) -> Self {
        Self::new(
            min_support,
            Mode::Uncertain {
                max_period: Some(max_period),
            },
        )
    }

    pub fn with_max_pattern_length(mut self, length: usize) -> Self {
        self.max_pattern_length = Some(length);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rejects bounds that can never describe a sensible run.
    pub fn validate(&self) -> Result<()> {
        self.min_support.validate("minimum support")?;
        match &self.mode {
            Mode::Periodic { max_period }
            | Mode::Uncertain {
                max_period: Some(max_period),
            } => max_period.validate("maximum period")?,
            Mode::Correlated { min_ratio } if !(0.0..=1.0).contains(min_ratio) => {
                return Err(MiningError::Configuration(format!(
                    "minimum ratio must lie in [0, 1], got {min_ratio}"
                )));
            }
            _ => {}
        }
        if self.max_pattern_length == Some(0) {
            return Err(MiningError::Configuration(
                "maximum pattern length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn length_limit(&self) -> usize {
        self.max_pattern_length.unwrap_or(usize::MAX)
    }
}
