//! Picking a side from derived probabilities, with a confidence bar on backing the favourite
//! against the spread that rises as the spread widens.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{ProbabilityResult, Side, Spread};
use crate::dto::PredictionType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceTier {
    pub max_spread: f64,
    pub required_confidence: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidThresholds {
    #[error("at least one confidence tier is required")]
    Empty,

    #[error("tier {index} max spread {max_spread} does not exceed the preceding tier")]
    Unordered { index: usize, max_spread: f64 },

    #[error("tier {index} required confidence {required_confidence} outside [0, 1]")]
    ConfidenceOutOfRange { index: usize, required_confidence: f64 },
}

/// Tiers ordered by ascending spread magnitude. The first tier whose `max_spread` reaches the
/// magnitude of the spread applies; spreads beyond the last tier use the last tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConfidenceTier>", into = "Vec<ConfidenceTier>")]
pub struct ConfidenceThresholds {
    tiers: Vec<ConfidenceTier>,
}
impl ConfidenceThresholds {
    pub fn new(tiers: Vec<ConfidenceTier>) -> Result<Self, InvalidThresholds> {
        if tiers.is_empty() {
            return Err(InvalidThresholds::Empty);
        }
        for (index, tier) in tiers.iter().enumerate() {
            if !(0.0..=1.0).contains(&tier.required_confidence) {
                return Err(InvalidThresholds::ConfidenceOutOfRange {
                    index,
                    required_confidence: tier.required_confidence,
                });
            }
            if index > 0 && !(tier.max_spread > tiers[index - 1].max_spread) {
                return Err(InvalidThresholds::Unordered {
                    index,
                    max_spread: tier.max_spread,
                });
            }
        }
        Ok(Self { tiers })
    }

    /// A single bar regardless of the spread.
    pub fn flat(required_confidence: f64) -> Result<Self, InvalidThresholds> {
        Self::new(vec![ConfidenceTier {
            max_spread: f64::MAX,
            required_confidence,
        }])
    }

    pub fn required_confidence(&self, spread_magnitude: f64) -> f64 {
        self.tiers
            .iter()
            .find(|tier| tier.max_spread >= spread_magnitude)
            .unwrap_or_else(|| &self.tiers[self.tiers.len() - 1])
            .required_confidence
    }
}

impl TryFrom<Vec<ConfidenceTier>> for ConfidenceThresholds {
    type Error = InvalidThresholds;

    fn try_from(tiers: Vec<ConfidenceTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<ConfidenceThresholds> for Vec<ConfidenceTier> {
    fn from(thresholds: ConfidenceThresholds) -> Self {
        thresholds.tiers
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pick style '{0}'")]
pub struct UnknownPickStyle(pub String);

/// Named sets of thresholds, e.g. `conservative` or `aggressive`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickStyles(FxHashMap<String, ConfidenceThresholds>);
impl PickStyles {
    pub fn get(&self, style: &str) -> Result<&ConfidenceThresholds, UnknownPickStyle> {
        self.0
            .get(style)
            .ok_or_else(|| UnknownPickStyle(style.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Chooses a side for the given prediction type. Straight-up picks follow the predicted winner,
/// as do against-the-spread picks when no line is available. Otherwise the favourite is backed
/// only if its cover probability meets the bar for the size of the spread.
pub fn pick(
    prediction_type: PredictionType,
    result: &ProbabilityResult,
    spread: Option<Spread>,
    thresholds: &ConfidenceThresholds,
) -> Side {
    let (cover_probability, spread) = match (prediction_type, result.cover_probability, spread) {
        (PredictionType::AgainstTheSpread, Some(cover_probability), Some(spread)) => {
            (cover_probability, spread)
        }
        (PredictionType::AgainstTheSpread, _, _) => {
            debug!("no line available, falling back to predicted winner {}", result.predicted_winner);
            return result.predicted_winner;
        }
        (PredictionType::StraightUp, _, _) => return result.predicted_winner,
    };

    let favourite = spread.favourite();
    let favourite_cover = match favourite {
        Side::Home => cover_probability,
        Side::Away => 1.0 - cover_probability,
    };
    let required = thresholds.required_confidence(spread.magnitude());
    if favourite_cover >= required {
        debug!("spread {spread} requires {required:.3}, favourite {favourite} has {favourite_cover:.3}: backing favourite");
        favourite
    } else {
        let underdog = favourite.flip();
        debug!(
            "spread {spread} requires {required:.3}, favourite {favourite} has {favourite_cover:.3}: backing underdog {underdog} at {:.3}",
            1.0 - favourite_cover
        );
        underdog
    }
}
