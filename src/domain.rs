//! Value records describing a matchup and the probabilities derived for it.

use std::fmt;
use std::fmt::Formatter;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter};

use crate::error::{InvalidParameter, NonFiniteInput, ProbabilityError};

#[derive(
    Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumCount, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}
impl Side {
    pub fn flip(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Point handicap quoted against the home side: negative when home is favoured, positive
/// when home is the underdog.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Spread(pub f64);
impl Spread {
    pub fn home_favoured(&self) -> bool {
        self.0 < 0.0
    }

    pub fn home_underdog(&self) -> bool {
        self.0 > 0.0
    }

    pub fn magnitude(&self) -> f64 {
        self.0.abs()
    }

    /// The side giving points. Only a negative line makes the home side the favourite, so a
    /// pick-'em line nominally favours the away side.
    pub fn favourite(&self) -> Side {
        if self.home_favoured() {
            Side::Home
        } else {
            Side::Away
        }
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1}", self.0)
    }
}

/// Output of a margin model: the expected home-minus-away margin and the standard deviation
/// of the model's residuals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchupPrediction {
    pub predicted_margin: f64,
    pub residual_std: f64,
}
impl MatchupPrediction {
    pub fn new(predicted_margin: f64, residual_std: f64) -> Result<Self, ProbabilityError> {
        let prediction = Self {
            predicted_margin,
            residual_std,
        };
        prediction.validate()?;
        Ok(prediction)
    }

    pub fn validate(&self) -> Result<(), ProbabilityError> {
        NonFiniteInput::check("predicted margin", self.predicted_margin)?;
        if self.residual_std > 0.0 && self.residual_std.is_finite() {
            Ok(())
        } else {
            Err(InvalidParameter {
                residual_std: self.residual_std,
            }
            .into())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub win_probability: f64,
    pub cover_probability: Option<f64>,
    pub predicted_winner: Side,
    pub predicted_coverer: Option<Side>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matchup {
    pub matchup_id: String,
    pub home_id: String,
    pub away_id: String,
}
impl Matchup {
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_id,
            Side::Away => &self.away_id,
        }
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.away_id, self.home_id, self.matchup_id)
    }
}
