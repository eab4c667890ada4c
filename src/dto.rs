//! API-ready prediction records and the rules for expressing a home-relative probability
//! from the perspective of a named team.

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::domain::{Matchup, ProbabilityResult, Side};

/// Decimal places retained when a probability is serialized.
pub const SERIALIZED_DECIMALS: i32 = 4;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(into = "u8", try_from = "u8")]
pub enum PredictionType {
    StraightUp,
    AgainstTheSpread,
}
impl PredictionType {
    pub fn code(&self) -> u8 {
        match self {
            PredictionType::StraightUp => 1,
            PredictionType::AgainstTheSpread => 2,
        }
    }
}

impl From<PredictionType> for u8 {
    fn from(prediction_type: PredictionType) -> Self {
        prediction_type.code()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown prediction type {0}")]
pub struct UnknownPredictionType(pub u8);

impl TryFrom<u8> for PredictionType {
    type Error = UnknownPredictionType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PredictionType::StraightUp),
            2 => Ok(PredictionType::AgainstTheSpread),
            _ => Err(UnknownPredictionType(code)),
        }
    }
}

/// Whose point of view an emitted probability is stated from.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProbabilityPerspective {
    /// Always the home team and the home team's probability.
    HomeRelative,

    /// The team predicted to prevail and its own probability.
    #[default]
    WinnerRelative,
}
impl ProbabilityPerspective {
    pub fn express<'a>(&self, matchup: &'a Matchup, home_probability: f64, side: Side) -> (&'a str, f64) {
        match self {
            ProbabilityPerspective::HomeRelative => home_relative(matchup, home_probability),
            ProbabilityPerspective::WinnerRelative => reconcile(matchup, home_probability, side),
        }
    }
}

/// Restates a home-relative probability from the perspective of the predicted `side`.
pub fn reconcile(matchup: &Matchup, home_probability: f64, side: Side) -> (&str, f64) {
    let probability = match side {
        Side::Home => home_probability,
        Side::Away => 1.0 - home_probability,
    };
    (matchup.team(side), probability)
}

/// Leaves the probability relative to the home team.
pub fn home_relative(matchup: &Matchup, home_probability: f64) -> (&str, f64) {
    (matchup.team(Side::Home), home_probability)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestPredictionDto {
    pub matchup_id: String,
    pub winner_id: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub win_probability: f64,
    pub prediction_type: PredictionType,
    pub model_version: String,
}

/// Produces the straight-up record for `result` and, if a cover probability was derived, the
/// against-the-spread record.
pub fn emit(
    matchup: &Matchup,
    result: &ProbabilityResult,
    perspective: ProbabilityPerspective,
    model_version: &str,
) -> Vec<ContestPredictionDto> {
    let mut dtos = Vec::with_capacity(2);
    let mut push = |home_probability: f64, side: Side, prediction_type: PredictionType| {
        let (winner_id, win_probability) = perspective.express(matchup, home_probability, side);
        dtos.push(ContestPredictionDto {
            matchup_id: matchup.matchup_id.clone(),
            winner_id: winner_id.to_string(),
            win_probability,
            prediction_type,
            model_version: model_version.to_string(),
        });
    };
    push(result.win_probability, result.predicted_winner, PredictionType::StraightUp);
    if let (Some(cover_probability), Some(coverer)) = (result.cover_probability, result.predicted_coverer) {
        push(cover_probability, coverer, PredictionType::AgainstTheSpread);
    }
    dtos
}

pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_decimals(*value, SERIALIZED_DECIMALS))
}
