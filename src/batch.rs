//! Evaluation of many matchups at once. Matchups are independent of one another, so they are
//! evaluated in parallel and a bad matchup only costs its own result.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Matchup, MatchupPrediction, ProbabilityResult, Spread};
use crate::dto;
use crate::dto::{ContestPredictionDto, PredictionType, ProbabilityPerspective};
use crate::error::ProbabilityError;

/// Straight-up model output for one matchup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupInput {
    pub matchup_id: String,
    pub home_id: String,
    pub away_id: String,
    pub predicted_margin: f64,
    pub residual_std: f64,
}
impl MatchupInput {
    pub fn matchup(&self) -> Matchup {
        Matchup {
            matchup_id: self.matchup_id.clone(),
            home_id: self.home_id.clone(),
            away_id: self.away_id.clone(),
        }
    }

    pub fn prediction(&self) -> MatchupPrediction {
        MatchupPrediction {
            predicted_margin: self.predicted_margin,
            residual_std: self.residual_std,
        }
    }
}

/// Market line for one matchup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadInput {
    pub matchup_id: String,
    pub spread: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub matchup: Matchup,
    pub spread: Option<Spread>,
    pub result: ProbabilityResult,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("matchup {matchup_id} ({prediction_type}): {error}")]
pub struct MatchupFailure {
    pub matchup_id: String,
    pub prediction_type: PredictionType,
    #[source]
    pub error: ProbabilityError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub evaluations: Vec<Evaluation>,
    pub failures: Vec<MatchupFailure>,
}
impl BatchOutcome {
    pub fn dtos(&self, perspective: ProbabilityPerspective, model_version: &str) -> Vec<ContestPredictionDto> {
        self.evaluations
            .iter()
            .flat_map(|evaluation| dto::emit(&evaluation.matchup, &evaluation.result, perspective, model_version))
            .collect()
    }
}

/// Indexes spreads by matchup. Where a matchup is quoted more than once, the last quote wins.
pub fn index_spreads(spreads: &[SpreadInput]) -> FxHashMap<&str, Spread> {
    let mut index = FxHashMap::default();
    for input in spreads {
        if let Some(previous) = index.insert(input.matchup_id.as_str(), Spread(input.spread)) {
            warn!("matchup {} quoted more than once, replacing {previous} with {}", input.matchup_id, Spread(input.spread));
        }
    }
    index
}

/// Evaluates every matchup in `inputs`, joining each to its spread where one is quoted.
/// Evaluations are returned in input order. A matchup whose straight-up result cannot be
/// derived is dropped; one whose spread cannot be evaluated keeps its straight-up result.
pub fn evaluate_batch(inputs: &[MatchupInput], spreads: &[SpreadInput]) -> BatchOutcome {
    let spreads = index_spreads(spreads);
    let results: Vec<_> = inputs
        .par_iter()
        .map(|input| evaluate_one(input, spreads.get(input.matchup_id.as_str()).copied()))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (evaluation, failure) in results {
        if let Some(evaluation) = evaluation {
            outcome.evaluations.push(evaluation);
        }
        if let Some(failure) = failure {
            warn!("{failure}");
            outcome.failures.push(failure);
        }
    }
    outcome
}

fn evaluate_one(input: &MatchupInput, spread: Option<Spread>) -> (Option<Evaluation>, Option<MatchupFailure>) {
    let failure = |prediction_type, error| MatchupFailure {
        matchup_id: input.matchup_id.clone(),
        prediction_type,
        error,
    };
    let prediction = input.prediction();
    let mut result = match prediction.evaluate_straight_up() {
        Ok(result) => result,
        Err(error) => return (None, Some(failure(PredictionType::StraightUp, error))),
    };

    let (spread, cover_failure) = match spread {
        None => {
            debug!("no spread for matchup {}, deriving straight-up only", input.matchup_id);
            (None, None)
        }
        Some(spread) => match prediction.evaluate_cover(&mut result, spread) {
            Ok(()) => (Some(spread), None),
            Err(error) => (None, Some(failure(PredictionType::AgainstTheSpread, error))),
        },
    };
    let evaluation = Evaluation {
        matchup: input.matchup(),
        spread,
        result,
    };
    (Some(evaluation), cover_failure)
}
