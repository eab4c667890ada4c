//! Errors raised while deriving probabilities.

use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProbabilityError {
    #[error("{0}")]
    InvalidParameter(#[from] InvalidParameter),

    #[error("{0}")]
    NonFiniteInput(#[from] NonFiniteInput),

    #[error("{0}")]
    DegenerateProbability(#[from] DegenerateProbability),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("residual std must be positive, got {residual_std}")]
pub struct InvalidParameter {
    pub residual_std: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{name} must be finite, got {value}")]
pub struct NonFiniteInput {
    pub name: &'static str,
    pub value: f64,
}
impl NonFiniteInput {
    pub fn check(name: &'static str, value: f64) -> Result<(), NonFiniteInput> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(NonFiniteInput { name, value })
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("probability {value} outside {bounds:?} for mean {mean} and std {std}")]
pub struct DegenerateProbability {
    pub value: f64,
    pub mean: f64,
    pub std: f64,
    pub bounds: RangeInclusive<f64>,
}
