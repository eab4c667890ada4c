//! Straight-up and against-the-spread probabilities from a predicted scoring margin.
//! The margin is modelled as Normal about the prediction, with the model's residual standard
//! deviation as its uncertainty. Win and cover probabilities are derived from that one
//! distribution, so the cover probability is always ordered against the win probability the
//! way the spread says it should be.

pub mod batch;
pub mod domain;
pub mod dto;
pub mod engine;
pub mod error;
pub mod file;
pub mod normal;
pub mod pick;
pub mod print;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
