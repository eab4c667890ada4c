//! Derivation of straight-up and against-the-spread probabilities from a predicted margin.
//!
//! The true margin is modelled as Normal with the predicted margin as its mean and the model's
//! residual standard deviation as its spread. Winning outright and covering are the same
//! event under different shifts of that distribution, so both probabilities are produced by
//! one function and cannot disagree about which is larger.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::domain::{MatchupPrediction, ProbabilityResult, Side, Spread};
use crate::error::{DegenerateProbability, NonFiniteInput, ProbabilityError};
use crate::normal;

/// Range that emitted probabilities are clipped to.
pub const PROBABILITY_BOUNDS: RangeInclusive<f64> = 0.01..=0.99;

/// Probability that the home side wins outright.
pub fn win_probability(margin: f64, std: f64) -> Result<f64, ProbabilityError> {
    shifted_probability(margin, std, 0.0)
}

/// Probability that the home side covers `spread`, i.e. that the true margin plus the spread
/// ends up positive.
pub fn cover_probability(margin: f64, std: f64, spread: Spread) -> Result<f64, ProbabilityError> {
    NonFiniteInput::check("spread", spread.0)?;
    shifted_probability(margin, std, spread.0)
}

/// The side a home-relative probability points to. An even 0.5 goes to the away side.
pub fn predicted_side(probability: f64) -> Side {
    if probability > 0.5 {
        Side::Home
    } else {
        Side::Away
    }
}

/// Whether a win/cover pair respects the ordering implied by `spread`.
pub fn is_consistent(win_probability: f64, cover_probability: f64, spread: Spread) -> bool {
    if spread.home_favoured() {
        cover_probability <= win_probability
    } else if spread.home_underdog() {
        cover_probability >= win_probability
    } else {
        cover_probability == win_probability
    }
}

fn shifted_probability(margin: f64, std: f64, shift: f64) -> Result<f64, ProbabilityError> {
    MatchupPrediction {
        predicted_margin: margin,
        residual_std: std,
    }
    .validate()?;
    let mean = margin + shift;
    NonFiniteInput::check("shifted margin", mean)?;
    let raw = normal::survival(mean, std)?;
    if !(0.0..=1.0).contains(&raw) {
        return Err(DegenerateProbability {
            value: raw,
            mean,
            std,
            bounds: 0.0..=1.0,
        }
        .into());
    }
    Ok(clip(raw, mean, std))
}

fn clip(raw: f64, mean: f64, std: f64) -> f64 {
    let clipped = raw.clamp(*PROBABILITY_BOUNDS.start(), *PROBABILITY_BOUNDS.end());
    if clipped != raw {
        debug!("clipped probability {raw} to {clipped} for mean {mean} and std {std}");
    }
    clipped
}

impl MatchupPrediction {
    /// Derives the straight-up result and, when a spread is known, the against-the-spread
    /// result from this prediction. Fails if either cannot be derived.
    pub fn evaluate(&self, spread: Option<Spread>) -> Result<ProbabilityResult, ProbabilityError> {
        let mut result = self.evaluate_straight_up()?;
        if let Some(spread) = spread {
            self.evaluate_cover(&mut result, spread)?;
        }
        Ok(result)
    }

    /// Derives the straight-up result alone, leaving the cover fields empty.
    pub fn evaluate_straight_up(&self) -> Result<ProbabilityResult, ProbabilityError> {
        let win_probability = win_probability(self.predicted_margin, self.residual_std)?;
        Ok(ProbabilityResult {
            win_probability,
            cover_probability: None,
            predicted_winner: predicted_side(win_probability),
            predicted_coverer: None,
        })
    }

    /// Adds the against-the-spread result for `spread` to a straight-up `result` derived from
    /// this prediction. On error, `result` is left unchanged.
    pub fn evaluate_cover(&self, result: &mut ProbabilityResult, spread: Spread) -> Result<(), ProbabilityError> {
        let cover_probability = cover_probability(self.predicted_margin, self.residual_std, spread)?;
        debug_assert!(
            is_consistent(result.win_probability, cover_probability, spread),
            "inconsistent win {} and cover {cover_probability} for spread {spread}",
            result.win_probability
        );
        result.cover_probability = Some(cover_probability);
        result.predicted_coverer = Some(predicted_side(cover_probability));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use tinyrand::{Seeded, StdRand};

    use crate::testing::next_f64;

    use super::*;

    const SWEEPS: usize = 10_000;

    #[test]
    fn win_probability_is_symmetric() {
        let mut rand = StdRand::seed(42);
        for _ in 0..SWEEPS {
            let margin = next_f64(&mut rand, -60.0..60.0);
            let std = next_f64(&mut rand, 0.5..30.0);
            let home = win_probability(margin, std).unwrap();
            let away = win_probability(-margin, std).unwrap();
            assert_float_absolute_eq!(1.0, home + away, 1e-12);
        }
    }

    #[test]
    fn cover_is_ordered_against_win() {
        let mut rand = StdRand::seed(7);
        for _ in 0..SWEEPS {
            let margin = next_f64(&mut rand, -40.0..40.0);
            let std = next_f64(&mut rand, 1.0..25.0);
            let half_points = next_f64(&mut rand, -60.0..60.0).round();
            let spread = Spread(half_points * 0.5);
            let win = win_probability(margin, std).unwrap();
            let cover = cover_probability(margin, std, spread).unwrap();
            assert!(
                is_consistent(win, cover, spread),
                "win {win}, cover {cover}, margin {margin}, std {std}, spread {spread}"
            );
        }
    }

    #[test]
    fn zero_spread_covers_like_a_win() {
        for margin in [-21.0, -3.5, 0.0, 0.5, 7.0, 28.0] {
            assert_eq!(
                win_probability(margin, 13.0).unwrap(),
                cover_probability(margin, 13.0, Spread(0.0)).unwrap()
            );
            assert_eq!(
                win_probability(margin, 13.0).unwrap(),
                cover_probability(margin, 13.0, Spread(-0.0)).unwrap()
            );
        }
    }

    #[test]
    fn win_probability_is_clipped() {
        assert_eq!(0.99, win_probability(100.0, 1.0).unwrap());
        assert_eq!(0.01, win_probability(-100.0, 1.0).unwrap());
        assert_eq!(0.99, cover_probability(10.0, 1.0, Spread(90.0)).unwrap());
        assert_eq!(0.01, cover_probability(10.0, 1.0, Spread(-90.0)).unwrap());
    }

    #[test]
    fn clipping_is_reported_at_debug() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct DebugEvents(Arc<AtomicUsize>);
        impl<S: Subscriber> Layer<S> for DebugEvents {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                let metadata = event.metadata();
                if *metadata.level() == Level::DEBUG && metadata.target() == module_path!() {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(DebugEvents(events.clone()));
        tracing::subscriber::with_default(subscriber, || {
            win_probability(3.0, 10.0).unwrap();
            assert_eq!(0, events.load(Ordering::SeqCst));
            assert_eq!(0.99, win_probability(100.0, 1.0).unwrap());
        });
        assert_eq!(1, events.load(Ordering::SeqCst));
    }

    #[test]
    fn probabilities_stay_in_bounds() {
        let mut rand = StdRand::seed(99);
        for _ in 0..SWEEPS {
            let margin = next_f64(&mut rand, -1_000.0..1_000.0);
            let std = next_f64(&mut rand, 0.01..50.0);
            let win = win_probability(margin, std).unwrap();
            assert!(PROBABILITY_BOUNDS.contains(&win), "{win} out of bounds");
        }
    }

    #[test]
    fn home_favoured_beyond_margin() {
        let win = win_probability(13.5, 10.0).unwrap();
        let cover = cover_probability(13.5, 10.0, Spread(-17.5)).unwrap();
        assert_float_absolute_eq!(0.911492, win, 1e-5);
        assert_float_absolute_eq!(0.344578, cover, 1e-5);
        assert!(cover < win);
    }

    #[test]
    fn home_underdog_receiving_points() {
        let win = win_probability(3.0, 10.0).unwrap();
        let cover = cover_probability(3.0, 10.0, Spread(6.5)).unwrap();
        assert_float_absolute_eq!(0.617911, win, 1e-5);
        assert_float_absolute_eq!(0.828944, cover, 1e-5);
        assert!(cover > win);
    }

    #[test]
    fn predicted_side_ties_go_away() {
        assert_eq!(Side::Home, predicted_side(0.5000001));
        assert_eq!(Side::Away, predicted_side(0.5));
        assert_eq!(Side::Away, predicted_side(0.4999999));
        assert_eq!(Side::Away, predicted_side(win_probability(0.0, 10.0).unwrap()));
    }

    #[test]
    fn rejects_non_positive_std() {
        assert_eq!(
            "residual std must be positive, got 0",
            win_probability(3.0, 0.0).unwrap_err().to_string()
        );
        assert_eq!(
            "residual std must be positive, got -2",
            cover_probability(3.0, -2.0, Spread(-3.0)).unwrap_err().to_string()
        );
    }

    #[test]
    fn surfaces_non_finite_inputs() {
        assert_eq!(
            "predicted margin must be finite, got NaN",
            win_probability(f64::NAN, 10.0).unwrap_err().to_string()
        );
        assert_eq!(
            "residual std must be positive, got NaN",
            win_probability(3.0, f64::NAN).unwrap_err().to_string()
        );
        assert_eq!(
            "spread must be finite, got inf",
            cover_probability(3.0, 10.0, Spread(f64::INFINITY)).unwrap_err().to_string()
        );
        assert_eq!(
            "shifted margin must be finite, got inf",
            cover_probability(f64::MAX, 10.0, Spread(f64::MAX)).unwrap_err().to_string()
        );
    }

    #[test]
    fn evaluate_with_spread() {
        let prediction = MatchupPrediction::new(13.5, 10.0).unwrap();
        let result = prediction.evaluate(Some(Spread(-17.5))).unwrap();
        assert_float_absolute_eq!(0.911492, result.win_probability, 1e-5);
        assert_float_absolute_eq!(0.344578, result.cover_probability.unwrap(), 1e-5);
        assert_eq!(Side::Home, result.predicted_winner);
        assert_eq!(Some(Side::Away), result.predicted_coverer);
    }

    #[test]
    fn evaluate_without_spread() {
        let prediction = MatchupPrediction::new(-6.0, 12.0).unwrap();
        let result = prediction.evaluate(None).unwrap();
        assert_float_absolute_eq!(0.308538, result.win_probability, 1e-5);
        assert_eq!(None, result.cover_probability);
        assert_eq!(Side::Away, result.predicted_winner);
        assert_eq!(None, result.predicted_coverer);
    }

    #[test]
    fn evaluate_rejects_invalid_prediction() {
        let prediction = MatchupPrediction {
            predicted_margin: 3.0,
            residual_std: 0.0,
        };
        assert!(matches!(
            prediction.evaluate(Some(Spread(-3.0))),
            Err(ProbabilityError::InvalidParameter(_))
        ));
    }

    #[test]
    fn bad_spread_leaves_straight_up_intact() {
        let prediction = MatchupPrediction::new(5.0, 10.0).unwrap();
        let mut result = prediction.evaluate_straight_up().unwrap();
        let before = result.clone();
        assert_eq!(
            "spread must be finite, got NaN",
            prediction.evaluate_cover(&mut result, Spread(f64::NAN)).unwrap_err().to_string()
        );
        assert_eq!(before, result);
        assert_float_absolute_eq!(0.691462, result.win_probability, 1e-5);
        assert_eq!(None, result.cover_probability);
    }

    #[test]
    fn consistency_rules() {
        assert!(is_consistent(0.7, 0.6, Spread(-3.0)));
        assert!(!is_consistent(0.6, 0.7, Spread(-3.0)));
        assert!(is_consistent(0.6, 0.7, Spread(3.0)));
        assert!(!is_consistent(0.7, 0.6, Spread(3.0)));
        assert!(is_consistent(0.6, 0.6, Spread(0.0)));
        assert!(!is_consistent(0.6, 0.61, Spread(0.0)));
    }
}
