//! The Normal model of the true scoring margin.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::InvalidParameter;

/// Probability that a Normally-distributed margin with the given `mean` and `std` ends up
/// strictly above zero. The result is not clipped.
pub fn survival(mean: f64, std: f64) -> Result<f64, InvalidParameter> {
    let dist = Normal::new(mean, std).map_err(|_| InvalidParameter { residual_std: std })?;
    Ok(dist.sf(0.0))
}
