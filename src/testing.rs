//! Testing helpers.

use std::ops::Range;

use assert_float_eq::*;
use tinyrand::Rand;

/// Draws a uniformly-distributed `f64` from `range`.
pub fn next_f64(rand: &mut impl Rand, range: Range<f64>) -> f64 {
    let unit = (rand.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
    range.start + unit * (range.end - range.start)
}

pub fn assert_slice_f64_absolute(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_absolute_eq!(expected, actual, epsilon);
        }
    }
}
