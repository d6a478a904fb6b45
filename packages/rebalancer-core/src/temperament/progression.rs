//! Progression curves and anchored interpolation.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Steepness of the sigmoid family around the 0.5 midpoint.
const SIGMOID_STEEPNESS: f64 = 12.0;

/// Below this anchor spread a half-interval is treated as flat.
const DEGENERATE_SPAN: f64 = 1e-9;

/// Curve family that shapes how a slider moves a parameter between its anchors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Progression {
    Linear,
    LinearReverse,
    Exponential,
    ExponentialReverse,
    Logarithmic,
    LogarithmicReverse,
    Sigmoid,
    SigmoidReverse,
}

impl Progression {
    /// All eight families, forward first.
    pub const ALL: [Progression; 8] = [
        Progression::Linear,
        Progression::Exponential,
        Progression::Logarithmic,
        Progression::Sigmoid,
        Progression::LinearReverse,
        Progression::ExponentialReverse,
        Progression::LogarithmicReverse,
        Progression::SigmoidReverse,
    ];

    /// Canonical name of the family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Progression::Linear => "linear",
            Progression::LinearReverse => "linear-reverse",
            Progression::Exponential => "exponential",
            Progression::ExponentialReverse => "exponential-reverse",
            Progression::Logarithmic => "logarithmic",
            Progression::LogarithmicReverse => "logarithmic-reverse",
            Progression::Sigmoid => "sigmoid",
            Progression::SigmoidReverse => "sigmoid-reverse",
        }
    }

    /// Whether the raw curve decreases as the slider increases.
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            Progression::LinearReverse
                | Progression::ExponentialReverse
                | Progression::LogarithmicReverse
                | Progression::SigmoidReverse
        )
    }

    /// Raw normalized progression value `p(x)` for `x` in [0, 1].
    ///
    /// Reverse families are their forward family evaluated at `1 - x`.
    pub fn curve(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Progression::Linear => x,
            Progression::Exponential => x * x,
            Progression::Logarithmic => (1.0 + 9.0 * x).log10(),
            Progression::Sigmoid => sigmoid(x),
            Progression::LinearReverse => 1.0 - x,
            Progression::ExponentialReverse => (1.0 - x) * (1.0 - x),
            Progression::LogarithmicReverse => (1.0 + 9.0 * (1.0 - x)).log10(),
            Progression::SigmoidReverse => 1.0 - sigmoid(x),
        }
    }

    /// Piecewise anchored interpolation between `start`, `base` and `end`.
    ///
    /// Guarantees `x = 0 → start`, `x = 0.5 → base` and `x = 1 → end`. Within
    /// each half the curve value is rescaled against the half's anchors, so
    /// reverse families stay monotonic in the same direction as their input.
    pub fn interpolate(&self, x: f64, start: f64, base: f64, end: f64) -> f64 {
        let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.5 };
        let p0 = self.curve(0.0);
        let p_mid = self.curve(0.5);
        let p1 = self.curve(1.0);
        let px = self.curve(x);

        if x <= 0.5 {
            let fraction = anchored_fraction(px, p0, p_mid, x / 0.5);
            // Measured back from base so the midpoint lands on it exactly
            base - (1.0 - fraction) * (base - start)
        } else {
            let fraction = anchored_fraction(px, p_mid, p1, (x - 0.5) / 0.5);
            base + fraction * (end - base)
        }
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Progression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Progression::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| Error::UnknownProgression(s.to_string()))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-SIGMOID_STEEPNESS * (x - 0.5)).exp())
}

/// Fraction travelled through one half-interval, falling back to `linear`
/// when the anchors are too close to divide by.
fn anchored_fraction(px: f64, from: f64, to: f64, linear: f64) -> f64 {
    let span = to - from;
    if span.abs() < DEGENERATE_SPAN {
        return linear.clamp(0.0, 1.0);
    }
    ((px - from) / span).clamp(0.0, 1.0)
}

/// Resolve a slider position against a soft band.
///
/// Direct mappings run from `min` at 0 to `max` at 1; inverse mappings run
/// the other way. The result is clamped to `[min, max]`.
pub fn adjusted_curve_value(
    progression: Progression,
    x: f64,
    min: f64,
    base: f64,
    max: f64,
    inverse: bool,
) -> f64 {
    let (start, end) = if inverse { (max, min) } else { (min, max) };
    progression.interpolate(x, start, base, end).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_raw_curve_endpoints() {
        assert_abs_diff_eq!(Progression::Logarithmic.curve(0.0), 0.0);
        assert_abs_diff_eq!(Progression::Logarithmic.curve(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Progression::Exponential.curve(0.5), 0.25);
        assert_abs_diff_eq!(Progression::ExponentialReverse.curve(0.0), 1.0);
        assert_abs_diff_eq!(Progression::Sigmoid.curve(0.5), 0.5);
        assert!(Progression::Sigmoid.curve(0.0) < 0.01);
        assert_abs_diff_eq!(
            Progression::SigmoidReverse.curve(0.3),
            1.0 - Progression::Sigmoid.curve(0.3),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_anchors_hit_exactly() {
        for progression in Progression::ALL {
            assert_abs_diff_eq!(progression.interpolate(0.0, 1.0, 2.0, 4.0), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(progression.interpolate(0.5, 1.0, 2.0, 4.0), 2.0, epsilon = 1e-9);
            assert_abs_diff_eq!(progression.interpolate(1.0, 1.0, 2.0, 4.0), 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_monotonic_for_every_family() {
        for progression in Progression::ALL {
            let mut previous = progression.interpolate(0.0, 10.0, 20.0, 50.0);
            for step in 1..=100 {
                let value = progression.interpolate(step as f64 / 100.0, 10.0, 20.0, 50.0);
                assert!(
                    value >= previous - 1e-9,
                    "{} not monotonic at step {}",
                    progression,
                    step
                );
                previous = value;
            }
        }
    }

    #[test]
    fn test_inverse_band_swaps_edges() {
        let low = adjusted_curve_value(Progression::Linear, 0.0, 0.1, 0.2, 0.4, true);
        let high = adjusted_curve_value(Progression::Linear, 1.0, 0.1, 0.2, 0.4, true);
        assert_abs_diff_eq!(low, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(high, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_shape_within_half() {
        // Lower half of x²: p(0.25) = 0.0625 of the 0.25 half span.
        let value = Progression::Exponential.interpolate(0.25, 0.0, 1.0, 2.0);
        assert_abs_diff_eq!(value, 0.25, epsilon = 1e-12);
        // Reverse family is concave over the same half.
        let reverse = Progression::ExponentialReverse.interpolate(0.25, 0.0, 1.0, 2.0);
        assert!(reverse > 0.5);
    }

    #[test]
    fn test_flat_band_is_constant() {
        for progression in Progression::ALL {
            let value = progression.interpolate(0.7, 3.0, 3.0, 3.0);
            assert_abs_diff_eq!(value, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_abs_diff_eq!(Progression::Linear.interpolate(-1.0, 1.0, 2.0, 3.0), 1.0);
        assert_abs_diff_eq!(Progression::Linear.interpolate(7.0, 1.0, 2.0, 3.0), 3.0);
        assert_abs_diff_eq!(Progression::Linear.interpolate(f64::NAN, 1.0, 2.0, 3.0), 2.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "sigmoid-reverse".parse::<Progression>().unwrap(),
            Progression::SigmoidReverse
        );
        assert_eq!("Linear".parse::<Progression>().unwrap(), Progression::Linear);
        assert!(matches!(
            "cubic".parse::<Progression>(),
            Err(Error::UnknownProgression(_))
        ));
    }
}
