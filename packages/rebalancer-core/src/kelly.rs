//! Fractional-Kelly position sizing.

use crate::context::MarketRegime;
use crate::params::KellyParams;

/// Position size as a fraction of portfolio value.
///
/// Starts from the continuous Kelly optimum `f* = μ / σ²`, scales it by the
/// fractional-Kelly multiplier, by confidence in the estimate and by the
/// market regime, then clamps to `[min_position_size, max_position_size]`.
/// Returns 0.0 when the expected return is below the configured minimum or
/// the inputs are not finite.
pub fn kelly_fraction(
    expected_return: f64,
    volatility: f64,
    confidence: f64,
    regime: MarketRegime,
    params: &KellyParams,
) -> f64 {
    if !expected_return.is_finite() || expected_return < params.min_expected_return {
        return 0.0;
    }

    let sigma = if volatility.is_finite() {
        volatility.max(params.volatility_floor)
    } else {
        params.volatility_floor
    };
    if sigma <= 0.0 {
        return 0.0;
    }

    let full = expected_return / (sigma * sigma);

    // 0.5 confidence is neutral; 0 and 1 swing by the full range
    let confidence = if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let confidence_factor = 1.0 + (confidence - 0.5) * 2.0 * params.confidence_adjustment_range;

    let regime_factor = match regime {
        MarketRegime::Bull => params.bull_market_boost,
        MarketRegime::Bear => params.bear_market_reduction,
        MarketRegime::Sideways => 1.0,
    };

    let sized = full * params.fraction * confidence_factor * regime_factor;
    sized.clamp(params.min_position_size, params.max_position_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamResolver;
    use crate::temperament::SliderState;
    use approx::assert_abs_diff_eq;

    fn params() -> KellyParams {
        KellyParams::from_resolver(&ParamResolver::new(SliderState::default())).unwrap()
    }

    #[test]
    fn test_below_min_expected_return() {
        let p = params();
        assert_eq!(kelly_fraction(0.01, 0.2, 0.5, MarketRegime::Sideways, &p), 0.0);
        assert_eq!(kelly_fraction(f64::NAN, 0.2, 0.5, MarketRegime::Sideways, &p), 0.0);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let p = params();
        // Enormous edge hits the ceiling
        let high = kelly_fraction(0.50, 0.05, 1.0, MarketRegime::Bull, &p);
        assert_abs_diff_eq!(high, p.max_position_size, epsilon = 1e-12);

        // High volatility shrinks to the floor
        let low = kelly_fraction(0.06, 2.0, 0.0, MarketRegime::Bear, &p);
        assert_abs_diff_eq!(low, p.min_position_size, epsilon = 1e-12);
    }

    #[test]
    fn test_regime_and_confidence_scale() {
        let mut p = params();
        p.max_position_size = 10.0;
        p.min_position_size = 0.0;
        let neutral = kelly_fraction(0.08, 0.4, 0.5, MarketRegime::Sideways, &p);
        assert_abs_diff_eq!(neutral, 0.08 / 0.16 * p.fraction, epsilon = 1e-12);

        let bear = kelly_fraction(0.08, 0.4, 0.5, MarketRegime::Bear, &p);
        assert_abs_diff_eq!(bear, neutral * p.bear_market_reduction, epsilon = 1e-12);

        let confident = kelly_fraction(0.08, 0.4, 1.0, MarketRegime::Sideways, &p);
        assert!(confident > neutral);
    }

    #[test]
    fn test_volatility_floor() {
        let mut p = params();
        p.max_position_size = 100.0;
        let zero_vol = kelly_fraction(0.08, 0.0, 0.5, MarketRegime::Sideways, &p);
        let floored = kelly_fraction(0.08, p.volatility_floor, 0.5, MarketRegime::Sideways, &p);
        assert_abs_diff_eq!(zero_vol, floored, epsilon = 1e-12);
    }
}
