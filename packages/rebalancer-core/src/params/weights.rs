//! Normalized weight groups for plan evaluation and security scoring.

use super::ParamResolver;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Below this total a weight group falls back to its default distribution.
const MIN_WEIGHT_SUM: f64 = 1e-9;

/// Scale weights so they sum to 1. Returns `None` when the total is
/// effectively zero or not finite.
fn normalize<const N: usize>(raw: [f64; N]) -> Option<[f64; N]> {
    let raw = raw.map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 });
    let sum: f64 = raw.iter().sum();
    if sum < MIN_WEIGHT_SUM {
        return None;
    }
    Some(raw.map(|w| w / sum))
}

/// Per-dimension scores of a candidate plan, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationScores {
    pub quality: f64,
    pub diversification: f64,
    pub risk: f64,
    pub momentum: f64,
    pub value: f64,
    /// 1.0 means costs are negligible
    pub transaction_cost: f64,
}

/// Weights for ranking candidate plans. Always sums to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EvaluationWeights {
    pub quality: f64,
    pub diversification: f64,
    pub risk: f64,
    pub momentum: f64,
    pub value: f64,
    pub transaction_cost: f64,
}

impl EvaluationWeights {
    const DEFAULTS: [f64; 6] = [0.30, 0.20, 0.15, 0.15, 0.10, 0.10];

    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self::normalized([
            r.value("evaluation_weight_quality")?,
            r.value("evaluation_weight_diversification")?,
            r.value("evaluation_weight_risk")?,
            r.value("evaluation_weight_momentum")?,
            r.value("evaluation_weight_value")?,
            r.value("evaluation_weight_transaction_cost")?,
        ]))
    }

    /// Normalize raw weights, using the default distribution when they sum to zero.
    pub fn normalized(raw: [f64; 6]) -> Self {
        let w = normalize(raw).unwrap_or_else(|| {
            tracing::warn!("Evaluation weights sum to zero, using defaults");
            Self::default_distribution()
        });
        Self {
            quality: w[0],
            diversification: w[1],
            risk: w[2],
            momentum: w[3],
            value: w[4],
            transaction_cost: w[5],
        }
    }

    fn default_distribution() -> [f64; 6] {
        let sum: f64 = Self::DEFAULTS.iter().sum();
        Self::DEFAULTS.map(|w| w / sum)
    }

    pub fn sum(&self) -> f64 {
        self.quality
            + self.diversification
            + self.risk
            + self.momentum
            + self.value
            + self.transaction_cost
    }

    /// Weighted score of a plan.
    pub fn evaluate(&self, scores: &EvaluationScores) -> f64 {
        self.quality * scores.quality
            + self.diversification * scores.diversification
            + self.risk * scores.risk
            + self.momentum * scores.momentum
            + self.value * scores.value
            + self.transaction_cost * scores.transaction_cost
    }
}

/// Component scores of a single security, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreComponents {
    pub long_term: f64,
    pub fundamentals: f64,
    pub dividends: f64,
    pub opportunity: f64,
    pub short_term: f64,
    pub technicals: f64,
    pub opinion: f64,
    pub diversification: f64,
}

/// Weights combining component scores into one security score. Always sums to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringWeights {
    pub long_term: f64,
    pub fundamentals: f64,
    pub dividends: f64,
    pub opportunity: f64,
    pub short_term: f64,
    pub technicals: f64,
    pub opinion: f64,
    pub diversification: f64,
}

impl ScoringWeights {
    const DEFAULTS: [f64; 8] = [0.25, 0.20, 0.12, 0.12, 0.08, 0.08, 0.05, 0.10];

    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self::normalized([
            r.value("scoring_weight_long_term")?,
            r.value("scoring_weight_fundamentals")?,
            r.value("scoring_weight_dividends")?,
            r.value("scoring_weight_opportunity")?,
            r.value("scoring_weight_short_term")?,
            r.value("scoring_weight_technicals")?,
            r.value("scoring_weight_opinion")?,
            r.value("scoring_weight_diversification")?,
        ]))
    }

    pub fn normalized(raw: [f64; 8]) -> Self {
        let w = normalize(raw).unwrap_or_else(|| {
            tracing::warn!("Scoring weights sum to zero, using defaults");
            let sum: f64 = Self::DEFAULTS.iter().sum();
            Self::DEFAULTS.map(|w| w / sum)
        });
        Self {
            long_term: w[0],
            fundamentals: w[1],
            dividends: w[2],
            opportunity: w[3],
            short_term: w[4],
            technicals: w[5],
            opinion: w[6],
            diversification: w[7],
        }
    }

    pub fn sum(&self) -> f64 {
        self.long_term
            + self.fundamentals
            + self.dividends
            + self.opportunity
            + self.short_term
            + self.technicals
            + self.opinion
            + self.diversification
    }

    /// Weighted security score.
    pub fn score(&self, c: &ScoreComponents) -> f64 {
        self.long_term * c.long_term
            + self.fundamentals * c.fundamentals
            + self.dividends * c.dividends
            + self.opportunity * c.opportunity
            + self.short_term * c.short_term
            + self.technicals * c.technicals
            + self.opinion * c.opinion
            + self.diversification * c.diversification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temperament::SliderState;
    use approx::assert_abs_diff_eq;

    const GRID: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    #[test]
    fn test_weights_sum_to_one_across_slider_grid() {
        for r in GRID {
            for a in GRID {
                for p in GRID {
                    let resolver = ParamResolver::new(SliderState::new(r, a, p));
                    let eval = EvaluationWeights::from_resolver(&resolver).unwrap();
                    let scoring = ScoringWeights::from_resolver(&resolver).unwrap();
                    assert_abs_diff_eq!(eval.sum(), 1.0, epsilon = 1e-4);
                    assert_abs_diff_eq!(scoring.sum(), 1.0, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_zero_sum_uses_default_distribution() {
        let eval = EvaluationWeights::normalized([0.0; 6]);
        assert_abs_diff_eq!(eval.sum(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(eval.quality, 0.30, epsilon = 1e-9);
        assert_abs_diff_eq!(eval.value, 0.10, epsilon = 1e-9);

        let scoring = ScoringWeights::normalized([0.0; 8]);
        assert_abs_diff_eq!(scoring.long_term, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_default_distributions_sum_to_one() {
        assert_abs_diff_eq!(EvaluationWeights::DEFAULTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ScoringWeights::DEFAULTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_weights_are_ignored() {
        let eval = EvaluationWeights::normalized([f64::NAN, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(eval.quality, 0.0);
        assert_abs_diff_eq!(eval.diversification, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_score_is_weighted_average() {
        let weights = ScoringWeights::normalized([1.0; 8]);
        let perfect = ScoreComponents {
            long_term: 1.0,
            fundamentals: 1.0,
            dividends: 1.0,
            opportunity: 1.0,
            short_term: 1.0,
            technicals: 1.0,
            opinion: 1.0,
            diversification: 1.0,
        };
        assert_abs_diff_eq!(weights.score(&perfect), 1.0, epsilon = 1e-9);
        assert_eq!(weights.score(&ScoreComponents::default()), 0.0);
    }
}
