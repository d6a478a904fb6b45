//! Deriving security tags from metrics and resolved thresholds.

use super::{parse_tags, SecurityTag, TagSet};
use crate::context::{PlanningContext, SecurityRepository};
use crate::params::{QualityGateParams, TagThresholdParams};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Measured characteristics of a security. Missing values never produce tags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityMetrics {
    /// Fundamentals score in [0, 1]
    pub fundamentals: Option<f64>,
    /// Long-term score in [0, 1]
    pub long_term: Option<f64>,
    /// Compound annual growth rate (0.10 = 10%)
    pub cagr: Option<f64>,
    /// Annualized volatility
    pub volatility: Option<f64>,
    pub sharpe: Option<f64>,
    /// Maximum drawdown as a positive fraction
    pub max_drawdown: Option<f64>,
    pub dividend_yield: Option<f64>,
    /// Year-over-year dividend growth
    pub dividend_growth: Option<f64>,
    /// Recent price momentum (0.05 = +5%)
    pub momentum: Option<f64>,
    pub rsi: Option<f64>,
    /// Distance below the 52-week high (0.20 = 20% below)
    pub discount_from_high: Option<f64>,
    pub opportunity_score: Option<f64>,
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

fn at_most(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v <= threshold)
}

/// Assign every tag the metrics support under the given thresholds.
pub fn assign_tags(
    m: &SecurityMetrics,
    t: &TagThresholdParams,
    gates: &QualityGateParams,
) -> TagSet {
    let mut tags = TagSet::new();
    let mut tag_if = |condition: bool, tag: SecurityTag| {
        if condition {
            tags.insert(tag);
        }
    };

    // Quality
    tag_if(
        at_least(m.fundamentals, t.high_quality_fundamentals)
            && at_least(m.long_term, t.high_quality_long_term),
        SecurityTag::HighQuality,
    );
    tag_if(
        at_least(m.fundamentals, t.stable_fundamentals)
            && at_most(m.volatility, t.stable_max_volatility),
        SecurityTag::StableFundamentals,
    );
    tag_if(
        at_least(m.cagr, t.consistent_grower_cagr) && at_least(m.sharpe, t.good_sharpe),
        SecurityTag::ConsistentGrower,
    );
    tag_if(
        at_least(m.fundamentals, gates.exceptional_excellence_threshold)
            && at_least(m.long_term, gates.exceptional_excellence_threshold),
        SecurityTag::ExceptionalQuality,
    );
    tag_if(
        at_least(m.fundamentals, gates.quality_value_fundamentals)
            && at_least(m.discount_from_high, gates.quality_value_discount),
        SecurityTag::QualityValue,
    );

    // Value
    let deep_value = at_least(m.discount_from_high, t.deep_value_discount);
    tag_if(deep_value, SecurityTag::DeepValue);
    tag_if(
        !deep_value
            && (at_least(m.discount_from_high, t.value_opportunity_discount)
                || at_least(m.opportunity_score, t.high_opportunity_score)),
        SecurityTag::ValueOpportunity,
    );
    tag_if(
        at_most(m.discount_from_high, t.near_high_threshold),
        SecurityTag::NearHigh,
    );

    // Risk profile
    tag_if(
        at_most(m.volatility, t.low_risk_max_volatility)
            && at_most(m.max_drawdown, t.low_risk_max_drawdown),
        SecurityTag::LowRisk,
    );
    tag_if(
        at_least(m.volatility, t.high_risk_min_volatility)
            || at_least(m.max_drawdown, t.high_risk_min_drawdown),
        SecurityTag::HighRisk,
    );
    tag_if(
        at_least(m.volatility, t.volatile_min_volatility),
        SecurityTag::Volatile,
    );

    // Technicals
    tag_if(at_most(m.rsi, t.oversold_rsi), SecurityTag::Oversold);
    tag_if(at_least(m.rsi, t.overbought_rsi), SecurityTag::Overbought);
    tag_if(
        at_least(m.momentum, t.positive_momentum),
        SecurityTag::PositiveMomentum,
    );
    tag_if(
        at_most(m.momentum, t.negative_momentum),
        SecurityTag::NegativeMomentum,
    );

    // Performance
    tag_if(
        at_least(m.cagr, t.strong_performer_cagr) && at_least(m.sharpe, t.good_sharpe),
        SecurityTag::StrongPerformer,
    );
    tag_if(
        at_most(m.cagr, t.underperforming_cagr),
        SecurityTag::Underperforming,
    );
    tag_if(at_most(m.sharpe, t.poor_sharpe), SecurityTag::PoorRiskReward);

    // Dividends
    tag_if(
        at_least(m.dividend_yield, t.high_dividend_yield),
        SecurityTag::HighDividend,
    );
    tag_if(
        at_least(m.dividend_yield, t.dividend_grower_yield)
            && m.dividend_growth.is_some_and(|g| g > 0.0),
        SecurityTag::DividendGrower,
    );

    // Quality gate, evaluated only when there is a score to judge
    if m.fundamentals.is_some() || m.long_term.is_some() {
        let passes = (at_least(m.fundamentals, gates.fundamentals_threshold)
            && at_least(m.long_term, gates.long_term_threshold))
            || at_least(m.fundamentals, gates.exceptional_threshold)
            || at_least(m.long_term, gates.exceptional_threshold)
            || (at_least(m.dividend_yield, gates.dividend_income_yield)
                && at_least(m.fundamentals, gates.dividend_income_fundamentals));
        tag_if(passes, SecurityTag::QualityGatePass);
        tag_if(!passes, SecurityTag::QualityGateFail);
    }
    if let Some(cagr) = m.cagr {
        let total_return = cagr + m.dividend_yield.unwrap_or(0.0);
        tag_if(
            total_return < gates.absolute_min_cagr,
            SecurityTag::BelowMinimumReturn,
        );
    }

    // Traps and bubbles
    tag_if(
        at_least(m.discount_from_high, t.value_opportunity_discount)
            && at_most(m.fundamentals, t.value_trap_max_fundamentals)
            && at_most(m.momentum, t.value_trap_max_momentum),
        SecurityTag::ValueTrap,
    );
    tag_if(
        at_least(m.cagr, t.bubble_min_cagr)
            && (at_most(m.sharpe, t.bubble_max_sharpe)
                || at_most(m.fundamentals, t.bubble_max_fundamentals)),
        SecurityTag::BubbleRisk,
    );

    // Early warnings short of the hard trap/bubble rules
    tag_if(
        at_least(m.rsi, t.overbought_rsi)
            && at_least(m.cagr, t.strong_performer_cagr)
            && at_most(m.sharpe, t.good_sharpe),
        SecurityTag::QuantumBubbleWarning,
    );
    tag_if(
        at_least(m.discount_from_high, t.value_opportunity_discount)
            && at_most(m.momentum, t.negative_momentum)
            && m.fundamentals.is_some_and(|f| f < t.stable_fundamentals),
        SecurityTag::QuantumValueWarning,
    );

    // Regime alignment
    tag_if(
        at_least(m.momentum, t.regime_bull_momentum) && at_least(m.cagr, t.consistent_grower_cagr),
        SecurityTag::RegimeBullGrowth,
    );
    tag_if(
        at_most(m.volatility, t.regime_bear_max_volatility)
            && at_least(m.fundamentals, t.stable_fundamentals),
        SecurityTag::RegimeBearSafe,
    );
    tag_if(
        m.momentum
            .is_some_and(|v| v.abs() <= t.regime_sideways_max_momentum)
            && at_least(m.discount_from_high, t.value_opportunity_discount),
        SecurityTag::RegimeSidewaysValue,
    );
    tag_if(
        at_least(m.momentum, t.recovery_min_momentum)
            && at_least(m.max_drawdown, t.recovery_min_drawdown),
        SecurityTag::RecoveryCandidate,
    );

    tags
}

/// In-memory security repository keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct StaticSecurityRepository {
    tags: HashMap<String, TagSet>,
}

impl StaticSecurityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, symbol: &str, tags: impl IntoIterator<Item = SecurityTag>) -> Self {
        self.insert(symbol, tags);
        self
    }

    pub fn insert(&mut self, symbol: &str, tags: impl IntoIterator<Item = SecurityTag>) {
        self.tags
            .entry(symbol.to_uppercase())
            .or_default()
            .extend(tags);
    }

    /// Build from a context: tags declared on each security, plus tags
    /// derived from its metrics when present.
    pub fn from_context(
        ctx: &PlanningContext,
        thresholds: &TagThresholdParams,
        gates: &QualityGateParams,
    ) -> Self {
        let mut repo = Self::new();
        for security in ctx.securities.values() {
            let mut tags = parse_tags(security.tags.iter().map(String::as_str));
            if let Some(metrics) = &security.metrics {
                tags.extend(assign_tags(metrics, thresholds, gates));
            }
            repo.insert(&security.symbol, tags);
        }
        tracing::debug!("Security repository built for {} symbols", repo.tags.len());
        repo
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl SecurityRepository for StaticSecurityRepository {
    fn tags_for_security(&self, symbol: &str) -> Result<TagSet> {
        Ok(self
            .tags
            .get(&symbol.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SecurityInfo;
    use crate::params::CalculatorConfig;

    fn thresholds() -> (TagThresholdParams, QualityGateParams) {
        let config = CalculatorConfig::neutral().unwrap();
        (config.tag_thresholds, config.quality_gates)
    }

    #[test]
    fn test_empty_metrics_yield_no_tags() {
        let (t, g) = thresholds();
        assert!(assign_tags(&SecurityMetrics::default(), &t, &g).is_empty());
    }

    #[test]
    fn test_high_quality_low_risk() {
        let (t, g) = thresholds();
        let metrics = SecurityMetrics {
            fundamentals: Some(0.85),
            long_term: Some(0.82),
            volatility: Some(0.12),
            max_drawdown: Some(0.15),
            cagr: Some(0.12),
            sharpe: Some(1.2),
            ..Default::default()
        };
        let tags = assign_tags(&metrics, &t, &g);
        assert!(tags.contains(&SecurityTag::HighQuality));
        assert!(tags.contains(&SecurityTag::ExceptionalQuality));
        assert!(tags.contains(&SecurityTag::LowRisk));
        assert!(tags.contains(&SecurityTag::QualityGatePass));
        assert!(!tags.contains(&SecurityTag::HighRisk));
        assert!(!tags.contains(&SecurityTag::BelowMinimumReturn));
    }

    #[test]
    fn test_value_trap() {
        let (t, g) = thresholds();
        let metrics = SecurityMetrics {
            fundamentals: Some(0.30),
            momentum: Some(-0.12),
            discount_from_high: Some(0.35),
            ..Default::default()
        };
        let tags = assign_tags(&metrics, &t, &g);
        assert!(tags.contains(&SecurityTag::ValueTrap));
        assert!(tags.contains(&SecurityTag::DeepValue));
        assert!(!tags.contains(&SecurityTag::ValueOpportunity));
        assert!(tags.contains(&SecurityTag::QualityGateFail));
    }

    #[test]
    fn test_bubble_risk() {
        let (t, g) = thresholds();
        let metrics = SecurityMetrics {
            cagr: Some(0.55),
            sharpe: Some(0.4),
            rsi: Some(80.0),
            ..Default::default()
        };
        let tags = assign_tags(&metrics, &t, &g);
        assert!(tags.contains(&SecurityTag::BubbleRisk));
        assert!(tags.contains(&SecurityTag::Overbought));
        assert!(tags.contains(&SecurityTag::QuantumBubbleWarning));
    }

    #[test]
    fn test_dividend_income_passes_gate() {
        let (t, g) = thresholds();
        let metrics = SecurityMetrics {
            fundamentals: Some(0.58),
            long_term: Some(0.40),
            dividend_yield: Some(0.05),
            cagr: Some(0.03),
            ..Default::default()
        };
        let tags = assign_tags(&metrics, &t, &g);
        assert!(tags.contains(&SecurityTag::QualityGatePass));
        assert!(tags.contains(&SecurityTag::HighDividend));
        // 3% growth plus 5% yield clears the return floor
        assert!(!tags.contains(&SecurityTag::BelowMinimumReturn));
    }

    #[test]
    fn test_repository_from_context() {
        let (t, g) = thresholds();
        let mut security = SecurityInfo::new("abc", "ABC Corp");
        security.tags = vec!["value-trap".to_string(), "unknown-tag".to_string()];
        security.metrics = Some(SecurityMetrics {
            rsi: Some(20.0),
            ..Default::default()
        });
        let ctx = PlanningContext::new(1000.0).with_security("US0001", security);

        let repo = StaticSecurityRepository::from_context(&ctx, &t, &g);
        let tags = repo.tags_for_security("ABC").unwrap();
        assert!(tags.contains(&SecurityTag::ValueTrap));
        assert!(tags.contains(&SecurityTag::Oversold));
        assert!(repo.tags_for_security("XYZ").unwrap().is_empty());
    }
}
