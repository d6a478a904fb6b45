//! Quality gates and tag-assignment thresholds.

use super::ParamResolver;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Thresholds a security must clear to pass the quality gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QualityGateParams {
    pub fundamentals_threshold: f64,
    pub long_term_threshold: f64,
    /// Either score above this passes on its own
    pub exceptional_threshold: f64,
    /// Both scores above this earn the exceptional-quality tag
    pub exceptional_excellence_threshold: f64,
    pub absolute_min_cagr: f64,
    pub quality_value_fundamentals: f64,
    pub quality_value_discount: f64,
    pub dividend_income_yield: f64,
    pub dividend_income_fundamentals: f64,
    pub min_sharpe: f64,
}

impl QualityGateParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            fundamentals_threshold: r.value("quality_gate_fundamentals_threshold")?,
            long_term_threshold: r.value("quality_gate_long_term_threshold")?,
            exceptional_threshold: r.value("quality_gate_exceptional_threshold")?,
            exceptional_excellence_threshold: r
                .value("quality_gate_exceptional_excellence_threshold")?,
            absolute_min_cagr: r.value("quality_gate_absolute_min_cagr")?,
            quality_value_fundamentals: r.value("quality_gate_quality_value_fundamentals")?,
            quality_value_discount: r.value("quality_gate_quality_value_discount")?,
            dividend_income_yield: r.value("quality_gate_dividend_income_yield")?,
            dividend_income_fundamentals: r.value("quality_gate_dividend_income_fundamentals")?,
            min_sharpe: r.value("quality_gate_min_sharpe")?,
        })
    }
}

/// Thresholds used by the tag assigner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TagThresholdParams {
    // Value
    pub value_opportunity_discount: f64,
    pub deep_value_discount: f64,
    pub near_high_threshold: f64,
    pub high_opportunity_score: f64,
    // Quality
    pub high_quality_fundamentals: f64,
    pub high_quality_long_term: f64,
    pub stable_fundamentals: f64,
    pub stable_max_volatility: f64,
    pub consistent_grower_cagr: f64,
    // Risk profile
    pub low_risk_max_volatility: f64,
    pub low_risk_max_drawdown: f64,
    pub high_risk_min_volatility: f64,
    pub high_risk_min_drawdown: f64,
    pub volatile_min_volatility: f64,
    // Technicals
    pub oversold_rsi: f64,
    pub overbought_rsi: f64,
    pub positive_momentum: f64,
    pub negative_momentum: f64,
    // Performance
    pub excellent_sharpe: f64,
    pub good_sharpe: f64,
    pub poor_sharpe: f64,
    pub strong_performer_cagr: f64,
    pub underperforming_cagr: f64,
    // Dividends
    pub high_dividend_yield: f64,
    pub dividend_grower_yield: f64,
    // Traps and bubbles
    pub value_trap_max_fundamentals: f64,
    pub value_trap_max_momentum: f64,
    pub bubble_min_cagr: f64,
    pub bubble_max_sharpe: f64,
    pub bubble_max_fundamentals: f64,
    // Regime and recovery
    pub regime_bull_momentum: f64,
    pub regime_bear_max_volatility: f64,
    pub regime_sideways_max_momentum: f64,
    pub recovery_min_momentum: f64,
    pub recovery_min_drawdown: f64,
}

impl TagThresholdParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            value_opportunity_discount: r.value("tag_value_opportunity_discount")?,
            deep_value_discount: r.value("tag_deep_value_discount")?,
            near_high_threshold: r.value("tag_near_high_threshold")?,
            high_opportunity_score: r.value("tag_high_opportunity_score")?,
            high_quality_fundamentals: r.value("tag_high_quality_fundamentals")?,
            high_quality_long_term: r.value("tag_high_quality_long_term")?,
            stable_fundamentals: r.value("tag_stable_fundamentals")?,
            stable_max_volatility: r.value("tag_stable_max_volatility")?,
            consistent_grower_cagr: r.value("tag_consistent_grower_cagr")?,
            low_risk_max_volatility: r.value("tag_low_risk_max_volatility")?,
            low_risk_max_drawdown: r.value("tag_low_risk_max_drawdown")?,
            high_risk_min_volatility: r.value("tag_high_risk_min_volatility")?,
            high_risk_min_drawdown: r.value("tag_high_risk_min_drawdown")?,
            volatile_min_volatility: r.value("tag_volatile_min_volatility")?,
            oversold_rsi: r.value("tag_oversold_rsi")?,
            overbought_rsi: r.value("tag_overbought_rsi")?,
            positive_momentum: r.value("tag_positive_momentum")?,
            negative_momentum: r.value("tag_negative_momentum")?,
            excellent_sharpe: r.value("tag_excellent_sharpe")?,
            good_sharpe: r.value("tag_good_sharpe")?,
            poor_sharpe: r.value("tag_poor_sharpe")?,
            strong_performer_cagr: r.value("tag_strong_performer_cagr")?,
            underperforming_cagr: r.value("tag_underperforming_cagr")?,
            high_dividend_yield: r.value("tag_high_dividend_yield")?,
            dividend_grower_yield: r.value("tag_dividend_grower_yield")?,
            value_trap_max_fundamentals: r.value("tag_value_trap_max_fundamentals")?,
            value_trap_max_momentum: r.value("tag_value_trap_max_momentum")?,
            bubble_min_cagr: r.value("tag_bubble_min_cagr")?,
            bubble_max_sharpe: r.value("tag_bubble_max_sharpe")?,
            bubble_max_fundamentals: r.value("tag_bubble_max_fundamentals")?,
            regime_bull_momentum: r.value("tag_regime_bull_momentum")?,
            regime_bear_max_volatility: r.value("tag_regime_bear_max_volatility")?,
            regime_sideways_max_momentum: r.value("tag_regime_sideways_max_momentum")?,
            recovery_min_momentum: r.value("tag_recovery_min_momentum")?,
            recovery_min_drawdown: r.value("tag_recovery_min_drawdown")?,
        })
    }
}
