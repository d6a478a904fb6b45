//! Tag-driven priority multipliers.

use super::ParamResolver;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Multipliers applied to a calculator's raw priority.
///
/// Values above 1.0 boost, values below 1.0 penalize. The functions that
/// apply them live in `opportunities::boosts`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriorityBoostParams {
    // Quality and value
    pub high_quality: f64,
    pub quality_value: f64,
    pub deep_value: f64,
    pub value_opportunity: f64,
    pub dividend: f64,
    // Risk profile
    pub low_risk: f64,
    pub high_risk_penalty: f64,
    pub volatile_penalty: f64,
    // Performance and technicals
    pub strong_performer: f64,
    pub underperforming_penalty: f64,
    pub oversold: f64,
    pub overbought_penalty: f64,
    // Regime alignment
    pub regime_bull_growth: f64,
    pub regime_bear_safe: f64,
    pub regime_sideways_value: f64,
    // Sell side
    pub sell_high_risk: f64,
    pub sell_underperforming: f64,
    pub sell_overbought: f64,
    pub sell_high_quality_penalty: f64,
    // Quantum warnings
    pub quantum_penalty_opportunity_buys: f64,
    pub quantum_penalty_averaging_down: f64,
    pub quantum_penalty_rebalance: f64,
    /// How much of the penalty a second, different warning adds
    pub quantum_compound_softening: f64,
}

impl PriorityBoostParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            high_quality: r.value("priority_boost_high_quality")?,
            quality_value: r.value("priority_boost_quality_value")?,
            deep_value: r.value("priority_boost_deep_value")?,
            value_opportunity: r.value("priority_boost_value_opportunity")?,
            dividend: r.value("priority_boost_dividend")?,
            low_risk: r.value("priority_boost_low_risk")?,
            high_risk_penalty: r.value("priority_penalty_high_risk")?,
            volatile_penalty: r.value("priority_penalty_volatile")?,
            strong_performer: r.value("priority_boost_strong_performer")?,
            underperforming_penalty: r.value("priority_penalty_underperforming")?,
            oversold: r.value("priority_boost_oversold")?,
            overbought_penalty: r.value("priority_penalty_overbought")?,
            regime_bull_growth: r.value("regime_boost_bull_growth")?,
            regime_bear_safe: r.value("regime_boost_bear_safe")?,
            regime_sideways_value: r.value("regime_boost_sideways_value")?,
            sell_high_risk: r.value("priority_sell_boost_high_risk")?,
            sell_underperforming: r.value("priority_sell_boost_underperforming")?,
            sell_overbought: r.value("priority_sell_boost_overbought")?,
            sell_high_quality_penalty: r.value("priority_sell_penalty_high_quality")?,
            quantum_penalty_opportunity_buys: r.value("quantum_penalty_opportunity_buys")?,
            quantum_penalty_averaging_down: r.value("quantum_penalty_averaging_down")?,
            quantum_penalty_rebalance: r.value("quantum_penalty_rebalance")?,
            quantum_compound_softening: r.value("quantum_compound_softening")?,
        })
    }
}
