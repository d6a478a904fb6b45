//! Strategy, sizing and risk parameter groups.

use super::{HoldSettings, ParamResolver};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Profit-taking thresholds and sell sizing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProfitTakingParams {
    /// Minimum unrealized gain (0.15 = 15%) before a trim is considered
    pub min_gain_threshold: f64,
    /// Gain treated as a windfall
    pub windfall_threshold: f64,
    /// Fraction of the position sold on a regular trim
    pub sell_percentage: f64,
    /// Fraction of the position sold on a windfall
    pub windfall_sell_percentage: f64,
    pub max_positions: usize,
    pub priority_weight: f64,
    pub windfall_priority_multiplier: f64,
}

impl ProfitTakingParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            min_gain_threshold: r.value("profit_taking_min_gain_threshold")?,
            windfall_threshold: r.value("profit_taking_windfall_threshold")?,
            sell_percentage: r.value("profit_taking_sell_percentage")?,
            windfall_sell_percentage: r.value("profit_taking_windfall_sell_percentage")?,
            max_positions: r.count("profit_taking_max_positions")?,
            priority_weight: r.value("profit_taking_priority_weight")?,
            windfall_priority_multiplier: r.value("profit_taking_windfall_priority_multiplier")?,
        })
    }
}

/// Averaging down into positions trading below cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AveragingDownParams {
    /// Minimum loss from average cost before adding
    pub min_loss_threshold: f64,
    /// Losses deeper than this are not averaged into
    pub max_loss_threshold: f64,
    /// Fraction of the current position value added per trade
    pub percent: f64,
    pub min_quality_score: f64,
    pub max_trade_value: f64,
    pub max_positions: usize,
    /// Position weight the averaged position may reach
    pub max_position_pct: f64,
    pub priority_weight: f64,
}

impl AveragingDownParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            min_loss_threshold: r.value("averaging_down_min_loss_threshold")?,
            max_loss_threshold: r.value("averaging_down_max_loss_threshold")?,
            percent: r.value("averaging_down_percent")?,
            min_quality_score: r.value("averaging_down_min_quality_score")?,
            max_trade_value: r.value("averaging_down_max_trade_value")?,
            max_positions: r.count("averaging_down_max_positions")?,
            max_position_pct: r.value("averaging_down_max_position_pct")?,
            priority_weight: r.value("averaging_down_priority_weight")?,
        })
    }
}

/// Opportunistic buys of discounted, well-scored securities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OpportunityBuyParams {
    pub min_score: f64,
    pub min_quality_score: f64,
    pub max_value_per_position: f64,
    pub max_positions: usize,
    /// Minimum distance below the 52-week high
    pub min_discount_from_high: f64,
    pub max_position_pct: f64,
    pub priority_weight: f64,
}

impl OpportunityBuyParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            min_score: r.value("opportunity_buys_min_score")?,
            min_quality_score: r.value("opportunity_buys_min_quality_score")?,
            max_value_per_position: r.value("opportunity_buys_max_value_per_position")?,
            max_positions: r.count("opportunity_buys_max_positions")?,
            min_discount_from_high: r.value("opportunity_buys_min_discount_from_high")?,
            max_position_pct: r.value("opportunity_buys_max_position_pct")?,
            priority_weight: r.value("opportunity_buys_priority_weight")?,
        })
    }
}

/// Fractional-Kelly position sizing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KellyParams {
    /// Multiplier applied to the full Kelly fraction
    pub fraction: f64,
    pub min_position_size: f64,
    pub max_position_size: f64,
    /// Sizing swing between zero and full confidence
    pub confidence_adjustment_range: f64,
    pub bear_market_reduction: f64,
    pub bull_market_boost: f64,
    pub min_expected_return: f64,
    pub volatility_floor: f64,
}

impl KellyParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            fraction: r.value("kelly_fraction")?,
            min_position_size: r.value("kelly_min_position_size")?,
            max_position_size: r.value("kelly_max_position_size")?,
            confidence_adjustment_range: r.value("kelly_confidence_adjustment_range")?,
            bear_market_reduction: r.value("kelly_bear_market_reduction")?,
            bull_market_boost: r.value("kelly_bull_market_boost")?,
            min_expected_return: r.value("kelly_min_expected_return")?,
            volatility_floor: r.value("kelly_volatility_floor")?,
        })
    }
}

/// Portfolio guardrails and hold periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskManagementParams {
    /// From settings, not sliders
    pub min_hold_days: u32,
    /// From settings, not sliders
    pub sell_cooldown_days: u32,
    pub buy_cooldown_days: u32,
    pub max_single_position_concentration: f64,
    pub max_geography_concentration: f64,
    pub max_drawdown_tolerance: f64,
    pub stop_loss_threshold: f64,
    pub max_portfolio_volatility: f64,
    pub volatility_spike_threshold: f64,
    /// Cash kept aside from buy sizing, as a fraction of portfolio value
    pub cash_reserve_pct: f64,
}

impl RiskManagementParams {
    pub fn from_resolver(r: &ParamResolver, hold: HoldSettings) -> Result<Self> {
        Ok(Self {
            min_hold_days: hold.min_hold_days,
            sell_cooldown_days: hold.sell_cooldown_days,
            buy_cooldown_days: r.days("risk_buy_cooldown_days")?,
            max_single_position_concentration: r
                .value("risk_max_single_position_concentration")?,
            max_geography_concentration: r.value("risk_max_geography_concentration")?,
            max_drawdown_tolerance: r.value("risk_max_drawdown_tolerance")?,
            stop_loss_threshold: r.value("risk_stop_loss_threshold")?,
            max_portfolio_volatility: r.value("risk_max_portfolio_volatility")?,
            volatility_spike_threshold: r.value("risk_volatility_spike_threshold")?,
            cash_reserve_pct: r.value("risk_cash_reserve_pct")?,
        })
    }
}

/// Allocation-gap rebalancing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RebalancingParams {
    /// Minimum gap between target and current geography weight
    pub min_underweight_threshold: f64,
    pub max_per_position_pct: f64,
    pub max_trade_value: f64,
    pub max_positions: usize,
    pub priority_weight: f64,
    /// Quality assumed for securities without a score
    pub default_quality_score: f64,
}

impl RebalancingParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            min_underweight_threshold: r.value("rebalance_min_underweight_threshold")?,
            max_per_position_pct: r.value("rebalance_max_per_position_pct")?,
            max_trade_value: r.value("rebalance_max_trade_value")?,
            max_positions: r.count("rebalance_max_positions")?,
            priority_weight: r.value("rebalance_priority_weight")?,
            default_quality_score: r.value("rebalance_default_quality_score")?,
        })
    }
}

/// Transaction-cost economics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransactionParams {
    /// Largest share of a trade's value that costs may consume
    pub max_cost_ratio: f64,
}

impl TransactionParams {
    pub fn from_resolver(r: &ParamResolver) -> Result<Self> {
        Ok(Self {
            max_cost_ratio: r.value("transaction_max_cost_ratio")?,
        })
    }
}
