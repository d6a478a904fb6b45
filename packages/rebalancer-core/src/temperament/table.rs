//! The registered temperament mappings.
//!
//! Entries are grouped by the parameter group that consumes them. Each line
//! reads: slider and direction, curve, soft band `(min, base, max)`, hard
//! bounds `(absolute_min, absolute_max)`.

use super::mapping::Temperament::{Aggression, Patience, RiskTolerance};
use super::mapping::TemperamentMapping as M;
use super::progression::Progression::{Exponential, Linear, Logarithmic, Sigmoid};

pub(super) static MAPPINGS: &[M] = &[
    // Profit taking
    M::direct("profit_taking_min_gain_threshold", Patience, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.05, 0.50),
    M::direct("profit_taking_windfall_threshold", Patience, Exponential)
        .band(0.20, 0.30, 0.50)
        .hard(0.15, 1.00),
    M::direct("profit_taking_sell_percentage", Aggression, Linear)
        .band(0.10, 0.25, 0.50)
        .hard(0.05, 1.00),
    M::direct("profit_taking_windfall_sell_percentage", Aggression, Linear)
        .band(0.25, 0.40, 0.75)
        .hard(0.10, 1.00),
    M::direct("profit_taking_max_positions", Aggression, Linear)
        .band(2.0, 5.0, 10.0)
        .hard(1.0, 20.0),
    M::direct("profit_taking_priority_weight", Aggression, Sigmoid)
        .band(0.80, 1.00, 1.30)
        .hard(0.50, 2.00),
    M::direct("profit_taking_windfall_priority_multiplier", Aggression, Linear)
        .band(1.20, 1.50, 2.00)
        .hard(1.00, 3.00),
    // Averaging down
    M::direct("averaging_down_min_loss_threshold", Patience, Linear)
        .band(0.05, 0.10, 0.20)
        .hard(0.02, 0.30),
    M::direct("averaging_down_max_loss_threshold", RiskTolerance, Linear)
        .band(0.20, 0.30, 0.45)
        .hard(0.10, 0.60),
    M::direct("averaging_down_percent", Aggression, Linear)
        .band(0.05, 0.10, 0.20)
        .hard(0.02, 0.50),
    M::inverse("averaging_down_min_quality_score", RiskTolerance, Linear)
        .band(0.55, 0.65, 0.80)
        .hard(0.40, 0.95),
    M::direct("averaging_down_max_trade_value", Aggression, Exponential)
        .band(300.0, 1000.0, 3000.0)
        .hard(100.0, 10000.0),
    M::direct("averaging_down_max_positions", Aggression, Linear)
        .band(1.0, 3.0, 5.0)
        .hard(1.0, 10.0),
    M::direct("averaging_down_max_position_pct", RiskTolerance, Linear)
        .band(0.05, 0.08, 0.12)
        .hard(0.02, 0.20),
    M::direct("averaging_down_priority_weight", Aggression, Linear)
        .band(0.60, 0.80, 1.00)
        .hard(0.30, 1.50),
    // Opportunity buys
    M::inverse("opportunity_buys_min_score", RiskTolerance, Linear)
        .band(0.60, 0.70, 0.85)
        .hard(0.40, 0.95),
    M::inverse("opportunity_buys_min_quality_score", RiskTolerance, Linear)
        .band(0.50, 0.60, 0.70)
        .hard(0.30, 0.90),
    M::direct("opportunity_buys_max_value_per_position", Aggression, Exponential)
        .band(300.0, 500.0, 1500.0)
        .hard(100.0, 5000.0),
    M::direct("opportunity_buys_max_positions", Aggression, Linear)
        .band(2.0, 5.0, 10.0)
        .hard(1.0, 20.0),
    M::direct("opportunity_buys_min_discount_from_high", Patience, Linear)
        .band(0.05, 0.10, 0.25)
        .hard(0.00, 0.50),
    M::direct("opportunity_buys_max_position_pct", RiskTolerance, Linear)
        .band(0.03, 0.05, 0.08)
        .hard(0.01, 0.15),
    M::direct("opportunity_buys_priority_weight", Aggression, Sigmoid)
        .band(0.70, 0.90, 1.20)
        .hard(0.30, 2.00),
    // Kelly sizing
    M::direct("kelly_fraction", RiskTolerance, Linear)
        .band(0.15, 0.25, 0.50)
        .hard(0.05, 1.00),
    M::direct("kelly_min_position_size", RiskTolerance, Linear)
        .band(0.005, 0.01, 0.02)
        .hard(0.00, 0.05),
    M::direct("kelly_max_position_size", RiskTolerance, Logarithmic)
        .band(0.05, 0.10, 0.20)
        .hard(0.02, 0.30),
    M::inverse("kelly_confidence_adjustment_range", RiskTolerance, Linear)
        .band(0.10, 0.15, 0.30)
        .hard(0.00, 0.50),
    M::direct("kelly_bear_market_reduction", RiskTolerance, Linear)
        .band(0.60, 0.75, 0.90)
        .hard(0.40, 1.00),
    M::direct("kelly_bull_market_boost", Aggression, Linear)
        .band(1.00, 1.10, 1.25)
        .hard(1.00, 1.50),
    M::inverse("kelly_min_expected_return", RiskTolerance, Linear)
        .band(0.03, 0.05, 0.08)
        .hard(0.00, 0.15),
    M::fixed("kelly_volatility_floor", 0.05).hard(0.01, 0.50),
    // Risk management
    M::direct("risk_buy_cooldown_days", Patience, Linear)
        .band(14.0, 30.0, 60.0)
        .hard(7.0, 180.0),
    M::direct("risk_max_single_position_concentration", RiskTolerance, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.05, 0.35),
    M::direct("risk_max_geography_concentration", RiskTolerance, Linear)
        .band(0.30, 0.40, 0.60)
        .hard(0.20, 0.80),
    M::direct("risk_max_drawdown_tolerance", RiskTolerance, Linear)
        .band(0.10, 0.20, 0.35)
        .hard(0.05, 0.50),
    M::direct("risk_stop_loss_threshold", RiskTolerance, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.05, 0.40),
    M::direct("risk_max_portfolio_volatility", RiskTolerance, Linear)
        .band(0.12, 0.18, 0.28)
        .hard(0.05, 0.40),
    M::direct("risk_volatility_spike_threshold", RiskTolerance, Exponential)
        .band(1.50, 2.00, 3.00)
        .hard(1.20, 4.00),
    M::inverse("risk_cash_reserve_pct", RiskTolerance, Linear)
        .band(0.02, 0.05, 0.10)
        .hard(0.00, 0.25),
    // Quality gates
    M::inverse("quality_gate_fundamentals_threshold", RiskTolerance, Linear)
        .band(0.55, 0.60, 0.70)
        .hard(0.40, 0.85),
    M::inverse("quality_gate_long_term_threshold", RiskTolerance, Linear)
        .band(0.45, 0.50, 0.60)
        .hard(0.30, 0.80),
    M::inverse("quality_gate_exceptional_threshold", RiskTolerance, Linear)
        .band(0.70, 0.75, 0.85)
        .hard(0.60, 0.95),
    M::inverse("quality_gate_exceptional_excellence_threshold", RiskTolerance, Linear)
        .band(0.75, 0.80, 0.90)
        .hard(0.65, 0.95),
    M::inverse("quality_gate_absolute_min_cagr", RiskTolerance, Linear)
        .band(0.04, 0.06, 0.08)
        .hard(0.02, 0.12),
    M::inverse("quality_gate_quality_value_fundamentals", RiskTolerance, Linear)
        .band(0.65, 0.70, 0.80)
        .hard(0.50, 0.90),
    M::direct("quality_gate_quality_value_discount", Patience, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.05, 0.40),
    M::inverse("quality_gate_dividend_income_yield", RiskTolerance, Linear)
        .band(0.030, 0.035, 0.050)
        .hard(0.020, 0.080),
    M::inverse("quality_gate_dividend_income_fundamentals", RiskTolerance, Linear)
        .band(0.50, 0.55, 0.65)
        .hard(0.40, 0.80),
    M::inverse("quality_gate_min_sharpe", RiskTolerance, Linear)
        .band(0.30, 0.50, 0.80)
        .hard(0.00, 1.50),
    // Rebalancing
    M::direct("rebalance_min_underweight_threshold", Patience, Linear)
        .band(0.01, 0.02, 0.05)
        .hard(0.005, 0.10),
    M::direct("rebalance_max_per_position_pct", RiskTolerance, Linear)
        .band(0.03, 0.05, 0.10)
        .hard(0.01, 0.20),
    M::direct("rebalance_max_trade_value", Aggression, Exponential)
        .band(500.0, 2000.0, 5000.0)
        .hard(100.0, 20000.0),
    M::direct("rebalance_max_positions", Aggression, Linear)
        .band(2.0, 5.0, 10.0)
        .hard(1.0, 25.0),
    M::direct("rebalance_priority_weight", Aggression, Linear)
        .band(0.80, 1.00, 1.20)
        .hard(0.50, 2.00),
    M::fixed("rebalance_default_quality_score", 0.5).hard(0.0, 1.0),
    // Transaction economics
    M::fixed("transaction_max_cost_ratio", 0.01).hard(0.001, 0.05),
    // Tag thresholds: value
    M::direct("tag_value_opportunity_discount", Patience, Linear)
        .band(0.15, 0.20, 0.30)
        .hard(0.05, 0.50),
    M::direct("tag_deep_value_discount", Patience, Linear)
        .band(0.25, 0.30, 0.40)
        .hard(0.15, 0.60),
    M::inverse("tag_near_high_threshold", Patience, Linear)
        .band(0.03, 0.05, 0.10)
        .hard(0.00, 0.20),
    M::inverse("tag_high_opportunity_score", RiskTolerance, Linear)
        .band(0.65, 0.70, 0.80)
        .hard(0.50, 0.95),
    // Tag thresholds: quality
    M::inverse("tag_high_quality_fundamentals", RiskTolerance, Linear)
        .band(0.70, 0.75, 0.85)
        .hard(0.60, 0.95),
    M::inverse("tag_high_quality_long_term", RiskTolerance, Linear)
        .band(0.65, 0.70, 0.80)
        .hard(0.50, 0.90),
    M::inverse("tag_stable_fundamentals", RiskTolerance, Linear)
        .band(0.60, 0.65, 0.75)
        .hard(0.50, 0.90),
    M::direct("tag_stable_max_volatility", RiskTolerance, Linear)
        .band(0.15, 0.20, 0.25)
        .hard(0.10, 0.35),
    M::inverse("tag_consistent_grower_cagr", RiskTolerance, Linear)
        .band(0.07, 0.09, 0.12)
        .hard(0.04, 0.20),
    // Tag thresholds: risk profile
    M::direct("tag_low_risk_max_volatility", RiskTolerance, Linear)
        .band(0.12, 0.15, 0.20)
        .hard(0.05, 0.30),
    M::direct("tag_low_risk_max_drawdown", RiskTolerance, Linear)
        .band(0.15, 0.20, 0.30)
        .hard(0.05, 0.40),
    M::direct("tag_high_risk_min_volatility", RiskTolerance, Linear)
        .band(0.30, 0.35, 0.45)
        .hard(0.20, 0.60),
    M::direct("tag_high_risk_min_drawdown", RiskTolerance, Linear)
        .band(0.35, 0.40, 0.50)
        .hard(0.25, 0.70),
    M::direct("tag_volatile_min_volatility", RiskTolerance, Sigmoid)
        .band(0.35, 0.40, 0.55)
        .hard(0.25, 0.80),
    // Tag thresholds: technicals
    M::direct("tag_oversold_rsi", Aggression, Linear)
        .band(25.0, 30.0, 35.0)
        .hard(15.0, 45.0),
    M::inverse("tag_overbought_rsi", Aggression, Linear)
        .band(65.0, 70.0, 75.0)
        .hard(55.0, 85.0),
    M::inverse("tag_positive_momentum", Aggression, Linear)
        .band(0.03, 0.05, 0.10)
        .hard(0.00, 0.20),
    M::direct("tag_negative_momentum", Aggression, Linear)
        .band(-0.10, -0.05, -0.02)
        .hard(-0.30, 0.00),
    // Tag thresholds: performance
    M::inverse("tag_excellent_sharpe", RiskTolerance, Linear)
        .band(1.20, 1.50, 2.00)
        .hard(0.80, 3.00),
    M::inverse("tag_good_sharpe", RiskTolerance, Linear)
        .band(0.80, 1.00, 1.30)
        .hard(0.50, 2.00),
    M::inverse("tag_poor_sharpe", RiskTolerance, Linear)
        .band(0.20, 0.30, 0.50)
        .hard(0.00, 1.00),
    M::inverse("tag_strong_performer_cagr", RiskTolerance, Linear)
        .band(0.12, 0.15, 0.20)
        .hard(0.08, 0.30),
    M::inverse("tag_underperforming_cagr", RiskTolerance, Linear)
        .band(0.00, 0.02, 0.04)
        .hard(-0.05, 0.08),
    // Tag thresholds: dividends
    M::inverse("tag_high_dividend_yield", Patience, Linear)
        .band(0.035, 0.040, 0.060)
        .hard(0.020, 0.100),
    M::inverse("tag_dividend_grower_yield", Patience, Linear)
        .band(0.015, 0.020, 0.030)
        .hard(0.005, 0.050),
    // Tag thresholds: traps and bubbles
    M::inverse("tag_value_trap_max_fundamentals", RiskTolerance, Linear)
        .band(0.40, 0.45, 0.55)
        .hard(0.30, 0.70),
    M::inverse("tag_value_trap_max_momentum", RiskTolerance, Linear)
        .band(-0.10, -0.05, 0.00)
        .hard(-0.30, 0.10),
    M::direct("tag_bubble_min_cagr", RiskTolerance, Exponential)
        .band(0.30, 0.40, 0.60)
        .hard(0.20, 1.00),
    M::inverse("tag_bubble_max_sharpe", RiskTolerance, Linear)
        .band(0.30, 0.50, 0.70)
        .hard(0.00, 1.00),
    M::inverse("tag_bubble_max_fundamentals", RiskTolerance, Linear)
        .band(0.45, 0.55, 0.65)
        .hard(0.30, 0.80),
    // Tag thresholds: regime and recovery
    M::inverse("tag_regime_bull_momentum", Aggression, Linear)
        .band(0.05, 0.08, 0.12)
        .hard(0.00, 0.25),
    M::direct("tag_regime_bear_max_volatility", RiskTolerance, Linear)
        .band(0.15, 0.20, 0.25)
        .hard(0.10, 0.35),
    M::direct("tag_regime_sideways_max_momentum", Patience, Linear)
        .band(0.02, 0.03, 0.05)
        .hard(0.00, 0.10),
    M::inverse("tag_recovery_min_momentum", Aggression, Linear)
        .band(0.02, 0.04, 0.06)
        .hard(0.00, 0.15),
    M::direct("tag_recovery_min_drawdown", Patience, Linear)
        .band(0.15, 0.20, 0.30)
        .hard(0.05, 0.50),
    // Priority boosts: quality and value
    M::inverse("priority_boost_high_quality", RiskTolerance, Linear)
        .band(1.10, 1.15, 1.30)
        .hard(1.00, 1.60),
    M::inverse("priority_boost_quality_value", RiskTolerance, Linear)
        .band(1.10, 1.20, 1.35)
        .hard(1.00, 1.60),
    M::direct("priority_boost_deep_value", Patience, Linear)
        .band(1.05, 1.15, 1.30)
        .hard(1.00, 1.60),
    M::direct("priority_boost_value_opportunity", Patience, Linear)
        .band(1.05, 1.10, 1.25)
        .hard(1.00, 1.50),
    M::direct("priority_boost_dividend", Patience, Linear)
        .band(1.00, 1.05, 1.15)
        .hard(1.00, 1.30),
    // Priority boosts: risk profile
    M::inverse("priority_boost_low_risk", RiskTolerance, Linear)
        .band(1.05, 1.10, 1.20)
        .hard(1.00, 1.50),
    M::direct("priority_penalty_high_risk", RiskTolerance, Linear)
        .band(0.60, 0.75, 0.90)
        .hard(0.30, 1.00),
    M::direct("priority_penalty_volatile", RiskTolerance, Linear)
        .band(0.70, 0.80, 0.95)
        .hard(0.40, 1.00),
    // Priority boosts: performance and technicals
    M::direct("priority_boost_strong_performer", Aggression, Linear)
        .band(1.05, 1.10, 1.25)
        .hard(1.00, 1.50),
    M::direct("priority_penalty_underperforming", Patience, Linear)
        .band(0.70, 0.80, 0.95)
        .hard(0.40, 1.00),
    M::direct("priority_boost_oversold", Aggression, Linear)
        .band(1.00, 1.05, 1.15)
        .hard(1.00, 1.30),
    M::direct("priority_penalty_overbought", Aggression, Linear)
        .band(0.80, 0.90, 1.00)
        .hard(0.50, 1.00),
    // Priority boosts: regime alignment
    M::direct("regime_boost_bull_growth", Aggression, Linear)
        .band(1.05, 1.10, 1.25)
        .hard(1.00, 1.50),
    M::inverse("regime_boost_bear_safe", RiskTolerance, Linear)
        .band(1.05, 1.15, 1.30)
        .hard(1.00, 1.60),
    M::direct("regime_boost_sideways_value", Patience, Linear)
        .band(1.00, 1.08, 1.20)
        .hard(1.00, 1.40),
    // Priority boosts: sell side
    M::inverse("priority_sell_boost_high_risk", RiskTolerance, Linear)
        .band(1.05, 1.15, 1.30)
        .hard(1.00, 1.60),
    M::inverse("priority_sell_boost_underperforming", Patience, Linear)
        .band(1.05, 1.15, 1.30)
        .hard(1.00, 1.60),
    M::direct("priority_sell_boost_overbought", Aggression, Linear)
        .band(1.05, 1.10, 1.25)
        .hard(1.00, 1.50),
    M::inverse("priority_sell_penalty_high_quality", Patience, Linear)
        .band(0.70, 0.85, 0.95)
        .hard(0.40, 1.00),
    // Quantum warning penalties
    M::direct("quantum_penalty_opportunity_buys", RiskTolerance, Linear)
        .band(0.50, 0.70, 0.85)
        .hard(0.30, 1.00),
    M::direct("quantum_penalty_averaging_down", RiskTolerance, Linear)
        .band(0.55, 0.75, 0.90)
        .hard(0.30, 1.00),
    M::direct("quantum_penalty_rebalance", RiskTolerance, Linear)
        .band(0.80, 0.90, 0.95)
        .hard(0.50, 1.00),
    M::fixed("quantum_compound_softening", 0.5).hard(0.0, 1.0),
    // Evaluation weights
    M::inverse("evaluation_weight_quality", RiskTolerance, Linear)
        .band(0.25, 0.35, 0.45)
        .hard(0.10, 0.60),
    M::inverse("evaluation_weight_diversification", RiskTolerance, Linear)
        .band(0.15, 0.20, 0.30)
        .hard(0.05, 0.40),
    M::inverse("evaluation_weight_risk", RiskTolerance, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.05, 0.40),
    M::direct("evaluation_weight_momentum", Aggression, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.00, 0.40),
    M::direct("evaluation_weight_value", Patience, Linear)
        .band(0.10, 0.15, 0.25)
        .hard(0.00, 0.40),
    M::inverse("evaluation_weight_transaction_cost", Aggression, Linear)
        .band(0.05, 0.10, 0.15)
        .hard(0.00, 0.30),
    // Security scoring weights
    M::direct("scoring_weight_long_term", Patience, Linear)
        .band(0.20, 0.25, 0.35)
        .hard(0.10, 0.50),
    M::inverse("scoring_weight_fundamentals", RiskTolerance, Linear)
        .band(0.15, 0.20, 0.30)
        .hard(0.05, 0.40),
    M::direct("scoring_weight_dividends", Patience, Linear)
        .band(0.08, 0.12, 0.18)
        .hard(0.00, 0.30),
    M::direct("scoring_weight_opportunity", Aggression, Linear)
        .band(0.08, 0.12, 0.18)
        .hard(0.00, 0.30),
    M::direct("scoring_weight_short_term", Aggression, Linear)
        .band(0.05, 0.08, 0.15)
        .hard(0.00, 0.30),
    M::direct("scoring_weight_technicals", Aggression, Linear)
        .band(0.05, 0.08, 0.12)
        .hard(0.00, 0.25),
    M::fixed("scoring_weight_opinion", 0.05).hard(0.00, 0.20),
    M::inverse("scoring_weight_diversification", RiskTolerance, Linear)
        .band(0.05, 0.10, 0.15)
        .hard(0.00, 0.30),
    // Security scoring references
    M::direct("scoring_cagr_target", RiskTolerance, Linear)
        .band(0.08, 0.11, 0.15)
        .hard(0.05, 0.25),
    M::fixed("scoring_sharpe_target", 1.0).hard(0.5, 3.0),
    M::fixed("scoring_max_drawdown_reference", 0.50).hard(0.10, 1.00),
    M::fixed("scoring_dividend_yield_reference", 0.06).hard(0.01, 0.15),
    M::fixed("scoring_lookback_years", 5.0).hard(1.0, 20.0),
    M::fixed("scoring_min_history_days", 365.0).hard(30.0, 3650.0),
];
