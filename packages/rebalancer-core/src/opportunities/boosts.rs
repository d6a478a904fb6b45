//! Tag-driven priority adjustments.

use crate::params::PriorityBoostParams;
use crate::tags::{SecurityTag, TagSet};
use crate::types::OpportunityCategory;
use serde::{Deserialize, Serialize};

/// Which calculator a priority belongs to. Decides how tags move it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorType {
    RebalanceBuys,
    /// No built-in calculator; for callers plugging in their own rebalance sells.
    RebalanceSells,
    OpportunityBuys,
    AveragingDown,
    ProfitTaking,
}

impl CalculatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorType::RebalanceBuys => "rebalance_buys",
            CalculatorType::RebalanceSells => "rebalance_sells",
            CalculatorType::OpportunityBuys => "opportunity_buys",
            CalculatorType::AveragingDown => "averaging_down",
            CalculatorType::ProfitTaking => "profit_taking",
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(
            self,
            CalculatorType::RebalanceSells | CalculatorType::ProfitTaking
        )
    }
}

impl From<OpportunityCategory> for CalculatorType {
    fn from(category: OpportunityCategory) -> Self {
        match category {
            OpportunityCategory::RebalanceBuys => CalculatorType::RebalanceBuys,
            OpportunityCategory::ProfitTaking => CalculatorType::ProfitTaking,
            OpportunityCategory::AveragingDown => CalculatorType::AveragingDown,
            OpportunityCategory::OpportunityBuys => CalculatorType::OpportunityBuys,
        }
    }
}

impl PriorityBoostParams {
    /// Penalize priorities of securities carrying a quantum bubble or
    /// value-trap warning.
    ///
    /// Profit-taking is exempt: a bubble warning should speed up a sale. Buy
    /// calculators take their strong penalty, rebalancing the mild one. Both
    /// warnings together apply the factor a second time, softened toward 1.0.
    pub fn apply_quantum_warning_penalty(
        &self,
        priority: f64,
        tags: &TagSet,
        calculator: CalculatorType,
    ) -> f64 {
        let bubble = tags.contains(&SecurityTag::QuantumBubbleWarning);
        let value_trap = tags.contains(&SecurityTag::QuantumValueWarning);
        if !bubble && !value_trap {
            return priority;
        }

        let factor = match calculator {
            CalculatorType::ProfitTaking => return priority,
            CalculatorType::OpportunityBuys => self.quantum_penalty_opportunity_buys,
            CalculatorType::AveragingDown => self.quantum_penalty_averaging_down,
            CalculatorType::RebalanceBuys | CalculatorType::RebalanceSells => {
                self.quantum_penalty_rebalance
            }
        };

        let mut adjusted = priority * factor;
        if bubble && value_trap {
            adjusted *= 1.0 - (1.0 - factor) * self.quantum_compound_softening;
        }
        adjusted
    }

    /// Compound the boost or penalty of every recognized tag.
    ///
    /// Buy calculators reward quality, value, low risk, strength and regime
    /// fit. Sell calculators use the sell factors: high risk, weak
    /// performance and overbought readings speed a sale, quality slows it.
    pub fn apply_tag_based_priority_boosts(
        &self,
        priority: f64,
        tags: &TagSet,
        calculator: CalculatorType,
    ) -> f64 {
        let sell = [
            (SecurityTag::HighRisk, self.sell_high_risk),
            (SecurityTag::Underperforming, self.sell_underperforming),
            (SecurityTag::Overbought, self.sell_overbought),
            (SecurityTag::HighQuality, self.sell_high_quality_penalty),
        ];
        let buy = [
            (SecurityTag::HighQuality, self.high_quality),
            (SecurityTag::QualityValue, self.quality_value),
            (SecurityTag::DeepValue, self.deep_value),
            (SecurityTag::ValueOpportunity, self.value_opportunity),
            (SecurityTag::HighDividend, self.dividend),
            (SecurityTag::LowRisk, self.low_risk),
            (SecurityTag::HighRisk, self.high_risk_penalty),
            (SecurityTag::Volatile, self.volatile_penalty),
            (SecurityTag::StrongPerformer, self.strong_performer),
            (SecurityTag::Underperforming, self.underperforming_penalty),
            (SecurityTag::Oversold, self.oversold),
            (SecurityTag::Overbought, self.overbought_penalty),
            (SecurityTag::RegimeBullGrowth, self.regime_bull_growth),
            (SecurityTag::RegimeBearSafe, self.regime_bear_safe),
            (SecurityTag::RegimeSidewaysValue, self.regime_sideways_value),
        ];
        let factors: &[(SecurityTag, f64)] = if calculator.is_sell() { &sell } else { &buy };

        factors
            .iter()
            .filter(|(tag, _)| tags.contains(tag))
            .fold(priority, |p, (_, factor)| p * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CalculatorConfig;
    use approx::assert_abs_diff_eq;

    fn boosts() -> PriorityBoostParams {
        CalculatorConfig::neutral().unwrap().boosts
    }

    fn tags(list: &[SecurityTag]) -> TagSet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_profit_taking_exempt_from_quantum_penalty() {
        let b = boosts();
        let warned = tags(&[SecurityTag::QuantumBubbleWarning]);
        assert_eq!(
            b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::ProfitTaking),
            1.0
        );
        assert!(b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::OpportunityBuys) < 1.0);
    }

    #[test]
    fn test_buy_side_penalized_more_than_rebalance() {
        let b = boosts();
        let warned = tags(&[SecurityTag::QuantumValueWarning]);
        let buy = b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::OpportunityBuys);
        let averaging = b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::AveragingDown);
        let rebalance = b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::RebalanceBuys);
        assert!(buy < rebalance);
        assert!(averaging < rebalance);
        assert!(rebalance < 1.0);
    }

    #[test]
    fn test_double_warning_compounds_softly() {
        let b = boosts();
        let single = tags(&[SecurityTag::QuantumBubbleWarning]);
        let both = tags(&[
            SecurityTag::QuantumBubbleWarning,
            SecurityTag::QuantumValueWarning,
        ]);
        let one = b.apply_quantum_warning_penalty(1.0, &single, CalculatorType::OpportunityBuys);
        let two = b.apply_quantum_warning_penalty(1.0, &both, CalculatorType::OpportunityBuys);
        assert!(two < one);
        // Softened: gentler than applying the full factor twice
        assert!(two > one * one);
    }

    #[test]
    fn test_no_warning_no_penalty() {
        let b = boosts();
        let clean = tags(&[SecurityTag::HighQuality]);
        assert_eq!(
            b.apply_quantum_warning_penalty(0.7, &clean, CalculatorType::OpportunityBuys),
            0.7
        );
    }

    #[test]
    fn test_boosts_compound() {
        let b = boosts();
        let t = tags(&[SecurityTag::HighQuality, SecurityTag::LowRisk]);
        let boosted = b.apply_tag_based_priority_boosts(1.0, &t, CalculatorType::RebalanceBuys);
        assert_abs_diff_eq!(boosted, b.high_quality * b.low_risk, epsilon = 1e-12);
        assert!(boosted > 1.0);
    }

    #[test]
    fn test_sell_side_factors() {
        let b = boosts();
        let risky = tags(&[SecurityTag::HighRisk]);
        assert!(b.apply_tag_based_priority_boosts(1.0, &risky, CalculatorType::ProfitTaking) > 1.0);
        assert!(b.apply_tag_based_priority_boosts(1.0, &risky, CalculatorType::RebalanceBuys) < 1.0);

        let quality = tags(&[SecurityTag::HighQuality]);
        assert!(b.apply_tag_based_priority_boosts(1.0, &quality, CalculatorType::ProfitTaking) < 1.0);
    }

    #[test]
    fn test_rebalance_sells_use_sell_factors_and_mild_penalty() {
        let b = boosts();
        let risky = tags(&[SecurityTag::HighRisk]);
        assert!(b.apply_tag_based_priority_boosts(1.0, &risky, CalculatorType::RebalanceSells) > 1.0);

        let warned = tags(&[SecurityTag::QuantumBubbleWarning]);
        assert_abs_diff_eq!(
            b.apply_quantum_warning_penalty(1.0, &warned, CalculatorType::RebalanceSells),
            b.quantum_penalty_rebalance,
            epsilon = 1e-12
        );
        assert!(CalculatorType::RebalanceSells.is_sell());
        assert_eq!(CalculatorType::RebalanceSells.as_str(), "rebalance_sells");
    }

    #[test]
    fn test_category_conversion() {
        assert_eq!(
            CalculatorType::from(OpportunityCategory::ProfitTaking),
            CalculatorType::ProfitTaking
        );
        assert!(CalculatorType::ProfitTaking.is_sell());
        assert!(!CalculatorType::OpportunityBuys.is_sell());
    }
}
