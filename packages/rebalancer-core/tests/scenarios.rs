//! End-to-end planning scenarios and slider-grid properties.

use approx::assert_abs_diff_eq;
use rebalancer_core::opportunities::CalculatorType;
use rebalancer_core::params::{EvaluationWeights, ParamResolver, ScoringWeights};
use rebalancer_core::{
    all_mappings, default_calculators, min_trade_amount, plan, AllowAllTagFilter, CalculatorConfig,
    CandidateTag, Error, HoldSettings, OpportunityCalculator, OpportunityCategory,
    PlanningContext, RebalanceBuysCalculator, SecurityInfo, SecurityRepository, SecurityTag,
    SliderState, StaticSecurityRepository, TagSet, Temperament, TradeSide,
};
use std::sync::Arc;

const GRID: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

fn slider_grid() -> impl Iterator<Item = SliderState> {
    GRID.into_iter().flat_map(|r| {
        GRID.into_iter()
            .flat_map(move |a| GRID.into_iter().map(move |p| SliderState::new(r, a, p)))
    })
}

fn underweight_eu(tags: &[&str]) -> PlanningContext {
    let mut security = SecurityInfo::new("XSYM", "X Corp")
        .with_geography("EU")
        .with_price(100.0);
    security.tags = tags.iter().map(|t| t.to_string()).collect();
    PlanningContext::new(10_000.0)
        .with_geography("EU", 0.20, 0.10)
        .with_security("X", security)
}

fn repository_for(ctx: &PlanningContext, config: &CalculatorConfig) -> Arc<dyn SecurityRepository> {
    Arc::new(StaticSecurityRepository::from_context(
        ctx,
        &config.tag_thresholds,
        &config.quality_gates,
    ))
}

#[test]
fn test_every_mapping_within_absolute_bounds() {
    for sliders in slider_grid() {
        for mapping in all_mappings() {
            let value = sliders.adjusted_value(mapping);
            assert!(
                value >= mapping.absolute_min && value <= mapping.absolute_max,
                "{} = {} outside [{}, {}] at {:?}",
                mapping.parameter,
                value,
                mapping.absolute_min,
                mapping.absolute_max,
                sliders
            );
        }
    }
}

#[test]
fn test_fixed_mappings_ignore_every_slider() {
    for sliders in slider_grid() {
        for mapping in all_mappings().iter().filter(|m| m.is_fixed()) {
            assert_eq!(sliders.adjusted_value(mapping), mapping.base);
        }
    }
}

#[test]
fn test_monotonic_in_controlling_slider() {
    let steps: Vec<f64> = (0..=20).map(|i| f64::from(i) / 20.0).collect();
    for mapping in all_mappings().iter().filter(|m| !m.is_fixed()) {
        let values: Vec<f64> = steps
            .iter()
            .map(|&x| {
                let mut sliders = SliderState::default();
                match mapping.temperament {
                    Temperament::RiskTolerance => sliders.risk_tolerance = x,
                    Temperament::Aggression => sliders.aggression = x,
                    Temperament::Patience => sliders.patience = x,
                    Temperament::Fixed => {}
                }
                sliders.adjusted_value(mapping)
            })
            .collect();
        for pair in values.windows(2) {
            if mapping.inverse {
                assert!(pair[1] <= pair[0] + 1e-12, "{} not decreasing", mapping.parameter);
            } else {
                assert!(pair[1] >= pair[0] - 1e-12, "{} not increasing", mapping.parameter);
            }
        }
    }
}

#[test]
fn test_weights_normalize_across_grid() {
    for sliders in slider_grid() {
        let resolver = ParamResolver::new(sliders);
        let evaluation = EvaluationWeights::from_resolver(&resolver).unwrap();
        let scoring = ScoringWeights::from_resolver(&resolver).unwrap();
        assert_abs_diff_eq!(evaluation.sum(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(scoring.sum(), 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_full_config_across_grid() {
    for sliders in slider_grid() {
        let config = CalculatorConfig::new(sliders, HoldSettings::default()).unwrap();
        assert!(config.kelly.min_position_size <= config.kelly.max_position_size);
        assert!(config.transaction.max_cost_ratio > 0.0);
    }
}

#[test]
fn test_min_trade_amount_worked_example() {
    assert_abs_diff_eq!(min_trade_amount(2.0, 0.002, 0.01).unwrap(), 250.0, epsilon = 1e-9);
    assert!(matches!(
        min_trade_amount(2.0, 0.01, 0.01),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_underweight_geography_buy() {
    let ctx = underweight_eu(&[]);
    let config = CalculatorConfig::neutral().unwrap();
    let calculator = RebalanceBuysCalculator::new(
        Arc::new(AllowAllTagFilter),
        repository_for(&ctx, &config),
    );

    let list = calculator.calculate(&ctx, &config).unwrap();
    assert_eq!(list.candidates.len(), 1);
    let buy = &list.candidates[0];
    assert_eq!(buy.side, TradeSide::Buy);
    assert_eq!(buy.isin, "X");
    assert_eq!(buy.quantity, 5);
    assert_eq!(
        buy.tags,
        vec![CandidateTag::Rebalance, CandidateTag::Buy, CandidateTag::Underweight]
    );

    let json = serde_json::to_value(buy).unwrap();
    assert_eq!(json["side"], "BUY");
    assert_eq!(json["tags"], serde_json::json!(["rebalance", "buy", "underweight"]));
}

#[test]
fn test_value_trap_is_excluded() {
    let ctx = underweight_eu(&["value-trap"]);
    let config = CalculatorConfig::neutral().unwrap();
    let calculator = RebalanceBuysCalculator::new(
        Arc::new(AllowAllTagFilter),
        repository_for(&ctx, &config),
    );

    let list = calculator.calculate(&ctx, &config).unwrap();
    assert!(list.candidates.is_empty());
    assert_eq!(list.exclusions.len(), 1);
    assert_eq!(list.exclusions[0].isin, "X");
    assert!(list.exclusions[0].reason.contains("value trap"));
}

#[test]
fn test_quantum_penalty_asymmetry() {
    let boosts = CalculatorConfig::neutral().unwrap().boosts;
    for warning in [SecurityTag::QuantumBubbleWarning, SecurityTag::QuantumValueWarning] {
        let tags: TagSet = [warning].into_iter().collect();
        assert_eq!(
            boosts.apply_quantum_warning_penalty(1.0, &tags, CalculatorType::ProfitTaking),
            1.0
        );
        assert!(
            boosts.apply_quantum_warning_penalty(1.0, &tags, CalculatorType::OpportunityBuys) < 1.0
        );
    }
}

#[test]
fn test_plan_from_json_context() {
    let json = r#"{
        "portfolio_value": 10000.0,
        "geography_targets": { "EU": 0.20 },
        "geography_allocations": { "EU": 0.10 },
        "securities": {
            "X": { "symbol": "XSYM", "name": "X Corp", "geography": "EU", "price": 100.0 },
            "T": { "symbol": "TSYM", "name": "Trap Inc", "geography": "EU", "price": 50.0,
                   "tags": ["value-trap"] }
        }
    }"#;
    let ctx = PlanningContext::from_json(json).unwrap();
    let config = CalculatorConfig::neutral().unwrap();
    let securities = repository_for(&ctx, &config);
    let calculators = default_calculators(Arc::new(AllowAllTagFilter), securities);

    let outcome = plan(&ctx, &config, &calculators).unwrap();
    let rebalance = outcome
        .for_category(OpportunityCategory::RebalanceBuys)
        .unwrap();
    assert_eq!(rebalance.candidates.len(), 1);
    assert_eq!(rebalance.candidates[0].isin, "X");
    assert!(rebalance
        .exclusions
        .iter()
        .any(|e| e.isin == "T" && e.reason.contains("value trap")));
    assert!(outcome
        .for_category(OpportunityCategory::ProfitTaking)
        .unwrap()
        .candidates
        .is_empty());
}

#[test]
fn test_bold_sliders_size_larger() {
    let cautious = CalculatorConfig::new(SliderState::new(0.0, 0.0, 1.0), HoldSettings::default())
        .unwrap();
    let bold = CalculatorConfig::new(SliderState::new(1.0, 1.0, 0.0), HoldSettings::default())
        .unwrap();
    assert!(bold.kelly.fraction > cautious.kelly.fraction);
    // Hold periods are settings, not sliders
    assert_eq!(bold.risk.min_hold_days, cautious.risk.min_hold_days);
}
