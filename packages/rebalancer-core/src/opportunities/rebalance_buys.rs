//! Buys that close underweight geography allocations.

use super::{
    buy_blocked, context_min_trade, lookup_tags, quality_gate_reason, quality_score, size_buy,
    whitelist, CalculationError, CalculatorType, CandidateList, ExclusionCollector,
    OpportunityCalculator, SizedBuy,
};
use crate::context::{PlanningContext, SecurityInfo, SecurityRepository, TagFilter};
use crate::params::CalculatorConfig;
use crate::tags::{CandidateTag, TagSet};
use crate::types::{ActionCandidate, OpportunityCategory, TradeSide};
use std::collections::BTreeMap;
use std::sync::Arc;

const NAME: &str = "rebalance_buys";

struct Eligible<'a> {
    isin: &'a str,
    security: &'a SecurityInfo,
    price: f64,
    tags: TagSet,
}

/// Splits each underweight geography's gap among its eligible securities.
pub struct RebalanceBuysCalculator {
    tag_filter: Arc<dyn TagFilter>,
    securities: Arc<dyn SecurityRepository>,
}

impl RebalanceBuysCalculator {
    pub fn new(tag_filter: Arc<dyn TagFilter>, securities: Arc<dyn SecurityRepository>) -> Self {
        Self {
            tag_filter,
            securities,
        }
    }
}

impl OpportunityCalculator for RebalanceBuysCalculator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> OpportunityCategory {
        OpportunityCategory::RebalanceBuys
    }

    fn calculate(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
    ) -> Result<CandidateList, CalculationError> {
        let mut exclusions = ExclusionCollector::new(NAME);
        let params = &config.rebalancing;

        let isins = match whitelist(self.tag_filter.as_ref(), ctx, self.category()) {
            Ok(isins) => isins,
            Err(e) => return Err(exclusions.fail(e)),
        };
        if isins.is_empty() {
            tracing::debug!("{}: no whitelisted securities", NAME);
            return Ok(exclusions.empty());
        }
        if !ctx.allow_buy {
            tracing::debug!("{}: buying disabled", NAME);
            return Ok(exclusions.empty());
        }
        let min_trade = match context_min_trade(ctx, config) {
            Ok(amount) => amount,
            Err(e) => return Err(exclusions.fail(e)),
        };

        let mut by_geography: BTreeMap<&str, Vec<Eligible>> = BTreeMap::new();
        for isin in &isins {
            let Some(security) = ctx.securities.get(isin) else {
                continue;
            };
            if let Some(reason) = buy_blocked(ctx, isin, security, config) {
                exclusions.exclude_security(isin, security, reason);
                continue;
            }
            let Some(geography) = security.geography.as_deref() else {
                exclusions.exclude_security(isin, security, "missing geography");
                continue;
            };
            let Some(gap) = ctx.geography_gap(geography) else {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!("no target allocation for {}", geography),
                );
                continue;
            };
            if gap < params.min_underweight_threshold {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "{} not underweight ({:.1}% gap, need {:.1}%)",
                        geography,
                        gap * 100.0,
                        params.min_underweight_threshold * 100.0
                    ),
                );
                continue;
            }

            let tags = match lookup_tags(self.securities.as_ref(), &security.symbol) {
                Ok(tags) => tags,
                Err(e) => return Err(exclusions.fail(e)),
            };
            if let Some(reason) = quality_gate_reason(&tags) {
                exclusions.exclude_security(isin, security, reason);
                continue;
            }

            let Some(price) = security.valid_price() else {
                continue;
            };
            by_geography.entry(geography).or_default().push(Eligible {
                isin,
                security,
                price,
                tags,
            });
        }

        let cap = (params.max_per_position_pct * ctx.portfolio_value).min(params.max_trade_value);
        let mut buys = Vec::new();

        for (geography, eligible) in by_geography {
            let gap = ctx.geography_gap(geography).unwrap_or(0.0);
            let share = gap * ctx.portfolio_value / eligible.len() as f64;

            for Eligible {
                isin,
                security,
                price,
                tags,
            } in eligible
            {
                let quantity = match size_buy(share, cap, min_trade, price, security.min_lot) {
                    Ok(quantity) => quantity,
                    Err(reason) => {
                        exclusions.exclude_security(isin, security, reason);
                        continue;
                    }
                };

                let quality = quality_score(security, &config.scoring)
                    .unwrap_or(params.default_quality_score);
                let raw = gap * quality * params.priority_weight;
                let boosted = config.boosts.apply_tag_based_priority_boosts(
                    raw,
                    &tags,
                    CalculatorType::RebalanceBuys,
                );
                let priority = config.boosts.apply_quantum_warning_penalty(
                    boosted,
                    &tags,
                    CalculatorType::RebalanceBuys,
                );

                let gross = quantity as f64 * price;
                buys.push(SizedBuy {
                    candidate: ActionCandidate {
                        side: TradeSide::Buy,
                        isin: isin.to_string(),
                        symbol: security.symbol.clone(),
                        name: security.name.clone(),
                        quantity,
                        price,
                        value: gross + ctx.transaction_costs.cost(gross),
                        currency: security.currency.clone(),
                        priority,
                        reason: format!(
                            "{} underweight by {:.1}% (target {:.1}%)",
                            geography,
                            gap * 100.0,
                            ctx.geography_targets.get(geography).copied().unwrap_or(0.0) * 100.0
                        ),
                        tags: vec![
                            CandidateTag::Rebalance,
                            CandidateTag::Buy,
                            CandidateTag::Underweight,
                        ],
                    },
                    geography: Some(geography.to_string()),
                    min_lot: security.min_lot,
                });
            }
        }

        Ok(exclusions.fund_buys(ctx, config, buys, min_trade, params.max_positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opportunities::test_support::*;
    use crate::tags::{SecurityTag, StaticSecurityRepository};

    fn context() -> PlanningContext {
        PlanningContext::new(10_000.0)
            .with_geography("EU", 0.20, 0.10)
            .with_security(
                "X",
                SecurityInfo::new("XSYM", "X Corp")
                    .with_geography("EU")
                    .with_price(100.0),
            )
    }

    fn calculator(repo: Arc<dyn SecurityRepository>) -> RebalanceBuysCalculator {
        RebalanceBuysCalculator::new(allow_all(), repo)
    }

    #[test]
    fn test_single_underweight_buy() {
        let config = CalculatorConfig::neutral().unwrap();
        let list = calculator(no_tags()).calculate(&context(), &config).unwrap();

        assert_eq!(list.len(), 1);
        let buy = &list.candidates[0];
        assert_eq!(buy.isin, "X");
        assert_eq!(buy.side, TradeSide::Buy);
        assert_eq!(buy.quantity, 5);
        assert_eq!(buy.price, 100.0);
        assert!((buy.value - 503.0).abs() < 1e-9);
        assert_eq!(
            buy.tags,
            vec![CandidateTag::Rebalance, CandidateTag::Buy, CandidateTag::Underweight]
        );
        assert!((buy.priority - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_value_trap_excluded() {
        let config = CalculatorConfig::neutral().unwrap();
        let repo =
            repo(StaticSecurityRepository::new().with_tags("XSYM", [SecurityTag::ValueTrap]));
        let list = calculator(repo).calculate(&context(), &config).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.exclusions.len(), 1);
        assert!(list.exclusions[0].reason.contains("value trap"));
    }

    #[test]
    fn test_empty_whitelist_is_not_an_error() {
        let config = CalculatorConfig::neutral().unwrap();
        let calc = RebalanceBuysCalculator::new(Arc::new(EmptyFilter), no_tags());
        let list = calc.calculate(&context(), &config).unwrap();
        assert!(list.is_empty());
        assert!(list.exclusions.is_empty());
    }

    #[test]
    fn test_buying_disabled() {
        let config = CalculatorConfig::neutral().unwrap();
        let mut ctx = context();
        ctx.allow_buy = false;
        assert!(calculator(no_tags()).calculate(&ctx, &config).unwrap().is_empty());
    }

    #[test]
    fn test_tag_filter_failure_propagates() {
        let config = CalculatorConfig::neutral().unwrap();
        let calc = RebalanceBuysCalculator::new(Arc::new(FailingFilter), no_tags());
        let err = calc.calculate(&context(), &config).unwrap_err();
        assert_eq!(err.calculator, NAME);
    }

    #[test]
    fn test_repository_failure_keeps_prior_exclusions() {
        let config = CalculatorConfig::neutral().unwrap();
        let ctx = context().with_security(
            "A",
            SecurityInfo::new("ASYM", "No Price").with_geography("EU"),
        );
        let calc = RebalanceBuysCalculator::new(allow_all(), Arc::new(FailingRepository("XSYM")));
        let err = calc.calculate(&ctx, &config).unwrap_err();
        assert_eq!(err.exclusions.len(), 1);
        assert_eq!(err.exclusions[0].isin, "A");
    }

    #[test]
    fn test_structural_exclusions() {
        let config = CalculatorConfig::neutral().unwrap();
        let mut ctx = context()
            .with_security("B", SecurityInfo::new("BSYM", "No Geo").with_price(10.0))
            .with_security(
                "C",
                SecurityInfo::new("CSYM", "Unknown Geo")
                    .with_geography("APAC")
                    .with_price(10.0),
            );
        ctx.recently_bought.insert("X".to_string());

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert!(list.is_empty());
        let reasons: Vec<_> = list.exclusions.iter().map(|e| e.reason.as_str()).collect();
        assert!(reasons.contains(&"missing geography"));
        assert!(reasons.contains(&"no target allocation for APAC"));
        assert!(reasons.contains(&"recently bought"));
    }

    #[test]
    fn test_lot_rounding_excludes_rather_than_inflates() {
        let config = CalculatorConfig::neutral().unwrap();
        let mut ctx = context();
        if let Some(security) = ctx.securities.get_mut("X") {
            security.min_lot = 6;
        }
        // One lot of 6 at 100 costs 600, above the 500 cap
        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.exclusions.len(), 1);
    }

    #[test]
    fn test_geography_guardrail_on_sized_trade() {
        let config = CalculatorConfig::neutral().unwrap();
        // 38% held, 45% target: the 500 buy would push EU past the 40% limit
        let ctx = PlanningContext::new(10_000.0)
            .with_geography("EU", 0.45, 0.38)
            .with_security(
                "X",
                SecurityInfo::new("XSYM", "X Corp")
                    .with_geography("EU")
                    .with_price(100.0),
            );
        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert!(list.is_empty());
        assert!(list.exclusions[0].reason.contains("limit"));
    }

    #[test]
    fn test_gap_split_and_isin_tie_break() {
        let config = CalculatorConfig::neutral().unwrap();
        let ctx = context().with_security(
            "W",
            SecurityInfo::new("WSYM", "W Corp")
                .with_geography("EU")
                .with_price(50.0),
        );
        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert_eq!(list.len(), 2);
        // Equal priority, ISIN ascending
        assert_eq!(list.candidates[0].isin, "W");
        assert_eq!(list.candidates[1].isin, "X");
        // 1000 gap split in two, 500 each
        assert_eq!(list.candidates[0].quantity, 10);
        assert_eq!(list.candidates[1].quantity, 5);
    }

    fn eu_security(symbol: &str, quality: Option<f64>) -> SecurityInfo {
        let mut security = SecurityInfo::new(symbol, symbol)
            .with_geography("EU")
            .with_price(100.0);
        security.quality_score = quality;
        security
    }

    #[test]
    fn test_cash_reserve_shrinks_buy() {
        let config = CalculatorConfig::neutral().unwrap();
        let reserve = config.risk.cash_reserve_pct * 10_000.0;
        let mut ctx = context();
        ctx.available_cash = Some(reserve + 300.0);

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert_eq!(list.len(), 1);
        // Only 300 is spendable above the reserve
        assert_eq!(list.candidates[0].quantity, 3);
        assert!((list.candidates[0].value - 302.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_cash_above_reserve() {
        let config = CalculatorConfig::neutral().unwrap();
        let mut ctx = context();
        ctx.available_cash = Some(config.risk.cash_reserve_pct * 10_000.0);

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert!(list.is_empty());
        assert!(list.exclusions[0].reason.starts_with("insufficient cash"));
    }

    #[test]
    fn test_shared_cash_goes_to_highest_priority() {
        let config = CalculatorConfig::neutral().unwrap();
        let mut ctx = PlanningContext::new(10_000.0)
            .with_geography("EU", 0.20, 0.10)
            .with_security("A", eu_security("ASYM", Some(0.1)))
            .with_security("C", eu_security("CSYM", Some(0.9)));
        // Room for one 500 buy; A sorts first by ISIN but ranks lower
        ctx.available_cash = Some(config.risk.cash_reserve_pct * 10_000.0 + 550.0);

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.candidates[0].isin, "C");
        assert_eq!(list.candidates[0].quantity, 5);
        assert_eq!(list.exclusions.len(), 1);
        assert_eq!(list.exclusions[0].isin, "A");
        assert!(list.exclusions[0].reason.contains("below minimum trade"));
    }

    #[test]
    fn test_geography_limit_counts_earlier_buys() {
        let config = CalculatorConfig::neutral().unwrap();
        let limit = config.risk.max_geography_concentration;
        let current = limit - 0.06;
        // Each 500 buy adds 5%: the first fits under the limit, the second does not
        let ctx = PlanningContext::new(10_000.0)
            .with_geography("EU", current + 0.11, current)
            .with_security("A", eu_security("ASYM", None))
            .with_security("B", eu_security("BSYM", None));

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.candidates[0].isin, "A");
        assert_eq!(list.candidates[0].quantity, 5);
        assert_eq!(list.exclusions.len(), 1);
        assert_eq!(list.exclusions[0].isin, "B");
        assert!(list.exclusions[0].reason.contains("limit"));
    }

    #[test]
    fn test_position_limit_stops_funding() {
        let mut config = CalculatorConfig::neutral().unwrap();
        config.rebalancing.max_positions = 1;
        let ctx = PlanningContext::new(10_000.0)
            .with_geography("EU", 0.20, 0.10)
            .with_security("A", eu_security("ASYM", Some(0.1)))
            .with_security("C", eu_security("CSYM", Some(0.9)));

        let list = calculator(no_tags()).calculate(&ctx, &config).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.candidates[0].isin, "C");
        assert!(list.exclusions.is_empty());
    }
}
