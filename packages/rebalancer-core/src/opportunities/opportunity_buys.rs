//! Buying well-scored securities trading at a discount.

use super::{
    buy_blocked, context_min_trade, lookup_tags, quality_gate_reason, quality_score, size_buy,
    whitelist, CalculationError, CalculatorType, CandidateList, ExclusionCollector,
    OpportunityCalculator, SizedBuy,
};
use crate::context::{PlanningContext, SecurityRepository, TagFilter};
use crate::kelly::kelly_fraction;
use crate::params::CalculatorConfig;
use crate::tags::CandidateTag;
use crate::types::{ActionCandidate, OpportunityCategory, TradeSide};
use std::sync::Arc;

const NAME: &str = "opportunity_buys";

/// Confidence assumed when a security carries no estimate.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Buys discounted securities whose opportunity and quality scores clear the minimums.
///
/// When a security has expected-return and volatility estimates, the trade
/// is further capped by fractional-Kelly sizing.
pub struct OpportunityBuysCalculator {
    tag_filter: Arc<dyn TagFilter>,
    securities: Arc<dyn SecurityRepository>,
}

impl OpportunityBuysCalculator {
    pub fn new(tag_filter: Arc<dyn TagFilter>, securities: Arc<dyn SecurityRepository>) -> Self {
        Self {
            tag_filter,
            securities,
        }
    }
}

impl OpportunityCalculator for OpportunityBuysCalculator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> OpportunityCategory {
        OpportunityCategory::OpportunityBuys
    }

    fn calculate(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
    ) -> Result<CandidateList, CalculationError> {
        let mut exclusions = ExclusionCollector::new(NAME);
        let params = &config.opportunity_buys;

        let isins = match whitelist(self.tag_filter.as_ref(), ctx, self.category()) {
            Ok(isins) => isins,
            Err(e) => return Err(exclusions.fail(e)),
        };
        if isins.is_empty() || !ctx.allow_buy {
            return Ok(exclusions.empty());
        }
        let min_trade = match context_min_trade(ctx, config) {
            Ok(amount) => amount,
            Err(e) => return Err(exclusions.fail(e)),
        };

        let mut buys = Vec::new();

        for isin in &isins {
            let Some(security) = ctx.securities.get(isin) else {
                continue;
            };
            if let Some(reason) = buy_blocked(ctx, isin, security, config) {
                exclusions.exclude_security(isin, security, reason);
                continue;
            }
            let Some(price) = security.valid_price() else {
                continue;
            };

            let opportunity = security
                .opportunity_score
                .or_else(|| security.metrics.as_ref().and_then(|m| m.opportunity_score));
            let Some(opportunity) = opportunity else {
                exclusions.exclude_security(isin, security, "missing opportunity score");
                continue;
            };
            if opportunity < params.min_score {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "opportunity score {:.2} below {:.2}",
                        opportunity, params.min_score
                    ),
                );
                continue;
            }
            let Some(quality) = quality_score(security, &config.scoring) else {
                exclusions.exclude_security(isin, security, "missing quality score");
                continue;
            };
            if quality < params.min_quality_score {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "quality {:.2} below {:.2}",
                        quality, params.min_quality_score
                    ),
                );
                continue;
            }
            let Some(discount) = security.discount_from_high() else {
                exclusions.exclude_security(isin, security, "missing 52-week high data");
                continue;
            };
            if discount < params.min_discount_from_high {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "{:.1}% below high, need {:.1}%",
                        discount * 100.0,
                        params.min_discount_from_high * 100.0
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

            let room = params.max_position_pct * ctx.portfolio_value - ctx.position_value(isin);
            let mut limit = room.min(params.max_value_per_position);
            let mut kelly_sized = false;
            if let (Some(expected), Some(volatility)) =
                (security.expected_return, security.volatility())
            {
                let fraction = kelly_fraction(
                    expected,
                    volatility,
                    security.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                    ctx.regime,
                    &config.kelly,
                );
                if fraction <= 0.0 {
                    exclusions.exclude_security(
                        isin,
                        security,
                        format!(
                            "expected return {:.1}% below Kelly minimum {:.1}%",
                            expected * 100.0,
                            config.kelly.min_expected_return * 100.0
                        ),
                    );
                    continue;
                }
                let kelly_cap = fraction * ctx.portfolio_value;
                if kelly_cap < limit {
                    limit = kelly_cap;
                    kelly_sized = true;
                }
            }

            let quantity = match size_buy(
                params.max_value_per_position,
                limit,
                min_trade,
                price,
                security.min_lot,
            ) {
                Ok(quantity) => quantity,
                Err(reason) => {
                    exclusions.exclude_security(isin, security, reason);
                    continue;
                }
            };

            let raw = opportunity * quality * params.priority_weight;
            let boosted = config.boosts.apply_tag_based_priority_boosts(
                raw,
                &tags,
                CalculatorType::OpportunityBuys,
            );
            let priority = config.boosts.apply_quantum_warning_penalty(
                boosted,
                &tags,
                CalculatorType::OpportunityBuys,
            );

            let mut candidate_tags = vec![CandidateTag::Buy, CandidateTag::Opportunity];
            if kelly_sized {
                candidate_tags.push(CandidateTag::KellySized);
            }
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
                        "Opportunity {:.2}, quality {:.2}, {:.1}% below high",
                        opportunity,
                        quality,
                        discount * 100.0
                    ),
                    tags: candidate_tags,
                },
                geography: security.geography.clone(),
                min_lot: security.min_lot,
            });
        }

        Ok(exclusions.fund_buys(ctx, config, buys, min_trade, params.max_positions))
    }
}
