//! Trimming positions with large unrealized gains.

use super::{
    context_min_trade, lookup_tags, whitelist, CalculationError, CalculatorType, CandidateList,
    ExclusionCollector, OpportunityCalculator,
};
use crate::context::{PlanningContext, SecurityRepository, TagFilter};
use crate::params::CalculatorConfig;
use crate::tags::CandidateTag;
use crate::types::{ActionCandidate, OpportunityCategory, TradeSide};
use std::sync::Arc;

const NAME: &str = "profit_taking";

/// Sells part of a position once its gain clears the threshold, more on a windfall.
///
/// Hold period and sell cooldown come straight from settings and are never
/// relaxed by the sliders.
pub struct ProfitTakingCalculator {
    tag_filter: Arc<dyn TagFilter>,
    securities: Arc<dyn SecurityRepository>,
}

impl ProfitTakingCalculator {
    pub fn new(tag_filter: Arc<dyn TagFilter>, securities: Arc<dyn SecurityRepository>) -> Self {
        Self {
            tag_filter,
            securities,
        }
    }
}

impl OpportunityCalculator for ProfitTakingCalculator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> OpportunityCategory {
        OpportunityCategory::ProfitTaking
    }

    fn calculate(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
    ) -> Result<CandidateList, CalculationError> {
        let mut exclusions = ExclusionCollector::new(NAME);
        let params = &config.profit_taking;
        let risk = &config.risk;

        let isins = match whitelist(self.tag_filter.as_ref(), ctx, self.category()) {
            Ok(isins) => isins,
            Err(e) => return Err(exclusions.fail(e)),
        };
        if isins.is_empty() {
            tracing::debug!("{}: no whitelisted securities", NAME);
            return Ok(exclusions.empty());
        }
        if !ctx.allow_sell {
            tracing::debug!("{}: selling disabled", NAME);
            return Ok(exclusions.empty());
        }
        let min_trade = match context_min_trade(ctx, config) {
            Ok(amount) => amount,
            Err(e) => return Err(exclusions.fail(e)),
        };

        let mut candidates = Vec::new();
        for isin in &isins {
            let Some(security) = ctx.securities.get(isin) else {
                continue;
            };
            let Some(position) = ctx.positions.get(isin).filter(|p| p.quantity > 0.0) else {
                exclusions.exclude_security(isin, security, "no position held");
                continue;
            };
            if !security.allow_sell {
                exclusions.exclude_security(isin, security, "selling disabled for security");
                continue;
            }
            let Some(price) = security.valid_price() else {
                exclusions.exclude_security(isin, security, "missing or invalid price");
                continue;
            };
            if security.min_lot == 0 {
                exclusions.exclude_security(isin, security, "invalid minimum lot size");
                continue;
            }
            if ctx.recently_sold.contains(isin) {
                exclusions.exclude_security(isin, security, "recently sold");
                continue;
            }
            if let Some(sold) = position.last_sold_at {
                let days = ctx.days_since(sold);
                if days < i64::from(risk.sell_cooldown_days) {
                    exclusions.exclude_security(
                        isin,
                        security,
                        format!(
                            "sold {} days ago (cooldown {} days)",
                            days, risk.sell_cooldown_days
                        ),
                    );
                    continue;
                }
            }
            let Some(bought) = position.first_bought_at else {
                exclusions.exclude_security(isin, security, "unknown holding period");
                continue;
            };
            let held_days = ctx.days_since(bought);
            if held_days < i64::from(risk.min_hold_days) {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "held {} days (minimum {} days)",
                        held_days, risk.min_hold_days
                    ),
                );
                continue;
            }

            let Some(gain) = position.gain_at(price) else {
                exclusions.exclude_security(isin, security, "missing cost basis");
                continue;
            };
            if gain < params.min_gain_threshold {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "gain {:.1}% below {:.1}% threshold",
                        gain * 100.0,
                        params.min_gain_threshold * 100.0
                    ),
                );
                continue;
            }
            let windfall = gain >= params.windfall_threshold;

            // Quality-gate tags do not block sells; they only shape priority
            let tags = match lookup_tags(self.securities.as_ref(), &security.symbol) {
                Ok(tags) => tags,
                Err(e) => return Err(exclusions.fail(e)),
            };

            let fraction = if windfall {
                params.windfall_sell_percentage
            } else {
                params.sell_percentage
            };
            let lot = u64::from(security.min_lot);
            let held_lots = (position.quantity / lot as f64).floor() as u64;
            let lots = ((position.quantity * fraction / lot as f64).floor() as u64).min(held_lots);
            let quantity = lots * lot;
            if quantity == 0 {
                exclusions.exclude_security(isin, security, "sale rounds to zero lots");
                continue;
            }
            let gross = quantity as f64 * price;
            if gross < min_trade {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!("sale {:.2} below minimum trade {:.2}", gross, min_trade),
                );
                continue;
            }

            let mut raw = gain * params.priority_weight;
            if windfall {
                raw *= params.windfall_priority_multiplier;
            }
            let boosted = config.boosts.apply_tag_based_priority_boosts(
                raw,
                &tags,
                CalculatorType::ProfitTaking,
            );
            let priority = config.boosts.apply_quantum_warning_penalty(
                boosted,
                &tags,
                CalculatorType::ProfitTaking,
            );

            let mut candidate_tags = vec![CandidateTag::Sell, CandidateTag::ProfitTaking];
            if windfall {
                candidate_tags.push(CandidateTag::Windfall);
            }
            candidates.push(ActionCandidate {
                side: TradeSide::Sell,
                isin: isin.to_string(),
                symbol: security.symbol.clone(),
                name: security.name.clone(),
                quantity,
                price,
                value: gross - ctx.transaction_costs.cost(gross),
                currency: security.currency.clone(),
                priority,
                reason: format!(
                    "{} gain of {:.1}%, selling {:.0}%",
                    if windfall { "Windfall" } else { "Unrealized" },
                    gain * 100.0,
                    fraction * 100.0
                ),
                tags: candidate_tags,
            });
        }

        Ok(exclusions.finish(candidates, params.max_positions))
    }
}
