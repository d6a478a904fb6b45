//! Adding to quality positions trading below cost.

use super::{
    buy_blocked, context_min_trade, lookup_tags, quality_gate_reason, quality_score, size_buy,
    whitelist, CalculationError, CalculatorType, CandidateList, ExclusionCollector,
    OpportunityCalculator, SizedBuy,
};
use crate::context::{PlanningContext, SecurityRepository, TagFilter};
use crate::params::CalculatorConfig;
use crate::tags::CandidateTag;
use crate::types::{ActionCandidate, OpportunityCategory, TradeSide};
use std::sync::Arc;

const NAME: &str = "averaging_down";

pub struct AveragingDownCalculator {
    tag_filter: Arc<dyn TagFilter>,
    securities: Arc<dyn SecurityRepository>,
}

impl AveragingDownCalculator {
    pub fn new(tag_filter: Arc<dyn TagFilter>, securities: Arc<dyn SecurityRepository>) -> Self {
        Self {
            tag_filter,
            securities,
        }
    }
}

impl OpportunityCalculator for AveragingDownCalculator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> OpportunityCategory {
        OpportunityCategory::AveragingDown
    }

    fn calculate(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
    ) -> Result<CandidateList, CalculationError> {
        let mut exclusions = ExclusionCollector::new(NAME);
        let params = &config.averaging_down;

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
            let Some(position) = ctx.positions.get(isin).filter(|p| p.quantity > 0.0) else {
                exclusions.exclude_security(isin, security, "no position to average into");
                continue;
            };
            if let Some(reason) = buy_blocked(ctx, isin, security, config) {
                exclusions.exclude_security(isin, security, reason);
                continue;
            }
            let Some(price) = security.valid_price() else {
                continue;
            };

            let Some(loss) = position.gain_at(price).map(|g| -g) else {
                exclusions.exclude_security(isin, security, "missing cost basis");
                continue;
            };
            if loss < params.min_loss_threshold {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "loss {:.1}% below {:.1}% threshold",
                        loss.max(0.0) * 100.0,
                        params.min_loss_threshold * 100.0
                    ),
                );
                continue;
            }
            if loss > params.max_loss_threshold {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "loss {:.1}% beyond {:.1}% limit",
                        loss * 100.0,
                        params.max_loss_threshold * 100.0
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

            let tags = match lookup_tags(self.securities.as_ref(), &security.symbol) {
                Ok(tags) => tags,
                Err(e) => return Err(exclusions.fail(e)),
            };
            if let Some(reason) = quality_gate_reason(&tags) {
                exclusions.exclude_security(isin, security, reason);
                continue;
            }

            let position_value = ctx.position_value(isin);
            let room = params.max_position_pct * ctx.portfolio_value - position_value;
            if room <= 0.0 {
                exclusions.exclude_security(
                    isin,
                    security,
                    format!(
                        "position already {:.1}% of portfolio",
                        position_value / ctx.portfolio_value.max(f64::EPSILON) * 100.0
                    ),
                );
                continue;
            }
            let target = position_value * params.percent;
            let limit = room.min(params.max_trade_value);
            let quantity = match size_buy(target, limit, min_trade, price, security.min_lot) {
                Ok(quantity) => quantity,
                Err(reason) => {
                    exclusions.exclude_security(isin, security, reason);
                    continue;
                }
            };

            let raw = loss * quality * params.priority_weight;
            let boosted = config.boosts.apply_tag_based_priority_boosts(
                raw,
                &tags,
                CalculatorType::AveragingDown,
            );
            let priority = config.boosts.apply_quantum_warning_penalty(
                boosted,
                &tags,
                CalculatorType::AveragingDown,
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
                        "Down {:.1}% from average cost {:.2}, quality {:.2}",
                        loss * 100.0,
                        position.average_cost,
                        quality
                    ),
                    tags: vec![CandidateTag::Buy, CandidateTag::AveragingDown],
                },
                geography: security.geography.clone(),
                min_lot: security.min_lot,
            });
        }

        Ok(exclusions.fund_buys(ctx, config, buys, min_trade, params.max_positions))
    }
}
