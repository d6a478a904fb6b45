//! Opportunity calculators.
//!
//! Every calculator turns a [`PlanningContext`] snapshot and a resolved
//! [`CalculatorConfig`] into a ranked list of trade candidates. They share
//! one pipeline shape:
//!
//! 1. Whitelist from the tag filter (empty means no candidates)
//! 2. Global allow-buy / allow-sell gating
//! 3. Structural filters (cooldowns, missing data, per-security flags, lots)
//! 4. Quality-gate tag exclusion (buy side only)
//! 5. Scoring, tag boosts and quantum-warning penalty
//! 6. Sizing against per-position caps with a minimum trade floor and lot rounding
//! 7. Ranking by priority (ISIN breaks ties)
//! 8. Buys only: funding in rank order against the cash budget and the
//!    concentration guardrail
//! 9. Optional truncation to the position limit
//!
//! Every rejected security is recorded in an [`ExclusionCollector`].

mod averaging_down;
mod boosts;
mod opportunity_buys;
mod profit_taking;
mod rebalance_buys;

pub use averaging_down::AveragingDownCalculator;
pub use boosts::CalculatorType;
pub use opportunity_buys::OpportunityBuysCalculator;
pub use profit_taking::ProfitTakingCalculator;
pub use rebalance_buys::RebalanceBuysCalculator;

use crate::context::{PlanningContext, SecurityInfo, SecurityRepository, TagFilter};
use crate::params::{CalculatorConfig, ScoringWeights};
use crate::tags::{first_disqualifying, TagSet};
use crate::types::{ActionCandidate, ExclusionRecord, OpportunityCategory};
use crate::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A strategy that proposes trades for one opportunity category.
pub trait OpportunityCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    fn category(&self) -> OpportunityCategory;

    fn calculate(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
    ) -> std::result::Result<CandidateList, CalculationError>;
}

/// Ranked candidates plus everything that was considered and rejected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateList {
    pub candidates: Vec<ActionCandidate>,
    pub exclusions: Vec<ExclusionRecord>,
}

impl CandidateList {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// A calculator run that could not determine eligibility.
///
/// Carries the exclusions recorded before the failure. No candidates are
/// ever returned alongside it.
#[derive(Debug, thiserror::Error)]
#[error("{calculator} failed: {source}")]
pub struct CalculationError {
    pub calculator: &'static str,
    #[source]
    pub source: Error,
    pub exclusions: Vec<ExclusionRecord>,
}

/// Records rejected securities for one calculator run.
#[derive(Debug)]
pub struct ExclusionCollector {
    calculator: &'static str,
    records: Vec<ExclusionRecord>,
}

impl ExclusionCollector {
    pub fn new(calculator: &'static str) -> Self {
        Self {
            calculator,
            records: Vec::new(),
        }
    }

    pub fn exclude(&mut self, isin: &str, symbol: &str, name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!("{}: excluding {} ({}): {}", self.calculator, symbol, isin, reason);
        self.records.push(ExclusionRecord {
            isin: isin.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            reason,
        });
    }

    pub fn exclude_security(&mut self, isin: &str, security: &SecurityInfo, reason: impl Into<String>) {
        self.exclude(isin, &security.symbol, &security.name, reason);
    }

    pub fn records(&self) -> &[ExclusionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Turn a failure into a calculation error carrying the records so far.
    pub fn fail(self, source: Error) -> CalculationError {
        tracing::warn!("{} aborted: {}", self.calculator, source);
        CalculationError {
            calculator: self.calculator,
            source,
            exclusions: self.records,
        }
    }

    /// Rank, truncate and package the run's output.
    pub fn finish(self, mut candidates: Vec<ActionCandidate>, max_positions: usize) -> CandidateList {
        rank(&mut candidates);
        if max_positions > 0 && candidates.len() > max_positions {
            tracing::debug!(
                "{}: keeping top {} of {} candidates",
                self.calculator,
                max_positions,
                candidates.len()
            );
            candidates.truncate(max_positions);
        }
        tracing::info!(
            "{}: {} candidates, {} excluded",
            self.calculator,
            candidates.len(),
            self.records.len()
        );
        CandidateList {
            candidates,
            exclusions: self.records,
        }
    }

    /// Fund sized buys in rank order, then package the run's output.
    ///
    /// A buy larger than the remaining cash is shrunk to fit, and every buy
    /// must pass the concentration guardrail on top of what higher-ranked
    /// buys already added. Funding stops once `max_positions` buys are
    /// accepted (0 means unlimited).
    pub(crate) fn fund_buys(
        mut self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
        mut buys: Vec<SizedBuy>,
        min_trade: f64,
        max_positions: usize,
    ) -> CandidateList {
        buys.sort_by(|a, b| by_priority(&a.candidate, &b.candidate));
        let total = buys.len();
        let mut cash = CashBudget::new(ctx, config);
        let mut guard = ConcentrationGuard::default();
        let mut funded = Vec::new();

        for (index, buy) in buys.into_iter().enumerate() {
            if max_positions > 0 && funded.len() >= max_positions {
                tracing::debug!(
                    "{}: position limit {} reached, {} buys unfunded",
                    self.calculator,
                    max_positions,
                    total - index
                );
                break;
            }
            let SizedBuy {
                mut candidate,
                geography,
                min_lot,
            } = buy;

            let mut gross = candidate.quantity as f64 * candidate.price;
            if gross > cash.cap() {
                match size_buy(gross, cash.cap(), min_trade, candidate.price, min_lot) {
                    Ok(quantity) => {
                        candidate.quantity = quantity;
                        gross = quantity as f64 * candidate.price;
                    }
                    Err(reason) => {
                        self.exclude(
                            &candidate.isin,
                            &candidate.symbol,
                            &candidate.name,
                            format!("insufficient cash: {}", reason),
                        );
                        continue;
                    }
                }
            }

            let geography = geography.as_deref();
            if let Err(reason) = guard.check(ctx, config, &candidate.isin, geography, gross) {
                self.exclude(&candidate.isin, &candidate.symbol, &candidate.name, reason);
                continue;
            }
            guard.commit(geography, gross);
            cash.spend(gross);

            candidate.value = gross + ctx.transaction_costs.cost(gross);
            funded.push(candidate);
        }

        self.finish(funded, max_positions)
    }

    /// Finish a run that produced nothing.
    pub fn empty(self) -> CandidateList {
        self.finish(Vec::new(), 0)
    }
}

/// Descending priority, then ascending ISIN.
pub fn rank(candidates: &mut [ActionCandidate]) {
    candidates.sort_by(by_priority);
}

fn by_priority(a: &ActionCandidate, b: &ActionCandidate) -> Ordering {
    b.priority
        .partial_cmp(&a.priority)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.isin.cmp(&b.isin))
}

/// Smallest trade whose costs stay within `max_cost_ratio` of its value.
///
/// `fixed / (max_cost_ratio - variable_percent)`. A ratio at or below the
/// variable cost can never be met by any trade size and is rejected.
pub fn min_trade_amount(fixed_cost: f64, variable_cost_percent: f64, max_cost_ratio: f64) -> Result<f64> {
    let spread = max_cost_ratio - variable_cost_percent;
    if !spread.is_finite() || spread <= 0.0 {
        tracing::warn!(
            "Max cost ratio {} must exceed variable cost {}",
            max_cost_ratio,
            variable_cost_percent
        );
        return Err(Error::InvalidConfig(format!(
            "max cost ratio {} must exceed variable cost percent {}",
            max_cost_ratio, variable_cost_percent
        )));
    }
    Ok(fixed_cost.max(0.0) / spread)
}

/// Minimum trade amount for this context and config.
pub(crate) fn context_min_trade(ctx: &PlanningContext, config: &CalculatorConfig) -> Result<f64> {
    min_trade_amount(
        ctx.transaction_costs.fixed,
        ctx.transaction_costs.variable_percent,
        config.transaction.max_cost_ratio,
    )
}

/// The built-in calculators, sells first so their proceeds are visible to planning.
pub fn default_calculators(
    tag_filter: Arc<dyn TagFilter>,
    securities: Arc<dyn SecurityRepository>,
) -> Vec<Box<dyn OpportunityCalculator>> {
    vec![
        Box::new(ProfitTakingCalculator::new(tag_filter.clone(), securities.clone())),
        Box::new(RebalanceBuysCalculator::new(tag_filter.clone(), securities.clone())),
        Box::new(AveragingDownCalculator::new(tag_filter.clone(), securities.clone())),
        Box::new(OpportunityBuysCalculator::new(tag_filter, securities)),
    ]
}

/// Whitelisted ISINs for a category.
pub(crate) fn whitelist(
    filter: &dyn TagFilter,
    ctx: &PlanningContext,
    category: OpportunityCategory,
) -> Result<Vec<String>> {
    let symbols = filter.opportunity_candidates(ctx, category)?;
    Ok(ctx.resolve_symbols(&symbols))
}

/// Collaborator lookup of a security's tags.
pub(crate) fn lookup_tags(repo: &dyn SecurityRepository, symbol: &str) -> Result<TagSet> {
    repo.tags_for_security(symbol).map_err(|e| match e {
        collaborator @ Error::Collaborator { .. } => collaborator,
        other => Error::collaborator("security repository", other.to_string()),
    })
}

/// Reason a buy is blocked by a quality-gate tag.
pub(crate) fn quality_gate_reason(tags: &TagSet) -> Option<String> {
    first_disqualifying(tags).map(|tag| format!("excluded by quality gate: {}", tag.describe()))
}

/// Structural reasons a security cannot be bought right now.
pub(crate) fn buy_blocked(
    ctx: &PlanningContext,
    isin: &str,
    security: &SecurityInfo,
    config: &CalculatorConfig,
) -> Option<String> {
    if ctx.recently_bought.contains(isin) {
        return Some("recently bought".to_string());
    }
    if let Some(bought) = ctx.positions.get(isin).and_then(|p| p.last_bought_at) {
        let days = ctx.days_since(bought);
        let cooldown = i64::from(config.risk.buy_cooldown_days);
        if days < cooldown {
            return Some(format!("bought {} days ago (cooldown {} days)", days, cooldown));
        }
    }
    if !security.allow_buy {
        return Some("buying disabled for security".to_string());
    }
    if security.valid_price().is_none() {
        return Some("missing or invalid price".to_string());
    }
    if security.min_lot == 0 {
        return Some("invalid minimum lot size".to_string());
    }
    None
}

/// Quality from the explicit score, else from component scores.
pub(crate) fn quality_score(security: &SecurityInfo, scoring: &ScoringWeights) -> Option<f64> {
    security
        .quality_score
        .or_else(|| security.scores.as_ref().map(|c| scoring.score(c)))
        .filter(|q| q.is_finite())
}

/// A buy sized against its own caps, not yet checked against cash or concentration.
#[derive(Debug)]
pub(crate) struct SizedBuy {
    pub(crate) candidate: ActionCandidate,
    pub(crate) geography: Option<String>,
    pub(crate) min_lot: u32,
}

/// Cash left for buys after the configured reserve, spent as buys are funded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CashBudget {
    remaining: Option<f64>,
}

impl CashBudget {
    pub(crate) fn new(ctx: &PlanningContext, config: &CalculatorConfig) -> Self {
        let reserve = config.risk.cash_reserve_pct * ctx.portfolio_value;
        Self {
            remaining: ctx.available_cash.map(|cash| (cash - reserve).max(0.0)),
        }
    }

    /// Largest trade value the budget still allows.
    pub(crate) fn cap(&self) -> f64 {
        self.remaining.unwrap_or(f64::INFINITY)
    }

    pub(crate) fn spend(&mut self, value: f64) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = (*remaining - value).max(0.0);
        }
    }
}

/// Size a buy in whole lots.
///
/// The strategy target is floored at the minimum trade and capped by `cap`.
/// Lot rounding only ever rounds down; a result below the minimum trade is an
/// exclusion, never a larger order.
pub(crate) fn size_buy(
    target: f64,
    cap: f64,
    min_trade: f64,
    price: f64,
    min_lot: u32,
) -> std::result::Result<u64, String> {
    let value = target.max(min_trade).min(cap);
    if value < min_trade {
        return Err(format!(
            "cap {:.2} below minimum trade {:.2}",
            cap.max(0.0),
            min_trade
        ));
    }
    let lot = u64::from(min_lot.max(1));
    let lot_value = price * lot as f64;
    // Nudge against representation error so an exact fit is not lost
    let lots = (value / lot_value + 1e-9).floor();
    let quantity = lots.max(0.0) as u64 * lot;
    if quantity == 0 {
        return Err(format!(
            "one lot costs {:.2}, more than sized {:.2}",
            lot_value, value
        ));
    }
    let gross = quantity as f64 * price;
    if gross < min_trade {
        return Err(format!(
            "rounded trade {:.2} below minimum {:.2}",
            gross, min_trade
        ));
    }
    Ok(quantity)
}

/// Post-sizing concentration limits for buys, tracking what this run already added.
#[derive(Debug, Default)]
pub(crate) struct ConcentrationGuard {
    added_by_geography: BTreeMap<String, f64>,
}

impl ConcentrationGuard {
    pub(crate) fn check(
        &self,
        ctx: &PlanningContext,
        config: &CalculatorConfig,
        isin: &str,
        geography: Option<&str>,
        gross: f64,
    ) -> std::result::Result<(), String> {
        if ctx.portfolio_value <= 0.0 {
            return Ok(());
        }
        let position_weight = (ctx.position_value(isin) + gross) / ctx.portfolio_value;
        let position_limit = config.risk.max_single_position_concentration;
        if position_weight > position_limit + 1e-9 {
            return Err(format!(
                "position would reach {:.1}% of portfolio (limit {:.1}%)",
                position_weight * 100.0,
                position_limit * 100.0
            ));
        }
        if let Some(geography) = geography {
            let added = self.added_by_geography.get(geography).copied().unwrap_or(0.0);
            let geography_weight =
                ctx.current_allocation(geography) + (added + gross) / ctx.portfolio_value;
            let geography_limit = config.risk.max_geography_concentration;
            if geography_weight > geography_limit + 1e-9 {
                return Err(format!(
                    "{} would reach {:.1}% of portfolio (limit {:.1}%)",
                    geography,
                    geography_weight * 100.0,
                    geography_limit * 100.0
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn commit(&mut self, geography: Option<&str>, gross: f64) {
        if let Some(geography) = geography {
            *self
                .added_by_geography
                .entry(geography.to_string())
                .or_insert(0.0) += gross;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::context::{AllowAllTagFilter, PositionInfo};
    use crate::tags::StaticSecurityRepository;
    use std::sync::Arc;

    pub fn allow_all() -> Arc<dyn TagFilter> {
        Arc::new(AllowAllTagFilter)
    }

    pub fn repo(repo: StaticSecurityRepository) -> Arc<dyn SecurityRepository> {
        Arc::new(repo)
    }

    pub fn no_tags() -> Arc<dyn SecurityRepository> {
        Arc::new(StaticSecurityRepository::new())
    }

    /// Tag filter that always errors.
    pub struct FailingFilter;

    impl TagFilter for FailingFilter {
        fn opportunity_candidates(
            &self,
            _ctx: &PlanningContext,
            _category: OpportunityCategory,
        ) -> Result<Vec<String>> {
            Err(Error::collaborator("tag filter", "backend unavailable"))
        }
    }

    /// Tag filter that admits nothing.
    pub struct EmptyFilter;

    impl TagFilter for EmptyFilter {
        fn opportunity_candidates(
            &self,
            _ctx: &PlanningContext,
            _category: OpportunityCategory,
        ) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    /// Repository that fails for one symbol.
    pub struct FailingRepository(pub &'static str);

    impl SecurityRepository for FailingRepository {
        fn tags_for_security(&self, symbol: &str) -> Result<TagSet> {
            if symbol == self.0 {
                Err(Error::collaborator("security repository", "lookup timed out"))
            } else {
                Ok(TagSet::new())
            }
        }
    }

    pub fn held(quantity: f64, average_cost: f64, symbol: &str) -> PositionInfo {
        PositionInfo::new(symbol, quantity, average_cost)
    }
}
