//! Planning context snapshot and the collaborators calculators consult.

use crate::params::ScoreComponents;
use crate::settings::SettingsSource;
use crate::tags::{SecurityMetrics, TagSet};
use crate::types::OpportunityCategory;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Whitelist of symbols eligible for one opportunity category.
pub trait TagFilter: Send + Sync {
    fn opportunity_candidates(
        &self,
        ctx: &PlanningContext,
        category: OpportunityCategory,
    ) -> Result<Vec<String>>;
}

/// Qualitative tag lookup by symbol.
pub trait SecurityRepository: Send + Sync {
    fn tags_for_security(&self, symbol: &str) -> Result<TagSet>;
}

/// Tag filter that admits every security in the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllTagFilter;

impl TagFilter for AllowAllTagFilter {
    fn opportunity_candidates(
        &self,
        ctx: &PlanningContext,
        _category: OpportunityCategory,
    ) -> Result<Vec<String>> {
        Ok(ctx.securities.values().map(|s| s.symbol.clone()).collect())
    }
}

/// Broad market regime, used by Kelly sizing and regime boosts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Bull,
    Bear,
    #[default]
    Sideways,
}

/// Per-trade cost model: `fixed + value * variable_percent`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransactionCosts {
    pub fixed: f64,
    /// Fraction of trade value (0.002 = 0.2%)
    pub variable_percent: f64,
}

impl Default for TransactionCosts {
    fn default() -> Self {
        Self {
            fixed: 2.0,
            variable_percent: 0.002,
        }
    }
}

impl TransactionCosts {
    pub fn cost(&self, value: f64) -> f64 {
        self.fixed + value * self.variable_percent
    }

    /// Read the cost model from settings, falling back to defaults.
    pub fn load(settings: &dyn SettingsSource) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            fixed: settings
                .get("transaction_cost_fixed")?
                .unwrap_or(defaults.fixed),
            variable_percent: settings
                .get("transaction_cost_percent")?
                .unwrap_or(defaults.variable_percent),
        })
    }
}

const fn yes() -> bool {
    true
}

const fn one_lot() -> u32 {
    1
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Static and market data for one security.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub geography: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "one_lot")]
    pub min_lot: u32,
    #[serde(default = "yes")]
    pub allow_buy: bool,
    #[serde(default = "yes")]
    pub allow_sell: bool,
    /// Composite quality in [0, 1]
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub opportunity_score: Option<f64>,
    /// Component scores combined with the scoring weights when no quality score is given
    #[serde(default)]
    pub scores: Option<ScoreComponents>,
    /// Annualized expected return estimate
    #[serde(default)]
    pub expected_return: Option<f64>,
    /// Confidence in the expected return, in [0, 1]
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub metrics: Option<SecurityMetrics>,
    /// Tags already assigned upstream
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SecurityInfo {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            geography: None,
            currency: default_currency(),
            price: None,
            min_lot: one_lot(),
            allow_buy: true,
            allow_sell: true,
            quality_score: None,
            opportunity_score: None,
            scores: None,
            expected_return: None,
            confidence: None,
            metrics: None,
            tags: Vec::new(),
        }
    }

    pub fn with_geography(mut self, geography: &str) -> Self {
        self.geography = Some(geography.to_string());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Price if present and strictly positive.
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Distance below the 52-week high, from metrics.
    pub fn discount_from_high(&self) -> Option<f64> {
        self.metrics.as_ref().and_then(|m| m.discount_from_high)
    }

    pub fn volatility(&self) -> Option<f64> {
        self.metrics.as_ref().and_then(|m| m.volatility)
    }
}

/// A held position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionInfo {
    pub symbol: String,
    pub quantity: f64,
    /// Average cost per share
    pub average_cost: f64,
    #[serde(default)]
    pub first_bought_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_bought_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sold_at: Option<DateTime<Utc>>,
}

impl PositionInfo {
    pub fn new(symbol: &str, quantity: f64, average_cost: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity,
            average_cost,
            first_bought_at: None,
            last_bought_at: None,
            last_sold_at: None,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.quantity * self.average_cost
    }

    /// Unrealized return at `price` as a fraction (0.15 = +15%).
    pub fn gain_at(&self, price: f64) -> Option<f64> {
        if self.average_cost > 0.0 {
            Some(price / self.average_cost - 1.0)
        } else {
            None
        }
    }
}

/// Read-only snapshot one planning cycle runs against.
///
/// Securities and positions are keyed by ISIN. Geography targets and current
/// allocations are fractions of portfolio value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanningContext {
    #[serde(default = "Utc::now")]
    pub as_of: DateTime<Utc>,
    pub portfolio_value: f64,
    /// Cash available for buys; `None` leaves buys uncapped by cash
    #[serde(default)]
    pub available_cash: Option<f64>,
    #[serde(default = "yes")]
    pub allow_buy: bool,
    #[serde(default = "yes")]
    pub allow_sell: bool,
    #[serde(default)]
    pub regime: MarketRegime,
    #[serde(default)]
    pub securities: BTreeMap<String, SecurityInfo>,
    #[serde(default)]
    pub positions: BTreeMap<String, PositionInfo>,
    #[serde(default)]
    pub geography_targets: BTreeMap<String, f64>,
    #[serde(default)]
    pub geography_allocations: BTreeMap<String, f64>,
    #[serde(default)]
    pub recently_bought: BTreeSet<String>,
    #[serde(default)]
    pub recently_sold: BTreeSet<String>,
    #[serde(default)]
    pub transaction_costs: TransactionCosts,
}

impl PlanningContext {
    pub fn new(portfolio_value: f64) -> Self {
        Self {
            as_of: Utc::now(),
            portfolio_value,
            available_cash: None,
            allow_buy: true,
            allow_sell: true,
            regime: MarketRegime::default(),
            securities: BTreeMap::new(),
            positions: BTreeMap::new(),
            geography_targets: BTreeMap::new(),
            geography_allocations: BTreeMap::new(),
            recently_bought: BTreeSet::new(),
            recently_sold: BTreeSet::new(),
            transaction_costs: TransactionCosts::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a context snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn with_security(mut self, isin: &str, security: SecurityInfo) -> Self {
        self.securities.insert(isin.to_string(), security);
        self
    }

    pub fn with_position(mut self, isin: &str, position: PositionInfo) -> Self {
        self.positions.insert(isin.to_string(), position);
        self
    }

    pub fn with_geography(mut self, geography: &str, target: f64, current: f64) -> Self {
        self.geography_targets.insert(geography.to_string(), target);
        self.geography_allocations
            .insert(geography.to_string(), current);
        self
    }

    /// Look a security up by symbol, returning its ISIN too.
    pub fn security_by_symbol(&self, symbol: &str) -> Option<(&str, &SecurityInfo)> {
        self.securities
            .iter()
            .find(|(_, s)| s.symbol.eq_ignore_ascii_case(symbol))
            .map(|(isin, s)| (isin.as_str(), s))
    }

    /// Resolve whitelisted symbols to ISINs, sorted and deduplicated.
    /// Unknown symbols are logged and skipped.
    pub fn resolve_symbols(&self, symbols: &[String]) -> Vec<String> {
        let mut isins = BTreeSet::new();
        for symbol in symbols {
            match self.security_by_symbol(symbol) {
                Some((isin, _)) => {
                    isins.insert(isin.to_string());
                }
                None => tracing::debug!("Whitelisted symbol not in context: {}", symbol),
            }
        }
        isins.into_iter().collect()
    }

    pub fn current_allocation(&self, geography: &str) -> f64 {
        self.geography_allocations
            .get(geography)
            .copied()
            .unwrap_or(0.0)
    }

    /// Target minus current allocation (positive when underweight).
    pub fn geography_gap(&self, geography: &str) -> Option<f64> {
        self.geography_targets
            .get(geography)
            .map(|target| target - self.current_allocation(geography))
    }

    /// Market value of the position in `isin` at the security's current price.
    pub fn position_value(&self, isin: &str) -> f64 {
        let price = self.securities.get(isin).and_then(SecurityInfo::valid_price);
        match (self.positions.get(isin), price) {
            (Some(position), Some(price)) => position.quantity * price,
            _ => 0.0,
        }
    }

    /// Whole days between `at` and the snapshot time.
    pub fn days_since(&self, at: DateTime<Utc>) -> i64 {
        (self.as_of - at).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> PlanningContext {
        PlanningContext::new(10_000.0)
            .with_geography("EU", 0.20, 0.10)
            .with_security(
                "DE0001",
                SecurityInfo::new("SAP", "SAP SE")
                    .with_geography("EU")
                    .with_price(100.0),
            )
            .with_position("DE0001", PositionInfo::new("SAP", 10.0, 80.0))
    }

    #[test]
    fn test_geography_gap() {
        let ctx = sample();
        assert!((ctx.geography_gap("EU").unwrap() - 0.10).abs() < 1e-12);
        assert_eq!(ctx.geography_gap("US"), None);
    }

    #[test]
    fn test_lookup_by_symbol() {
        let ctx = sample();
        let (isin, security) = ctx.security_by_symbol("sap").unwrap();
        assert_eq!(isin, "DE0001");
        assert_eq!(security.name, "SAP SE");
        assert_eq!(
            ctx.resolve_symbols(&["SAP".to_string(), "MISSING".to_string()]),
            vec!["DE0001".to_string()]
        );
    }

    #[test]
    fn test_position_value_and_gain() {
        let ctx = sample();
        assert_eq!(ctx.position_value("DE0001"), 1000.0);
        let gain = ctx.positions["DE0001"].gain_at(100.0).unwrap();
        assert!((gain - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_days_since() {
        let ctx = sample();
        assert_eq!(ctx.days_since(ctx.as_of - Duration::days(42)), 42);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "portfolio_value": 5000.0,
            "securities": {
                "US0001": { "symbol": "ABC", "price": 10.0 }
            }
        }"#;
        let ctx = PlanningContext::from_json(json).unwrap();
        assert!(ctx.allow_buy);
        assert_eq!(ctx.transaction_costs, TransactionCosts::default());
        let security = &ctx.securities["US0001"];
        assert_eq!(security.min_lot, 1);
        assert_eq!(security.currency, "EUR");
        assert!(security.allow_sell);
    }

    #[test]
    fn test_allow_all_filter() {
        let ctx = sample();
        let symbols = AllowAllTagFilter
            .opportunity_candidates(&ctx, OpportunityCategory::RebalanceBuys)
            .unwrap();
        assert_eq!(symbols, vec!["SAP".to_string()]);
    }

    #[test]
    fn test_transaction_costs() {
        let costs = TransactionCosts::default();
        assert!((costs.cost(500.0) - 3.0).abs() < 1e-12);
    }
}
