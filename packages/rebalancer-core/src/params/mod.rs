//! Typed parameter groups resolved from one slider snapshot.
//!
//! Every group is assembled field by field through a single
//! [`ParamResolver`], so a whole decision cycle sees one consistent
//! temperament reading. Groups are rebuilt for every cycle and never cached
//! across slider changes.

mod boosts;
mod gates;
mod trading;
mod weights;

pub use boosts::PriorityBoostParams;
pub use gates::{QualityGateParams, TagThresholdParams};
pub use trading::{
    AveragingDownParams, KellyParams, OpportunityBuyParams, ProfitTakingParams, RebalancingParams,
    RiskManagementParams, TransactionParams,
};
pub use weights::{EvaluationScores, EvaluationWeights, ScoreComponents, ScoringWeights};

use crate::settings::SettingsSource;
use crate::temperament::SliderState;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Resolves named parameters against one slider snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ParamResolver {
    sliders: SliderState,
}

impl ParamResolver {
    pub fn new(sliders: SliderState) -> Self {
        Self { sliders }
    }

    pub fn sliders(&self) -> SliderState {
        self.sliders
    }

    /// Resolved value of a named parameter.
    pub fn value(&self, parameter: &str) -> Result<f64> {
        self.sliders.resolve(parameter)
    }

    /// Resolved value rounded to a non-negative count.
    pub fn count(&self, parameter: &str) -> Result<usize> {
        Ok(self.value(parameter)?.round().max(0.0) as usize)
    }

    /// Resolved value rounded to whole days.
    pub fn days(&self, parameter: &str) -> Result<u32> {
        Ok(self.value(parameter)?.round().max(0.0) as u32)
    }
}

/// Hold periods read straight from settings.
///
/// These are absolute safety controls and never follow the sliders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldSettings {
    pub min_hold_days: u32,
    pub sell_cooldown_days: u32,
}

impl Default for HoldSettings {
    fn default() -> Self {
        Self {
            min_hold_days: 90,
            sell_cooldown_days: 180,
        }
    }
}

impl HoldSettings {
    pub fn load(settings: &dyn SettingsSource) -> Result<Self> {
        let defaults = Self::default();
        let read = |key: &str, fallback: u32| -> Result<u32> {
            Ok(settings
                .get(key)?
                .map(|v| v.round().max(0.0) as u32)
                .unwrap_or(fallback))
        };
        Ok(Self {
            min_hold_days: read("min_hold_days", defaults.min_hold_days)?,
            sell_cooldown_days: read("sell_cooldown_days", defaults.sell_cooldown_days)?,
        })
    }
}

/// Every parameter group for one decision cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorConfig {
    pub sliders: SliderState,
    pub profit_taking: ProfitTakingParams,
    pub averaging_down: AveragingDownParams,
    pub opportunity_buys: OpportunityBuyParams,
    pub kelly: KellyParams,
    pub risk: RiskManagementParams,
    pub quality_gates: QualityGateParams,
    pub rebalancing: RebalancingParams,
    pub tag_thresholds: TagThresholdParams,
    pub boosts: PriorityBoostParams,
    pub evaluation: EvaluationWeights,
    pub scoring: ScoringWeights,
    pub transaction: TransactionParams,
}

impl CalculatorConfig {
    /// Build all groups from an explicit slider snapshot.
    pub fn new(sliders: SliderState, hold: HoldSettings) -> Result<Self> {
        let resolver = ParamResolver::new(sliders);
        Ok(Self {
            sliders,
            profit_taking: ProfitTakingParams::from_resolver(&resolver)?,
            averaging_down: AveragingDownParams::from_resolver(&resolver)?,
            opportunity_buys: OpportunityBuyParams::from_resolver(&resolver)?,
            kelly: KellyParams::from_resolver(&resolver)?,
            risk: RiskManagementParams::from_resolver(&resolver, hold)?,
            quality_gates: QualityGateParams::from_resolver(&resolver)?,
            rebalancing: RebalancingParams::from_resolver(&resolver)?,
            tag_thresholds: TagThresholdParams::from_resolver(&resolver)?,
            boosts: PriorityBoostParams::from_resolver(&resolver)?,
            evaluation: EvaluationWeights::from_resolver(&resolver)?,
            scoring: ScoringWeights::from_resolver(&resolver)?,
            transaction: TransactionParams::from_resolver(&resolver)?,
        })
    }

    /// Neutral sliders, default hold periods.
    pub fn neutral() -> Result<Self> {
        Self::new(SliderState::default(), HoldSettings::default())
    }

    /// Read sliders and hold periods from settings once and build every group.
    pub fn from_settings(settings: &dyn SettingsSource) -> Result<Self> {
        let sliders = SliderState::load(settings)?;
        let hold = HoldSettings::load(settings)?;
        tracing::debug!(
            "Building calculator config (risk={:.2}, aggression={:.2}, patience={:.2})",
            sliders.risk_tolerance,
            sliders.aggression,
            sliders.patience
        );
        Self::new(sliders, hold)
    }
}
