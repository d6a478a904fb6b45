//! Rebalancer Core - Temperament-driven rebalancing and trade recommendations.
//!
//! This crate turns three user-facing temperament sliders into a complete set
//! of trading parameters and uses them to rank trade candidates:
//!
//! - **Temperament**: Progression curves, the mapping table and the resolver
//! - **Parameters**: Typed parameter groups assembled from one slider snapshot
//! - **Opportunities**: Rebalance buys, profit-taking, averaging-down and
//!   opportunity-buy calculators with exclusion tracking
//! - **Tags**: Closed security tag vocabulary and the tag assigner
//! - **Planner**: One sequential planning cycle over the calculators
//! - **Settings**: Persisted sliders, hold periods and transaction costs
//!
//! # Example
//!
//! ```rust,no_run
//! use rebalancer_core::{get_temperament_mapping, SliderState};
//!
//! let sliders = SliderState::new(0.8, 0.5, 0.3);
//! let mapping = get_temperament_mapping("profit_taking_min_gain_threshold").unwrap();
//! let threshold = sliders.adjusted_value(mapping);
//! println!("Take profits from {:.1}% gain", threshold * 100.0);
//! ```

pub mod context;
pub mod kelly;
pub mod opportunities;
pub mod params;
pub mod planner;
pub mod settings;
pub mod tags;
pub mod temperament;
pub mod types;

// Re-export commonly used types
pub use types::{ActionCandidate, ApiResponse, ExclusionRecord, OpportunityCategory, TradeSide};

// Re-export main functionality
pub use context::{
    AllowAllTagFilter, MarketRegime, PlanningContext, PositionInfo, SecurityInfo,
    SecurityRepository, TagFilter, TransactionCosts,
};
pub use kelly::kelly_fraction;
pub use opportunities::{
    default_calculators, min_trade_amount, AveragingDownCalculator, CalculationError,
    CalculatorType, CandidateList, ExclusionCollector, OpportunityBuysCalculator,
    OpportunityCalculator, ProfitTakingCalculator, RebalanceBuysCalculator,
};
pub use params::{CalculatorConfig, HoldSettings, ParamResolver};
pub use planner::{plan, CalculatorOutcome, PlanOutcome};
pub use settings::{Settings, SettingsSource, SettingsStore};
pub use tags::{
    assign_tags, CandidateTag, SecurityMetrics, SecurityTag, StaticSecurityRepository, TagSet,
};
pub use temperament::{
    all_mappings, get_adjusted_value, get_temperament_mapping, Progression, SliderState,
    Temperament, TemperamentMapping,
};

/// Error types for rebalancer-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Settings write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Unknown mapping: {0}")]
    UnknownMapping(String),

    #[error("Invalid mapping {parameter}: {reason}")]
    InvalidMapping { parameter: String, reason: String },

    #[error("Unknown progression: {0}")]
    UnknownProgression(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
    },
}

impl Error {
    /// Build a collaborator failure (tag filter, security repository, settings).
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }
}

/// Result type for rebalancer-core operations.
pub type Result<T> = std::result::Result<T, Error>;
