//! One planning cycle across a set of calculators.

use crate::context::PlanningContext;
use crate::opportunities::{rank, CalculationError, CandidateList, OpportunityCalculator};
use crate::params::CalculatorConfig;
use crate::types::{ActionCandidate, OpportunityCategory, TradeSide};
use serde::Serialize;

/// Output of one calculator inside a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorOutcome {
    pub calculator: &'static str,
    pub category: OpportunityCategory,
    #[serde(flatten)]
    pub list: CandidateList,
}

/// Everything a planning cycle produced, in calculator order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanOutcome {
    pub calculators: Vec<CalculatorOutcome>,
}

impl PlanOutcome {
    /// All candidates from every calculator, ranked together.
    pub fn ranked(&self) -> Vec<ActionCandidate> {
        let mut all: Vec<_> = self
            .calculators
            .iter()
            .flat_map(|outcome| outcome.list.candidates.iter().cloned())
            .collect();
        rank(&mut all);
        all
    }

    pub fn candidate_count(&self) -> usize {
        self.calculators.iter().map(|o| o.list.len()).sum()
    }

    pub fn exclusion_count(&self) -> usize {
        self.calculators.iter().map(|o| o.list.exclusions.len()).sum()
    }

    pub fn for_category(&self, category: OpportunityCategory) -> Option<&CandidateList> {
        self.calculators
            .iter()
            .find(|o| o.category == category)
            .map(|o| &o.list)
    }

    /// Net cash effect of all candidates: sell proceeds minus buy costs.
    pub fn net_cash_flow(&self) -> f64 {
        self.calculators
            .iter()
            .flat_map(|o| o.list.candidates.iter())
            .map(|c| match c.side {
                TradeSide::Sell => c.value,
                TradeSide::Buy => -c.value,
            })
            .sum()
    }
}

/// Run every calculator in order against one context and config.
///
/// The first calculator error aborts the cycle; its partial exclusions
/// travel with the returned error.
pub fn plan(
    ctx: &PlanningContext,
    config: &CalculatorConfig,
    calculators: &[Box<dyn OpportunityCalculator>],
) -> Result<PlanOutcome, CalculationError> {
    let mut outcome = PlanOutcome::default();
    for calculator in calculators {
        let list = calculator.calculate(ctx, config)?;
        outcome.calculators.push(CalculatorOutcome {
            calculator: calculator.name(),
            category: calculator.category(),
            list,
        });
    }

    tracing::info!(
        "Planning cycle: {} candidates, {} exclusions across {} calculators",
        outcome.candidate_count(),
        outcome.exclusion_count(),
        outcome.calculators.len()
    );
    Ok(outcome)
}
