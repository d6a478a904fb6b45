//! Core data types shared by the calculators and the planner.

use crate::tags::CandidateTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("BUY"),
            TradeSide::Sell => f.write_str("SELL"),
        }
    }
}

/// Opportunity family a calculator serves. Tag filters whitelist per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityCategory {
    RebalanceBuys,
    ProfitTaking,
    AveragingDown,
    OpportunityBuys,
}

impl OpportunityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityCategory::RebalanceBuys => "rebalance_buys",
            OpportunityCategory::ProfitTaking => "profit_taking",
            OpportunityCategory::AveragingDown => "averaging_down",
            OpportunityCategory::OpportunityBuys => "opportunity_buys",
        }
    }

    pub fn side(&self) -> TradeSide {
        match self {
            OpportunityCategory::ProfitTaking => TradeSide::Sell,
            _ => TradeSide::Buy,
        }
    }
}

impl fmt::Display for OpportunityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed trade produced by one calculator run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionCandidate {
    pub side: TradeSide,
    /// Primary identifier
    pub isin: String,
    pub symbol: String,
    pub name: String,
    /// Whole lots only
    pub quantity: u64,
    pub price: f64,
    /// Trade value including transaction costs (added for buys, deducted for sells)
    pub value: f64,
    pub currency: String,
    /// Higher is more urgent
    pub priority: f64,
    pub reason: String,
    pub tags: Vec<CandidateTag>,
}

impl ActionCandidate {
    /// Value of the shares alone, before costs.
    pub fn gross_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn has_tag(&self, tag: CandidateTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A security that was considered and rejected, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionRecord {
    pub isin: String,
    pub symbol: String,
    pub name: String,
    pub reason: String,
}

/// API response wrapper for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_side_serde() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), "\"BUY\"");
        assert_eq!(TradeSide::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_category_side() {
        assert_eq!(OpportunityCategory::ProfitTaking.side(), TradeSide::Sell);
        assert_eq!(OpportunityCategory::AveragingDown.side(), TradeSide::Buy);
        assert_eq!(
            serde_json::to_string(&OpportunityCategory::RebalanceBuys).unwrap(),
            "\"rebalance_buys\""
        );
    }

    #[test]
    fn test_candidate_values() {
        let candidate = ActionCandidate {
            side: TradeSide::Buy,
            isin: "US0378331005".to_string(),
            symbol: "AAPL".to_string(),
            name: "Apple".to_string(),
            quantity: 5,
            price: 100.0,
            value: 503.0,
            currency: "USD".to_string(),
            priority: 0.05,
            reason: "underweight".to_string(),
            tags: vec![CandidateTag::Rebalance, CandidateTag::Buy],
        };
        assert_eq!(candidate.gross_value(), 500.0);
        assert!(candidate.has_tag(CandidateTag::Buy));
        assert!(!candidate.has_tag(CandidateTag::Sell));
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
