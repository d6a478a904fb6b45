//! Closed tag vocabularies.
//!
//! [`SecurityTag`] labels describe a security (quality, risk, value, regime
//! fit, warnings). [`CandidateTag`] labels describe why a trade candidate
//! qualified.

mod assign;

pub use assign::{assign_tags, SecurityMetrics, StaticSecurityRepository};

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Qualitative label attached to a security.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityTag {
    // Quality
    HighQuality,
    StableFundamentals,
    ConsistentGrower,
    QualityValue,
    ExceptionalQuality,
    // Value
    ValueOpportunity,
    DeepValue,
    NearHigh,
    // Risk profile
    LowRisk,
    HighRisk,
    Volatile,
    // Technicals
    Oversold,
    Overbought,
    PositiveMomentum,
    NegativeMomentum,
    // Performance
    StrongPerformer,
    Underperforming,
    PoorRiskReward,
    // Dividends
    HighDividend,
    DividendGrower,
    // Quality gates
    QualityGatePass,
    QualityGateFail,
    BelowMinimumReturn,
    // Traps
    ValueTrap,
    BubbleRisk,
    // Warnings from the quantum heuristics
    QuantumBubbleWarning,
    QuantumValueWarning,
    // Regime alignment
    RegimeBullGrowth,
    RegimeBearSafe,
    RegimeSidewaysValue,
    RecoveryCandidate,
}

/// Ordered set of security tags.
pub type TagSet = BTreeSet<SecurityTag>;

impl SecurityTag {
    pub const ALL: [SecurityTag; 31] = [
        SecurityTag::HighQuality,
        SecurityTag::StableFundamentals,
        SecurityTag::ConsistentGrower,
        SecurityTag::QualityValue,
        SecurityTag::ExceptionalQuality,
        SecurityTag::ValueOpportunity,
        SecurityTag::DeepValue,
        SecurityTag::NearHigh,
        SecurityTag::LowRisk,
        SecurityTag::HighRisk,
        SecurityTag::Volatile,
        SecurityTag::Oversold,
        SecurityTag::Overbought,
        SecurityTag::PositiveMomentum,
        SecurityTag::NegativeMomentum,
        SecurityTag::StrongPerformer,
        SecurityTag::Underperforming,
        SecurityTag::PoorRiskReward,
        SecurityTag::HighDividend,
        SecurityTag::DividendGrower,
        SecurityTag::QualityGatePass,
        SecurityTag::QualityGateFail,
        SecurityTag::BelowMinimumReturn,
        SecurityTag::ValueTrap,
        SecurityTag::BubbleRisk,
        SecurityTag::QuantumBubbleWarning,
        SecurityTag::QuantumValueWarning,
        SecurityTag::RegimeBullGrowth,
        SecurityTag::RegimeBearSafe,
        SecurityTag::RegimeSidewaysValue,
        SecurityTag::RecoveryCandidate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityTag::HighQuality => "high-quality",
            SecurityTag::StableFundamentals => "stable-fundamentals",
            SecurityTag::ConsistentGrower => "consistent-grower",
            SecurityTag::QualityValue => "quality-value",
            SecurityTag::ExceptionalQuality => "exceptional-quality",
            SecurityTag::ValueOpportunity => "value-opportunity",
            SecurityTag::DeepValue => "deep-value",
            SecurityTag::NearHigh => "near-high",
            SecurityTag::LowRisk => "low-risk",
            SecurityTag::HighRisk => "high-risk",
            SecurityTag::Volatile => "volatile",
            SecurityTag::Oversold => "oversold",
            SecurityTag::Overbought => "overbought",
            SecurityTag::PositiveMomentum => "positive-momentum",
            SecurityTag::NegativeMomentum => "negative-momentum",
            SecurityTag::StrongPerformer => "strong-performer",
            SecurityTag::Underperforming => "underperforming",
            SecurityTag::PoorRiskReward => "poor-risk-reward",
            SecurityTag::HighDividend => "high-dividend",
            SecurityTag::DividendGrower => "dividend-grower",
            SecurityTag::QualityGatePass => "quality-gate-pass",
            SecurityTag::QualityGateFail => "quality-gate-fail",
            SecurityTag::BelowMinimumReturn => "below-minimum-return",
            SecurityTag::ValueTrap => "value-trap",
            SecurityTag::BubbleRisk => "bubble-risk",
            SecurityTag::QuantumBubbleWarning => "quantum-bubble-warning",
            SecurityTag::QuantumValueWarning => "quantum-value-warning",
            SecurityTag::RegimeBullGrowth => "regime-bull-growth",
            SecurityTag::RegimeBearSafe => "regime-bear-safe",
            SecurityTag::RegimeSidewaysValue => "regime-sideways-value",
            SecurityTag::RecoveryCandidate => "recovery-candidate",
        }
    }

    /// Tags that remove a security from every buy-side calculator.
    pub fn is_disqualifying(&self) -> bool {
        matches!(
            self,
            SecurityTag::ValueTrap
                | SecurityTag::BubbleRisk
                | SecurityTag::QualityGateFail
                | SecurityTag::BelowMinimumReturn
        )
    }

    /// Warnings raised by the quantum bubble/trap heuristics.
    pub fn is_quantum_warning(&self) -> bool {
        matches!(
            self,
            SecurityTag::QuantumBubbleWarning | SecurityTag::QuantumValueWarning
        )
    }

    /// Plain words used in exclusion reasons.
    pub fn describe(&self) -> &'static str {
        match self {
            SecurityTag::ValueTrap => "value trap",
            SecurityTag::BubbleRisk => "bubble risk",
            SecurityTag::QualityGateFail => "failed quality gate",
            SecurityTag::BelowMinimumReturn => "below minimum return",
            SecurityTag::QuantumBubbleWarning => "quantum bubble warning",
            SecurityTag::QuantumValueWarning => "quantum value trap warning",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SecurityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SecurityTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == needle)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown security tag: {}", s)))
    }
}

/// Parse free-form tag strings, skipping names outside the vocabulary.
pub fn parse_tags<'a>(names: impl IntoIterator<Item = &'a str>) -> TagSet {
    names
        .into_iter()
        .filter_map(|name| match name.parse::<SecurityTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                tracing::debug!("Ignoring unknown tag: {}", name);
                None
            }
        })
        .collect()
}

/// First disqualifying tag in a set, if any.
pub fn first_disqualifying(tags: &TagSet) -> Option<SecurityTag> {
    tags.iter().copied().find(SecurityTag::is_disqualifying)
}

/// Why a trade candidate qualified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateTag {
    Rebalance,
    Buy,
    Sell,
    Underweight,
    ProfitTaking,
    Windfall,
    AveragingDown,
    Opportunity,
    KellySized,
}

impl CandidateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateTag::Rebalance => "rebalance",
            CandidateTag::Buy => "buy",
            CandidateTag::Sell => "sell",
            CandidateTag::Underweight => "underweight",
            CandidateTag::ProfitTaking => "profit-taking",
            CandidateTag::Windfall => "windfall",
            CandidateTag::AveragingDown => "averaging-down",
            CandidateTag::Opportunity => "opportunity",
            CandidateTag::KellySized => "kelly-sized",
        }
    }
}

impl fmt::Display for CandidateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for tag in SecurityTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
            assert_eq!(tag.as_str().parse::<SecurityTag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_disqualifying_set() {
        let disqualifying: Vec<_> = SecurityTag::ALL
            .iter()
            .filter(|t| t.is_disqualifying())
            .collect();
        assert_eq!(disqualifying.len(), 4);
        assert!(!SecurityTag::QuantumBubbleWarning.is_disqualifying());
        assert_eq!(SecurityTag::ValueTrap.describe(), "value trap");
    }

    #[test]
    fn test_parse_tags_skips_unknown() {
        let tags = parse_tags(["value-trap", "moonshot", "LOW-RISK"]);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&SecurityTag::ValueTrap));
        assert!(tags.contains(&SecurityTag::LowRisk));
        assert_eq!(first_disqualifying(&tags), Some(SecurityTag::ValueTrap));
    }

    #[test]
    fn test_candidate_tag_serde() {
        let json = serde_json::to_string(&CandidateTag::ProfitTaking).unwrap();
        assert_eq!(json, "\"profit-taking\"");
    }
}
