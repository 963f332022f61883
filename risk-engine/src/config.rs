//! Scorer configuration
//!
//! Thresholds, weights and keyword lists are plain data handed to
//! [`RiskScorer`](crate::RiskScorer) at construction, so tests can vary them
//! without touching shared state.

use crate::{Error, Result, RiskLevel, RiskScore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Complete scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Score to risk level boundaries
    pub risk_thresholds: RiskThresholds,

    /// Amount tier boundaries (INR)
    pub amount_thresholds: AmountThresholds,

    /// Points per triggered rule
    pub weights: RuleWeights,

    /// An amount divisible by any of these is "round"
    pub round_divisors: Vec<Decimal>,

    /// Score reported when no rule fires
    pub floor_score: u8,

    /// Substrings searched for in transaction ids
    pub keywords: RiskKeywords,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            risk_thresholds: RiskThresholds::default(),
            amount_thresholds: AmountThresholds::default(),
            weights: RuleWeights::default(),
            round_divisors: vec![
                Decimal::from(1_000),
                Decimal::from(500),
                Decimal::from(100),
            ],
            floor_score: 10,
            keywords: RiskKeywords::default(),
        }
    }
}

impl ScorerConfig {
    /// Amount divisible by any configured divisor
    pub fn is_round_amount(&self, amount: Decimal) -> bool {
        self.round_divisors
            .iter()
            .any(|divisor| (amount % *divisor).is_zero())
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        let rt = &self.risk_thresholds;
        if rt.low >= rt.medium || rt.medium >= 100 {
            return Err(Error::InvalidConfig(format!(
                "risk thresholds must satisfy low < medium < 100 (got {} / {})",
                rt.low, rt.medium
            )));
        }

        let at = &self.amount_thresholds;
        if at.low.is_sign_negative() || at.low >= at.medium || at.medium >= at.high {
            return Err(Error::InvalidConfig(format!(
                "amount thresholds must satisfy 0 <= low < medium < high (got {} / {} / {})",
                at.low, at.medium, at.high
            )));
        }

        if at.high > Decimal::MAX / Decimal::TWO {
            return Err(Error::InvalidConfig(format!(
                "high amount threshold is too large (got {})",
                at.high
            )));
        }

        if let Some((name, weight)) = self
            .weights
            .entries()
            .into_iter()
            .find(|(_, weight)| *weight > MAX_RULE_WEIGHT)
        {
            return Err(Error::InvalidConfig(format!(
                "weight '{}' must be at most {} (got {})",
                name, MAX_RULE_WEIGHT, weight
            )));
        }

        if self.round_divisors.iter().any(|d| d <= &Decimal::ZERO) {
            return Err(Error::InvalidConfig(
                "round divisors must be positive".to_string(),
            ));
        }

        if self.floor_score == 0 || self.floor_score > 100 {
            return Err(Error::InvalidConfig(format!(
                "floor score must be in 1..=100 (got {})",
                self.floor_score
            )));
        }

        let kw = &self.keywords;
        let lists: [(&str, &Vec<String>); 3] = [
            ("suspicious", &kw.suspicious),
            ("patterns", &kw.patterns),
            ("time_indicators", &kw.time_indicators),
        ];
        for (name, list) in lists {
            if list.iter().any(|k| k.is_empty()) {
                return Err(Error::InvalidConfig(format!(
                    "keyword list '{}' contains an empty entry",
                    name
                )));
            }
        }

        if let Some(method) = kw.high_risk_methods.iter().find(|m| !m.is_high_risk()) {
            return Err(Error::InvalidConfig(format!(
                "payment method '{}' is not a high-risk method",
                method
            )));
        }

        Ok(())
    }
}

/// Risk level boundaries
///
/// `score <= low` is Low, `score <= medium` is Medium, anything above is High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Upper bound of Low (inclusive)
    pub low: u8,

    /// Upper bound of Medium (inclusive)
    pub medium: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { low: 30, medium: 70 }
    }
}

impl RiskThresholds {
    /// Map a score to its level
    pub fn level_for(&self, score: RiskScore) -> RiskLevel {
        match score.score() {
            s if s <= self.low => RiskLevel::Low,
            s if s <= self.medium => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    /// Only High scores are suspicious
    pub fn is_suspicious(&self, score: RiskScore) -> bool {
        score.score() > self.medium
    }

    /// Scores above Low warrant an alert
    pub fn warrants_alert(&self, score: RiskScore) -> bool {
        score.score() > self.low
    }
}

/// Amount tier boundaries in rupees
///
/// The top tier starts at twice `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountThresholds {
    /// Above this: medium tier
    pub low: Decimal,

    /// Above this: high tier, and the Unusual Amount check fails
    pub medium: Decimal,

    /// Above this: very high tier
    pub high: Decimal,
}

impl Default for AmountThresholds {
    fn default() -> Self {
        Self {
            low: Decimal::from(1_000),
            medium: Decimal::from(5_000),
            high: Decimal::from(10_000),
        }
    }
}

impl AmountThresholds {
    /// Lower bound of the extreme tier
    pub fn extreme(&self) -> Decimal {
        self.high.checked_mul(Decimal::TWO).unwrap_or(Decimal::MAX)
    }
}

/// Upper bound for a single rule weight
pub const MAX_RULE_WEIGHT: u32 = 100;

/// Points added per triggered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleWeights {
    /// Per suspicious keyword hit
    pub suspicious_keyword: u32,
    /// Per unusual suffix
    pub unusual_pattern: u32,
    /// Amount above twice the high threshold
    pub extreme_amount: u32,
    /// Amount above the high threshold
    pub very_high_amount: u32,
    /// Amount above the medium threshold
    pub high_amount: u32,
    /// Amount above the low threshold
    pub medium_amount: u32,
    /// Round amount, applied once
    pub round_amount: u32,
    /// Per time indicator hit
    pub time_indicator: u32,
    /// Per high-risk payment method hit
    pub high_risk_method: u32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            suspicious_keyword: 25,
            unusual_pattern: 15,
            extreme_amount: 70,
            very_high_amount: 50,
            high_amount: 30,
            medium_amount: 15,
            round_amount: 20,
            time_indicator: 20,
            high_risk_method: 30,
        }
    }
}

impl RuleWeights {
    /// Every weight with its config name
    pub fn entries(&self) -> [(&'static str, u32); 9] {
        [
            ("suspicious_keyword", self.suspicious_keyword),
            ("unusual_pattern", self.unusual_pattern),
            ("extreme_amount", self.extreme_amount),
            ("very_high_amount", self.very_high_amount),
            ("high_amount", self.high_amount),
            ("medium_amount", self.medium_amount),
            ("round_amount", self.round_amount),
            ("time_indicator", self.time_indicator),
            ("high_risk_method", self.high_risk_method),
        ]
    }
}

/// Keyword lists matched against transaction ids
///
/// Reading intent out of an opaque id is a demo heuristic kept for
/// compatibility with existing test ids; it says nothing about real fraud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskKeywords {
    /// Case-insensitive substrings
    pub suspicious: Vec<String>,

    /// Case-sensitive suffixes
    pub patterns: Vec<String>,

    /// Case-insensitive substrings
    pub time_indicators: Vec<String>,

    /// Case-insensitive substrings, matched by wire name
    pub high_risk_methods: Vec<crate::PaymentMethod>,
}

impl Default for RiskKeywords {
    fn default() -> Self {
        use crate::PaymentMethod;

        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            suspicious: owned(&["fraud", "suspicious", "urgent", "immediate"]),
            patterns: owned(&["999", "888", "777", "666"]),
            time_indicators: owned(&["night", "late", "midnight", "early"]),
            high_risk_methods: vec![
                PaymentMethod::NewCard,
                PaymentMethod::International,
                PaymentMethod::GiftCard,
            ],
        }
    }
}

impl RiskKeywords {
    /// Suspicious keywords contained in `id_lower`, in list order
    pub fn suspicious_hits<'a>(&'a self, id_lower: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        contained(&self.suspicious, id_lower)
    }

    /// Time indicators contained in `id_lower`, in list order
    pub fn time_hits<'a>(&'a self, id_lower: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        contained(&self.time_indicators, id_lower)
    }

    /// Patterns `id` ends with, in list order
    pub fn pattern_hits<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns
            .iter()
            .map(String::as_str)
            .filter(move |p| id.ends_with(p))
    }
}

fn contained<'a>(words: &'a [String], haystack: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    words
        .iter()
        .map(|w| w.as_str())
        .filter(move |w| haystack.contains(&w.to_lowercase()))
}
