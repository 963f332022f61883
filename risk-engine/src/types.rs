//! Core types for risk engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency every normalized amount is expressed in
pub const CURRENCY_INR: &str = "INR";

/// Amount as supplied by the caller, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Numeric amount, used as-is when finite and non-negative
    Number(f64),
    /// Free-form text such as `"₹12,000"`
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

/// Verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Opaque transaction identifier
    pub transaction_id: String,

    /// Optional raw amount
    #[serde(default)]
    pub amount: Option<RawAmount>,

    /// Optional alert recipient
    #[serde(default)]
    pub email: Option<String>,
}

impl TransactionInput {
    /// Create input with only a transaction id
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount: None,
            email: None,
        }
    }

    /// Attach a raw amount
    pub fn with_amount(mut self, amount: impl Into<RawAmount>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Attach an alert recipient
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Recipient e-mail, if one was given and is not blank
    pub fn recipient(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Payment method resolved from the transaction id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment
    Card,
    /// Bank transfer (default)
    BankTransfer,
    /// First use of a card
    NewCard,
    /// International payment
    International,
    /// Gift card
    GiftCard,
}

impl PaymentMethod {
    /// Wire name, also the keyword searched for in transaction ids
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::NewCard => "new_card",
            PaymentMethod::International => "international",
            PaymentMethod::GiftCard => "gift_card",
        }
    }

    /// Methods that add to the fraud score
    pub fn is_high_risk(&self) -> bool {
        matches!(
            self,
            PaymentMethod::NewCard | PaymentMethod::International | PaymentMethod::GiftCard
        )
    }

    /// Method implied by the id before high-risk keywords are applied
    pub fn base_for(transaction_id: &str) -> Self {
        if transaction_id.contains("card") {
            PaymentMethod::Card
        } else {
            PaymentMethod::BankTransfer
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction after amount normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    /// Transaction id as supplied
    pub id: String,

    /// Amount in rupees, finite and non-negative
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Always `INR`
    pub currency: String,

    /// Normalization time
    pub timestamp: DateTime<Utc>,

    /// Resolved payment method
    pub payment_method: PaymentMethod,

    /// Triggered rule descriptions, in rule order
    pub risk_factors: Vec<String>,
}

impl NormalizedTransaction {
    /// Create a transaction stamped with the current time
    pub fn new(id: impl Into<String>, amount: Decimal) -> Self {
        let id = id.into();
        let payment_method = PaymentMethod::base_for(&id);
        Self {
            id,
            amount,
            currency: CURRENCY_INR.to_string(),
            timestamp: Utc::now(),
            payment_method,
            risk_factors: Vec::new(),
        }
    }
}

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score, clamped to 100
    pub fn new(score: u8) -> Self {
        Self(score.min(100))
    }

    /// Clamp an accumulated rule total
    pub fn from_total(total: u32) -> Self {
        Self(total.min(100) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five fixed checks, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckName {
    /// Amount above the medium threshold
    UnusualAmount,
    /// Suspicious keyword in id
    VelocityCheck,
    /// Unusual numeric suffix
    PatternAnalysis,
    /// Time-of-day keyword in id
    TimeAnalysis,
    /// Amount is a round number
    RoundAmount,
}

impl CheckName {
    /// All checks in report order
    pub const ALL: [CheckName; 5] = [
        CheckName::UnusualAmount,
        CheckName::VelocityCheck,
        CheckName::PatternAnalysis,
        CheckName::TimeAnalysis,
        CheckName::RoundAmount,
    ];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::UnusualAmount => "Unusual Amount",
            CheckName::VelocityCheck => "Velocity Check",
            CheckName::PatternAnalysis => "Pattern Analysis",
            CheckName::TimeAnalysis => "Time Analysis",
            CheckName::RoundAmount => "Round Amount",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name
    pub name: String,

    /// `true` when the check found nothing suspicious
    #[serde(rename = "status", alias = "passed")]
    pub passed: bool,

    /// Human-readable explanation
    pub explanation: String,
}

impl CheckResult {
    /// Create a check result
    pub fn new(name: CheckName, passed: bool, explanation: impl Into<String>) -> Self {
        Self {
            name: name.as_str().to_string(),
            passed,
            explanation: explanation.into(),
        }
    }
}

/// Fraud analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAnalysis {
    /// Score in 0-100
    pub fraud_score: u8,

    /// `fraud_score` above the medium threshold
    pub is_suspicious: bool,

    /// Bucket derived from `fraud_score`
    pub risk_level: RiskLevel,

    /// Exactly five check results in fixed order
    pub details: Vec<CheckResult>,

    /// One-sentence summary
    pub explanation: String,
}
