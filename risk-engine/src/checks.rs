//! Per-check pass/fail results
//!
//! Each check is an independent predicate over the id and amount; none of
//! them look at the accumulated score.

use crate::{CheckName, CheckResult, ScorerConfig};
use rust_decimal::Decimal;

/// Builds the fixed five-entry check report
pub struct CheckSynthesizer<'a> {
    config: &'a ScorerConfig,
}

impl<'a> CheckSynthesizer<'a> {
    /// Create a synthesizer over `config`
    pub fn new(config: &'a ScorerConfig) -> Self {
        Self { config }
    }

    /// Evaluate all five checks in report order
    pub fn synthesize(&self, transaction_id: &str, amount: Decimal) -> Vec<CheckResult> {
        CheckName::ALL
            .iter()
            .map(|name| self.check(*name, transaction_id, amount))
            .collect()
    }

    /// Evaluate a single check
    pub fn check(&self, name: CheckName, transaction_id: &str, amount: Decimal) -> CheckResult {
        let keywords = &self.config.keywords;
        let id_lower = transaction_id.to_lowercase();

        match name {
            CheckName::UnusualAmount => {
                if amount > self.config.amount_thresholds.medium {
                    CheckResult::new(name, false, format!("Amount ({} INR) is unusually large", amount))
                } else {
                    CheckResult::new(name, true, format!("Amount ({} INR) is within normal range", amount))
                }
            }
            CheckName::VelocityCheck => {
                if keywords.suspicious_hits(&id_lower).next().is_some() {
                    CheckResult::new(name, false, "Multiple transactions detected in short time")
                } else {
                    CheckResult::new(name, true, "Transaction frequency is normal")
                }
            }
            CheckName::PatternAnalysis => {
                if keywords.pattern_hits(transaction_id).next().is_some() {
                    CheckResult::new(name, false, "Unusual transaction pattern detected")
                } else {
                    CheckResult::new(name, true, "No unusual patterns detected")
                }
            }
            CheckName::TimeAnalysis => {
                if keywords.time_hits(&id_lower).next().is_some() {
                    CheckResult::new(name, false, "Transaction occurred at an unusual time")
                } else {
                    CheckResult::new(name, true, "Transaction time is normal")
                }
            }
            CheckName::RoundAmount => {
                if self.config.is_round_amount(amount) {
                    CheckResult::new(name, false, format!("Amount ({} INR) is suspiciously round", amount))
                } else {
                    CheckResult::new(name, true, format!("Amount ({} INR) is not suspiciously round", amount))
                }
            }
        }
    }
}
