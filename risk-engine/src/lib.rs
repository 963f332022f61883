//! Transaction risk engine
//!
//! Deterministic, rule-based fraud scoring for payment transactions: amount
//! normalization, additive rule scoring, the five-check report and the
//! summary sentence. Nothing here does I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod checks;
pub mod config;
pub mod error;
pub mod explanation;
pub mod scoring;
pub mod types;

pub use amount::AmountNormalizer;
pub use checks::CheckSynthesizer;
pub use config::{AmountThresholds, RiskKeywords, RiskThresholds, RuleWeights, ScorerConfig};
pub use error::{Error, Result};
pub use scoring::{RiskScorer, ScoreCard, NO_RISK_FACTORS};
pub use types::*;

/// Normalize and score a transaction with the rule engine alone
pub fn evaluate(scorer: &RiskScorer, input: &TransactionInput) -> (NormalizedTransaction, FraudAnalysis) {
    let amount = AmountNormalizer::normalize(input.amount.as_ref(), &input.transaction_id);
    let mut transaction = NormalizedTransaction::new(input.transaction_id.clone(), amount);
    let analysis = scorer.assess(&mut transaction);
    (transaction, analysis)
}
