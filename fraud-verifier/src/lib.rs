//! Fraud verification service
//!
//! Scores transactions through a generative-text completion service and
//! falls back to the deterministic rules in [`risk_engine`] when that
//! service is unavailable or answers with something unusable. Risky
//! transactions raise an alert to the caller-supplied recipient.
//!
//! ```no_run
//! use fraud_verifier::{Config, FraudVerifier};
//! use risk_engine::TransactionInput;
//!
//! # async fn run() -> fraud_verifier::Result<()> {
//! let verifier = FraudVerifier::from_config(&Config::from_env()?)?;
//! let result = verifier
//!     .verify(&TransactionInput::new("txn_urgent_999").with_amount("₹12,000"))
//!     .await?;
//! println!("{}", result.fraud_analysis.fraud_score);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod ai;
pub mod config;
pub mod error;
pub mod metrics;
pub mod notifier;
pub mod verifier;

pub use ai::{CompletionClient, GeminiClient};
pub use config::{AiConfig, Config, NotifierConfig};
pub use error::{Result, VerifierError};
pub use metrics::VerifierMetrics;
pub use notifier::{AlertEmail, FraudAlert, FraudNotifier, HttpNotifier, LogNotifier, RelayPayload};
pub use verifier::{AnalysisSource, FallbackReason, FraudVerifier, ScoringOutcome, VerificationResult};
