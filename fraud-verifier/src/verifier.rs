//! Verification pipeline
//!
//! Normalize once, score through the completion service when one is
//! configured, fall back to the rule engine otherwise, then raise an alert
//! for risky transactions.

use crate::ai::{build_prompt, parse_analysis, CompletionClient, GeminiClient};
use crate::config::Config;
use crate::error::{Result, VerifierError};
use crate::metrics::VerifierMetrics;
use crate::notifier::{FraudAlert, FraudNotifier, HttpNotifier, LogNotifier};
use risk_engine::{
    AmountNormalizer, FraudAnalysis, NormalizedTransaction, RiskScore, RiskScorer,
    TransactionInput,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Which path produced the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Ai,
    Rules,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Ai => "ai",
            AnalysisSource::Rules => "rules",
        }
    }
}

/// Why the rule engine scored a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No completion client configured
    NotConfigured,
    /// The completion request did not return text
    RequestFailed(String),
    /// The completion text held no usable analysis
    MalformedResponse(String),
}

impl FallbackReason {
    /// The completion service was tried and failed
    pub fn is_failure(&self) -> bool {
        !matches!(self, FallbackReason::NotConfigured)
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured => f.write_str("AI service not configured"),
            FallbackReason::RequestFailed(e) => write!(f, "AI request failed: {}", e),
            FallbackReason::MalformedResponse(e) => write!(f, "AI response unusable: {}", e),
        }
    }
}

/// Result of scoring one transaction
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringOutcome {
    /// The completion service produced the analysis
    Delegated(FraudAnalysis),
    /// The rule engine produced the analysis
    Fallback {
        analysis: FraudAnalysis,
        reason: FallbackReason,
    },
}

impl ScoringOutcome {
    pub fn analysis(&self) -> &FraudAnalysis {
        match self {
            ScoringOutcome::Delegated(analysis) => analysis,
            ScoringOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    pub fn into_analysis(self) -> FraudAnalysis {
        match self {
            ScoringOutcome::Delegated(analysis) => analysis,
            ScoringOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    pub fn source(&self) -> AnalysisSource {
        match self {
            ScoringOutcome::Delegated(_) => AnalysisSource::Ai,
            ScoringOutcome::Fallback { .. } => AnalysisSource::Rules,
        }
    }
}

/// Verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verification_id: Uuid,
    pub success: bool,
    pub transaction: NormalizedTransaction,
    pub fraud_analysis: FraudAnalysis,
    pub source: AnalysisSource,
}

/// Transaction fraud verifier
pub struct FraudVerifier {
    scorer: RiskScorer,
    ai: Option<Arc<dyn CompletionClient>>,
    notifier: Option<Arc<dyn FraudNotifier>>,
    fallback_enabled: bool,
    metrics: VerifierMetrics,
}

impl FraudVerifier {
    /// Rules-only verifier with no alert delivery
    pub fn new(scorer: RiskScorer) -> Result<Self> {
        Ok(Self {
            scorer,
            ai: None,
            notifier: None,
            fallback_enabled: true,
            metrics: VerifierMetrics::new()?,
        })
    }

    /// Wire collaborators from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let scorer = RiskScorer::new(config.scorer.clone())?;
        let mut verifier = Self::new(scorer)?.with_fallback(config.fallback_enabled);

        if config.ai.is_enabled() {
            verifier = verifier.with_completion_client(Arc::new(GeminiClient::new(&config.ai)?));
        } else {
            info!("No AI api key configured, scoring with rules only");
        }

        verifier = match HttpNotifier::from_config(&config.notifier)? {
            Some(notifier) => verifier.with_notifier(Arc::new(notifier)),
            None => verifier.with_notifier(Arc::new(LogNotifier)),
        };

        Ok(verifier)
    }

    pub fn with_completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.ai = Some(client);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn FraudNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Disabled, completion failures are returned instead of scored by rules
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    pub fn metrics(&self) -> &VerifierMetrics {
        &self.metrics
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Score `transaction`, delegating to the completion service when possible
    ///
    /// On fallback the rule engine writes the resolved payment method and risk
    /// factors back into `transaction`.
    pub async fn analyze(&self, transaction: &mut NormalizedTransaction) -> ScoringOutcome {
        let reason = match &self.ai {
            None => FallbackReason::NotConfigured,
            Some(client) => match self.delegate(client.as_ref(), transaction).await {
                Ok(analysis) => return ScoringOutcome::Delegated(analysis),
                Err(reason) => {
                    warn!(
                        "Falling back to rule engine for {}: {}",
                        transaction.id, reason
                    );
                    reason
                }
            },
        };

        let analysis = self.scorer.assess(transaction);
        ScoringOutcome::Fallback { analysis, reason }
    }

    async fn delegate(
        &self,
        client: &dyn CompletionClient,
        transaction: &NormalizedTransaction,
    ) -> std::result::Result<FraudAnalysis, FallbackReason> {
        let prompt = build_prompt(transaction);

        let started = Instant::now();
        let response = client.complete(&prompt).await;
        self.metrics
            .ai_request_duration
            .observe(started.elapsed().as_secs_f64());

        let text = response.map_err(|e| FallbackReason::RequestFailed(e.to_string()))?;
        parse_analysis(&text, &self.scorer.config().risk_thresholds)
            .map_err(|e| FallbackReason::MalformedResponse(e.to_string()))
    }

    /// Verify a transaction end to end
    pub async fn verify(&self, input: &TransactionInput) -> Result<VerificationResult> {
        if input.transaction_id.trim().is_empty() {
            return Err(VerifierError::InvalidInput(
                "transaction id is required".to_string(),
            ));
        }

        let amount = AmountNormalizer::normalize(input.amount.as_ref(), &input.transaction_id);
        debug!("Normalized amount for {}: {}", input.transaction_id, amount);

        let mut transaction = NormalizedTransaction::new(input.transaction_id.clone(), amount);
        let outcome = self.analyze(&mut transaction).await;

        if let ScoringOutcome::Fallback { reason, .. } = &outcome {
            if reason.is_failure() && !self.fallback_enabled {
                return Err(VerifierError::AiService(reason.to_string()));
            }
        }

        let source = outcome.source();
        let analysis = outcome.into_analysis();

        info!(
            transaction_id = %transaction.id,
            score = analysis.fraud_score,
            level = %analysis.risk_level,
            source = source.as_str(),
            "Transaction verified"
        );
        self.metrics.record_verification(source.as_str(), analysis.risk_level);

        if let Some(email) = input.recipient() {
            self.raise_alert(email, &transaction, &analysis).await;
        }

        Ok(VerificationResult {
            verification_id: Uuid::new_v4(),
            success: true,
            transaction,
            fraud_analysis: analysis,
            source,
        })
    }

    async fn raise_alert(&self, email: &str, transaction: &NormalizedTransaction, analysis: &FraudAnalysis) {
        let thresholds = &self.scorer.config().risk_thresholds;
        if !thresholds.warrants_alert(RiskScore::new(analysis.fraud_score)) {
            return;
        }

        let Some(notifier) = &self.notifier else {
            debug!("No notifier configured, skipping alert for {}", transaction.id);
            return;
        };

        let alert = FraudAlert::new(email, transaction.id.clone(), analysis);
        match notifier.notify(&alert).await {
            Ok(()) => self.metrics.record_notification(true),
            Err(e) => {
                warn!("Fraud alert for {} not delivered: {}", transaction.id, e);
                self.metrics.record_notification(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::RiskLevel;

    fn verifier() -> FraudVerifier {
        FraudVerifier::new(RiskScorer::default()).unwrap()
    }

    #[tokio::test]
    async fn test_rules_only_outcome() {
        let verifier = verifier();
        let mut txn = NormalizedTransaction::new("txn_abc", rust_decimal::Decimal::from(750));

        let outcome = verifier.analyze(&mut txn).await;
        assert_eq!(outcome.source(), AnalysisSource::Rules);
        assert!(matches!(
            outcome,
            ScoringOutcome::Fallback {
                reason: FallbackReason::NotConfigured,
                ..
            }
        ));
        assert_eq!(outcome.analysis().fraud_score, 10);
    }

    #[tokio::test]
    async fn test_blank_id_rejected() {
        let err = verifier().verify(&TransactionInput::new("   ")).await.unwrap_err();
        assert!(matches!(err, VerifierError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_result_serialization() {
        let result = verifier()
            .verify(&TransactionInput::new("txn_1").with_amount(500.0))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.fraud_analysis.fraud_score, 20);
        assert_eq!(result.fraud_analysis.risk_level, RiskLevel::Low);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["source"], "rules");
        assert_eq!(value["transaction"]["amount"], 500.0);
        assert_eq!(value["fraudAnalysis"]["fraudScore"], 20);
        assert!(value["verificationId"].is_string());
    }

    #[test]
    fn test_fallback_reason_failure_flag() {
        assert!(!FallbackReason::NotConfigured.is_failure());
        assert!(FallbackReason::RequestFailed("timeout".into()).is_failure());
        assert!(FallbackReason::MalformedResponse("no json".into()).is_failure());
    }

    #[test]
    fn test_from_config_rules_only() {
        let verifier = FraudVerifier::from_config(&Config::default()).unwrap();
        assert!(verifier.ai.is_none());
        assert!(verifier.notifier.is_some());
    }
}
