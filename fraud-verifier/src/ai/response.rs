//! Pulling a fraud analysis out of free-form completion text

use crate::error::{Result, VerifierError};
use lazy_static::lazy_static;
use regex::Regex;
use risk_engine::{CheckName, CheckResult, FraudAnalysis, RiskScore, RiskThresholds};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

lazy_static! {
    static ref FENCED_JSON: Regex =
        Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").expect("regex is valid");
}

/// Analysis as the completion service writes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionAnalysis {
    fraud_score: f64,
    #[serde(default)]
    is_suspicious: Option<bool>,
    #[serde(default)]
    risk_level: Option<String>,
    details: Vec<CheckResult>,
    explanation: String,
}

/// Locate and parse the JSON object in `text`
///
/// A ```` ```json ```` fenced block wins. Otherwise the first complete JSON
/// value starting at the first `{` is used; trailing prose is ignored.
pub fn extract_json(text: &str) -> Result<Value> {
    if let Some(captures) = FENCED_JSON.captures(text) {
        let block = captures.get(1).map_or("", |m| m.as_str());
        return serde_json::from_str(block).map_err(|e| {
            VerifierError::AiResponse(format!("Failed to parse fenced JSON block: {}", e))
        });
    }

    let start = text
        .find('{')
        .ok_or_else(|| VerifierError::AiResponse("Response did not contain JSON".to_string()))?;

    let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(VerifierError::AiResponse(format!(
            "Failed to parse JSON in response: {}",
            e
        ))),
        None => Err(VerifierError::AiResponse(
            "Response did not contain JSON".to_string(),
        )),
    }
}

/// Parse a completion into a [`FraudAnalysis`]
///
/// The score is rounded and clamped to 0-100; risk level and the suspicious
/// flag are recomputed from it with `thresholds`, whatever the service said.
pub fn parse_analysis(text: &str, thresholds: &RiskThresholds) -> Result<FraudAnalysis> {
    let value = extract_json(text)?;
    let parsed: CompletionAnalysis = serde_json::from_value(value)
        .map_err(|e| VerifierError::AiResponse(format!("Unexpected analysis shape: {}", e)))?;

    if !parsed.fraud_score.is_finite() {
        return Err(VerifierError::AiResponse(format!(
            "Fraud score is not a number: {}",
            parsed.fraud_score
        )));
    }

    if parsed.details.len() != CheckName::ALL.len() {
        return Err(VerifierError::AiResponse(format!(
            "Expected {} check results, got {}",
            CheckName::ALL.len(),
            parsed.details.len()
        )));
    }

    let score = RiskScore::new(parsed.fraud_score.round().clamp(0.0, 100.0) as u8);
    let risk_level = thresholds.level_for(score);
    let is_suspicious = thresholds.is_suspicious(score);

    if parsed.risk_level.as_deref() != Some(risk_level.as_str())
        || parsed.is_suspicious != Some(is_suspicious)
    {
        debug!(
            "Completion reported level {:?} / suspicious {:?}, using {} / {} for score {}",
            parsed.risk_level, parsed.is_suspicious, risk_level, is_suspicious, score
        );
    }

    Ok(FraudAnalysis {
        fraud_score: score.score(),
        is_suspicious,
        risk_level,
        details: parsed.details,
        explanation: parsed.explanation,
    })
}
