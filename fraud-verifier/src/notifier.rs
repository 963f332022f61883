//! Fraud alert delivery
//!
//! Alerts go out when a score passes the low-risk threshold and the caller
//! supplied a recipient. Delivery is best effort: the verifier logs a failed
//! alert and still returns its result.

use crate::config::NotifierConfig;
use crate::error::{Result, VerifierError};
use async_trait::async_trait;
use reqwest::Client;
use risk_engine::{FraudAnalysis, RiskLevel};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Alert raised for a risky transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAlert {
    /// Recipient address
    pub email: String,
    pub transaction_id: String,
    pub fraud_score: u8,
    pub risk_level: RiskLevel,
    pub explanation: String,
}

/// Rendered alert e-mail
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl FraudAlert {
    pub fn new(email: impl Into<String>, transaction_id: impl Into<String>, analysis: &FraudAnalysis) -> Self {
        Self {
            email: email.into(),
            transaction_id: transaction_id.into(),
            fraud_score: analysis.fraud_score,
            risk_level: analysis.risk_level,
            explanation: analysis.explanation.clone(),
        }
    }

    /// Render the alert as an HTML e-mail
    pub fn email(&self) -> AlertEmail {
        let colour = match self.risk_level {
            RiskLevel::High => "red",
            RiskLevel::Medium => "orange",
            RiskLevel::Low => "green",
        };

        let html = format!(
            "<h2>Fraud Alert</h2>\
             <p>A potentially fraudulent transaction has been detected.</p>\
             <p><strong>Transaction ID:</strong> {id}</p>\
             <p><strong>Fraud Score:</strong> {score}/100</p>\
             <p><strong>Risk Level:</strong> <span style=\"color: {colour}\">{level}</span></p>\
             <p><strong>Explanation:</strong> {explanation}</p>\
             <p>Please review this transaction as soon as possible.</p>\
             <p><em>This is an automated message from the fraud detection system.</em></p>",
            id = escape_html(&self.transaction_id),
            score = self.fraud_score,
            colour = colour,
            level = self.risk_level,
            explanation = escape_html(&self.explanation),
        );

        AlertEmail {
            to: self.email.clone(),
            subject: format!("Fraud Alert: Transaction {}", self.transaction_id),
            html,
        }
    }
}

/// Body posted to the alert relay: the alert plus its rendered e-mail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload<'a> {
    #[serde(flatten)]
    pub alert: &'a FraudAlert,
    pub subject: String,
    pub html: String,
}

impl<'a> RelayPayload<'a> {
    pub fn new(alert: &'a FraudAlert) -> Self {
        let email = alert.email();
        Self {
            alert,
            subject: email.subject,
            html: email.html,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sink for fraud alerts
#[async_trait]
pub trait FraudNotifier: Send + Sync {
    async fn notify(&self, alert: &FraudAlert) -> Result<()>;
}

/// Posts alerts as JSON to a relay endpoint
pub struct HttpNotifier {
    endpoint: String,
    client: Client,
}

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifierError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Build from config; `None` when no endpoint is configured
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>> {
        config
            .endpoint
            .as_ref()
            .map(|endpoint| Self::new(endpoint.clone(), Duration::from_secs(config.request_timeout_secs)))
            .transpose()
    }
}

#[async_trait]
impl FraudNotifier for HttpNotifier {
    async fn notify(&self, alert: &FraudAlert) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayPayload::new(alert))
            .send()
            .await
            .map_err(|e| VerifierError::Notification(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VerifierError::Notification(format!(
                "Alert relay returned {}: {}",
                status, error_text
            )));
        }

        info!(
            "Fraud alert for {} delivered to {}",
            alert.transaction_id, alert.email
        );
        Ok(())
    }
}

/// Writes alerts to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl FraudNotifier for LogNotifier {
    async fn notify(&self, alert: &FraudAlert) -> Result<()> {
        let email = alert.email();
        warn!(
            to = %email.to,
            score = alert.fraud_score,
            level = %alert.risk_level,
            "{}",
            email.subject
        );
        debug!(to = %email.to, "{}", email.html);
        Ok(())
    }
}
