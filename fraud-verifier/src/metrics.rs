//! Prometheus metrics for the verifier
//!
//! # Metrics
//!
//! - `fraud_verifications_total{source}` - Verifications by scoring source (`ai`, `rules`)
//! - `fraud_risk_level_total{level}` - Verifications by resulting risk level
//! - `fraud_notifications_total{result}` - Alert deliveries (`sent`, `failed`)
//! - `fraud_ai_request_duration_seconds` - Completion round-trip latency
//!
//! Each collector lives in a private registry so several verifiers can
//! coexist in one process.

use crate::error::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use risk_engine::RiskLevel;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct VerifierMetrics {
    /// Verifications by source
    pub verifications: IntCounterVec,

    /// Verifications by risk level
    pub risk_levels: IntCounterVec,

    /// Alert deliveries by result
    pub notifications: IntCounterVec,

    /// Completion latency
    pub ai_request_duration: Histogram,

    registry: Arc<Registry>,
}

impl VerifierMetrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let verifications = IntCounterVec::new(
            Opts::new("fraud_verifications_total", "Verifications by scoring source"),
            &["source"],
        )?;
        registry.register(Box::new(verifications.clone()))?;

        let risk_levels = IntCounterVec::new(
            Opts::new("fraud_risk_level_total", "Verifications by resulting risk level"),
            &["level"],
        )?;
        registry.register(Box::new(risk_levels.clone()))?;

        let notifications = IntCounterVec::new(
            Opts::new("fraud_notifications_total", "Fraud alert deliveries"),
            &["result"],
        )?;
        registry.register(Box::new(notifications.clone()))?;

        let ai_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "fraud_ai_request_duration_seconds",
                "Completion service round-trip latency",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(ai_request_duration.clone()))?;

        Ok(Self {
            verifications,
            risk_levels,
            notifications,
            ai_request_duration,
            registry,
        })
    }

    /// Count a finished verification
    pub fn record_verification(&self, source: &str, level: RiskLevel) {
        self.verifications.with_label_values(&[source]).inc();
        self.risk_levels.with_label_values(&[level.as_str()]).inc();
    }

    /// Count an alert delivery attempt
    pub fn record_notification(&self, delivered: bool) {
        let result = if delivered { "sent" } else { "failed" };
        self.notifications.with_label_values(&[result]).inc();
    }

    /// Render in the Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
