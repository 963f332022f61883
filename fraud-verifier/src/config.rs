//! Configuration for the fraud verifier

use crate::error::{Result, VerifierError};
use risk_engine::ScorerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default completion endpoint
pub const DEFAULT_AI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Verifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Fall back to the rule engine when the AI service fails.
    /// Disabled, AI failures are returned to the caller.
    pub fallback_enabled: bool,

    /// Rule engine configuration
    pub scorer: ScorerConfig,

    /// Completion service configuration
    pub ai: AiConfig,

    /// Alert delivery configuration
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "fraud-verifier".to_string(),
            fallback_enabled: true,
            scorer: ScorerConfig::default(),
            ai: AiConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key; the AI path is skipped when unset
    pub api_key: Option<String>,

    /// generateContent endpoint
    pub endpoint: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Top-k sampling
    pub top_k: u32,

    /// Nucleus sampling
    pub top_p: f32,

    /// Response length cap
    pub max_output_tokens: u32,

    /// HTTP transport timeout
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            temperature: 0.2,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            request_timeout_secs: 30,
        }
    }
}

impl AiConfig {
    /// A non-blank API key is configured
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .map_or(false, |key| !key.trim().is_empty())
    }
}

/// Alert delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Alert relay endpoint; alerts are only logged when unset
    pub endpoint: Option<String>,

    /// HTTP transport timeout
    pub request_timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| VerifierError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(key) = lookup("GEMINI_API_KEY") {
            config.ai.api_key = Some(key);
        }

        if let Some(endpoint) = lookup("FRAUD_AI_ENDPOINT") {
            config.ai.endpoint = endpoint;
        }

        if let Some(timeout) = lookup("FRAUD_AI_TIMEOUT_SECS") {
            config.ai.request_timeout_secs = timeout.parse().map_err(|_| {
                VerifierError::Config(format!("FRAUD_AI_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }

        if let Some(url) = lookup("FRAUD_NOTIFY_URL") {
            config.notifier.endpoint = Some(url);
        }

        if let Some(flag) = lookup("FRAUD_FALLBACK_ENABLED") {
            config.fallback_enabled = parse_flag(&flag).ok_or_else(|| {
                VerifierError::Config(format!("FRAUD_FALLBACK_ENABLED is not a boolean: {}", flag))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        self.scorer.validate()?;

        if !self.fallback_enabled && !self.ai.is_enabled() {
            return Err(VerifierError::Config(
                "fallback can only be disabled when an AI api key is configured".to_string(),
            ));
        }

        if self.ai.is_enabled() && !is_http_url(&self.ai.endpoint) {
            return Err(VerifierError::Config(format!(
                "AI endpoint must be an http(s) URL: {}",
                self.ai.endpoint
            )));
        }

        if let Some(endpoint) = &self.notifier.endpoint {
            if !is_http_url(endpoint) {
                return Err(VerifierError::Config(format!(
                    "Notifier endpoint must be an http(s) URL: {}",
                    endpoint
                )));
            }
        }

        if self.ai.request_timeout_secs == 0 || self.notifier.request_timeout_secs == 0 {
            return Err(VerifierError::Config(
                "request timeouts must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid_and_rules_only() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.fallback_enabled);
        assert!(!config.ai.is_enabled());
        assert!(config.notifier.endpoint.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("FRAUD_AI_TIMEOUT_SECS", "5"),
            ("FRAUD_NOTIFY_URL", "http://localhost:7001/api/notifications/fraud-alert"),
            ("FRAUD_FALLBACK_ENABLED", "false"),
        ]))
        .unwrap();

        assert!(config.ai.is_enabled());
        assert_eq!(config.ai.request_timeout_secs, 5);
        assert!(!config.fallback_enabled);
        assert!(config.notifier.endpoint.is_some());
    }

    #[test]
    fn test_disabling_fallback_requires_ai() {
        let result = Config::from_lookup(lookup(&[("FRAUD_FALLBACK_ENABLED", "0")]));
        assert!(matches!(result, Err(VerifierError::Config(_))));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Config::from_lookup(lookup(&[("FRAUD_AI_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FRAUD_FALLBACK_ENABLED", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FRAUD_NOTIFY_URL", "smtp://mail")])).is_err());
    }

    #[test]
    fn test_blank_api_key_disables_ai() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(!config.ai.is_enabled());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
service_name = "fraud-verifier-test"

[ai]
api_key = "k"
temperature = 0.0

[notifier]
endpoint = "https://alerts.example.com/fraud-alert"

[scorer]
floor_score = 5

[scorer.risk_thresholds]
low = 25
medium = 60
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.service_name, "fraud-verifier-test");
        assert!(config.ai.is_enabled());
        assert_eq!(config.ai.endpoint, DEFAULT_AI_ENDPOINT);
        assert_eq!(config.scorer.floor_score, 5);
        assert_eq!(config.scorer.risk_thresholds.medium, 60);
    }

    #[test]
    fn test_from_file_rejects_invalid_scorer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scorer.risk_thresholds]\nlow = 80\nmedium = 40").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(VerifierError::Engine(_))
        ));
    }
}
