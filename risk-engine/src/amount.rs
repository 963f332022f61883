//! Amount normalization
//!
//! Turns whatever the caller supplied into a non-negative rupee amount. Bad or
//! missing input never fails: the amount is derived from the transaction id
//! instead, and failing that from keywords in the id. An empty string counts
//! as missing, while text made only of symbols and spaces (`"₹"`) reads as 0.

use crate::RawAmount;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

/// Id-derived amounts below this are scaled up by 100
const MIN_DERIVED_AMOUNT: u64 = 10;

/// Id-derived amounts are clamped to this
const MAX_DERIVED_AMOUNT: u64 = 100_000;

/// Keyword defaults, checked in order when the id has no digits
const KEYWORD_DEFAULTS: [(&str, u64); 2] = [("huge", 15_000), ("high", 8_000)];
const ROUND_SUFFIXES: [&str; 2] = ["000", "500"];
const ROUND_SUFFIX_DEFAULT: u64 = 5_000;
const MEDIUM_KEYWORD: &str = "medium";
const MEDIUM_DEFAULT: u64 = 3_000;
const DEFAULT_AMOUNT: u64 = 750;

/// Amount normalizer
pub struct AmountNormalizer;

impl AmountNormalizer {
    /// Normalize `raw`, falling back to the id when it is unusable
    pub fn normalize(raw: Option<&RawAmount>, transaction_id: &str) -> Decimal {
        match raw.and_then(Self::parse) {
            Some(amount) => {
                debug!("Using supplied amount {} INR for {}", amount, transaction_id);
                amount
            }
            None => {
                let amount = Self::from_transaction_id(transaction_id);
                debug!("Derived amount {} INR from transaction id {}", amount, transaction_id);
                amount
            }
        }
    }

    /// Parse a supplied amount; `None` if it is unusable
    pub fn parse(raw: &RawAmount) -> Option<Decimal> {
        let parsed = match raw {
            RawAmount::Text(text) if text.is_empty() => None,
            RawAmount::Text(text) => Self::parse_text(text),
            RawAmount::Number(value) if value.is_finite() => Decimal::from_f64(*value),
            RawAmount::Number(_) => None,
        };

        match parsed {
            Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                warn!("Ignoring negative amount {:?}", raw);
                None
            }
            Some(amount) => Some(amount.normalize()),
            None => {
                if !matches!(raw, RawAmount::Text(t) if t.is_empty()) {
                    warn!("Failed to parse amount {:?}", raw);
                }
                None
            }
        }
    }

    fn parse_text(text: &str) -> Option<Decimal> {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '₹' | '$' | ',') && !c.is_whitespace())
            .collect();

        // Only symbols: reads as zero. A blank string never reaches here.
        if cleaned.is_empty() {
            return Some(Decimal::ZERO);
        }

        // Digit separators are not accepted
        if cleaned.contains('_') {
            return None;
        }

        // Exponent notation goes through f64
        Decimal::from_str(&cleaned).ok().or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .and_then(Decimal::from_f64)
        })
    }

    /// Derive an amount from the transaction id alone
    pub fn from_transaction_id(transaction_id: &str) -> Decimal {
        let amount = match first_digit_run(transaction_id) {
            Some(digits) => {
                // Runs too long for u64 are far above the clamp anyway
                let value = digits.parse::<u64>().unwrap_or(MAX_DERIVED_AMOUNT);
                let value = if value < MIN_DERIVED_AMOUNT { value * 100 } else { value };
                value.min(MAX_DERIVED_AMOUNT)
            }
            None => Self::keyword_default(transaction_id),
        };
        Decimal::from(amount)
    }

    fn keyword_default(transaction_id: &str) -> u64 {
        if let Some((_, amount)) = KEYWORD_DEFAULTS
            .iter()
            .find(|(keyword, _)| transaction_id.contains(keyword))
        {
            return *amount;
        }
        if ROUND_SUFFIXES.iter().any(|s| transaction_id.ends_with(s)) {
            return ROUND_SUFFIX_DEFAULT;
        }
        if transaction_id.contains(MEDIUM_KEYWORD) {
            return MEDIUM_DEFAULT;
        }
        DEFAULT_AMOUNT
    }
}

fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}
