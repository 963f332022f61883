//! Rule-based fraud scoring
//!
//! Every rule is evaluated; contributions are additive and the total is
//! clamped to 100. A transaction that trips nothing still gets the configured
//! floor score, so no result ever reads as zero risk.

use crate::checks::CheckSynthesizer;
use crate::explanation;
use crate::{
    FraudAnalysis, NormalizedTransaction, PaymentMethod, Result, RiskScore, ScorerConfig,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Factor recorded when no rule fires
pub const NO_RISK_FACTORS: &str = "No risk factors detected";

/// Output of the rule pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    /// Clamped, floored score
    pub score: RiskScore,

    /// Triggered rule descriptions, in rule order
    pub risk_factors: Vec<String>,

    /// Payment method after high-risk keywords are applied
    pub payment_method: PaymentMethod,
}

/// Risk scorer
#[derive(Debug, Clone)]
pub struct RiskScorer {
    config: ScorerConfig,
}

impl RiskScorer {
    /// Create new risk scorer
    pub fn new(config: ScorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scorer configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Run every rule against `transaction_id` and `amount`
    pub fn score(&self, transaction_id: &str, amount: Decimal) -> ScoreCard {
        let weights = &self.config.weights;
        let keywords = &self.config.keywords;
        let id_lower = transaction_id.to_lowercase();

        let mut total = 0u32;
        let mut risk_factors = Vec::new();

        for keyword in keywords.suspicious_hits(&id_lower) {
            total = total.saturating_add(weights.suspicious_keyword);
            risk_factors.push(format!("Contains suspicious keyword: \"{}\"", keyword));
        }

        for pattern in keywords.pattern_hits(transaction_id) {
            total = total.saturating_add(weights.unusual_pattern);
            risk_factors.push(format!("Ends with suspicious pattern: \"{}\"", pattern));
        }

        if let Some((points, label)) = self.amount_tier(amount) {
            total = total.saturating_add(points);
            risk_factors.push(format!("{}: {} INR", label, amount));
        }

        if self.config.is_round_amount(amount) {
            total = total.saturating_add(weights.round_amount);
            risk_factors.push(format!("Suspiciously round amount: {} INR", amount));
        }

        for indicator in keywords.time_hits(&id_lower) {
            total = total.saturating_add(weights.time_indicator);
            risk_factors.push(format!("Unusual transaction time indicator: \"{}\"", indicator));
        }

        let mut payment_method = PaymentMethod::base_for(transaction_id);
        for method in &keywords.high_risk_methods {
            if id_lower.contains(method.as_str()) {
                total = total.saturating_add(weights.high_risk_method);
                payment_method = *method;
                risk_factors.push(format!("High-risk payment method: {}", method));
            }
        }

        let mut score = RiskScore::from_total(total);
        if score.score() == 0 {
            score = RiskScore::new(self.config.floor_score);
            risk_factors.push(NO_RISK_FACTORS.to_string());
        }

        debug!(
            "Scored {} at {} with {} risk factors",
            transaction_id,
            score,
            risk_factors.len()
        );

        ScoreCard {
            score,
            risk_factors,
            payment_method,
        }
    }

    /// Score the transaction, record the factors on it, and build the analysis
    pub fn assess(&self, transaction: &mut NormalizedTransaction) -> FraudAnalysis {
        let card = self.score(&transaction.id, transaction.amount);
        let thresholds = &self.config.risk_thresholds;

        let is_suspicious = thresholds.is_suspicious(card.score);
        let explanation = explanation::compose(
            transaction.amount,
            is_suspicious,
            card.risk_factors.len(),
        );
        let details = CheckSynthesizer::new(&self.config).synthesize(&transaction.id, transaction.amount);

        transaction.payment_method = card.payment_method;
        transaction.risk_factors = card.risk_factors;

        FraudAnalysis {
            fraud_score: card.score.score(),
            is_suspicious,
            risk_level: thresholds.level_for(card.score),
            details,
            explanation,
        }
    }

    fn amount_tier(&self, amount: Decimal) -> Option<(u32, &'static str)> {
        let at = &self.config.amount_thresholds;
        let w = &self.config.weights;

        if amount > at.extreme() {
            Some((w.extreme_amount, "Extremely high amount"))
        } else if amount > at.high {
            Some((w.very_high_amount, "Very high amount"))
        } else if amount > at.medium {
            Some((w.high_amount, "High amount"))
        } else if amount > at.low {
            Some((w.medium_amount, "Medium amount"))
        } else {
            None
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            config: ScorerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RiskLevel, RiskThresholds};
    use std::str::FromStr;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_keyword_pattern_and_tier() {
        let card = RiskScorer::default().score("txn_urgent_999", d(12_345));

        assert_eq!(card.score.score(), 90);
        assert_eq!(
            card.risk_factors,
            vec![
                "Contains suspicious keyword: \"urgent\"".to_string(),
                "Ends with suspicious pattern: \"999\"".to_string(),
                "Very high amount: 12345 INR".to_string(),
            ]
        );
        assert_eq!(card.payment_method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_round_twelve_thousand_hits_the_cap() {
        // 25 + 15 + 50, plus 20 because 12000 is a multiple of 1000
        let card = RiskScorer::default().score("txn_urgent_999", d(12_000));
        assert_eq!(card.score.score(), 100);
        assert_eq!(card.risk_factors.len(), 4);
        assert_eq!(card.risk_factors[3], "Suspiciously round amount: 12000 INR");
    }

    #[test]
    fn test_round_amount_counted_once() {
        let card = RiskScorer::default().score("txn_1", d(500));
        assert_eq!(card.score.score(), 20);
        assert_eq!(card.risk_factors, vec!["Suspiciously round amount: 500 INR"]);

        // 2000 is divisible by all three divisors
        let card = RiskScorer::default().score("txn_1", d(2_000));
        assert_eq!(card.score.score(), 15 + 20);
    }

    #[test]
    fn test_hundred_divisor_alone_is_round() {
        let card = RiskScorer::default().score("txn_abc", d(300));
        assert_eq!(card.score.score(), 20);
        assert_eq!(card.risk_factors, vec!["Suspiciously round amount: 300 INR"]);

        // medium tier plus round through the 100 divisor only
        let card = RiskScorer::default().score("txn_abc", d(1_300));
        assert_eq!(card.score.score(), 15 + 20);
    }

    #[test]
    fn test_huge_weights_saturate() {
        let mut config = ScorerConfig::default();
        config.weights.suspicious_keyword = u32::MAX;
        let scorer = RiskScorer { config };

        let card = scorer.score("fraud_urgent", d(750));
        assert_eq!(card.score.score(), 100);
    }

    #[test]
    fn test_floor_score_when_nothing_fires() {
        let card = RiskScorer::default().score("txn_abc", d(750));
        assert_eq!(card.score.score(), 10);
        assert_eq!(card.risk_factors, vec![NO_RISK_FACTORS]);
    }

    #[test]
    fn test_amount_tiers_are_exclusive() {
        let scorer = RiskScorer::default();
        let cases = [
            ("999.5", 0),
            ("1000.5", 15),
            ("5000.5", 30),
            ("10000.5", 50),
            ("20000.5", 70),
        ];
        for (amount, expected) in cases {
            let card = scorer.score("txn_abc", Decimal::from_str(amount).unwrap());
            let expected = if expected == 0 { 10 } else { expected };
            assert_eq!(card.score.score(), expected, "amount {}", amount);
        }
    }

    #[test]
    fn test_boundary_amounts_stay_in_lower_tier() {
        let scorer = RiskScorer::default();
        // 20000 is not above 2x high, and is round
        assert_eq!(scorer.score("txn_abc", d(20_000)).score.score(), 50 + 20);
        assert_eq!(scorer.score("txn_abc", d(5_000)).score.score(), 15 + 20);
    }

    #[test]
    fn test_repeated_keywords_each_count() {
        let card = RiskScorer::default().score("fraud_suspicious_late_night", Decimal::from_str("750.25").unwrap());
        // fraud + suspicious + night + late
        assert_eq!(card.score.score(), 25 + 25 + 20 + 20);
        assert_eq!(card.risk_factors.len(), 4);
    }

    #[test]
    fn test_keywords_case_insensitive_patterns_not() {
        let card = RiskScorer::default().score("TXN_URGENT", Decimal::from_str("750.25").unwrap());
        assert_eq!(card.score.score(), 25);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let card = RiskScorer::default().score("fraud_urgent_international_night_999", d(50_000));
        assert_eq!(card.score.score(), 100);
    }

    #[test]
    fn test_last_high_risk_method_wins() {
        let card = RiskScorer::default().score("gift_card_international_x", Decimal::from_str("750.25").unwrap());
        assert_eq!(card.payment_method, PaymentMethod::GiftCard);
        assert_eq!(card.score.score(), 60);

        let card = RiskScorer::default().score("plain_card_x", Decimal::from_str("750.25").unwrap());
        assert_eq!(card.payment_method, PaymentMethod::Card);
    }

    #[test]
    fn test_assess_records_factors_on_transaction() {
        let mut txn = NormalizedTransaction::new("txn_new_card_late", d(6_000));
        let analysis = RiskScorer::default().assess(&mut txn);

        // high tier + round + late + new_card
        assert_eq!(analysis.fraud_score, 30 + 20 + 20 + 30);
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert!(analysis.is_suspicious);
        assert_eq!(txn.payment_method, PaymentMethod::NewCard);
        assert_eq!(txn.risk_factors.len(), 4);
        assert_eq!(
            analysis.explanation,
            "This transaction of 6000 INR shows 4 risk indicators consistent with fraud patterns."
        );
    }

    #[test]
    fn test_injected_thresholds() {
        let mut config = ScorerConfig::default();
        config.risk_thresholds = RiskThresholds { low: 10, medium: 15 };
        let scorer = RiskScorer::new(config).unwrap();

        let mut txn = NormalizedTransaction::new("txn_1", d(500));
        let analysis = scorer.assess(&mut txn);
        assert_eq!(analysis.fraud_score, 20);
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert!(analysis.is_suspicious);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ScorerConfig::default();
        config.floor_score = 0;
        assert!(RiskScorer::new(config).is_err());
    }
}
