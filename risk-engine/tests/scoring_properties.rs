//! Property-based tests for the rule engine
//!
//! - Normalized amounts are never negative
//! - Scores stay within [floor, 100]
//! - Risk level and the suspicious flag follow the score
//! - The check report always has five entries in fixed order
//! - Scoring is deterministic

use proptest::prelude::*;
use risk_engine::{
    evaluate, AmountNormalizer, CheckName, RawAmount, RiskLevel, RiskScorer, TransactionInput,
    NO_RISK_FACTORS,
};
use rust_decimal::Decimal;

/// Ids built from fragments the rules care about, plus noise
fn transaction_id_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("txn".to_string()),
        Just("fraud".to_string()),
        Just("URGENT".to_string()),
        Just("late".to_string()),
        Just("midnight".to_string()),
        Just("new_card".to_string()),
        Just("gift_card".to_string()),
        Just("international".to_string()),
        Just("huge".to_string()),
        Just("999".to_string()),
        Just("777".to_string()),
        "[a-z]{1,6}",
        "[0-9]{1,7}",
    ];
    prop::collection::vec(fragment, 1..5).prop_map(|parts| parts.join("_"))
}

fn raw_amount_strategy() -> impl Strategy<Value = Option<RawAmount>> {
    prop_oneof![
        Just(None),
        any::<f64>().prop_map(|v| Some(RawAmount::Number(v))),
        (0u64..200_000u64).prop_map(|v| Some(RawAmount::Text(format!("₹{}", v)))),
        "[0-9,.$ ₹a-z-]{0,12}".prop_map(|s| Some(RawAmount::Text(s))),
    ]
}

proptest! {
    #[test]
    fn prop_normalized_amount_is_non_negative(
        id in transaction_id_strategy(),
        raw in raw_amount_strategy(),
    ) {
        let amount = AmountNormalizer::normalize(raw.as_ref(), &id);
        prop_assert!(amount >= Decimal::ZERO);
    }

    #[test]
    fn prop_letters_only_ids_default_to_750(id in "[a-z_]{1,20}") {
        prop_assume!(!id.contains("huge") && !id.contains("high") && !id.contains("medium"));
        prop_assert_eq!(AmountNormalizer::normalize(None, &id), Decimal::from(750));
    }

    #[test]
    fn prop_score_within_bounds(
        id in transaction_id_strategy(),
        raw in raw_amount_strategy(),
    ) {
        let scorer = RiskScorer::default();
        let input = TransactionInput { transaction_id: id, amount: raw, email: None };
        let (txn, analysis) = evaluate(&scorer, &input);

        prop_assert!(analysis.fraud_score >= 10);
        prop_assert!(analysis.fraud_score <= 100);
        prop_assert!(!txn.risk_factors.is_empty());
        if txn.risk_factors == vec![NO_RISK_FACTORS.to_string()] {
            prop_assert_eq!(analysis.fraud_score, 10);
        }
    }

    #[test]
    fn prop_level_and_flag_follow_score(
        id in transaction_id_strategy(),
        raw in raw_amount_strategy(),
    ) {
        let scorer = RiskScorer::default();
        let input = TransactionInput { transaction_id: id, amount: raw, email: None };
        let (_, analysis) = evaluate(&scorer, &input);

        let expected = match analysis.fraud_score {
            0..=30 => RiskLevel::Low,
            31..=70 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };
        prop_assert_eq!(analysis.risk_level, expected);
        prop_assert_eq!(analysis.is_suspicious, analysis.fraud_score > 70);
    }

    #[test]
    fn prop_five_checks_in_order(
        id in transaction_id_strategy(),
        raw in raw_amount_strategy(),
    ) {
        let scorer = RiskScorer::default();
        let input = TransactionInput { transaction_id: id, amount: raw, email: None };
        let (_, analysis) = evaluate(&scorer, &input);

        let names: Vec<&str> = analysis.details.iter().map(|c| c.name.as_str()).collect();
        let expected: Vec<&str> = CheckName::ALL.iter().map(|c| c.as_str()).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn prop_scoring_is_deterministic(
        id in transaction_id_strategy(),
        raw in raw_amount_strategy(),
    ) {
        let scorer = RiskScorer::default();
        let input = TransactionInput { transaction_id: id, amount: raw, email: None };
        let (first_txn, first) = evaluate(&scorer, &input);
        let (second_txn, second) = evaluate(&scorer, &input);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_txn.risk_factors, second_txn.risk_factors);
        prop_assert_eq!(first_txn.payment_method, second_txn.payment_method);
    }
}

#[test]
fn scenario_urgent_999_with_rupee_string() {
    let input = TransactionInput::new("txn_urgent_999").with_amount("₹12,000");
    let (txn, analysis) = evaluate(&RiskScorer::default(), &input);

    assert_eq!(txn.amount, Decimal::from(12_000));
    assert_eq!(analysis.risk_level, RiskLevel::High);
    assert!(analysis.is_suspicious);
    // keyword, pattern, very-high tier and round amount: 25 + 15 + 50 + 20, capped
    assert_eq!(analysis.fraud_score, 100);
    assert!(txn
        .risk_factors
        .contains(&"Contains suspicious keyword: \"urgent\"".to_string()));
    assert!(txn
        .risk_factors
        .contains(&"Ends with suspicious pattern: \"999\"".to_string()));
    assert!(txn.risk_factors.contains(&"Very high amount: 12000 INR".to_string()));
}

#[test]
fn scenario_small_round_amount() {
    let input = TransactionInput::new("txn_1").with_amount(500.0);
    let (_, analysis) = evaluate(&RiskScorer::default(), &input);

    assert_eq!(analysis.fraud_score, 20);
    assert_eq!(analysis.risk_level, RiskLevel::Low);
    assert!(!analysis.is_suspicious);
    assert!(!analysis.details[4].passed);
    assert_eq!(
        analysis.explanation,
        "This transaction of 500 INR appears legitimate based on the analyzed patterns."
    );
}

#[test]
fn scenario_no_amount_no_keywords() {
    let input = TransactionInput::new("txn_abc");
    let (txn, analysis) = evaluate(&RiskScorer::default(), &input);

    assert_eq!(txn.amount, Decimal::from(750));
    assert_eq!(analysis.fraud_score, 10);
    assert_eq!(analysis.risk_level, RiskLevel::Low);
    assert!(!analysis.is_suspicious);
    assert_eq!(txn.risk_factors, vec![NO_RISK_FACTORS.to_string()]);
    assert!(analysis.details.iter().all(|c| c.passed));
}
