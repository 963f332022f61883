//! One-sentence analysis summary

use rust_decimal::Decimal;

/// Compose the summary for an analysed amount
pub fn compose(amount: Decimal, is_suspicious: bool, risk_factor_count: usize) -> String {
    if is_suspicious {
        format!(
            "This transaction of {} INR shows {} risk indicators consistent with fraud patterns.",
            amount, risk_factor_count
        )
    } else {
        format!(
            "This transaction of {} INR appears legitimate based on the analyzed patterns.",
            amount
        )
    }
}
