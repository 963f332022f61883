use risk_engine::{CheckName, NormalizedTransaction};

/// Build the analysis prompt for `transaction`
///
/// The response shape requested here is what [`parse_analysis`](super::parse_analysis) reads.
pub fn build_prompt(transaction: &NormalizedTransaction) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a fraud detection AI system. Analyze this transaction for potential fraud.\n\n",
    );

    prompt.push_str(&format!(
        "Transaction details:\n\
         - ID: {}\n\
         - Amount: {} {} (exact amount, not rounded)\n\
         - Timestamp: {}\n\
         - Payment Method: {}\n",
        transaction.id,
        transaction.amount,
        transaction.currency,
        transaction.timestamp.to_rfc3339(),
        transaction.payment_method
    ));

    prompt.push_str("\nAnalyze this transaction for the following fraud indicators:\n");
    prompt.push_str("1. Unusual amount\n");
    prompt.push_str("2. Velocity check (too many transactions in short time)\n");
    prompt.push_str("3. Pattern analysis (unusual patterns)\n");
    prompt.push_str("4. Time of transaction (unusual time)\n");
    prompt.push_str("5. Amount round numbers (fraudsters often use round numbers)\n\n");

    prompt.push_str(
        "For each indicator, respond with \"PASS\" or \"FAIL\" and a brief explanation.\n\
         Then provide an overall fraud score from 0-100 (higher means more likely fraudulent),\n\
         a risk level (Low, Medium, or High), and whether the transaction is suspicious.\n\n",
    );

    prompt.push_str("Format your response as a JSON object with this structure:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"fraudScore\": number,\n");
    prompt.push_str("  \"isSuspicious\": boolean,\n");
    prompt.push_str("  \"riskLevel\": \"Low|Medium|High\",\n");
    prompt.push_str("  \"details\": [\n");
    let last = CheckName::ALL.len() - 1;
    for (i, check) in CheckName::ALL.iter().enumerate() {
        prompt.push_str(&format!(
            "    {{\"name\": \"{}\", \"status\": boolean, \"explanation\": \"string\"}}{}\n",
            check,
            if i == last { "" } else { "," }
        ));
    }
    prompt.push_str("  ],\n");
    prompt.push_str("  \"explanation\": \"string\"\n");
    prompt.push_str("}\n");

    prompt
}
