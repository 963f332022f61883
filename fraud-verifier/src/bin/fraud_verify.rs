//! Verify a single transaction and print the result as JSON
//!
//! Usage: `fraud-verify <transaction-id> [amount] [email]`

use anyhow::{bail, Context};
use fraud_verifier::{Config, FraudVerifier};
use risk_engine::{RawAmount, TransactionInput};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("FRAUD_LOG_JSON").map_or(false, |v| v == "1" || v == "true") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config() -> anyhow::Result<Config> {
    match std::env::var("FRAUD_CONFIG") {
        Ok(path) => Config::from_file(&path).with_context(|| format!("loading {}", path)),
        Err(_) => Config::from_env().context("loading configuration from environment"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(transaction_id) = args.next() else {
        bail!("usage: fraud-verify <transaction-id> [amount] [email]");
    };

    let mut input = TransactionInput::new(transaction_id);
    if let Some(amount) = args.next() {
        input.amount = Some(match amount.parse::<f64>() {
            Ok(number) => RawAmount::Number(number),
            Err(_) => RawAmount::Text(amount),
        });
    }
    input.email = args.next();

    let config = load_config()?;
    tracing::info!("Starting {}", config.service_name);

    let verifier = FraudVerifier::from_config(&config)?;
    let result = verifier.verify(&input).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
