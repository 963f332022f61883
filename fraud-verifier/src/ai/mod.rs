//! Delegation to a generative-text completion service

pub mod gemini;
pub mod prompt;
pub mod response;

use crate::error::Result;
use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use prompt::build_prompt;
pub use response::{extract_json, parse_analysis};

/// A service that turns a prompt into free-form text
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt`, returning the raw response text
    async fn complete(&self, prompt: &str) -> Result<String>;
}
