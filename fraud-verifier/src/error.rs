use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("AI response error: {0}")]
    AiResponse(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Risk engine error: {0}")]
    Engine(#[from] risk_engine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, VerifierError>;
