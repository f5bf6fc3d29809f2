pub mod types;
pub mod prompt;
pub mod parser;
pub mod anthropic;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use anthropic::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("ANTHROPIC_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Anthropic request failed (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl SummarizeError {
    /// Transient failures worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SummarizeError::HttpClient(_) => true,
            SummarizeError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
