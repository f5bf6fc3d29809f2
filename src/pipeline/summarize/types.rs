use serde::{Deserialize, Serialize};

use super::SummarizeError;

/// One single-turn completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Hosted model abstraction (allows mocking for tests).
pub trait LlmClient {
    /// Return the model's text reply.
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, SummarizeError>;

    /// Whether credentials are present. Unconfigured clients fail every call.
    fn is_configured(&self) -> bool;
}

/// Patient-facing summary of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub summary: String,
    pub advice: String,
}

/// What the model is told about the report being summarized.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub disease: Option<&'a str>,
    pub age: Option<i64>,
    pub report_text: &'a str,
}
