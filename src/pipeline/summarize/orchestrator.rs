use std::sync::Arc;

use super::parser::{parse_report_reply, parse_trend_reply};
use super::prompt::{
    build_report_prompt, build_trend_prompt, REPORT_MAX_TOKENS, REPORT_SYSTEM_PROMPT,
    SUMMARY_TEMPERATURE, TREND_MAX_TOKENS, TREND_SYSTEM_PROMPT,
};
use super::types::{CompletionRequest, LlmClient, ReportContext, ReportSummary};
use super::SummarizeError;
use crate::models::{PriorSummary, ReadingPoint};

/// Total attempts for one completion, including the first.
const MAX_ATTEMPTS: usize = 2;

/// Turns report text and reading history into patient-facing prose.
#[derive(Clone)]
pub struct ReportSummarizer {
    llm: Arc<dyn LlmClient + Send + Sync>,
}

impl ReportSummarizer {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Summarize one report. Malformed model output still yields a summary.
    pub fn summarize_report(
        &self,
        ctx: &ReportContext<'_>,
    ) -> Result<ReportSummary, SummarizeError> {
        let prompt = build_report_prompt(ctx);
        let request = CompletionRequest {
            system: REPORT_SYSTEM_PROMPT,
            prompt: &prompt,
            max_tokens: REPORT_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let reply = self.complete_with_retry(&request)?;
        let parsed = parse_report_reply(&reply);

        tracing::info!(
            summary_len = parsed.summary.len(),
            advice_len = parsed.advice.len(),
            "Report summarized"
        );
        Ok(parsed)
    }

    /// Ask the model for a short narrative over the reading history.
    pub fn summarize_trend(
        &self,
        disease: Option<&str>,
        history: &[ReadingPoint],
        prior_summaries: &[PriorSummary],
    ) -> Result<String, SummarizeError> {
        let prompt = build_trend_prompt(disease, history, prior_summaries);
        let request = CompletionRequest {
            system: TREND_SYSTEM_PROMPT,
            prompt: &prompt,
            max_tokens: TREND_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let reply = self.complete_with_retry(&request)?;
        Ok(parse_trend_reply(&reply))
    }

    fn complete_with_retry(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<String, SummarizeError> {
        let mut attempt = 1;
        loop {
            match self.llm.complete(request) {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "LLM call failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
