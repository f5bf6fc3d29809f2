use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{CompletionRequest, LlmClient};
use super::SummarizeError;
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
///
/// The blocking reqwest client owns a runtime that must not be dropped
/// inside an async context, so one is built per call on the calling
/// (blocking) thread instead of being stored here.
pub struct AnthropicClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// Request body for POST /v1/messages
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Response body from POST /v1/messages (only the parts we read).
#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
}

/// First text block, else the first block's text, else empty.
fn reply_text(response: MessagesResponse) -> String {
    let first_text = response
        .content
        .iter()
        .find(|block| block.kind.as_deref() == Some("text"))
        .and_then(|block| block.text.clone())
        .filter(|t| !t.is_empty());

    first_text
        .or_else(|| response.content.into_iter().next().and_then(|b| b.text))
        .unwrap_or_default()
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, SummarizeError> {
        let api_key = self.api_key.as_deref().ok_or(SummarizeError::MissingApiKey)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| SummarizeError::HttpClient(e.to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system,
            messages: vec![Message {
                role: "user",
                content: vec![TextBlock {
                    kind: "text",
                    text: request.prompt,
                }],
            }],
        };

        tracing::debug!(model = %self.model, max_tokens = request.max_tokens, "Calling Anthropic");

        let response = client
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizeError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    SummarizeError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummarizeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(|e| SummarizeError::ResponseParsing(e.to_string()))?;

        Ok(reply_text(parsed))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Mock LLM client for testing. Returns configured replies in order,
/// repeating the last one, and records every prompt it receives.
pub struct MockLlmClient {
    replies: Mutex<Vec<Result<String, SummarizeError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(reply: &str) -> Self {
        Self::with_replies(vec![Ok(reply.to_string())])
    }

    pub fn failing(error: SummarizeError) -> Self {
        Self::with_replies(vec![Err(error)])
    }

    pub fn with_replies(replies: Vec<Result<String, SummarizeError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, SummarizeError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.to_string());
        }

        let mut replies = self
            .replies
            .lock()
            .map_err(|_| SummarizeError::HttpClient("mock lock poisoned".into()))?;

        let next = if replies.len() > 1 {
            replies.remove(0)
        } else {
            match replies.first() {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(e)) => Err(clone_error(e)),
                None => Ok(String::new()),
            }
        };
        next
    }

    fn is_configured(&self) -> bool {
        true
    }
}

fn clone_error(error: &SummarizeError) -> SummarizeError {
    match error {
        SummarizeError::MissingApiKey => SummarizeError::MissingApiKey,
        SummarizeError::HttpClient(m) => SummarizeError::HttpClient(m.clone()),
        SummarizeError::Upstream { status, body } => SummarizeError::Upstream {
            status: *status,
            body: body.clone(),
        },
        SummarizeError::ResponseParsing(m) => SummarizeError::ResponseParsing(m.clone()),
    }
}
