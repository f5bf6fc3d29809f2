use serde::Deserialize;
use serde_json::Value;

use super::types::ReportSummary;

pub const NO_RESPONSE_SUMMARY: &str = "No response from model.";
pub const FALLBACK_ADVICE: &str =
    "Consult your healthcare provider for personalized advice based on the report.";
pub const NO_TREND_SUMMARY: &str = "No trend summary.";

/// Strip a surrounding ```json ... ``` (or bare ```) fence if present.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Turn the model's reply into a summary/advice pair.
///
/// A JSON object reply supplies `summary` and `advice`; missing keys become
/// empty strings and an `advice` array is joined line by line. Anything that
/// is not JSON becomes the summary, paired with generic advice.
pub fn parse_report_reply(reply: &str) -> ReportSummary {
    #[derive(Deserialize)]
    struct RawReply {
        summary: Option<Value>,
        advice: Option<Value>,
    }

    match serde_json::from_str::<Value>(strip_code_fences(reply)) {
        Ok(value) => {
            let raw = value
                .is_object()
                .then(|| serde_json::from_value::<RawReply>(value).ok())
                .flatten();
            let (summary, advice) = raw
                .map(|r| (text_field(r.summary), text_field(r.advice)))
                .unwrap_or_default();
            ReportSummary { summary, advice }
        }
        Err(_) => {
            let trimmed = reply.trim();
            let summary = if trimmed.is_empty() {
                NO_RESPONSE_SUMMARY.to_string()
            } else {
                trimmed.to_string()
            };
            ReportSummary {
                summary,
                advice: FALLBACK_ADVICE.to_string(),
            }
        }
    }
}

/// Turn the model's trend reply into display text.
pub fn parse_trend_reply(reply: &str) -> String {
    #[derive(Deserialize)]
    struct RawTrend {
        #[serde(rename = "trendSummary")]
        trend_summary: Option<Value>,
    }

    match serde_json::from_str::<Value>(strip_code_fences(reply)) {
        Ok(value) => {
            let parsed = serde_json::from_value::<RawTrend>(value)
                .ok()
                .map(|r| text_field(r.trend_summary))
                .unwrap_or_default();
            if parsed.is_empty() {
                reply.to_string()
            } else {
                parsed
            }
        }
        Err(_) => {
            let trimmed = reply.trim();
            if trimmed.is_empty() {
                NO_TREND_SUMMARY.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

fn text_field(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
