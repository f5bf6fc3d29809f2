use crate::models::{PriorSummary, ReadingPoint};

use super::types::ReportContext;

pub const REPORT_SYSTEM_PROMPT: &str = "You are a medical report assistant. Provide concise, \
patient-friendly summaries and pragmatic advice. Never give diagnoses; remind users to consult \
their clinician.";

pub const TREND_SYSTEM_PROMPT: &str = "You are a medical trend assistant. Keep responses short, \
cautious, and defer decisions to clinicians.";

pub const REPORT_MAX_TOKENS: u32 = 350;
pub const TREND_MAX_TOKENS: u32 = 250;
pub const SUMMARY_TEMPERATURE: f32 = 0.2;

const UNKNOWN: &str = "unknown";

/// Build the report summarization prompt.
pub fn build_report_prompt(ctx: &ReportContext<'_>) -> String {
    let disease = ctx.disease.filter(|d| !d.trim().is_empty()).unwrap_or(UNKNOWN);
    let age = ctx
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    format!(
        "Summarize this medical report and provide 3-5 short advice items. \
         Return JSON with keys `summary` and `advice` (advice as a single string). \
         Disease: {disease}; Age: {age}; Report:\n{}",
        ctx.report_text
    )
}

/// Build the trend narrative prompt from readings and recent summaries.
pub fn build_trend_prompt(
    disease: Option<&str>,
    history: &[ReadingPoint],
    prior_summaries: &[PriorSummary],
) -> String {
    let disease = disease.filter(|d| !d.trim().is_empty()).unwrap_or(UNKNOWN);

    let history_text = if history.is_empty() {
        "none".to_string()
    } else {
        history
            .iter()
            .map(|row| {
                let date = row
                    .reading_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                let value = row
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("- {date}: HbA1c {value}%")
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let summary_text = if prior_summaries.is_empty() {
        "none".to_string()
    } else {
        prior_summaries
            .iter()
            .map(|s| {
                let date = s
                    .associated_date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                let text = if s.summary.trim().is_empty() {
                    "no summary"
                } else {
                    s.summary.as_str()
                };
                format!("- {date}: {text}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are a concise medical trend assistant. Given HbA1c readings over time and the latest prior AI summaries, produce a short trend overview (2-3 sentences max).
- Keep tone patient-friendly, no diagnoses, emphasize discussing with clinician.
- Mention direction (rising/improving/stable), most recent value/date, and notable change over time.
- Do not repeat advice; focus on trend description only.
Return JSON: {{"trendSummary": "<text>"}}.

Disease: {disease}
HbA1c history:
{history_text}

Recent summaries:
{summary_text}
"#
    )
}
