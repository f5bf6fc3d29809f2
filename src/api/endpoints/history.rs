//! `GET /api/hba1c/history`: stored readings and their trend narrative.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ReadingPoint;
use crate::pipeline::processor::{load_history, load_recent_summaries};
use crate::trend::synthesize_trend;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub disease: Option<String>,
    /// `ai` asks the model for the narrative; absent or `basic` uses the
    /// deterministic sentence.
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NarrativeMode {
    Basic,
    Ai,
}

impl NarrativeMode {
    fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None | Some("basic") => Ok(NarrativeMode::Basic),
            Some("ai") => Ok(NarrativeMode::Ai),
            Some(other) => Err(ApiError::BadRequest(format!(
                "Unknown narrative mode '{other}'. Use 'ai' or 'basic'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub hba1c_history: Vec<ReadingPoint>,
    pub trend_summary: String,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let mode = NarrativeMode::parse(query.narrative.as_deref())?;
    let disease = query
        .disease
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let response = tokio::task::spawn_blocking(move || -> Result<HistoryResponse, ApiError> {
        let conn = ctx.open_db()?;
        let history = load_history(&conn, disease.as_deref());
        let prior = load_recent_summaries(&conn);

        let trend_summary = match mode {
            NarrativeMode::Ai if !history.is_empty() => ctx
                .summarizer
                .summarize_trend(disease.as_deref(), &history, &prior)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "AI trend narrative failed, using basic narrative");
                    synthesize_trend(&history, &prior)
                }),
            _ => synthesize_trend(&history, &prior),
        };

        Ok(HistoryResponse {
            hba1c_history: history,
            trend_summary,
        })
    })
    .await??;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrative_mode_parsing() {
        assert_eq!(NarrativeMode::parse(None).unwrap(), NarrativeMode::Basic);
        assert_eq!(NarrativeMode::parse(Some("")).unwrap(), NarrativeMode::Basic);
        assert_eq!(NarrativeMode::parse(Some("basic")).unwrap(), NarrativeMode::Basic);
        assert_eq!(NarrativeMode::parse(Some("ai")).unwrap(), NarrativeMode::Ai);
        assert!(matches!(
            NarrativeMode::parse(Some("poetry")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
