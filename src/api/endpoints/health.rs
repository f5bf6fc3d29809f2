//! Liveness endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

pub const ROOT_MESSAGE: &str = "Backend is running";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_configured: bool,
}

/// `GET /`: plain-text liveness check.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// `GET /api/health`: liveness plus whether summaries can be generated.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        llm_configured: ctx.summarizer.is_configured(),
    })
}
