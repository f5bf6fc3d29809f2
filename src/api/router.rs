//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! JSON routes live under `/api/`; `/` answers a plain-text liveness check.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::AppConfig;
use crate::pipeline::summarize::LlmClient;

/// Build the API router for a configuration and model client.
pub fn api_router(config: AppConfig, llm: Arc<dyn LlmClient + Send + Sync>) -> Router {
    build_router(ApiContext::new(config, llm))
}

pub(crate) fn build_router(ctx: ApiContext) -> Router {
    let cors = cors_layer(ctx.config.frontend_origin.as_deref());
    let body_limit = ctx.config.max_upload_bytes;

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/upload-report", post(endpoints::reports::upload))
        .route("/hba1c/history", get(endpoints::history::list));

    Router::new()
        .route("/", get(endpoints::health::root))
        .nest("/api", api)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
}

/// Credentialed CORS for the configured frontend; any origin (without
/// credentials) when none is configured.
fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let Some(origin) = frontend_origin else {
        return CorsLayer::permissive();
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            tracing::warn!(origin, error = %e, "Invalid FRONTEND_ORIGIN, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}
