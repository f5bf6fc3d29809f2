pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod trend;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::db::DatabaseError;
use crate::pipeline::summarize::{AnthropicClient, LlmClient};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Read configuration from the environment and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;

    // Create the database and apply migrations before accepting requests.
    db::open_database(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Database ready");

    let llm = AnthropicClient::new(&config.llm);
    if llm.is_configured() {
        tracing::info!(model = llm.model(), "Anthropic summaries enabled");
    } else {
        tracing::warn!("ANTHROPIC_API_KEY not set; report uploads will fail until it is configured");
    }

    api::serve_until_ctrl_c(config, Arc::new(llm)).await?;
    Ok(())
}
