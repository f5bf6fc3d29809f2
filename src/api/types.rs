//! Shared state for the HTTP layer.

use std::sync::Arc;

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::sqlite::open_database;
use crate::db::DatabaseError;
use crate::pipeline::summarize::{LlmClient, ReportSummarizer};

/// Shared context for all API routes.
///
/// Cheap to clone. Each request opens its own SQLite connection from
/// `config.database_path`, on a blocking thread.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub summarizer: ReportSummarizer,
}

impl ApiContext {
    pub fn new(config: AppConfig, llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            config: Arc::new(config),
            summarizer: ReportSummarizer::new(llm),
        }
    }

    /// Open a connection to the configured database (blocking).
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.config.database_path)
    }
}
