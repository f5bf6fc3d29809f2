//! Report processing orchestrator.
//!
//! Single entry point that drives one upload through the pipeline:
//! extract → detect HbA1c → store report → summarize → store summary and
//! reading → assemble history and trend.
//!
//! Only extraction and summarization are fatal. Storage failures are
//! logged and the upload still gets its summary back.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::repository;
use crate::models::{AiSummary, Hba1cReading, PriorSummary, ReadingPoint, Report};
use crate::pipeline::extraction::{extract_hba1c_value, ExtractionError, PdfExtractor};
use crate::pipeline::summarize::{ReportContext, ReportSummarizer, SummarizeError};
use crate::trend::synthesize_trend;

/// Readings returned with each upload.
pub const HISTORY_LIMIT: u32 = 50;

/// Prior summaries returned with each upload.
pub const RECENT_SUMMARY_LIMIT: u32 = 5;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Summarization failed: {0}")]
    Summarize(#[from] SummarizeError),
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// One validated upload.
#[derive(Debug, Clone)]
pub struct ReportUpload {
    pub pdf_bytes: Vec<u8>,
    pub disease: Option<String>,
    pub age: Option<i64>,
    pub report_date: NaiveDate,
}

/// Everything the client gets back for an upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome {
    pub summary: String,
    pub advice: String,
    pub report_date: NaiveDate,
    pub hba1c_value: Option<f64>,
    pub hba1c_history: Vec<ReadingPoint>,
    pub trend_summary: String,
    pub previous_summaries: Vec<PriorSummary>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Process one uploaded report. Blocking; run it off the async runtime.
pub fn process_report(
    conn: &Connection,
    extractor: &dyn PdfExtractor,
    summarizer: &ReportSummarizer,
    upload: &ReportUpload,
) -> Result<ReportOutcome, ProcessingError> {
    let document = extractor.extract_document(&upload.pdf_bytes)?;
    let report_text = document.full_text;
    let hba1c_value = extract_hba1c_value(&report_text);

    tracing::info!(
        pages = document.page_count,
        text_length = report_text.len(),
        hba1c_detected = hba1c_value.is_some(),
        "Report text extracted"
    );

    let disease = upload.disease.as_deref();

    let report = Report {
        id: Uuid::new_v4(),
        disease: upload.disease.clone(),
        age: upload.age,
        report_text: report_text.clone(),
        report_date: upload.report_date,
        created_at: Utc::now(),
    };
    let report_id = match repository::insert_report(conn, &report) {
        Ok(()) => Some(report.id),
        Err(e) => {
            tracing::error!(error = %e, "Failed to store report");
            None
        }
    };

    let generated = summarizer.summarize_report(&ReportContext {
        disease,
        age: upload.age,
        report_text: &report_text,
    })?;

    let ai_summary = AiSummary {
        id: Uuid::new_v4(),
        report_id,
        summary: generated.summary.clone(),
        advice: generated.advice.clone(),
        created_at: Utc::now(),
    };
    let summary_id = match repository::insert_ai_summary(conn, &ai_summary) {
        Ok(()) => Some(ai_summary.id),
        Err(e) => {
            tracing::error!(error = %e, "Failed to store AI summary");
            None
        }
    };

    if let Some(value) = hba1c_value {
        let reading = Hba1cReading {
            id: Uuid::new_v4(),
            report_id,
            summary_id,
            disease: upload.disease.clone(),
            reading_date: upload.report_date,
            value,
        };
        if let Err(e) = repository::insert_hba1c_reading(conn, &reading) {
            tracing::error!(error = %e, value, "Failed to store HbA1c reading");
        }
    }

    let hba1c_history = load_history(conn, disease);
    let previous_summaries = load_recent_summaries(conn);
    let trend_summary = synthesize_trend(&hba1c_history, &previous_summaries);

    tracing::info!(
        report_id = ?report_id,
        history_len = hba1c_history.len(),
        "Report processed"
    );

    Ok(ReportOutcome {
        summary: generated.summary,
        advice: generated.advice,
        report_date: upload.report_date,
        hba1c_value,
        hba1c_history,
        trend_summary,
        previous_summaries,
    })
}

/// Reading history for the trend; a read failure degrades to no history.
pub fn load_history(conn: &Connection, disease: Option<&str>) -> Vec<ReadingPoint> {
    repository::get_hba1c_history(conn, disease, HISTORY_LIMIT).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load HbA1c history");
        Vec::new()
    })
}

pub fn load_recent_summaries(conn: &Connection) -> Vec<PriorSummary> {
    repository::get_recent_summaries(conn, RECENT_SUMMARY_LIMIT).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load previous summaries");
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
