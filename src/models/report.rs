use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded report after text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub disease: Option<String>,
    pub age: Option<i64>,
    pub report_text: String,
    pub report_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// LLM-generated summary and advice for one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSummary {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub summary: String,
    pub advice: String,
    pub created_at: DateTime<Utc>,
}

/// A previously stored summary, joined with the date of its report.
/// Lists of these are ordered most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorSummary {
    pub id: Uuid,
    pub summary: String,
    pub report_id: Option<Uuid>,
    pub report_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl PriorSummary {
    /// Date this summary speaks for: its report's date, else when it was written.
    pub fn associated_date(&self) -> Option<NaiveDate> {
        self.report_date
            .or_else(|| self.created_at.map(|ts| ts.date_naive()))
    }
}
