//! `POST /api/upload-report`: lab report PDF in, summary plus HbA1c trend out.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, NaiveDate};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::PdfTextExtractor;
use crate::pipeline::processor::{process_report, ReportOutcome, ReportUpload};

/// Multipart field carrying the PDF.
pub const REPORT_FIELD: &str = "report";

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    age: Option<String>,
    disease: Option<String>,
    report_date: Option<String>,
}

pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ReportOutcome>, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Rejected(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            REPORT_FIELD => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Rejected(e.body_text()))?;
                form.file = Some(bytes.to_vec());
            }
            "age" | "disease" | "reportDate" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Rejected(e.body_text()))?;
                match name.as_str() {
                    "age" => form.age = Some(value),
                    "disease" => form.disease = Some(value),
                    _ => form.report_date = Some(value),
                }
            }
            _ => {}
        }
    }

    let upload = validate(form)?;

    tracing::info!(
        bytes = upload.pdf_bytes.len(),
        disease = upload.disease.as_deref().unwrap_or("-"),
        report_date = %upload.report_date,
        "Report upload received"
    );

    let outcome = tokio::task::spawn_blocking(move || {
        let conn = ctx
            .open_db()
            .map_err(|e| ApiError::ServerError(e.to_string()))?;
        process_report(&conn, &PdfTextExtractor, &ctx.summarizer, &upload).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::ServerError(format!("Report task failed: {e}")))??;

    Ok(Json(outcome))
}

/// Check required fields in the order clients expect the messages.
fn validate(form: UploadForm) -> Result<ReportUpload, ApiError> {
    let pdf_bytes = form
        .file
        .ok_or_else(|| ApiError::Rejected("No file uploaded".into()))?;

    let raw_date = form
        .report_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::Rejected("Report date is required".into()))?;

    let report_date = parse_report_date(raw_date)
        .ok_or_else(|| ApiError::Rejected("Report date is invalid".into()))?;

    Ok(ReportUpload {
        pdf_bytes,
        disease: form
            .disease
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        age: form.age.and_then(|a| a.trim().parse::<i64>().ok()),
        report_date,
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
}
