use rusqlite::{params, Connection};

use super::timestamp_to_sql;
use crate::db::DatabaseError;
use crate::models::Report;

pub fn insert_report(conn: &Connection, report: &Report) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reports (id, disease, age, report_text, report_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            report.id.to_string(),
            report.disease,
            report.age,
            report.report_text,
            report.report_date.to_string(),
            timestamp_to_sql(&report.created_at),
        ],
    )?;
    Ok(())
}
