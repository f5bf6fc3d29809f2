use rusqlite::{params, Connection};

use super::date_from_sql;
use crate::db::DatabaseError;
use crate::models::{is_plausible_hba1c, Hba1cReading, ReadingPoint};

pub fn insert_hba1c_reading(
    conn: &Connection,
    reading: &Hba1cReading,
) -> Result<(), DatabaseError> {
    if !is_plausible_hba1c(reading.value) {
        return Err(DatabaseError::ConstraintViolation(format!(
            "HbA1c value out of range: {}",
            reading.value
        )));
    }

    conn.execute(
        "INSERT INTO hba1c_readings (id, report_id, summary_id, disease, reading_date, value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            reading.id.to_string(),
            reading.report_id.map(|id| id.to_string()),
            reading.summary_id.map(|id| id.to_string()),
            reading.disease,
            reading.reading_date.to_string(),
            reading.value,
        ],
    )?;
    Ok(())
}

/// The `limit` most recent readings, returned oldest first.
///
/// A `disease` label narrows the history to readings stored under the
/// same label; `None` returns every reading.
pub fn get_hba1c_history(
    conn: &Connection,
    disease: Option<&str>,
    limit: u32,
) -> Result<Vec<ReadingPoint>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT reading_date, value FROM (
             SELECT reading_date, value, rowid AS seq
             FROM hba1c_readings
             WHERE ?1 IS NULL OR disease = ?1
             ORDER BY reading_date DESC, seq DESC
             LIMIT ?2
         )
         ORDER BY reading_date ASC, seq ASC",
    )?;

    let rows = stmt.query_map(params![disease, limit], |row| {
        Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<f64>>(1)?))
    })?;

    let mut history = Vec::new();
    for row in rows {
        let (reading_date, value) = row?;
        history.push(ReadingPoint {
            reading_date: reading_date.as_deref().and_then(date_from_sql),
            value,
        });
    }
    Ok(history)
}
