use rusqlite::{params, Connection};

use super::{date_from_sql, timestamp_from_sql, timestamp_to_sql, uuid_from_sql};
use crate::db::DatabaseError;
use crate::models::{AiSummary, PriorSummary};

pub fn insert_ai_summary(conn: &Connection, summary: &AiSummary) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO ai_summaries (id, report_id, summary, advice, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            summary.id.to_string(),
            summary.report_id.map(|id| id.to_string()),
            summary.summary,
            summary.advice,
            timestamp_to_sql(&summary.created_at),
        ],
    )?;
    Ok(())
}

/// Most recent summaries that belong to a stored report, newest first.
pub fn get_recent_summaries(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<PriorSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.summary, s.report_id, r.report_date, s.created_at
         FROM ai_summaries s
         INNER JOIN reports r ON r.id = s.report_id
         ORDER BY s.created_at DESC, s.rowid DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut summaries = Vec::new();
    for row in rows {
        let (id, summary, report_id, report_date, created_at) = row?;
        summaries.push(PriorSummary {
            id: uuid_from_sql(&id)?,
            summary,
            report_id: report_id.and_then(|s| uuid::Uuid::parse_str(&s).ok()),
            report_date: report_date.as_deref().and_then(date_from_sql),
            created_at: created_at.as_deref().and_then(timestamp_from_sql),
        });
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_report;
    use crate::db::open_memory_database;
    use crate::models::Report;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn seed_report(conn: &Connection, date: NaiveDate) -> Uuid {
        let report = Report {
            id: Uuid::new_v4(),
            disease: Some("diabetes".into()),
            age: None,
            report_text: "text".into(),
            report_date: date,
            created_at: Utc::now(),
        };
        insert_report(conn, &report).unwrap();
        report.id
    }

    fn summary_for(report_id: Option<Uuid>, text: &str, minutes: i64) -> AiSummary {
        AiSummary {
            id: Uuid::new_v4(),
            report_id,
            summary: text.into(),
            advice: "See your clinician.".into(),
            created_at: Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[test]
    fn recent_summaries_newest_first_with_report_date() {
        let conn = open_memory_database().unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let jun = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let r1 = seed_report(&conn, jan);
        let r2 = seed_report(&conn, jun);
        insert_ai_summary(&conn, &summary_for(Some(r1), "older", 0)).unwrap();
        insert_ai_summary(&conn, &summary_for(Some(r2), "newer", 5)).unwrap();

        let recent = get_recent_summaries(&conn, 5).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].summary, "newer");
        assert_eq!(recent[0].report_date, Some(jun));
        assert_eq!(recent[1].report_date, Some(jan));
    }

    #[test]
    fn summaries_without_report_are_excluded() {
        let conn = open_memory_database().unwrap();
        insert_ai_summary(&conn, &summary_for(None, "orphan", 0)).unwrap();
        assert!(get_recent_summaries(&conn, 5).unwrap().is_empty());
    }

    #[test]
    fn recent_summaries_respects_limit() {
        let conn = open_memory_database().unwrap();
        let report = seed_report(&conn, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        for i in 0..7 {
            insert_ai_summary(&conn, &summary_for(Some(report), &format!("s{i}"), i)).unwrap();
        }
        let recent = get_recent_summaries(&conn, 5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].summary, "s6");
    }
}
