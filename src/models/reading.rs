use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exclusive bounds for a plausible HbA1c percentage.
pub const HBA1C_MIN_EXCLUSIVE: f64 = 0.0;
pub const HBA1C_MAX_EXCLUSIVE: f64 = 25.0;

/// Whether `value` is a storable HbA1c percentage.
pub fn is_plausible_hba1c(value: f64) -> bool {
    value.is_finite() && value > HBA1C_MIN_EXCLUSIVE && value < HBA1C_MAX_EXCLUSIVE
}

/// A stored HbA1c reading, one per report in which a value was detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hba1cReading {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub summary_id: Option<Uuid>,
    pub disease: Option<String>,
    pub reading_date: NaiveDate,
    pub value: f64,
}

/// One point of a reading history as handed to clients and the trend builder.
///
/// Both fields are optional: rows with unparsable dates or missing values
/// still render (as `n/a`) instead of failing the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingPoint {
    pub reading_date: Option<NaiveDate>,
    pub value: Option<f64>,
}

impl ReadingPoint {
    pub fn new(reading_date: NaiveDate, value: f64) -> Self {
        Self {
            reading_date: Some(reading_date),
            value: Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausibility_bounds_are_exclusive() {
        assert!(!is_plausible_hba1c(0.0));
        assert!(!is_plausible_hba1c(25.0));
        assert!(is_plausible_hba1c(0.1));
        assert!(is_plausible_hba1c(24.99));
        assert!(!is_plausible_hba1c(f64::NAN));
        assert!(!is_plausible_hba1c(f64::INFINITY));
    }

    #[test]
    fn reading_point_serializes_iso_date() {
        let point = ReadingPoint::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 7.5);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["reading_date"], "2024-06-01");
        assert_eq!(json["value"], 7.5);
    }

    #[test]
    fn reading_point_serializes_missing_fields_as_null() {
        let point = ReadingPoint {
            reading_date: None,
            value: None,
        };
        let json = serde_json::to_value(point).unwrap();
        assert!(json["reading_date"].is_null());
        assert!(json["value"].is_null());
    }
}
