use super::recording_type::RecordingType;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// One normalized glucose / insulin / carbohydrate data point.
///
/// Built once per decoded CSV row and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub id: i64, // ⇔ readings.id, 0 until persisted
    pub user_id: String,
    pub device_name: String,
    pub device_serial_number: String,
    pub device_timestamp: DateTime<FixedOffset>, // local time in the configured zone
    pub recording_type: RecordingType,

    pub glucose_history_mg_dl: Option<i64>,
    pub glucose_scan_mg_dl: Option<i64>,

    pub fast_acting_insulin: Option<String>,
    pub fast_acting_insulin_units: Option<f64>,

    pub food_data: Option<String>,

    pub carbohydrates_grams: Option<f64>,
    pub carbohydrates_servings: Option<f64>,

    pub long_acting_insulin: Option<String>,
    pub long_acting_insulin_units: Option<f64>,

    pub notes: Option<String>,

    pub glucose_test_strip_mg_dl: Option<i64>,
    pub ketone_mmol_l: Option<f64>,

    pub meal_insulin_units: Option<f64>,
    pub correction_insulin_units: Option<f64>,
    pub user_adjusted_insulin_units: Option<f64>,
}

impl Reading {
    /// Reading with only the identity columns set; every optional field is null.
    pub fn new(
        user_id: &str,
        device_name: &str,
        device_serial_number: &str,
        device_timestamp: DateTime<FixedOffset>,
        recording_type: RecordingType,
    ) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            device_name: device_name.to_string(),
            device_serial_number: device_serial_number.to_string(),
            device_timestamp,
            recording_type,
            glucose_history_mg_dl: None,
            glucose_scan_mg_dl: None,
            fast_acting_insulin: None,
            fast_acting_insulin_units: None,
            food_data: None,
            carbohydrates_grams: None,
            carbohydrates_servings: None,
            long_acting_insulin: None,
            long_acting_insulin_units: None,
            notes: None,
            glucose_test_strip_mg_dl: None,
            ketone_mmol_l: None,
            meal_insulin_units: None,
            correction_insulin_units: None,
            user_adjusted_insulin_units: None,
        }
    }

    /// Glucose value that is meaningful for this row's recording type.
    pub fn glucose_mg_dl(&self) -> Option<i64> {
        match self.recording_type {
            RecordingType::History => self.glucose_history_mg_dl,
            RecordingType::Scan => self.glucose_scan_mg_dl,
        }
    }

    /// Storage form of the timestamp: UTC, second precision, lexically sortable.
    pub fn timestamp_db_str(&self) -> String {
        to_db_timestamp(&self.device_timestamp.with_timezone(&Utc))
    }

    pub fn timestamp_str(&self) -> String {
        self.device_timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Format a UTC instant the way the `readings` table stores it.
pub fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(kind: RecordingType) -> Reading {
        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2021, 2, 18, 11, 57, 0)
            .unwrap();
        let mut r = Reading::new("u1", "FreeStyle LibreLink", "SN-1", ts, kind);
        r.glucose_history_mg_dl = Some(75);
        r.glucose_scan_mg_dl = Some(110);
        r
    }

    #[test]
    fn glucose_value_follows_recording_type() {
        assert_eq!(sample(RecordingType::History).glucose_mg_dl(), Some(75));
        assert_eq!(sample(RecordingType::Scan).glucose_mg_dl(), Some(110));
    }

    #[test]
    fn db_timestamp_is_utc() {
        assert_eq!(
            sample(RecordingType::History).timestamp_db_str(),
            "2021-02-18T10:57:00Z"
        );
    }
}
