// src/export/model.rs

use crate::models::reading::Reading;
use serde::Serialize;

/// Flat row written by the CSV / JSON exporters.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ReadingExport {
    pub id: i64,
    pub user_id: String,
    pub device_name: String,
    pub device_serial_number: String,
    /// RFC 3339 in the configured zone.
    pub device_timestamp: String,
    pub recording_type: String,
    pub glucose_history_mg_dl: Option<i64>,
    pub glucose_scan_mg_dl: Option<i64>,
}

impl From<&Reading> for ReadingExport {
    fn from(r: &Reading) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id.clone(),
            device_name: r.device_name.clone(),
            device_serial_number: r.device_serial_number.clone(),
            device_timestamp: r.device_timestamp.to_rfc3339(),
            recording_type: r.recording_type.to_db_str().to_string(),
            glucose_history_mg_dl: r.glucose_history_mg_dl,
            glucose_scan_mg_dl: r.glucose_scan_mg_dl,
        }
    }
}
