use serde::Serialize;

/// Per-user glucose extremes over the recording-type-selected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinMax {
    pub user_id: String,
    pub glucose_level_min: i64,
    pub glucose_level_max: i64,
    /// Readings that contributed a glucose value.
    pub readings: i64,
}
