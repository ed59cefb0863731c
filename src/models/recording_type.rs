use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordingType {
    History,
    Scan,
}

/// Numeric codes used by the device export (`Aufzeichnungstyp` column).
const RECORDING_TYPE_CODES: [(i64, RecordingType); 2] =
    [(0, RecordingType::History), (1, RecordingType::Scan)];

impl RecordingType {
    /// Look up a numeric device code. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        RECORDING_TYPE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| *t)
    }

    pub fn code(&self) -> i64 {
        match self {
            RecordingType::History => 0,
            RecordingType::Scan => 1,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordingType::History => "history",
            RecordingType::Scan => "scan",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "history" => Some(RecordingType::History),
            "scan" => Some(RecordingType::Scan),
            _ => None,
        }
    }

    /// Parse a raw cell: either a numeric code or the canonical name.
    pub fn parse_cell(raw: &str) -> Option<Self> {
        match raw.parse::<i64>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::from_db_str(&raw.to_lowercase()),
        }
    }
}
