//! Per-kind cell coercion.
//!
//! Every function receives an already trimmed cell and returns `Ok(None)` for
//! an empty cell. A non-empty cell that cannot be converted is an error; there
//! is no silent default.

use super::columns::ValueKind;
use crate::models::recording_type::RecordingType;
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Device timestamp layout: day-month-year, 24h clock, no seconds.
pub const DEVICE_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Float(f64),
    Integer(i64),
    Timestamp(DateTime<FixedOffset>),
    Recording(RecordingType),
}

impl Value {
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
    pub fn into_float(self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
    pub fn into_integer(self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(v),
            _ => None,
        }
    }
    pub fn into_timestamp(self) -> Option<DateTime<FixedOffset>> {
        match self {
            Value::Timestamp(v) => Some(v),
            _ => None,
        }
    }
    pub fn into_recording(self) -> Option<RecordingType> {
        match self {
            Value::Recording(v) => Some(v),
            _ => None,
        }
    }
}

/// Coerce one cell according to its declared kind.
pub fn coerce(raw: &str, kind: ValueKind, tz: Tz) -> Result<Option<Value>, String> {
    Ok(match kind {
        ValueKind::String => coerce_string(raw).map(Value::Text),
        ValueKind::Float => coerce_float(raw)?.map(Value::Float),
        ValueKind::Integer => coerce_integer(raw)?.map(Value::Integer),
        ValueKind::Timestamp => coerce_timestamp(raw, tz)?.map(Value::Timestamp),
        ValueKind::Enum => coerce_recording_type(raw)?.map(Value::Recording),
    })
}

pub fn coerce_string(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

pub fn coerce_float(raw: &str) -> Result<Option<f64>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("'{}' is not a valid number", raw)),
    }
}

/// Integers may be written as integral floats (`"75.0"`), as some exports do.
pub fn coerce_integer(raw: &str) -> Result<Option<i64>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(Some(v));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            Ok(Some(v as i64))
        }
        _ => Err(format!("'{}' is not a valid integer", raw)),
    }
}

/// Parse a wall-clock device timestamp and pin it to `tz`.
///
/// Local times that fall into a DST gap or fold are rejected.
pub fn coerce_timestamp(raw: &str, tz: Tz) -> Result<Option<DateTime<FixedOffset>>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    let naive = NaiveDateTime::parse_from_str(raw, DEVICE_TIMESTAMP_FORMAT).map_err(|e| {
        format!(
            "'{}' does not match timestamp format DD-MM-YYYY HH:MM ({})",
            raw, e
        )
    })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(Some(dt.fixed_offset())),
        LocalResult::Ambiguous(_, _) => Err(format!(
            "'{}' is ambiguous in timezone {} (daylight saving fold)",
            raw, tz
        )),
        LocalResult::None => Err(format!(
            "'{}' does not exist in timezone {} (daylight saving gap)",
            raw, tz
        )),
    }
}

pub fn coerce_recording_type(raw: &str) -> Result<Option<RecordingType>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    RecordingType::parse_cell(raw)
        .map(Some)
        .ok_or_else(|| format!("unknown recording type code '{}'", raw))
}
