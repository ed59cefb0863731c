//! Static column table of the device export.
//!
//! Every known column has a canonical field, the vendor (German) label used in
//! the header row, the kind of value it carries and whether a row is valid
//! without it. Columns are always addressed by label, never by position.

use crate::errors::{AppError, AppResult};
use csv::StringRecord;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceName,
    DeviceSerialNumber,
    DeviceTimestamp,
    RecordingType,
    GlucoseHistoryMgDl,
    GlucoseScanMgDl,
    FastActingInsulin,
    FastActingInsulinUnits,
    FoodData,
    CarbohydratesGrams,
    CarbohydratesServings,
    LongActingInsulin,
    LongActingInsulinUnits,
    Notes,
    GlucoseTestStripMgDl,
    KetoneMmolL,
    MealInsulinUnits,
    CorrectionInsulinUnits,
    UserAdjustedInsulinUnits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Float,
    Integer,
    Timestamp,
    Enum,
}

#[derive(Debug)]
pub struct ColumnSpec {
    pub field: Field,
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ValueKind,
    pub required: bool,
}

const fn col(
    field: Field,
    name: &'static str,
    label: &'static str,
    kind: ValueKind,
    required: bool,
) -> ColumnSpec {
    ColumnSpec {
        field,
        name,
        label,
        kind,
        required,
    }
}

/// Ordered like `Field`, so `COLUMNS[field as usize]` is the field's entry.
pub static COLUMNS: [ColumnSpec; 19] = [
    col(Field::DeviceName, "device_name", "Gerät", ValueKind::String, true),
    col(Field::DeviceSerialNumber, "device_serial_number", "Seriennummer", ValueKind::String, true),
    col(Field::DeviceTimestamp, "device_timestamp", "Gerätezeitstempel", ValueKind::Timestamp, true),
    col(Field::RecordingType, "recording_type", "Aufzeichnungstyp", ValueKind::Enum, true),
    col(Field::GlucoseHistoryMgDl, "glucose_history_mg_dl", "Glukosewert-Verlauf mg/dL", ValueKind::Integer, false),
    col(Field::GlucoseScanMgDl, "glucose_scan_mg_dl", "Glukose-Scan mg/dL", ValueKind::Integer, false),
    col(Field::FastActingInsulin, "fast_acting_insulin", "Nicht numerisches schnellwirkendes Insulin", ValueKind::String, false),
    col(Field::FastActingInsulinUnits, "fast_acting_insulin_units", "Schnellwirkendes Insulin (Einheiten)", ValueKind::Float, false),
    col(Field::FoodData, "food_data", "Nicht numerische Nahrungsdaten", ValueKind::String, false),
    col(Field::CarbohydratesGrams, "carbohydrates_grams", "Kohlenhydrate (Gramm)", ValueKind::Float, false),
    col(Field::CarbohydratesServings, "carbohydrates_servings", "Kohlenhydrate (Portionen)", ValueKind::Float, false),
    col(Field::LongActingInsulin, "long_acting_insulin", "Nicht numerisches Depotinsulin", ValueKind::String, false),
    col(Field::LongActingInsulinUnits, "long_acting_insulin_units", "Depotinsulin (Einheiten)", ValueKind::Float, false),
    col(Field::Notes, "notes", "Notizen", ValueKind::String, false),
    col(Field::GlucoseTestStripMgDl, "glucose_test_strip_mg_dl", "Glukose-Teststreifen mg/dL", ValueKind::Integer, false),
    col(Field::KetoneMmolL, "ketone_mmol_l", "Keton mmol/L", ValueKind::Float, false),
    col(Field::MealInsulinUnits, "meal_insulin_units", "Mahlzeiteninsulin (Einheiten)", ValueKind::Float, false),
    col(Field::CorrectionInsulinUnits, "correction_insulin_units", "Korrekturinsulin (Einheiten)", ValueKind::Float, false),
    col(Field::UserAdjustedInsulinUnits, "user_adjusted_insulin_units", "Insulin-Änderung durch Anwender (Einheiten)", ValueKind::Float, false),
];

/// Labels that must all appear on a line for it to count as the header row.
pub const HEADER_MARKERS: [&str; 2] = ["Gerät", "Seriennummer"];

impl Field {
    pub fn spec(self) -> &'static ColumnSpec {
        &COLUMNS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }
}

/// Strip whitespace and a UTF-8 byte order mark from a header cell.
fn normalize_label(raw: &str) -> &str {
    raw.trim().trim_start_matches('\u{feff}').trim()
}

/// Position of every known column in the header row of one file.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<Field, usize>,
}

impl ColumnIndex {
    /// Map the header row onto the column table.
    ///
    /// Unknown columns are ignored, optional columns may be absent, a missing
    /// required column is a decode error reported on `header_line_no`.
    pub fn from_headers(headers: &StringRecord, header_line_no: u64) -> AppResult<Self> {
        let mut positions = HashMap::new();

        for (i, raw) in headers.iter().enumerate() {
            let label = normalize_label(raw);
            match COLUMNS.iter().find(|c| c.label == label) {
                Some(spec) => {
                    // prima occorrenza vince
                    positions.entry(spec.field).or_insert(i);
                }
                None if label.is_empty() => {}
                None => debug!("Ignoring unknown column '{}'", label),
            }
        }

        if let Some(missing) = COLUMNS
            .iter()
            .find(|c| c.required && !positions.contains_key(&c.field))
        {
            return Err(AppError::decode(
                header_line_no,
                missing.label,
                "required column is missing from the header row",
            ));
        }

        Ok(Self { positions })
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.positions.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_like_field_enum() {
        for (i, spec) in COLUMNS.iter().enumerate() {
            assert_eq!(spec.field as usize, i, "{} out of place", spec.name);
        }
    }

    #[test]
    fn header_markers_are_identity_labels() {
        assert_eq!(HEADER_MARKERS[0], Field::DeviceName.spec().label);
        assert_eq!(HEADER_MARKERS[1], Field::DeviceSerialNumber.spec().label);
    }

    #[test]
    fn only_identity_columns_are_required() {
        let required: Vec<_> = COLUMNS.iter().filter(|c| c.required).map(|c| c.name).collect();
        assert_eq!(
            required,
            ["device_name", "device_serial_number", "device_timestamp", "recording_type"]
        );
    }

    #[test]
    fn index_resolves_labels_regardless_of_order() {
        let headers = StringRecord::from(vec![
            "Aufzeichnungstyp",
            "\u{feff}Gerät ",
            "Gerätezeitstempel",
            "Extra",
            "Seriennummer",
            "",
        ]);
        let index = ColumnIndex::from_headers(&headers, 1).unwrap();
        assert_eq!(index.position(Field::RecordingType), Some(0));
        assert_eq!(index.position(Field::DeviceName), Some(1));
        assert_eq!(index.position(Field::DeviceSerialNumber), Some(4));
        assert!(!index.has_column(Field::Notes));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn missing_required_column_is_a_decode_error() {
        let headers = StringRecord::from(vec!["Gerät", "Seriennummer", "Gerätezeitstempel"]);
        match ColumnIndex::from_headers(&headers, 3) {
            Err(AppError::Decode { line, column, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Aufzeichnungstyp");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
