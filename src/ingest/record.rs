//! Decoding of a single CSV record into a [`Reading`].

use super::coerce::{Value, coerce};
use super::columns::{ColumnIndex, Field};
use crate::errors::{AppError, AppResult};
use crate::models::reading::Reading;
use crate::models::recording_type::RecordingType;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use csv::StringRecord;

/// Typed view over one record, resolving cells through the column table.
struct RowView<'a> {
    record: &'a StringRecord,
    index: &'a ColumnIndex,
    line: u64,
    tz: Tz,
}

impl<'a> RowView<'a> {
    fn raw(&self, field: Field) -> &'a str {
        self.index
            .position(field)
            .and_then(|i| self.record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    fn value(&self, field: Field) -> AppResult<Option<Value>> {
        let spec = field.spec();
        let value = coerce(self.raw(field), spec.kind, self.tz)
            .map_err(|msg| AppError::decode(self.line, spec.label, msg))?;

        if value.is_none() && spec.required {
            return Err(AppError::decode(
                self.line,
                spec.label,
                "required value is empty",
            ));
        }
        Ok(value)
    }

    fn typed<T>(&self, field: Field, extract: fn(Value) -> Option<T>) -> AppResult<Option<T>> {
        match self.value(field)? {
            None => Ok(None),
            Some(v) => extract(v).map(Some).ok_or_else(|| {
                AppError::Other(format!(
                    "column '{}' is declared as {:?}",
                    field.label(),
                    field.spec().kind
                ))
            }),
        }
    }

    fn required<T>(&self, field: Field, extract: fn(Value) -> Option<T>) -> AppResult<T> {
        self.typed(field, extract)?
            .ok_or_else(|| AppError::decode(self.line, field.label(), "required value is empty"))
    }

    fn text(&self, field: Field) -> AppResult<Option<String>> {
        self.typed(field, Value::into_text)
    }

    fn float(&self, field: Field) -> AppResult<Option<f64>> {
        self.typed(field, Value::into_float)
    }

    fn integer(&self, field: Field) -> AppResult<Option<i64>> {
        self.typed(field, Value::into_integer)
    }

    fn timestamp(&self, field: Field) -> AppResult<DateTime<FixedOffset>> {
        self.required(field, Value::into_timestamp)
    }

    fn recording_type(&self, field: Field) -> AppResult<RecordingType> {
        self.required(field, Value::into_recording)
    }
}

/// Decode one data record.
///
/// `line` is the 1-based line of the record in the source file and is only
/// used for error reporting.
pub fn decode_record(
    record: &StringRecord,
    index: &ColumnIndex,
    line: u64,
    user_id: &str,
    tz: Tz,
) -> AppResult<Reading> {
    let row = RowView {
        record,
        index,
        line,
        tz,
    };

    let device_name = row.required(Field::DeviceName, Value::into_text)?;
    let serial = row.required(Field::DeviceSerialNumber, Value::into_text)?;
    let timestamp = row.timestamp(Field::DeviceTimestamp)?;
    let recording_type = row.recording_type(Field::RecordingType)?;

    let mut reading = Reading::new(user_id, &device_name, &serial, timestamp, recording_type);

    reading.glucose_history_mg_dl = row.integer(Field::GlucoseHistoryMgDl)?;
    reading.glucose_scan_mg_dl = row.integer(Field::GlucoseScanMgDl)?;
    reading.fast_acting_insulin = row.text(Field::FastActingInsulin)?;
    reading.fast_acting_insulin_units = row.float(Field::FastActingInsulinUnits)?;
    reading.food_data = row.text(Field::FoodData)?;
    reading.carbohydrates_grams = row.float(Field::CarbohydratesGrams)?;
    reading.carbohydrates_servings = row.float(Field::CarbohydratesServings)?;
    reading.long_acting_insulin = row.text(Field::LongActingInsulin)?;
    reading.long_acting_insulin_units = row.float(Field::LongActingInsulinUnits)?;
    reading.notes = row.text(Field::Notes)?;
    reading.glucose_test_strip_mg_dl = row.integer(Field::GlucoseTestStripMgDl)?;
    reading.ketone_mmol_l = row.float(Field::KetoneMmolL)?;
    reading.meal_insulin_units = row.float(Field::MealInsulinUnits)?;
    reading.correction_insulin_units = row.float(Field::CorrectionInsulinUnits)?;
    reading.user_adjusted_insulin_units = row.float(Field::UserAdjustedInsulinUnits)?;

    Ok(reading)
}

/// A record made only of empty cells (trailing `,,,,` lines).
pub fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}
