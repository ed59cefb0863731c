use crate::errors::{AppError, AppResult};
use crate::models::aggregate::MinMax;
use crate::models::reading::{Reading, to_db_timestamp};
use crate::models::recording_type::RecordingType;
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql, params, params_from_iter};

const SELECT_READINGS: &str = "SELECT id, user_id, device_name, device_serial_number, device_timestamp,
        recording_type, glucose_history_mg_dl, glucose_scan_mg_dl, fast_acting_insulin,
        fast_acting_insulin_units, food_data, carbohydrates_grams, carbohydrates_servings,
        long_acting_insulin, long_acting_insulin_units, notes, glucose_test_strip_mg_dl,
        ketone_mmol_l, meal_insulin_units, correction_insulin_units, user_adjusted_insulin_units
     FROM readings";

/// Glucose value selected by the row's recording type.
const SELECTED_GLUCOSE: &str = "CASE recording_type
        WHEN 'history' THEN glucose_history_mg_dl
        WHEN 'scan' THEN glucose_scan_mg_dl
     END";

/// Filter shared by list, export and aggregation.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ReadingFilter {
    pub user_id: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl ReadingFilter {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    /// Build the WHERE clause and its positional parameters.
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(u) = &self.user_id {
            clauses.push("user_id = ?");
            values.push(Box::new(u.clone()));
        }
        if let Some(s) = &self.start {
            clauses.push("device_timestamp >= ?");
            values.push(Box::new(to_db_timestamp(s)));
        }
        if let Some(s) = &self.stop {
            clauses.push("device_timestamp <= ?");
            values.push(Box::new(to_db_timestamp(s)));
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

fn conversion_error(col: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(AppError::Other(msg)))
}

/// Map a `readings` row, converting the stored UTC timestamp into `tz`.
pub fn map_row(row: &Row, tz: Tz) -> Result<Reading> {
    let ts_str: String = row.get("device_timestamp")?;
    let ts = DateTime::parse_from_rfc3339(&ts_str)
        .map_err(|_| conversion_error(4, format!("Invalid timestamp: {}", ts_str)))?
        .with_timezone(&tz)
        .fixed_offset();

    let kind_str: String = row.get("recording_type")?;
    let kind = RecordingType::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(5, format!("Invalid recording type: {}", kind_str)))?;

    Ok(Reading {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        device_name: row.get("device_name")?,
        device_serial_number: row.get("device_serial_number")?,
        device_timestamp: ts,
        recording_type: kind,
        glucose_history_mg_dl: row.get("glucose_history_mg_dl")?,
        glucose_scan_mg_dl: row.get("glucose_scan_mg_dl")?,
        fast_acting_insulin: row.get("fast_acting_insulin")?,
        fast_acting_insulin_units: row.get("fast_acting_insulin_units")?,
        food_data: row.get("food_data")?,
        carbohydrates_grams: row.get("carbohydrates_grams")?,
        carbohydrates_servings: row.get("carbohydrates_servings")?,
        long_acting_insulin: row.get("long_acting_insulin")?,
        long_acting_insulin_units: row.get("long_acting_insulin_units")?,
        notes: row.get("notes")?,
        glucose_test_strip_mg_dl: row.get("glucose_test_strip_mg_dl")?,
        ketone_mmol_l: row.get("ketone_mmol_l")?,
        meal_insulin_units: row.get("meal_insulin_units")?,
        correction_insulin_units: row.get("correction_insulin_units")?,
        user_adjusted_insulin_units: row.get("user_adjusted_insulin_units")?,
    })
}

pub fn insert_reading(conn: &Connection, r: &Reading, created_at: &str) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO readings (
            user_id, device_name, device_serial_number, device_timestamp, recording_type,
            glucose_history_mg_dl, glucose_scan_mg_dl, fast_acting_insulin, fast_acting_insulin_units,
            food_data, carbohydrates_grams, carbohydrates_servings, long_acting_insulin,
            long_acting_insulin_units, notes, glucose_test_strip_mg_dl, ketone_mmol_l,
            meal_insulin_units, correction_insulin_units, user_adjusted_insulin_units, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
    )?;

    stmt.execute(params![
        r.user_id,
        r.device_name,
        r.device_serial_number,
        r.timestamp_db_str(),
        r.recording_type.to_db_str(),
        r.glucose_history_mg_dl,
        r.glucose_scan_mg_dl,
        r.fast_acting_insulin,
        r.fast_acting_insulin_units,
        r.food_data,
        r.carbohydrates_grams,
        r.carbohydrates_servings,
        r.long_acting_insulin,
        r.long_acting_insulin_units,
        r.notes,
        r.glucose_test_strip_mg_dl,
        r.ketone_mmol_l,
        r.meal_insulin_units,
        r.correction_insulin_units,
        r.user_adjusted_insulin_units,
        created_at,
    ])?;
    Ok(())
}

/// Insert a batch atomically.
///
/// Uses a SAVEPOINT so it nests inside an outer transaction when the caller
/// stages a whole run.
pub fn insert_readings(conn: &Connection, batch: &[Reading]) -> Result<usize> {
    let created_at = Local::now().to_rfc3339();

    conn.execute_batch("SAVEPOINT readings_batch")?;
    for r in batch {
        if let Err(e) = insert_reading(conn, r, &created_at) {
            conn.execute_batch("ROLLBACK TO readings_batch; RELEASE readings_batch")?;
            return Err(e);
        }
    }
    conn.execute_batch("RELEASE readings_batch")?;

    Ok(batch.len())
}

pub fn load_readings(conn: &Connection, filter: &ReadingFilter, tz: Tz) -> AppResult<Vec<Reading>> {
    let (where_sql, values) = filter.where_clause();
    let mut sql = format!("{}{} ORDER BY device_timestamp ASC, id ASC", SELECT_READINGS, where_sql);
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), |row| map_row(row, tz))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_reading(conn: &Connection, id: i64, tz: Tz) -> AppResult<Option<Reading>> {
    let sql = format!("{} WHERE id = ?1", SELECT_READINGS);
    let reading = conn
        .query_row(&sql, [id], |row| map_row(row, tz))
        .optional()?;
    Ok(reading)
}

pub fn count_readings(conn: &Connection, user_id: Option<&str>) -> AppResult<i64> {
    let count = match user_id {
        Some(u) => conn.query_row(
            "SELECT COUNT(*) FROM readings WHERE user_id = ?1",
            [u],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?,
    };
    Ok(count)
}

/// Remove every reading of a user. Returns the number of deleted rows.
pub fn delete_by_user(conn: &Connection, user_id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM readings WHERE user_id = ?1", [user_id])?;
    Ok(n)
}

/// Min / max of the recording-type-selected glucose value for the filter's user.
///
/// Returns `None` when no reading in the filter carries a glucose value.
pub fn min_max(conn: &Connection, filter: &ReadingFilter) -> AppResult<Option<MinMax>> {
    let user_id = filter
        .user_id
        .as_deref()
        .ok_or_else(|| AppError::Other("min/max needs a user id".into()))?;
    let scoped = ReadingFilter {
        limit: None,
        ..filter.clone()
    };
    let (where_sql, values) = scoped.where_clause();
    let sql = format!(
        "SELECT MIN({sel}), MAX({sel}), COUNT({sel}) FROM readings{where_sql}",
        sel = SELECTED_GLUCOSE,
        where_sql = where_sql
    );

    let (min, max, count): (Option<i64>, Option<i64>, i64) =
        conn.query_row(&sql, params_from_iter(values.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    match (min, max) {
        (Some(glucose_level_min), Some(glucose_level_max)) => Ok(Some(MinMax {
            user_id: user_id.to_string(),
            glucose_level_min,
            glucose_level_max,
            readings: count,
        })),
        _ => Ok(None),
    }
}

/// Distinct users with at least one reading, with their reading count.
pub fn list_users(conn: &Connection) -> AppResult<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, COUNT(*) FROM readings GROUP BY user_id ORDER BY user_id ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
