use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};
use tracing::debug;

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check whether a migration version is already recorded in `log`.
fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `readings` table.
///
/// `device_timestamp` is UTC text (`YYYY-MM-DDTHH:MM:SSZ`) so that string
/// comparison equals time comparison in range filters.
fn create_readings_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id                          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id                     TEXT NOT NULL,
            device_name                 TEXT NOT NULL,
            device_serial_number        TEXT NOT NULL,
            device_timestamp            TEXT NOT NULL,
            recording_type              TEXT NOT NULL CHECK(recording_type IN ('history','scan')),
            glucose_history_mg_dl       INTEGER,
            glucose_scan_mg_dl          INTEGER,
            fast_acting_insulin         TEXT,
            fast_acting_insulin_units   REAL,
            food_data                   TEXT,
            carbohydrates_grams         REAL,
            carbohydrates_servings      REAL,
            long_acting_insulin         TEXT,
            long_acting_insulin_units   REAL,
            notes                       TEXT,
            glucose_test_strip_mg_dl    INTEGER,
            ketone_mmol_l               REAL,
            meal_insulin_units          REAL,
            correction_insulin_units    REAL,
            user_adjusted_insulin_units REAL,
            created_at                  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_readings_user ON readings(user_id);
        CREATE INDEX IF NOT EXISTS idx_readings_serial ON readings(device_serial_number);
        CREATE INDEX IF NOT EXISTS idx_readings_timestamp ON readings(device_timestamp);
        CREATE INDEX IF NOT EXISTS idx_readings_recording_type ON readings(recording_type);
        "#,
    )?;
    Ok(())
}

/// Composite index used by per-user range filters and min/max aggregation.
fn add_user_timestamp_index(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_readings_user_ts ON readings(user_id, device_timestamp);",
    )?;
    Ok(())
}

type Migration = (&'static str, &'static str, fn(&Connection) -> Result<()>);

const MIGRATIONS: [Migration; 2] = [
    (
        "20250301_0001_create_readings",
        "Created readings table",
        create_readings_table,
    ),
    (
        "20250315_0002_readings_user_ts_index",
        "Added (user_id, device_timestamp) index on readings",
        add_user_timestamp_index,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Invocata da db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            debug!("Migration {} already applied", version);
            continue; // già applicata
        }

        apply(conn)?;
        mark_applied(conn, version, message)?;
        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }
}
