use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an audit line into the `log` table.
///
/// `operation` is a short verb (`load`, `delete`, `export`, ...), `target`
/// usually the user id or the file involved.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // Timestamp locale, formattato in ISO 8601
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    #[test]
    fn writes_one_row_per_call() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();

        ttlog(&conn, "load", "alice", "Loaded 3 readings").unwrap();

        let (op, target): (String, String) = conn
            .query_row(
                "SELECT operation, target FROM log WHERE operation = 'load'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(op, "load");
        assert_eq!(target, "alice");
    }
}
