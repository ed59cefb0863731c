use crate::db::queries::insert_readings;
use crate::errors::{AppError, AppResult};
use crate::ingest::ReadingSink;
use crate::models::reading::Reading;
use rusqlite::Connection;
use tracing::debug;

/// Sink that appends each batch to the `readings` table.
///
/// Every batch commits on its own unless the connection is already inside a
/// transaction, in which case the batch joins it.
pub struct SqliteSink<'c> {
    conn: &'c Connection,
    written: usize,
}

impl<'c> SqliteSink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn, written: 0 }
    }

    /// Readings persisted by this sink so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ReadingSink for SqliteSink<'_> {
    fn write_batch(&mut self, batch: &[Reading]) -> AppResult<()> {
        let n = insert_readings(self.conn, batch).map_err(|e| AppError::SinkWrite(Box::new(e)))?;
        self.written += n;
        debug!("Stored batch of {} readings ({} total)", n, self.written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::models::recording_type::RecordingType;
    use chrono::{FixedOffset, TimeZone};

    fn reading(user: &str, minute: u32) -> Reading {
        let ts = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2021, 2, 18, 11, minute, 0)
            .unwrap();
        let mut r = Reading::new(user, "FreeStyle LibreLink", "SN-1", ts, RecordingType::History);
        r.glucose_history_mg_dl = Some(100 + minute as i64);
        r
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM readings", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn batches_are_persisted() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();

        let mut sink = SqliteSink::new(&conn);
        sink.write_batch(&[reading("a", 1), reading("a", 2)]).unwrap();
        sink.write_batch(&[reading("a", 3)]).unwrap();

        assert_eq!(sink.written(), 3);
        assert_eq!(count(&conn), 3);
    }

    #[test]
    fn batches_join_an_outer_transaction() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();

        {
            let tx = conn.transaction().unwrap();
            let mut sink = SqliteSink::new(&tx);
            sink.write_batch(&[reading("a", 1)]).unwrap();
            sink.write_batch(&[reading("a", 2)]).unwrap();
            // tx dropped without commit → rollback
        }

        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn failed_batch_leaves_nothing_behind() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON readings
             WHEN NEW.user_id = 'bad'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let mut sink = SqliteSink::new(&conn);
        let err = sink
            .write_batch(&[reading("a", 1), reading("bad", 2)])
            .unwrap_err();

        assert!(matches!(err, AppError::SinkWrite(_)));
        assert_eq!(count(&conn), 0);
    }
}
