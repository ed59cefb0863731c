//! Load orchestration: file → header probe → chunked ingest → SQLite.

use crate::config::{Config, IngestMode, parse_delimiter};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::delete_by_user;
use crate::db::sink::SqliteSink;
use crate::errors::{AppError, AppResult};
use crate::ingest::{IngestOptions, ingest, locate_header_in_file};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// One `load` invocation. `None` fields fall back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    pub file: PathBuf,
    pub user_id: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_probe_lines: Option<usize>,
    pub delimiter: Option<String>,
    pub mode: Option<IngestMode>,
    pub replace: bool,
}

impl LoadRequest {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub user_id: String,
    /// 0-based line index of the header row.
    pub header_line: usize,
    pub inserted: usize,
    /// Readings removed by `replace` before loading.
    pub replaced: usize,
    pub mode: IngestMode,
    pub elapsed: Duration,
}

/// User id derived from the file name, extension stripped.
pub fn user_id_from_path(path: &Path) -> AppResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Config(format!(
                "Cannot derive a user id from '{}', pass --user",
                path.display()
            ))
        })
}

pub struct LoadLogic;

impl LoadLogic {
    pub fn load(pool: &mut DbPool, cfg: &Config, request: &LoadRequest) -> AppResult<LoadSummary> {
        let started = Instant::now();

        match Self::run(pool, cfg, request, started) {
            Ok(summary) => {
                ttlog(
                    &pool.conn,
                    "load",
                    &summary.user_id,
                    &format!(
                        "Loaded {} readings from {} ({} replaced)",
                        summary.inserted,
                        request.file.display(),
                        summary.replaced
                    ),
                )?;
                info!(
                    "Loaded {} readings for '{}' in {:?}",
                    summary.inserted, summary.user_id, summary.elapsed
                );
                Ok(summary)
            }
            Err(e) => {
                error!("Load of {} failed: {}", request.file.display(), e);
                Err(e)
            }
        }
    }

    fn run(
        pool: &mut DbPool,
        cfg: &Config,
        request: &LoadRequest,
        started: Instant,
    ) -> AppResult<LoadSummary> {
        let user_id = match &request.user_id {
            Some(u) if !u.trim().is_empty() => u.trim().to_string(),
            Some(_) => return Err(AppError::Config("user id must not be empty".into())),
            None => user_id_from_path(&request.file)?,
        };

        let delimiter = match &request.delimiter {
            Some(d) => parse_delimiter(d)?,
            None => cfg.delimiter_byte()?,
        };
        let options = IngestOptions::new(request.chunk_size.unwrap_or(cfg.chunk_size), cfg.tz()?)
            .with_delimiter(delimiter);
        let mode = request.mode.unwrap_or(cfg.ingest_mode);
        let max_probe = request.max_probe_lines.unwrap_or(cfg.max_probe_lines);

        let located = locate_header_in_file(&request.file, max_probe)?;
        let header_line = located.header_line;
        info!(
            "Header found at line {} of {}",
            header_line + 1,
            request.file.display()
        );
        debug!("Header row: {}", located.header_text().trim_end());

        let (inserted, replaced) = match mode {
            IngestMode::Chunked => {
                let replaced = replace_first(&pool.conn, &user_id, request.replace)?;
                let mut sink = SqliteSink::new(&pool.conn);
                let n = ingest(located.into_content(), header_line, &user_id, &options, &mut sink)?;
                (n, replaced)
            }
            IngestMode::AllOrNothing => {
                // unico commit alla fine; un errore fa rollback di tutto
                let tx = pool.conn.transaction()?;
                let replaced = replace_first(&tx, &user_id, request.replace)?;
                let mut sink = SqliteSink::new(&tx);
                let n = ingest(located.into_content(), header_line, &user_id, &options, &mut sink)?;
                tx.commit()?;
                (n, replaced)
            }
        };

        Ok(LoadSummary {
            user_id,
            header_line,
            inserted,
            replaced,
            mode,
            elapsed: started.elapsed(),
        })
    }
}

fn replace_first(conn: &Connection, user_id: &str, replace: bool) -> AppResult<usize> {
    if !replace {
        return Ok(0);
    }
    let n = delete_by_user(conn, user_id)?;
    info!("Removed {} existing readings of '{}'", n, user_id);
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_the_file_stem() {
        let id = user_id_from_path(Path::new("/data/exports/anna_2021.csv")).unwrap();
        assert_eq!(id, "anna_2021");
    }

    #[test]
    fn user_id_needs_a_name() {
        assert!(user_id_from_path(Path::new("/")).is_err());
    }
}
