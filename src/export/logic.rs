// src/export/logic.rs

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{ReadingFilter, load_readings};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::ReadingExport;
use crate::ui::messages::warning;
use std::path::Path;
use tracing::debug;

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export delle letture selezionate da `filter`.
    ///
    /// - `format`: csv | json
    /// - `file`: path assoluto del file di output
    ///
    /// Returns the number of exported readings; nothing is written when the
    /// filter matches no reading.
    pub fn export(
        pool: &mut DbPool,
        cfg: &Config,
        format: ExportFormat,
        file: &str,
        filter: &ReadingFilter,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let tz = cfg.tz()?;
        let rows: Vec<ReadingExport> = load_readings(&pool.conn, filter, tz)?
            .iter()
            .map(ReadingExport::from)
            .collect();
        debug!("Export selected {} readings", rows.len());

        if rows.is_empty() {
            warning("No readings found for the selected filter.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        let target = filter.user_id.as_deref().unwrap_or("*");
        ttlog(
            &pool.conn,
            "export",
            target,
            &format!(
                "Exported {} readings as {} to {}",
                rows.len(),
                format.as_str(),
                path.display()
            ),
        )?;

        Ok(rows.len())
    }
}
