use crate::cli::parser::Commands;
use crate::config::{Config, IngestMode};
use crate::core::load::{LoadLogic, LoadRequest};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;

/// Handle the `load` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Load {
        file,
        user,
        chunk_size,
        max_probe_lines,
        delimiter,
        atomic,
        replace,
    } = cmd
    {
        let request = LoadRequest {
            file: expand_tilde(file),
            user_id: user.clone(),
            chunk_size: *chunk_size,
            max_probe_lines: *max_probe_lines,
            delimiter: delimiter.clone(),
            mode: atomic.then_some(IngestMode::AllOrNothing),
            replace: *replace,
        };

        let mut pool = open_db(&cfg.database)?;
        let summary = LoadLogic::load(&mut pool, cfg, &request)?;

        if summary.replaced > 0 {
            info(format!(
                "Removed {} previous readings of '{}'",
                summary.replaced, summary.user_id
            ));
        }
        success(format!(
            "Loaded {} readings for '{}' (header at line {}, {:.2}s)",
            summary.inserted,
            summary.user_id,
            summary.header_line + 1,
            summary.elapsed.as_secs_f64()
        ));
    }

    Ok(())
}
