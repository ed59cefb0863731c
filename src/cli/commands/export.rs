use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::queries::ReadingFilter;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::date::parse_range;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        user,
        start,
        stop,
        force,
    } = cmd
    {
        let (start, stop) = parse_range(start.as_deref(), stop.as_deref(), cfg.tz()?)?;
        let filter = ReadingFilter {
            user_id: user.clone(),
            start,
            stop,
            limit: None,
        };

        let file = expand_tilde(file);
        let mut pool = open_db(&cfg.database)?;
        ExportLogic::export(
            &mut pool,
            cfg,
            *format,
            &file.to_string_lossy(),
            &filter,
            *force,
        )?;
    }
    Ok(())
}
