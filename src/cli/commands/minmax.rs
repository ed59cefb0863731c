use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::queries::{ReadingFilter, min_max};
use crate::errors::AppResult;
use crate::ui::messages::warning;
use crate::utils::colors::{CYAN, RESET, color_for_glucose};
use crate::utils::date::parse_range;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Minmax { user, start, stop } = cmd {
        let (start, stop) = parse_range(start.as_deref(), stop.as_deref(), cfg.tz()?)?;
        let filter = ReadingFilter {
            user_id: Some(user.clone()),
            start,
            stop,
            limit: None,
        };

        let pool = open_db(&cfg.database)?;

        match min_max(&pool.conn, &filter)? {
            Some(mm) => {
                println!("{}User:{} {}", CYAN, RESET, mm.user_id);
                println!(
                    "{}Min:{}  {}{} mg/dL{}",
                    CYAN,
                    RESET,
                    color_for_glucose(mm.glucose_level_min),
                    mm.glucose_level_min,
                    RESET
                );
                println!(
                    "{}Max:{}  {}{} mg/dL{}",
                    CYAN,
                    RESET,
                    color_for_glucose(mm.glucose_level_max),
                    mm.glucose_level_max,
                    RESET
                );
                println!("{}Readings:{} {}", CYAN, RESET, mm.readings);
            }
            None => warning(format!("No glucose readings found for user '{}'", user)),
        }
    }

    Ok(())
}
