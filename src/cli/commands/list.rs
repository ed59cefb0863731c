use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::queries::{ReadingFilter, load_readings};
use crate::errors::AppResult;
use crate::models::reading::Reading;
use crate::ui::messages::warning;
use crate::utils::colors::{RESET, color_for_glucose, colorize_optional};
use crate::utils::date::parse_range;
use crate::utils::formatting::{ellipsize, opt, opt_f64};
use crate::utils::table::{Column, Table};

/// Handle the `list` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        user,
        start,
        stop,
        limit,
    } = cmd
    {
        let tz = cfg.tz()?;
        let (start, stop) = parse_range(start.as_deref(), stop.as_deref(), tz)?;
        let filter = ReadingFilter {
            user_id: user.clone(),
            start,
            stop,
            limit: *limit,
        };

        let pool = open_db(&cfg.database)?;
        let readings = load_readings(&pool.conn, &filter, tz)?;

        if readings.is_empty() {
            warning("No readings found.");
            return Ok(());
        }

        print!("{}", render(&readings));
        println!("{} reading(s)", readings.len());
    }

    Ok(())
}

fn glucose_cell(r: &Reading) -> String {
    match r.glucose_mg_dl() {
        Some(v) => format!("{}{}{}", color_for_glucose(v), v, RESET),
        None => colorize_optional("--"),
    }
}

fn render(readings: &[Reading]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("User", 12),
        Column::new("Timestamp", 16),
        Column::new("Type", 7),
        Column::new("mg/dL", 6),
        Column::new("Carbs g", 7),
        Column::new("Insulin", 7),
        Column::new("Notes", 24),
    ]);

    for r in readings {
        let insulin = r.fast_acting_insulin_units.or(r.meal_insulin_units);
        table.add_row(vec![
            r.id.to_string(),
            ellipsize(&r.user_id, 12),
            r.timestamp_str(),
            r.recording_type.to_db_str().to_string(),
            glucose_cell(r),
            colorize_optional(&opt_f64(r.carbohydrates_grams)),
            colorize_optional(&opt_f64(insulin)),
            colorize_optional(&ellipsize(&opt(&r.notes), 24)),
        ]);
    }

    table.render()
}
