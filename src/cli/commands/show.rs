use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::queries::get_reading;
use crate::errors::{AppError, AppResult};
use crate::ingest::{COLUMNS, Field};
use crate::models::reading::Reading;
use crate::utils::colors::{CYAN, RESET, colorize_optional};
use crate::utils::formatting::{opt, opt_f64};
use unicode_width::UnicodeWidthStr;

/// Handle the `show` subcommand: every field of one reading, labelled the
/// way the device export labels it.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let pool = open_db(&cfg.database)?;
        let reading =
            get_reading(&pool.conn, *id, cfg.tz()?)?.ok_or(AppError::ReadingNotFound(*id))?;

        let label_w = COLUMNS
            .iter()
            .map(|c| c.label.width())
            .max()
            .unwrap_or(20);

        println!("{}Reading #{}{} ({})", CYAN, reading.id, RESET, reading.user_id);
        for spec in COLUMNS.iter() {
            let pad = " ".repeat(label_w.saturating_sub(spec.label.width()));
            println!(
                "  {}{} : {}",
                spec.label,
                pad,
                colorize_optional(&field_value(&reading, spec.field))
            );
        }
    }

    Ok(())
}

fn field_value(r: &Reading, field: Field) -> String {
    match field {
        Field::DeviceName => r.device_name.clone(),
        Field::DeviceSerialNumber => r.device_serial_number.clone(),
        Field::DeviceTimestamp => r.device_timestamp.to_rfc3339(),
        Field::RecordingType => format!(
            "{} ({})",
            r.recording_type.to_db_str(),
            r.recording_type.code()
        ),
        Field::GlucoseHistoryMgDl => opt(&r.glucose_history_mg_dl),
        Field::GlucoseScanMgDl => opt(&r.glucose_scan_mg_dl),
        Field::FastActingInsulin => opt(&r.fast_acting_insulin),
        Field::FastActingInsulinUnits => opt_f64(r.fast_acting_insulin_units),
        Field::FoodData => opt(&r.food_data),
        Field::CarbohydratesGrams => opt_f64(r.carbohydrates_grams),
        Field::CarbohydratesServings => opt_f64(r.carbohydrates_servings),
        Field::LongActingInsulin => opt(&r.long_acting_insulin),
        Field::LongActingInsulinUnits => opt_f64(r.long_acting_insulin_units),
        Field::Notes => opt(&r.notes),
        Field::GlucoseTestStripMgDl => opt(&r.glucose_test_strip_mg_dl),
        Field::KetoneMmolL => opt_f64(r.ketone_mmol_l),
        Field::MealInsulinUnits => opt_f64(r.meal_insulin_units),
        Field::CorrectionInsulinUnits => opt_f64(r.correction_insulin_units),
        Field::UserAdjustedInsulinUnits => opt_f64(r.user_adjusted_insulin_units),
    }
}
