use crate::db::pool::DbPool;
use crate::db::queries::list_users;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::DateTime;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    header("🗄️ Database info");

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL READINGS
    //
    let count: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
    println!(
        "{}• Total readings:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );

    //
    // 3) USERS
    //
    let users = list_users(&pool.conn)?;
    println!("{}• Users:{} {}", CYAN, RESET, users.len());
    for (user, n) in &users {
        println!("    {:<24} {}", user, n);
    }

    //
    // 4) TIMESTAMP RANGE (UTC)
    //
    let range: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row(
            "SELECT MIN(device_timestamp), MAX(device_timestamp) FROM readings",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (first, last) = range.unwrap_or((None, None));
    let fmt = |v: &Option<String>| v.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Timestamp range (UTC):{}", CYAN, RESET);
    println!("    from: {}", fmt(&first));
    println!("    to:   {}", fmt(&last));

    //
    // 5) AVERAGE READINGS/DAY
    //
    if let (Some(f), Some(l)) = (first, last)
        && let (Ok(d1), Ok(d2)) = (
            DateTime::parse_from_rfc3339(&f),
            DateTime::parse_from_rfc3339(&l),
        )
    {
        let days = (d2 - d1).num_days().max(1);
        let avg = count as f64 / days as f64;
        println!("{}• Average readings/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
