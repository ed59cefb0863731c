//! Range bounds given on the command line.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Which end of a range a bound closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    Stop,
}

/// Parse a range bound into an instant.
///
/// Accepted forms:
/// - `YYYY-MM-DD`: first second of the day for [`Bound::Start`], last second
///   for [`Bound::Stop`], in `tz`
/// - `YYYY-MM-DD HH:MM`: wall-clock time in `tz`
/// - RFC 3339 with an explicit offset
pub fn parse_bound(s: &str, tz: Tz, bound: Bound) -> AppResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return tz
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                AppError::InvalidTimestamp(format!("{} is ambiguous or skipped in {}", s, tz))
            });
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let (time, local) = match bound {
            Bound::Start => (NaiveTime::MIN, day.and_time(NaiveTime::MIN)),
            Bound::Stop => {
                let t = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
                (t, day.and_time(t))
            }
        };
        let resolved = tz.from_local_datetime(&local);
        let dt = match bound {
            Bound::Start => resolved.earliest(),
            Bound::Stop => resolved.latest(),
        };
        return dt.map(|d| d.with_timezone(&Utc)).ok_or_else(|| {
            AppError::InvalidTimestamp(format!("{} {} does not exist in {}", s, time, tz))
        });
    }

    Err(AppError::InvalidTimestamp(format!(
        "{} (expected YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339)",
        s
    )))
}

/// Parse optional start / stop bounds and check their order.
pub fn parse_range(
    start: Option<&str>,
    stop: Option<&str>,
    tz: Tz,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let start = start.map(|s| parse_bound(s, tz, Bound::Start)).transpose()?;
    let stop = stop.map(|s| parse_bound(s, tz, Bound::Stop)).transpose()?;

    if let (Some(a), Some(b)) = (start, stop)
        && a > b
    {
        return Err(AppError::InvalidTimestamp(format!(
            "start {} is after stop {}",
            a, b
        )));
    }

    Ok((start, stop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;

    #[test]
    fn day_bounds_cover_the_whole_local_day() {
        let a = parse_bound("2021-02-18", Berlin, Bound::Start).unwrap();
        let b = parse_bound("2021-02-18", Berlin, Bound::Stop).unwrap();
        assert_eq!(a.to_rfc3339(), "2021-02-17T23:00:00+00:00");
        assert_eq!(b.to_rfc3339(), "2021-02-18T22:59:59+00:00");
    }

    #[test]
    fn wall_clock_and_rfc3339() {
        let a = parse_bound("2021-07-01 12:00", Berlin, Bound::Start).unwrap();
        assert_eq!(a.to_rfc3339(), "2021-07-01T10:00:00+00:00");

        let b = parse_bound("2021-07-01T12:00:00Z", Berlin, Bound::Start).unwrap();
        assert_eq!(b.to_rfc3339(), "2021-07-01T12:00:00+00:00");
    }

    #[test]
    fn skipped_wall_clock_is_rejected() {
        assert!(parse_bound("2021-03-28 02:30", Berlin, Bound::Start).is_err());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = parse_range(Some("2021-02-19"), Some("2021-02-18"), Berlin).unwrap_err();
        assert!(matches!(err, AppError::InvalidTimestamp(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_bound("yesterday", Berlin, Bound::Stop).is_err());
    }
}
