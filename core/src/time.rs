use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use anyhow::{anyhow, Result};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Date part of a backend date string ("2024-03-05" or "2024-03-05T00:00:00").
pub fn parse_date_prefix(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    let head = input.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Parses a timestamp as local wall-clock time.
///
/// RFC 3339 strings keep the clock time as written and drop the offset; no
/// conversion between zones happens here.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// "09:00" or "09:00:00".
pub fn parse_clock_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| anyhow!("Invalid clock time: {}", input))
}

pub fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday: {}", s)),
    }
}

/// Fractional hours from `start` to `end`. Negative when `end` precedes `start`.
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    end.signed_duration_since(start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Hour of day with minutes as a fraction (seconds ignored), e.g. 08:30 -> 8.5.
pub fn clock_hours(ts: NaiveDateTime) -> f64 {
    ts.hour() as f64 + ts.minute() as f64 / 60.0
}

/// "8h 43m", or "-" for nothing worked.
pub fn format_duration(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "-".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// "08:55 AM", or "--:--" when absent.
pub fn format_clock(ts: Option<NaiveDateTime>) -> String {
    match ts {
        Some(ts) => ts.format("%I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_date_prefix() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date_prefix("2024-03-05"), d);
        assert_eq!(parse_date_prefix("2024-03-05T00:00:00Z"), d);
        assert_eq!(parse_date_prefix("2024-3-5"), None);
        assert_eq!(parse_date_prefix(""), None);
        assert_eq!(parse_date_prefix("not a date at all"), None);
    }

    #[test]
    fn test_parse_timestamp_keeps_wall_clock() {
        assert_eq!(parse_timestamp("2024-03-05T08:55:00"), Some(ts(8, 55)));
        assert_eq!(parse_timestamp("2024-03-05T08:55:00.123"), Some(ts(8, 55) + chrono::Duration::milliseconds(123)));
        assert_eq!(parse_timestamp("2024-03-05 08:55:00"), Some(ts(8, 55)));
        assert_eq!(parse_timestamp("2024-03-05T08:55"), Some(ts(8, 55)));
        // offset is dropped, not applied
        assert_eq!(parse_timestamp("2024-03-05T08:55:00+05:30"), Some(ts(8, 55)));
        assert_eq!(parse_timestamp("2024-03-05T08:55:00Z"), Some(ts(8, 55)));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn test_hours_between() {
        assert_eq!(hours_between(ts(8, 55), ts(18, 10)), 9.25);
        assert_eq!(hours_between(ts(10, 0), ts(9, 0)), -1.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(8.5), "8h 30m");
        assert_eq!(format_duration(0.0), "-");
        assert_eq!(format_duration(-2.0), "-");
        assert_eq!(format_duration(f64::NAN), "-");
        // 7h 59.9m rounds into the next hour
        assert_eq!(format_duration(7.0 + 59.9 / 60.0), "8h 0m");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Some(ts(8, 55))), "08:55 AM");
        assert_eq!(format_clock(Some(ts(18, 10))), "06:10 PM");
        assert_eq!(format_clock(None), "--:--");
    }

    #[test]
    fn test_parse_clock_time_and_weekday() {
        assert_eq!(parse_clock_time("09:00").unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(parse_clock_time("09:15:30").unwrap(), NaiveTime::from_hms_opt(9, 15, 30).unwrap());
        assert!(parse_clock_time("9am").is_err());
        assert_eq!(parse_weekday_str("Sat").unwrap(), Weekday::Sat);
        assert!(parse_weekday_str("someday").is_err());
    }
}
