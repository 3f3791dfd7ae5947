use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

const MISSING_TIME: &str = "--:--";

/// Epoch-ms timestamp as wall-clock time at a fixed UTC offset.
pub fn local_time(timestamp_ms: f64, utc_offset_minutes: i32) -> Option<DateTime<FixedOffset>> {
    if !timestamp_ms.is_finite() {
        return None;
    }
    let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms.floor() as i64)
        .map(|utc| utc.with_timezone(&offset))
}

fn format_local(timestamp_ms: f64, utc_offset_minutes: i32, pattern: &str) -> String {
    local_time(timestamp_ms, utc_offset_minutes)
        .map(|time| time.format(pattern).to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}

/// `h:mm AM/PM`, used for the range labels under the timeline.
pub fn format_hour_minute(timestamp_ms: f64, utc_offset_minutes: i32) -> String {
    format_local(timestamp_ms, utc_offset_minutes, "%-I:%M %p")
}

/// `h:mm:ss AM/PM`, used for the label that follows the handle.
pub fn format_hour_minute_second(timestamp_ms: f64, utc_offset_minutes: i32) -> String {
    format_local(timestamp_ms, utc_offset_minutes, "%-I:%M:%S %p")
}

/// Epoch milliseconds of a date-time string. RFC 3339 (`2024-11-01T18:00:05+05:30`,
/// `...Z`) is read with its own offset; a bare `2024-11-01T12:30:05` or
/// `2024-11-01 12:30:05` is taken as UTC.
pub fn parse_timestamp_ms(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.timestamp_millis());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ist_offset_applies() {
        // 2024-11-01T12:30:05Z is 6:00:05 PM in IST.
        let ts = 1_730_464_205_000.0;
        assert_eq!(format_hour_minute_second(ts, 330), "6:00:05 PM");
        assert_eq!(format_hour_minute(ts, 330), "6:00 PM");
        assert_eq!(format_hour_minute(ts, 0), "12:30 PM");
    }

    #[test]
    fn midnight_is_twelve_am() {
        assert_eq!(format_hour_minute(0.0, 0), "12:00 AM");
        assert_eq!(format_hour_minute_second(-1_000.0, 0), "11:59:59 PM");
    }

    #[test]
    fn unusable_input_gets_a_placeholder() {
        assert_eq!(format_hour_minute(f64::NAN, 330), "--:--");
        assert_eq!(format_hour_minute(0.0, 24 * 60), "--:--");
    }

    #[test]
    fn date_strings() {
        assert_eq!(parse_timestamp_ms("2024-11-01T12:30:05Z"), Some(1_730_464_205_000));
        assert_eq!(parse_timestamp_ms("2024-11-01T18:00:05.250+05:30"), Some(1_730_464_205_250));
        assert_eq!(parse_timestamp_ms("2024-11-01 12:30:05"), Some(1_730_464_205_000));
        assert_eq!(parse_timestamp_ms("yesterday"), None);
    }
}
