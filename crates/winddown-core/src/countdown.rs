//! Countdown and clock formatting.

use chrono::{DateTime, Local};

/// Signed milliseconds from `now` until `target`. Negative once the
/// target has passed.
pub fn ms_until(target: &DateTime<Local>, now: &DateTime<Local>) -> i64 {
    (*target - *now).num_milliseconds()
}

/// Format a signed millisecond duration for the live countdown.
///
/// The hours field is omitted when zero; minutes and seconds are always
/// zero-padded to two digits. Negative durations carry a leading sign:
/// `1h 01m 01s`, `-00m 05s`.
pub fn format_countdown(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let total_seconds = ms.abs() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{sign}{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{sign}{minutes:02}m {seconds:02}s")
    }
}

/// 12-hour clock rendering used in alert text, e.g. `7:05 PM`.
pub fn format_clock(t: &DateTime<Local>) -> String {
    t.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn countdown_with_hours() {
        assert_eq!(format_countdown(3_661_000), "1h 01m 01s");
    }

    #[test]
    fn countdown_without_hours() {
        assert_eq!(format_countdown(59_000), "00m 59s");
        assert_eq!(format_countdown(5 * 60_000 + 7_000), "05m 07s");
    }

    #[test]
    fn countdown_negative_is_signed() {
        let out = format_countdown(-5_000);
        assert!(out.starts_with('-'));
        assert_eq!(out, "-00m 05s");
    }

    #[test]
    fn countdown_exact_hour() {
        assert_eq!(format_countdown(3_600_000), "1h 00m 00s");
    }

    #[test]
    fn countdown_zero() {
        assert_eq!(format_countdown(0), "00m 00s");
    }

    #[test]
    fn clock_is_twelve_hour() {
        let evening = Local.with_ymd_and_hms(2024, 1, 1, 23, 5, 0).unwrap();
        assert_eq!(format_clock(&evening), "11:05 PM");
        let morning = Local.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
        assert_eq!(format_clock(&morning), "7:00 AM");
        let midnight = Local.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(format_clock(&midnight), "12:30 AM");
    }

    #[test]
    fn ms_until_signs() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let later = Local.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap();
        assert_eq!(ms_until(&later, &now), 30 * 60_000);
        assert_eq!(ms_until(&now, &later), -30 * 60_000);
    }
}
