//! Local calendar helpers shared by the task store and statistics.

use chrono::{Local, NaiveDate, TimeZone};

/// Format used for per-day statistics keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local calendar date of an epoch-millisecond timestamp.
pub fn local_date(epoch_ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.date_naive())
}

/// `YYYY-MM-DD` key for `date`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(date_key(date), "2026-03-07");
    }

    #[test]
    fn local_date_of_now_is_today() {
        assert_eq!(local_date(now_ms()), Some(today()));
    }
}
