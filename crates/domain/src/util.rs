use std::time::{SystemTime, UNIX_EPOCH};

use time::OffsetDateTime;

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Formats an epoch-millisecond timestamp as a `YYYY-MM-DD` date (UTC).
pub fn format_ms_date(epoch_ms: i64) -> String {
    let value = OffsetDateTime::from_unix_timestamp_nanos(epoch_ms as i128 * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        u8::from(value.month()),
        value.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ms_date_renders_utc_date() {
        // 2024-05-01T12:30:00Z
        assert_eq!(format_ms_date(1_714_566_600_000), "2024-05-01");
    }

    #[test]
    fn format_ms_date_falls_back_to_epoch_when_out_of_range() {
        assert_eq!(format_ms_date(i64::MAX), "1970-01-01");
    }
}
