//! JST time helpers.

use chrono::{DateTime, FixedOffset, LocalResult, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

fn to_jst(timestamp_millis: i64) -> Option<DateTime<FixedOffset>> {
    match jst().timestamp_millis_opt(timestamp_millis) {
        LocalResult::Single(dt) => Some(dt),
        _ => None,
    }
}

/// Current Unix timestamp in milliseconds, taken from a JST clock.
pub fn now_jst_millis() -> i64 {
    Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) as RFC 3339 in JST.
///
/// Out-of-range timestamps render as an empty string.
pub fn to_jst_rfc3339(timestamp_millis: i64) -> String {
    to_jst(timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Render a Unix timestamp (milliseconds) as a JST calendar date (`YYYY-MM-DD`).
pub fn to_jst_date(timestamp_millis: i64) -> String {
    to_jst(timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_jst_millis_returns_positive_value() {
        // テスト項目: now_jst_millis が正の値を返す
        // given (前提条件):

        // when (操作):
        let timestamp = now_jst_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_now_jst_millis_is_monotonic_enough() {
        // テスト項目: 連続して呼び出すと減少しないタイムスタンプが返される
        // given (前提条件):
        let first = now_jst_millis();

        // when (操作):
        std::thread::sleep(std::time::Duration::from_millis(10));
        let second = now_jst_millis();

        // then (期待する結果):
        assert!(second >= first);
    }

    #[test]
    fn test_to_jst_rfc3339_format() {
        // テスト項目: タイムスタンプが JST の RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 JST in milliseconds
        let timestamp = 1672498800000;

        // when (操作):
        let result = to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.ends_with("+09:00"));
    }

    #[test]
    fn test_to_jst_date_crosses_midnight_in_jst() {
        // テスト項目: UTC では前日でも JST の日付で表示される
        // given (前提条件):
        // 2022-12-31 15:00:00 UTC == 2023-01-01 00:00:00 JST
        let timestamp = 1672498800000;

        // when (操作):
        let result = to_jst_date(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01");
    }

    #[test]
    fn test_out_of_range_timestamp_renders_empty() {
        // テスト項目: 範囲外のタイムスタンプは空文字列になる
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let rfc3339 = to_jst_rfc3339(timestamp);
        let date = to_jst_date(timestamp);

        // then (期待する結果):
        assert!(rfc3339.is_empty());
        assert!(date.is_empty());
    }
}
