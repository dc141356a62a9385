//! 课表展开 — 周模板到具体日期的纯函数计算
//!
//! 模板有效期与请求区间取交集后，按星期几步进 7 天枚举日期。
//! 不触数据库，幂等性由上层的 (template, date) 唯一约束保证。

use chrono::{Datelike, NaiveDate, Weekday};

/// 模板有效期与请求区间的交集
///
/// 区间为闭区间，无交集时返回 None。
pub fn clamp_window(
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = valid_from.max(from);
    let end = valid_until.min(to);
    (start <= end).then_some((start, end))
}

/// [start, end] 内指定星期几的全部日期（升序）
pub fn occurrences(weekday: Weekday, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let offset = (7 + weekday.num_days_from_monday() as i64
        - start.weekday().num_days_from_monday() as i64)
        % 7;
    let mut current = start + chrono::Duration::days(offset);

    let mut dates = Vec::new();
    while current <= end {
        dates.push(current);
        current += chrono::Duration::days(7);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_occurrences_mondays_in_two_weeks() {
        // 2025-06-02 is a Monday
        let dates = occurrences(Weekday::Mon, d("2025-06-01"), d("2025-06-14"));
        assert_eq!(dates, vec![d("2025-06-02"), d("2025-06-09")]);
    }

    #[test]
    fn test_occurrences_start_on_matching_weekday() {
        let dates = occurrences(Weekday::Mon, d("2025-06-02"), d("2025-06-02"));
        assert_eq!(dates, vec![d("2025-06-02")]);
    }

    #[test]
    fn test_occurrences_none_in_short_window() {
        // Tuesday through Thursday window holds no Sunday
        let dates = occurrences(Weekday::Sun, d("2025-06-03"), d("2025-06-05"));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_occurrences_sunday_wraps_week() {
        // 2025-06-08 is the first Sunday after 2025-06-03
        let dates = occurrences(Weekday::Sun, d("2025-06-03"), d("2025-06-15"));
        assert_eq!(dates, vec![d("2025-06-08"), d("2025-06-15")]);
    }

    #[test]
    fn test_clamp_window_template_narrower() {
        let clamped = clamp_window(d("2025-06-05"), d("2025-06-10"), d("2025-06-01"), d("2025-06-30"));
        assert_eq!(clamped, Some((d("2025-06-05"), d("2025-06-10"))));
    }

    #[test]
    fn test_clamp_window_request_narrower() {
        let clamped = clamp_window(d("2025-01-01"), d("2025-12-31"), d("2025-06-01"), d("2025-06-07"));
        assert_eq!(clamped, Some((d("2025-06-01"), d("2025-06-07"))));
    }

    #[test]
    fn test_clamp_window_disjoint() {
        let clamped = clamp_window(d("2025-01-01"), d("2025-02-01"), d("2025-06-01"), d("2025-06-30"));
        assert_eq!(clamped, None);
    }

    #[test]
    fn test_clamped_occurrences_respect_validity() {
        // Template valid only for the first week of a month-long request
        let (start, end) =
            clamp_window(d("2025-06-01"), d("2025-06-07"), d("2025-06-01"), d("2025-06-30")).unwrap();
        let dates = occurrences(Weekday::Wed, start, end);
        assert_eq!(dates, vec![d("2025-06-04")]);
    }
}
