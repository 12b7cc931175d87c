//! Relative date formatting ("3 hours ago", "3시간 전").
//!
//! Elapsed time is decomposed with calendar arithmetic in the timestamp's own
//! time zone: years and months are shifted on the calendar (with month-end
//! clamping), and only the remainder below one month is measured as a fixed
//! duration.

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{FitfeedError, Result};

/// Elapsed seconds below this threshold render as "just now".
pub const JUST_NOW_THRESHOLD_SECS: i64 = 5;

/// Display language for user-facing strings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

/// Calendar unit used for the rendered tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

struct Vocabulary {
    year: &'static str,
    month: &'static str,
    day: &'static str,
    hour: &'static str,
    minute: &'static str,
    second: &'static str,
    ago: &'static str,
    just_now: &'static str,
    plural: &'static str,
}

const EN: Vocabulary = Vocabulary {
    year: "year",
    month: "month",
    day: "day",
    hour: "hour",
    minute: "minute",
    second: "second",
    ago: "ago",
    just_now: "just now",
    plural: "s",
};

const KO: Vocabulary = Vocabulary {
    year: "년",
    month: "개월",
    day: "일",
    hour: "시간",
    minute: "분",
    second: "초",
    ago: "전",
    just_now: "방금 전",
    plural: "",
};

impl Locale {
    fn vocabulary(self) -> &'static Vocabulary {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }

    /// The locale's "just now" label.
    pub fn just_now(self) -> &'static str {
        self.vocabulary().just_now
    }

    fn unit_label(self, unit: TimeUnit) -> &'static str {
        let vocab = self.vocabulary();
        match unit {
            TimeUnit::Year => vocab.year,
            TimeUnit::Month => vocab.month,
            TimeUnit::Day => vocab.day,
            TimeUnit::Hour => vocab.hour,
            TimeUnit::Minute => vocab.minute,
            TimeUnit::Second => vocab.second,
        }
    }

    fn render(self, count: i64, unit: TimeUnit) -> String {
        let vocab = self.vocabulary();
        let label = self.unit_label(unit);
        match self {
            Locale::En => {
                let plural = if count > 1 { vocab.plural } else { "" };
                format!("{} {}{} {}", count, label, plural, vocab.ago)
            }
            Locale::Ko => format!("{}{} {}", count, label, vocab.ago),
        }
    }
}

/// Non-overlapping calendar decomposition of an elapsed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeDuration {
    pub years: u32,
    pub months: u32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl RelativeDuration {
    /// Decomposes `end - start`, both read as wall-clock times in one zone.
    ///
    /// Returns `None` when `start` is after `end`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if start > end {
            return None;
        }

        let mut years = (end.year() - start.year()).max(0) as u32;
        while years > 0 && !fits(start, years * 12, end) {
            years -= 1;
        }
        let cursor = shift_months(start, years * 12)?;

        let span = (end.year() - cursor.year()) as i64 * 12 + end.month() as i64
            - cursor.month() as i64;
        let mut months = span.max(0) as u32;
        while months > 0 && !fits(cursor, months, end) {
            months -= 1;
        }
        let cursor = shift_months(cursor, months)?;

        let remaining = end - cursor;
        Some(Self {
            years,
            months,
            days: remaining.num_days(),
            hours: remaining.num_hours() % 24,
            minutes: remaining.num_minutes() % 60,
            seconds: remaining.num_seconds() % 60,
        })
    }

    /// The largest unit with at least one whole count, or `None` for "just now".
    pub fn largest_unit(&self) -> Option<(TimeUnit, i64)> {
        if self.years >= 1 {
            Some((TimeUnit::Year, self.years as i64))
        } else if self.months >= 1 {
            Some((TimeUnit::Month, self.months as i64))
        } else if self.days >= 1 {
            Some((TimeUnit::Day, self.days))
        } else if self.hours >= 1 {
            Some((TimeUnit::Hour, self.hours))
        } else if self.minutes >= 1 {
            Some((TimeUnit::Minute, self.minutes))
        } else if self.seconds >= JUST_NOW_THRESHOLD_SECS {
            Some((TimeUnit::Second, self.seconds))
        } else {
            None
        }
    }
}

fn shift_months(at: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    at.checked_add_months(Months::new(months))
}

fn fits(start: NaiveDateTime, months: u32, end: NaiveDateTime) -> bool {
    matches!(shift_months(start, months), Some(shifted) if shifted <= end)
}

/// Formats `timestamp` relative to the current moment.
///
/// "Now" is read from the system clock on every call and interpreted in the
/// timestamp's own time zone.
pub fn format_relative_date<Tz: TimeZone>(
    timestamp: &DateTime<Tz>,
    locale: Locale,
) -> Result<String> {
    format_relative_date_at(timestamp, &Utc::now(), locale)
}

/// Formats `timestamp` relative to an explicit `now`.
///
/// # Errors
///
/// Returns `FitfeedError::InvalidInput` when `timestamp` lies after `now`.
pub fn format_relative_date_at<Tz, Now>(
    timestamp: &DateTime<Tz>,
    now: &DateTime<Now>,
    locale: Locale,
) -> Result<String>
where
    Tz: TimeZone,
    Now: TimeZone,
{
    let zone = timestamp.timezone();
    let start = timestamp.naive_local();
    let end = now.with_timezone(&zone).naive_local();

    let elapsed = RelativeDuration::between(start, end)
        .ok_or_else(|| FitfeedError::invalid_input("timestamp is in the future"))?;

    Ok(match elapsed.largest_unit() {
        Some((unit, count)) => locale.render(count, unit),
        None => locale.just_now().to_string(),
    })
}

/// Parses an ISO-8601 timestamp as sent by the remote data service.
///
/// Values without an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| FitfeedError::invalid_input(format!("invalid timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_two_hours_in_both_locales() {
        let ts = now() - Duration::hours(2);
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::Ko).unwrap(), "2시간 전");
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "2 hours ago");
    }

    #[test]
    fn test_singular_unit_has_no_plural_suffix() {
        let ts = now() - Duration::minutes(1);
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "1 minute ago");
        let ts = now() - Duration::days(1);
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "1 day ago");
    }

    #[test]
    fn test_under_five_seconds_is_just_now() {
        let ts = now() - Duration::seconds(4);
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "just now");
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::Ko).unwrap(), "방금 전");
        assert_eq!(format_relative_date_at(&now(), &now(), Locale::En).unwrap(), "just now");
    }

    #[test]
    fn test_five_seconds_switches_to_seconds_tier() {
        let ts = now() - Duration::seconds(5);
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "5 seconds ago");
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::Ko).unwrap(), "5초 전");
    }

    #[test]
    fn test_one_second_short_of_a_year_uses_months() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 1).unwrap();
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "11 months ago");

        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "1 year ago");
    }

    #[test]
    fn test_korean_years_never_pluralize() {
        let ts = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::Ko).unwrap(), "3년 전");
        assert_eq!(format_relative_date_at(&ts, &now(), Locale::En).unwrap(), "3 years ago");
    }

    #[test]
    fn test_month_end_clamping() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(format_relative_date_at(&ts, &at, Locale::En).unwrap(), "1 month ago");
    }

    #[test]
    fn test_decomposition_is_calendar_aware() {
        let elapsed = RelativeDuration::between(
            naive(2024, 1, 31, 10, 0, 0),
            naive(2025, 3, 1, 12, 30, 7),
        )
        .unwrap();
        assert_eq!(
            elapsed,
            RelativeDuration {
                years: 1,
                months: 1,
                days: 1,
                hours: 2,
                minutes: 30,
                seconds: 7,
            }
        );
    }

    #[test]
    fn test_future_timestamp_is_rejected() {
        let ts = now() + Duration::seconds(1);
        let err = format_relative_date_at(&ts, &now(), Locale::En).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_calendar_math_runs_in_timestamp_zone() {
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let ts = seoul.with_ymd_and_hms(2025, 3, 14, 23, 0, 0).unwrap();
        let at = seoul.with_ymd_and_hms(2025, 3, 15, 23, 0, 0).unwrap();
        assert_eq!(format_relative_date_at(&ts, &at, Locale::Ko).unwrap(), "1일 전");
        let at_utc = at.with_timezone(&Utc);
        assert_eq!(format_relative_date_at(&ts, &at_utc, Locale::Ko).unwrap(), "1일 전");
    }

    #[test]
    fn test_formatting_is_idempotent_for_fixed_inputs() {
        let ts = now() - Duration::days(40);
        let first = format_relative_date_at(&ts, &now(), Locale::En).unwrap();
        let second = format_relative_date_at(&ts, &now(), Locale::En).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_live_clock_formats_recent_past() {
        let ts = Utc::now() - Duration::hours(3);
        assert_eq!(format_relative_date(&ts, Locale::En).unwrap(), "3 hours ago");
    }

    #[test]
    fn test_locale_parsing_and_default() {
        assert_eq!("ko".parse::<Locale>().unwrap(), Locale::Ko);
        assert_eq!(Locale::default(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::Ko.to_string(), "ko");
    }

    #[test]
    fn test_parse_timestamp_accepts_offset_and_naive_forms() {
        let with_offset = parse_timestamp("2025-03-15T12:00:00.123456+00:00").unwrap();
        assert_eq!(with_offset.with_timezone(&Utc).timestamp(), now().timestamp());

        let naive_form = parse_timestamp("2025-03-15T12:00:00").unwrap();
        assert_eq!(naive_form.with_timezone(&Utc), now());

        assert!(parse_timestamp("yesterday").unwrap_err().is_invalid_input());
    }
}
