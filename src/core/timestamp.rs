//! Timestamp formatting utilities
//!
//! Renders the `time` key of a record. The default format is RFC 3339 with
//! at most millisecond precision: trailing zero digits of the fraction are
//! trimmed and the fraction disappears entirely when it truncates to zero.
//! A zero UTC offset is written as `Z`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;
use std::sync::Arc;

use super::error::LoggerError;

/// Source of record timestamps.
pub type NowFn = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// The wall clock in the local time zone
pub fn wall_clock() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

pub(crate) fn default_now_fn() -> NowFn {
    Arc::new(wall_clock)
}

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_log_facade::TimestampFormat;
/// use chrono::DateTime;
///
/// let time = DateTime::parse_from_rfc3339("2020-10-10T10:10:10.120+02:00").unwrap();
/// assert_eq!(TimestampFormat::Rfc3339Millis.format(&time), "2020-10-10T10:10:10.12+02:00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339, millisecond precision, trimmed: `2020-10-10T10:10:10.12Z`
    #[default]
    Rfc3339Millis,

    /// Full RFC 3339 with nanoseconds as chrono renders them
    Rfc3339,

    /// Unix timestamp in seconds: `1602324610`
    Unix,

    /// Unix timestamp in milliseconds: `1602324610120`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_log_facade::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampFormat::Rfc3339Millis => rfc3339_millis(datetime),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => custom(datetime, format_str),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

impl FromStr for TimestampFormat {
    type Err = LoggerError;

    /// Parses the format names accepted in configuration. Anything
    /// containing a `%` is taken as a strftime pattern and must be valid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "rfc3339millis" | "rfc3339_millis" | "default" => Ok(TimestampFormat::Rfc3339Millis),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "unix" => Ok(TimestampFormat::Unix),
            "unixmillis" | "unix_millis" => Ok(TimestampFormat::UnixMillis),
            _ if name.contains('%') => {
                if !is_valid_pattern(name) {
                    return Err(LoggerError::config(
                        "TimestampFormat",
                        format!("invalid strftime pattern '{}'", name),
                    ));
                }
                Ok(TimestampFormat::Custom(name.to_string()))
            }
            _ => Err(LoggerError::config(
                "TimestampFormat",
                format!("unknown timestamp format '{}'", name),
            )),
        }
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

// Patterns built without `from_str` are not validated; an unusable one
// renders the default format instead of failing the log call.
fn custom(datetime: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", datetime.format(pattern)) {
        Ok(()) => out,
        Err(_) => rfc3339_millis(datetime),
    }
}

fn rfc3339_millis(datetime: &DateTime<FixedOffset>) -> String {
    let mut out = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();

    // Leap seconds report up to 1999 ms.
    let millis = datetime.timestamp_subsec_millis().min(999);
    if millis > 0 {
        let fraction = format!("{:03}", millis);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    if datetime.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&datetime.format("%:z").to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(offset_hours: i32, nanos: i64) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(offset_hours * 3600).expect("valid offset");
        offset
            .with_ymd_and_hms(2020, 10, 10, 10, 10, 10)
            .single()
            .expect("valid datetime")
            + Duration::nanoseconds(nanos)
    }

    #[test]
    fn test_whole_seconds_omit_fraction() {
        assert_eq!(
            TimestampFormat::Rfc3339Millis.format(&at(0, 0)),
            "2020-10-10T10:10:10Z"
        );
    }

    #[test]
    fn test_fraction_is_trimmed() {
        let format = TimestampFormat::Rfc3339Millis;
        assert_eq!(format.format(&at(0, 123_000_000)), "2020-10-10T10:10:10.123Z");
        assert_eq!(format.format(&at(0, 120_000_000)), "2020-10-10T10:10:10.12Z");
        assert_eq!(format.format(&at(0, 100_900_000)), "2020-10-10T10:10:10.1Z");
    }

    #[test]
    fn test_sub_millisecond_fraction_is_dropped() {
        assert_eq!(
            TimestampFormat::Rfc3339Millis.format(&at(0, 999_999)),
            "2020-10-10T10:10:10Z"
        );
    }

    #[test]
    fn test_non_utc_offset() {
        let format = TimestampFormat::Rfc3339Millis;
        assert_eq!(format.format(&at(2, 0)), "2020-10-10T10:10:10+02:00");
        assert_eq!(format.format(&at(-5, 50_000_000)), "2020-10-10T10:10:10.05-05:00");
    }

    #[test]
    fn test_other_formats() {
        let time = Utc
            .with_ymd_and_hms(2020, 10, 10, 10, 10, 10)
            .single()
            .expect("valid datetime")
            .fixed_offset();

        assert_eq!(TimestampFormat::Unix.format(&time), "1602324610");
        assert_eq!(TimestampFormat::UnixMillis.format(&time), "1602324610000");
        assert_eq!(
            TimestampFormat::Rfc3339.format(&time),
            "2020-10-10T10:10:10+00:00"
        );
        assert_eq!(
            TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string()).format(&time),
            "2020/10/10 10:10"
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(!TimestampFormat::Rfc3339Millis.is_numeric());
        assert!(!TimestampFormat::Rfc3339.is_numeric());
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(!TimestampFormat::Custom("%s".to_string()).is_numeric());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "RFC3339Millis".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::Rfc3339Millis
        );
        assert_eq!("unix".parse::<TimestampFormat>().unwrap(), TimestampFormat::Unix);
        assert_eq!(
            "%H:%M".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::Custom("%H:%M".to_string())
        );
        assert!("iso9999".parse::<TimestampFormat>().is_err());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = "%Q".parse::<TimestampFormat>().unwrap_err();
        assert!(err.to_string().contains("invalid strftime pattern"));
        assert!("%Y-%m-%d %".parse::<TimestampFormat>().is_err());
    }

    #[test]
    fn test_invalid_custom_pattern_falls_back() {
        let time = at(0, 120_000_000);
        assert_eq!(
            TimestampFormat::Custom("%Q".to_string()).format(&time),
            "2020-10-10T10:10:10.12Z"
        );
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str("\"UnixMillis\"").expect("deserialize UnixMillis");
        assert_eq!(format, TimestampFormat::UnixMillis);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }

    #[test]
    fn test_wall_clock_is_recent() {
        let now = wall_clock();
        assert!((Utc::now() - now.with_timezone(&Utc)).num_seconds().abs() < 5);
    }
}
