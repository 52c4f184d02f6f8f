//! Output format configuration for records
//!
//! Provides different encodings for a [`Record`]:
//! - Json: one JSON object per line (default)
//! - Logfmt: key=value pairs compatible with log aggregation tools
//! - Text: human-readable, optionally colourised

use crate::core::{
    error::{LoggerError, Result},
    fields::FieldValue,
    record::Record,
    timestamp::TimestampFormat,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::str::FromStr;

/// Keys every record carries. A field with one of these names is written
/// as `fields.<name>` instead.
pub const RESERVED_KEYS: [&str; 3] = ["level", "time", "msg"];

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON object per line
    ///
    /// Example: `{"level":"info","time":"2020-10-10T10:10:10Z","msg":"Request processed","user":"alice"}`
    #[default]
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `level=info time=2020-10-10T10:10:10Z msg="Request processed" user=alice`
    Logfmt,

    /// Human-readable text format
    ///
    /// Example: `[2020-10-10T10:10:10Z] [INFO   ] Request processed user=alice`
    Text,
}

/// Settings a format needs besides the record itself.
#[derive(Debug, Clone, Default)]
pub struct FormatSettings {
    pub timestamp_format: TimestampFormat,
    /// Sort fields by key
    pub consistent_ordering: bool,
    /// Colourise the level in text output
    pub colors: bool,
}

impl OutputFormat {
    /// Encode `record` as one line, terminator included.
    pub fn format(&self, record: &Record, settings: &FormatSettings) -> Result<Vec<u8>> {
        let mut line = match self {
            OutputFormat::Json => serde_json::to_vec(&JsonLine { record, settings })?,
            OutputFormat::Logfmt => format_logfmt(record, settings).into_bytes(),
            OutputFormat::Text => format_text(record, settings).into_bytes(),
        };
        line.push(b'\n');
        Ok(line)
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            "text" => Ok(OutputFormat::Text),
            other => Err(LoggerError::config(
                "OutputFormat",
                format!("unknown format '{}'", other),
            )),
        }
    }
}

/// Fields in output order with reserved names prefixed.
fn output_fields<'a>(record: &'a Record, consistent: bool) -> Vec<(Cow<'a, str>, &'a FieldValue)> {
    let mut fields: Vec<(Cow<'a, str>, &'a FieldValue)> = record
        .fields
        .iter()
        .map(|(key, value)| {
            let key = if RESERVED_KEYS.contains(&key.as_str()) {
                Cow::Owned(format!("fields.{}", key))
            } else {
                Cow::Borrowed(key.as_str())
            };
            (key, value)
        })
        .collect();

    if consistent {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
    }
    fields
}

struct JsonLine<'a> {
    record: &'a Record,
    settings: &'a FormatSettings,
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let record = self.record;
        let fields = output_fields(record, self.settings.consistent_ordering);

        let mut map = serializer.serialize_map(Some(fields.len() + 3))?;
        map.serialize_entry("level", record.level.as_str())?;
        match self.settings.timestamp_format {
            TimestampFormat::Unix => map.serialize_entry("time", &record.time.timestamp())?,
            TimestampFormat::UnixMillis => {
                map.serialize_entry("time", &record.time.timestamp_millis())?
            }
            ref format => map.serialize_entry("time", &format.format(&record.time))?,
        }
        map.serialize_entry("msg", &record.message)?;
        for (key, value) in &fields {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

fn format_logfmt(record: &Record, settings: &FormatSettings) -> String {
    let mut parts = Vec::with_capacity(record.fields.len() + 3);

    parts.push(format!("level={}", record.level.as_str()));
    parts.push(format!(
        "time={}",
        escape_logfmt_value(&settings.timestamp_format.format(&record.time))
    ));
    parts.push(format!("msg={}", quote_logfmt_value(&record.message)));

    for (key, value) in output_fields(record, settings.consistent_ordering) {
        parts.push(format!(
            "{}={}",
            escape_logfmt_key(&key),
            logfmt_field_value(value)
        ));
    }

    parts.join(" ")
}

fn format_text(record: &Record, settings: &FormatSettings) -> String {
    let level = format!("{:7}", record.level.as_str().to_uppercase());
    let level = colorize_level(level, record, settings.colors);

    let mut out = format!(
        "[{}] [{}] {}",
        settings.timestamp_format.format(&record.time),
        level,
        record.message
    );

    for (key, value) in output_fields(record, true) {
        out.push(' ');
        out.push_str(&escape_logfmt_key(&key));
        out.push('=');
        out.push_str(&logfmt_field_value(value));
    }

    out
}

#[cfg(feature = "console")]
fn colorize_level(level: String, record: &Record, colors: bool) -> String {
    use colored::Colorize;

    if colors {
        level.color(record.level.color_code()).to_string()
    } else {
        level
    }
}

#[cfg(not(feature = "console"))]
fn colorize_level(level: String, _record: &Record, _colors: bool) -> String {
    level
}

fn logfmt_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => escape_logfmt_value(s),
        FieldValue::List(_) | FieldValue::Map(_) => quote_logfmt_value(&value.to_string()),
        other => other.to_string(),
    }
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Escape a logfmt value (quote if contains spaces)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=', '\n', '\t']) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\t', "\\t")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use chrono::DateTime;

    fn record(message: &str) -> Record {
        let time = DateTime::parse_from_rfc3339("2020-10-10T10:10:10Z").unwrap();
        Record::new(Level::Warn, message, time)
    }

    fn json(record: &Record, settings: &FormatSettings) -> String {
        let bytes = OutputFormat::Json.format(record, settings).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_json_key_order_with_sorted_fields() {
        let mut rec = record("Finished loading configuration");
        rec.fields.insert("timeSpentOnConfiguration".into(), 0.into());
        rec.fields.insert("defaultsLoaded".into(), true.into());

        let settings = FormatSettings {
            consistent_ordering: true,
            ..Default::default()
        };
        assert_eq!(
            json(&rec, &settings),
            "{\"level\":\"warning\",\"time\":\"2020-10-10T10:10:10Z\",\
             \"msg\":\"Finished loading configuration\",\
             \"defaultsLoaded\":true,\"timeSpentOnConfiguration\":0}\n"
        );
    }

    #[test]
    fn test_json_reserved_keys_are_prefixed() {
        let mut rec = record("clash");
        rec.fields.insert("level".into(), "mine".into());
        rec.fields.insert("msg".into(), "mine too".into());

        let line = json(&rec, &FormatSettings::default());
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "warning");
        assert_eq!(parsed["msg"], "clash");
        assert_eq!(parsed["fields.level"], "mine");
        assert_eq!(parsed["fields.msg"], "mine too");
    }

    #[test]
    fn test_json_numeric_time() {
        let rec = record("numeric");
        let settings = FormatSettings {
            timestamp_format: TimestampFormat::UnixMillis,
            ..Default::default()
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&json(&rec, &settings)).unwrap();
        assert_eq!(parsed["time"], 1602324610000i64);
    }

    #[test]
    fn test_logfmt_format() {
        let mut rec = record("Warning message");
        rec.fields.insert("query".into(), "SELECT * FROM users WHERE id=1".into());
        rec.fields.insert("count".into(), 5.into());

        let settings = FormatSettings {
            consistent_ordering: true,
            ..Default::default()
        };
        let line = String::from_utf8(OutputFormat::Logfmt.format(&rec, &settings).unwrap()).unwrap();

        assert_eq!(
            line,
            "level=warning time=2020-10-10T10:10:10Z msg=\"Warning message\" \
             count=5 query=\"SELECT * FROM users WHERE id=1\"\n"
        );
    }

    #[test]
    fn test_text_format() {
        let mut rec = record("User logged in");
        rec.fields.insert("user_id".into(), 123.into());
        rec.fields.insert("action".into(), "login".into());

        let line = String::from_utf8(
            OutputFormat::Text
                .format(&rec, &FormatSettings::default())
                .unwrap(),
        )
        .unwrap();

        assert!(line.starts_with("[2020-10-10T10:10:10Z] [WARNING] User logged in"));
        assert!(line.contains("action=login user_id=123"));
    }

    #[test]
    fn test_parse_and_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
        assert_eq!("LOGFMT".parse::<OutputFormat>().unwrap(), OutputFormat::Logfmt);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
