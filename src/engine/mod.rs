//! Structured logging engines
//!
//! The facade resolves a [`Record`] and hands it to an [`Engine`], which
//! owns level filtering, encoding and writing.

pub mod format;
pub mod writer;

pub use format::{FormatSettings, OutputFormat, RESERVED_KEYS};
pub use writer::WriterEngine;

use crate::core::{
    error::Result, level::Level, output::Output, record::Record, timestamp::TimestampFormat,
};

/// Backend that filters, encodes and writes records.
///
/// Setters are called while the logger holds its configuration lock;
/// `log` and `flush` may be called from many threads at once.
pub trait Engine: Send + Sync {
    fn set_output(&mut self, output: Output);
    fn set_level(&mut self, level: Level);
    fn set_consistent_ordering(&mut self, enabled: bool);
    fn set_format(&mut self, format: OutputFormat);
    fn set_timestamp_format(&mut self, format: TimestampFormat);

    fn level(&self) -> Level;

    /// Whether a record at `level` would be written.
    fn enabled(&self, level: Level) -> bool {
        self.level().enables(level)
    }

    fn log(&self, record: &Record) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
