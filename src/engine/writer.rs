//! Default engine: encode a record and write it to an [`Output`]

use super::{
    format::{FormatSettings, OutputFormat},
    Engine,
};
use crate::core::{
    error::{LoggerError, Result},
    level::Level,
    output::Output,
    record::Record,
    timestamp::TimestampFormat,
};

#[derive(Debug)]
pub struct WriterEngine {
    output: Output,
    level: Level,
    format: OutputFormat,
    settings: FormatSettings,
}

impl WriterEngine {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            level: Level::default(),
            format: OutputFormat::default(),
            settings: FormatSettings::default(),
        }
    }

    /// Colourise the level column of [`OutputFormat::Text`] output
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.settings.colors = colors;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for WriterEngine {
    fn default() -> Self {
        Self::new(Output::stdout())
    }
}

impl Engine for WriterEngine {
    fn set_output(&mut self, output: Output) {
        self.output = output;
    }

    fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    fn set_consistent_ordering(&mut self, enabled: bool) {
        self.settings.consistent_ordering = enabled;
    }

    fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    fn set_timestamp_format(&mut self, format: TimestampFormat) {
        self.settings.timestamp_format = format;
    }

    fn level(&self) -> Level {
        self.level
    }

    fn log(&self, record: &Record) -> Result<()> {
        let line = self.format.format(record, &self.settings)?;
        self.output.write_line(&line).map_err(|e| {
            LoggerError::io_operation(
                "writing record",
                format!("output '{}' rejected the write", self.output.name()),
                e,
            )
        })
    }

    fn flush(&self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}
