//! Logger for schema migration tools
//!
//! Migration runners usually expect a `printf`/`fatalf` pair. Progress goes
//! out at info level, and `fatalf` terminates the process like any other
//! fatal record.

use crate::core::logger::Logger;
use std::fmt;

#[derive(Debug, Clone)]
pub struct MigrationLogger {
    logger: Logger,
}

impl MigrationLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.logger.info_fmt(args)
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.logger.fatal_fmt(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        level::Level,
        options::{with_exit_func, with_level, with_output, with_report_caller},
        output::SharedBuffer,
    };
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_printf_and_fatalf() {
        let buffer = SharedBuffer::new();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let code = Arc::clone(&exit_code);
        let logger = Logger::new([
            with_level(Level::Info),
            with_output(buffer.clone()),
            with_report_caller(false),
            with_exit_func(move |c| code.store(c, Ordering::SeqCst)),
        ]);
        let migrations = MigrationLogger::new(logger);

        migrations.printf(format_args!("OK    {}", "00001_create_users.sql"));
        migrations.fatalf(format_args!("failed to apply {}", 2));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"level\":\"info\""));
        assert!(lines[0].contains("OK    00001_create_users.sql"));
        assert!(lines[1].contains("\"level\":\"fatal\""));
        assert_eq!(exit_code.load(Ordering::SeqCst), 1);
    }
}
