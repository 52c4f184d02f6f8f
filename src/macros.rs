//! Logging macros for ergonomic log message formatting.
//!
//! The leveled macros take anything with a `log_fmt` method (a [`Logger`]
//! or an [`Entry`]) followed by `format!`-style arguments. The message is
//! only formatted when the level is enabled.
//!
//! [`Logger`]: crate::Logger
//! [`Entry`]: crate::Entry
//!
//! # Examples
//!
//! ```
//! use rust_log_facade::{fields, info, warn, Level, Logger, SharedBuffer, with_level, with_output};
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new([with_level(Level::Info), with_output(buffer.clone())]);
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = logger.with_fields(fields! { "path" => "/health", "status" => 503 });
//! warn!(request, "Upstream unavailable");
//!
//! assert_eq!(buffer.lines().len(), 2);
//! ```

/// Log a message at the given level with automatic formatting.
///
/// ```
/// # use rust_log_facade::{Level, Logger, with_output, SharedBuffer};
/// # let logger = Logger::new([with_output(SharedBuffer::new())]);
/// use rust_log_facade::log;
/// log!(logger, Level::Warn, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then terminate the process with exit code 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// ```
/// use rust_log_facade::{fields, FieldValue};
///
/// let f = fields! { "user" => "alice", "attempts" => 3 };
/// assert_eq!(f.get("attempts"), Some(&FieldValue::Int(3)));
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(
                ::std::string::String::from($key),
                $crate::FieldValue::from($value),
            );
        )+
        fields
    }};
}
