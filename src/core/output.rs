//! Output sinks
//!
//! [`Output`] is a cloneable handle around a locked writer. A record is
//! written as one complete line with a single `write_all` while the lock is
//! held, so concurrent records never interleave.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Output {
    name: String,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    /// Wrap an arbitrary writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::named("custom", writer)
    }

    fn named<W: Write + Send + 'static>(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Process standard output (the default sink)
    pub fn stdout() -> Self {
        Self::named("stdout", io::stdout())
    }

    pub fn stderr() -> Self {
        Self::named("stderr", io::stderr())
    }

    /// Append to the file at `path`, creating it if needed.
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log output",
                    format!("cannot open {}", path.display()),
                    e,
                )
            })?;
        Ok(Self::named(path.display().to_string(), LineWriter::new(file)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one complete line. `line` must include its terminator.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut sink = self.sink.lock();
        sink.write_all(line)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.lock().flush()
    }

    /// Whether both handles write to the same sink
    pub fn ptr_eq(&self, other: &Output) -> bool {
        Arc::ptr_eq(&self.sink, &other.sink)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").field("name", &self.name).finish()
    }
}

impl From<SharedBuffer> for Output {
    fn from(buffer: SharedBuffer) -> Self {
        Output::named("buffer", buffer)
    }
}

/// Cloneable in-memory sink. All clones share the same bytes.
///
/// ```
/// use rust_log_facade::{Logger, SharedBuffer, with_output};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new([with_output(buffer.clone())]);
/// logger.warn("disk almost full");
/// assert!(buffer.contents().contains("disk almost full"));
/// ```
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Non-empty lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Drain the buffer, returning what it held
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.bytes.lock().len())
            .finish()
    }
}
