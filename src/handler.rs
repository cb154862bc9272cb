//! Named, leveled log output handlers.
use crate::format::LineFormat;
use crate::types::Severity;
use slog::{OwnedKVList, Record};
use std::fmt::Debug;
use std::io;
use std::sync::Arc;

/// The destination of formatted log lines (a file, a socket, a terminal, ...).
///
/// A sink owns its output resource and must be usable from multiple threads at once.
pub trait Sink: Send + Sync + Debug {
    /// Writes a single formatted line emitted at `severity`.
    ///
    /// `line` does not contain a trailing newline.
    fn emit(&self, severity: Severity, line: &str) -> io::Result<()>;

    /// Writes the line formatted from `record`.
    ///
    /// Sinks that decorate their output according to the record (e.g., colors
    /// by level) override this. The default forwards to `emit`.
    fn emit_record(&self, record: &Record, _values: &OwnedKVList, line: &str) -> io::Result<()> {
        self.emit(Severity::from_level(record.level()), line)
    }

    /// Flushes buffered output, if any.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Sink + ?Sized> Sink for Box<T> {
    fn emit(&self, severity: Severity, line: &str) -> io::Result<()> {
        (**self).emit(severity, line)
    }
    fn emit_record(&self, record: &Record, values: &OwnedKVList, line: &str) -> io::Result<()> {
        (**self).emit_record(record, values, line)
    }
    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// A log output handler.
///
/// A handler has a name, a severity threshold and a [`LineFormat`], and writes
/// the records passing its threshold to its [`Sink`].
/// Handlers are built by the builders of this crate (e.g.,
/// [`RotatingFileHandlerBuilder`]) and attached to a [`Logger`].
///
/// [`LineFormat`]: ../format/trait.LineFormat.html
/// [`Sink`]: trait.Sink.html
/// [`RotatingFileHandlerBuilder`]: ../file/struct.RotatingFileHandlerBuilder.html
/// [`Logger`]: ../struct.Logger.html
#[derive(Debug)]
pub struct Handler {
    name: String,
    level: Severity,
    format: Arc<dyn LineFormat>,
    sink: Box<dyn Sink>,
}
impl Handler {
    /// Makes a new `Handler` instance.
    pub fn new<S>(
        name: S,
        level: Severity,
        format: Arc<dyn LineFormat>,
        sink: Box<dyn Sink>,
    ) -> Self
    where
        S: Into<String>,
    {
        Handler {
            name: name.into(),
            level,
            format,
            sink,
        }
    }

    /// Returns the name of this handler.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the severity threshold of this handler.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Returns the sink of this handler.
    pub fn sink(&self) -> &dyn Sink {
        &*self.sink
    }

    /// Formats `record` and writes it to the sink, if the record passes the
    /// threshold of this handler.
    ///
    /// Formatting errors are reported as `io::ErrorKind::InvalidData`; write
    /// errors of the sink are returned as is.
    pub fn handle(&self, logger: &str, record: &Record, values: &OwnedKVList) -> io::Result<()> {
        if !self.level.accepts(record.level()) {
            return Ok(());
        }
        let line = self
            .format
            .to_string(logger, record, values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        self.sink.emit_record(record, values, &line)
    }

    /// Flushes the sink of this handler.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}
