//! Terminal handler.
use crate::build::BuilderCommon;
use crate::format::{LineFormat, LineFormatConfig};
use crate::handler::{Handler, Sink};
use crate::types::{LevelSpec, Severity, SourceLocation, TimeZone};
use crate::{Build, Config, Result};
use serde::{Deserialize, Serialize};
use slog::{OwnedKVList, Record};
use slog_term::{Decorator as _, PlainDecorator, RecordDecorator, TermDecorator};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A handler builder which builds handlers that write log records to the terminal.
///
/// # Example
///
/// ```
/// use reqloggers::Build;
/// use reqloggers::terminal::{Destination, TerminalHandlerBuilder};
///
/// let handler = TerminalHandlerBuilder::new()
///     .destination(Destination::Stdout)
///     .level("debug")
///     .build()
///     .unwrap();
/// assert_eq!(handler.name(), "console");
/// ```
#[derive(Debug)]
pub struct TerminalHandlerBuilder {
    common: BuilderCommon,
    destination: Destination,
}
impl TerminalHandlerBuilder {
    /// Makes a new `TerminalHandlerBuilder` instance.
    pub fn new() -> Self {
        TerminalHandlerBuilder {
            common: BuilderCommon::new("console", "INFO"),
            destination: Destination::default(),
        }
    }

    /// Sets the destination to which log records will be outputted.
    pub fn destination(&mut self, destination: Destination) -> &mut Self {
        self.destination = destination;
        self
    }

    /// Sets the severity threshold of the handler.
    pub fn level<L: Into<LevelSpec>>(&mut self, level: L) -> &mut Self {
        self.common.level = level.into();
        self
    }

    /// Sets the name of the handler.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.common.name = name.to_owned();
        self
    }

    /// Sets the line format of the handler.
    pub fn format(&mut self, format: impl LineFormat + 'static) -> &mut Self {
        self.format_arc(Arc::new(format))
    }

    /// Sets the line format of the handler, already wrapped in an `Arc`.
    pub fn format_arc(&mut self, format: Arc<dyn LineFormat>) -> &mut Self {
        self.common.format = format;
        self
    }
}
impl Default for TerminalHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl Build for TerminalHandlerBuilder {
    fn build(&self) -> Result<Handler> {
        let destination = self.destination;
        self.common.build_with_sink(|| Ok(TerminalSink::new(destination)))
    }
}

/// The destination to which log records will be outputted.
///
/// # Examples
///
/// The default value:
///
/// ```
/// use reqloggers::terminal::Destination;
///
/// assert_eq!(Destination::default(), Destination::Stderr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Standard output.
    Stdout,

    /// Standard error.
    Stderr,
}
impl Default for Destination {
    fn default() -> Self {
        Destination::Stderr
    }
}

impl Destination {
    fn to_decorator(self) -> Decorator {
        let maybe_term_decorator = match self {
            Destination::Stdout => TermDecorator::new().stdout().try_build(),
            Destination::Stderr => TermDecorator::new().stderr().try_build(),
        };
        maybe_term_decorator
            .map(Decorator::Term)
            .unwrap_or_else(|| match self {
                Destination::Stdout => Decorator::PlainStdout(PlainDecorator::new(io::stdout())),
                Destination::Stderr => Decorator::PlainStderr(PlainDecorator::new(io::stderr())),
            })
    }
}

enum Decorator {
    Term(TermDecorator),
    PlainStdout(PlainDecorator<io::Stdout>),
    PlainStderr(PlainDecorator<io::Stderr>),
}
impl slog_term::Decorator for Decorator {
    fn with_record<F>(&self, record: &Record, logger_values: &OwnedKVList, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut dyn RecordDecorator) -> io::Result<()>,
    {
        match *self {
            Decorator::Term(ref d) => d.with_record(record, logger_values, f),
            Decorator::PlainStdout(ref d) => d.with_record(record, logger_values, f),
            Decorator::PlainStderr(ref d) => d.with_record(record, logger_values, f),
        }
    }
}

/// A sink writing one line per record to the standard output or error.
///
/// On a terminal the line is colored according to the level of the record.
pub struct TerminalSink {
    destination: Destination,
    decorator: Mutex<Decorator>,
}
impl TerminalSink {
    /// Makes a sink writing to `destination`.
    pub fn new(destination: Destination) -> Self {
        TerminalSink {
            destination,
            decorator: Mutex::new(destination.to_decorator()),
        }
    }

    /// Returns the destination of this sink.
    pub fn destination(&self) -> Destination {
        self.destination
    }

    fn lock(&self) -> MutexGuard<Decorator> {
        self.decorator.lock().unwrap_or_else(|e| e.into_inner())
    }
}
impl fmt::Debug for TerminalSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TerminalSink")
            .field("destination", &self.destination)
            .finish()
    }
}
impl Sink for TerminalSink {
    fn emit(&self, _severity: Severity, line: &str) -> io::Result<()> {
        match self.destination {
            Destination::Stdout => writeln!(io::stdout().lock(), "{}", line),
            Destination::Stderr => writeln!(io::stderr().lock(), "{}", line),
        }
    }

    fn emit_record(&self, record: &Record, values: &OwnedKVList, line: &str) -> io::Result<()> {
        self.lock().with_record(record, values, |d| {
            d.start_level()?;
            write!(d, "{}", line)?;
            d.reset()?;
            writeln!(d)?;
            d.flush()
        })
    }

    fn flush(&self) -> io::Result<()> {
        match self.destination {
            Destination::Stdout => io::stdout().flush(),
            Destination::Stderr => io::stderr().flush(),
        }
    }
}

/// The configuration of `TerminalHandlerBuilder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(default)]
pub struct TerminalHandlerConfig {
    /// Handler name.
    pub name: String,

    /// Severity threshold.
    pub level: LevelSpec,

    /// Line format (`default` or `basic`).
    pub format: LineFormatConfig,

    /// Source code location of the default line format.
    pub source_location: SourceLocation,

    /// Time zone of the default line format.
    pub timezone: TimeZone,

    /// Output destination.
    pub destination: Destination,
}
impl TerminalHandlerConfig {
    /// Creates a new `TerminalHandlerConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }
}
impl Default for TerminalHandlerConfig {
    fn default() -> Self {
        TerminalHandlerConfig {
            name: "console".to_owned(),
            level: LevelSpec::from("INFO"),
            format: LineFormatConfig::default(),
            source_location: SourceLocation::default(),
            timezone: TimeZone::default(),
            destination: Destination::default(),
        }
    }
}
impl Config for TerminalHandlerConfig {
    type Builder = TerminalHandlerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        let mut builder = TerminalHandlerBuilder::new();
        builder.name(&self.name);
        builder.level(self.level.clone());
        builder.format_arc(self.format.to_format(self.timezone, self.source_location));
        builder.destination(self.destination);
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::Level;

    #[test]
    fn writes_through_the_decorator() {
        let handler = TerminalHandlerBuilder::new()
            .destination(Destination::Stdout)
            .level("debug")
            .build()
            .unwrap();
        let values: OwnedKVList = o!().into();
        handler
            .handle(
                "console-test",
                &record!(Level::Debug, "", &format_args!("to stdout"), b!()),
                &values,
            )
            .unwrap();
        assert!(handler.flush().is_ok());
    }

    #[test]
    fn config_defaults() {
        let config: TerminalHandlerConfig = serdeconv::from_toml_str("").unwrap();
        assert_eq!(config.name, "console");
        assert_eq!(config.destination, Destination::Stderr);

        let sink = TerminalSink::new(config.destination);
        assert_eq!(sink.destination(), Destination::Stderr);
        assert!(sink.emit(Severity::Info, "plain line").is_ok());
    }
}
