//! Named loggers with a mutable level and a list of handlers.
use crate::handler::Handler;
use crate::types::{LevelSpec, Severity};
use crate::Result;
use slog::{Drain, Level, OwnedKVList, Record};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// A named logger.
///
/// A `Logger` dereferences to a [`slog::Logger`], so the usual slog macros
/// (`info!`, `warn!`, ...) work on it directly. Every record that passes the
/// level of the logger is handed to each attached [`Handler`], in the order
/// the handlers were added; each handler then applies its own threshold.
///
/// Cloning a `Logger` is cheap and the clones share everything: the level,
/// the handlers and the identity checked by [`Logger::ptr_eq`].
///
/// # Examples
///
/// ```
/// #[macro_use]
/// extern crate slog;
/// extern crate reqloggers;
///
/// use reqloggers::{Build, Logger};
/// use reqloggers::null::NullHandlerBuilder;
/// use reqloggers::types::Severity;
///
/// # fn main() -> Result<(), reqloggers::Error> {
/// let logger = Logger::new("SERVER", "info")?;
/// logger.add_handler(NullHandlerBuilder::new().build()?);
/// assert_eq!(logger.level(), Severity::Info);
///
/// info!(logger, "Hello World!"; "user" => "alice");
/// # Ok(())
/// # }
/// ```
///
/// [`slog::Logger`]: https://docs.rs/slog/2/slog/struct.Logger.html
/// [`Handler`]: handler/struct.Handler.html
/// [`Logger::ptr_eq`]: #method.ptr_eq
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    root: slog::Logger,
}

struct Shared {
    name: String,
    level: AtomicU8,
    handlers: RwLock<Vec<Arc<Handler>>>,
}
impl Shared {
    fn level(&self) -> Severity {
        Severity::from_index(self.level.load(Ordering::Relaxed))
    }

    fn handlers(&self) -> RwLockReadGuard<Vec<Arc<Handler>>> {
        self.handlers.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Logger {
    /// Makes a new logger without handlers.
    ///
    /// Fails with `ErrorKind::InvalidLevel` if `level` is not a known level name.
    pub fn new<L: Into<LevelSpec>>(name: &str, level: L) -> Result<Self> {
        let level: LevelSpec = level.into();
        let level = track!(level.resolve())?;
        let shared = Arc::new(Shared {
            name: name.to_owned(),
            level: AtomicU8::new(level.to_index()),
            handlers: RwLock::new(Vec::new()),
        });
        let root = slog::Logger::root(Dispatch(Arc::clone(&shared)), o!());
        Ok(Logger { shared, root })
    }

    /// Returns the name of this logger.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Returns the current level of this logger.
    pub fn level(&self) -> Severity {
        self.shared.level()
    }

    /// Changes the level of this logger (and of all its clones).
    pub fn set_level(&self, level: Severity) {
        self.shared.level.store(level.to_index(), Ordering::Relaxed);
    }

    /// Attaches a handler.
    pub fn add_handler<H: Into<Arc<Handler>>>(&self, handler: H) {
        self.shared
            .handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(handler.into());
    }

    /// Returns the attached handlers, in order.
    pub fn handlers(&self) -> Vec<Arc<Handler>> {
        self.shared.handlers().clone()
    }

    /// Returns the names of the attached handlers, in order.
    pub fn handler_names(&self) -> Vec<String> {
        self.shared
            .handlers()
            .iter()
            .map(|h| h.name().to_owned())
            .collect()
    }

    /// Returns `true` if `a` and `b` are the same logger (or clones of it).
    pub fn ptr_eq(a: &Logger, b: &Logger) -> bool {
        Arc::ptr_eq(&a.shared, &b.shared)
    }

    /// Flushes every handler, stopping at the first failure.
    pub fn flush(&self) -> std::io::Result<()> {
        for handler in self.shared.handlers().iter() {
            handler.flush()?;
        }
        Ok(())
    }
}
impl Deref for Logger {
    type Target = slog::Logger;
    fn deref(&self) -> &Self::Target {
        &self.root
    }
}
impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// Root drain of a `Logger`: filters by the logger level, then feeds every handler.
struct Dispatch(Arc<Shared>);
impl Drain for Dispatch {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record, values: &OwnedKVList) -> std::result::Result<(), slog::Never> {
        if !self.0.level().accepts(record.level()) {
            return Ok(());
        }
        for handler in self.0.handlers().iter() {
            if let Err(e) = handler.handle(&self.0.name, record, values) {
                // Report and carry on with the remaining handlers.
                eprintln!(
                    "--- Logging error ---\nlogger={:?}, handler={:?}, location={}:{}: {}",
                    self.0.name,
                    handler.name(),
                    record.file(),
                    record.line(),
                    e
                );
            }
        }
        Ok(())
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.0.level().accepts(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BasicLineFormat;
    use crate::handler::testing::{memory_handler, BrokenSink};
    use crate::ErrorKind;

    #[test]
    fn dispatches_to_handlers_in_order() {
        let logger = Logger::new("orders", Severity::Debug).unwrap();
        let (first, first_sink) = memory_handler("first", Severity::Debug);
        let (second, second_sink) = memory_handler("second", Severity::Error);
        logger.add_handler(first);
        logger.add_handler(second);
        assert_eq!(logger.handler_names(), vec!["first", "second"]);

        debug!(logger, "details");
        error!(logger, "boom");

        assert_eq!(first_sink.messages(), vec!["details", "boom"]);
        assert_eq!(second_sink.messages(), vec!["boom"]);
    }

    #[test]
    fn logger_level_filters_before_handlers() {
        let logger = Logger::new("filtered", "WARNING").unwrap();
        let (handler, sink) = memory_handler("mem", Severity::Debug);
        logger.add_handler(handler);

        info!(logger, "dropped");
        warn!(logger, "kept");
        logger.set_level(Severity::Debug);
        debug!(logger, "now kept");

        assert_eq!(sink.messages(), vec!["kept", "now kept"]);
        assert_eq!(logger.level(), Severity::Debug);
    }

    #[test]
    fn trace_records_are_compiled_in() {
        let logger = Logger::new("verbose", Severity::Trace).unwrap();
        let (handler, sink) = memory_handler("mem", Severity::Trace);
        logger.add_handler(handler);

        trace!(logger, "fine grained");
        assert_eq!(sink.messages(), vec!["fine grained"]);
    }

    #[test]
    fn failing_handler_does_not_stop_the_others() {
        let logger = Logger::new("resilient", "info").unwrap();
        logger.add_handler(Handler::new(
            "broken",
            Severity::Debug,
            Arc::new(BasicLineFormat),
            Box::new(BrokenSink),
        ));
        let (handler, sink) = memory_handler("mem", Severity::Debug);
        logger.add_handler(handler);

        error!(logger, "still delivered");
        assert_eq!(sink.messages(), vec!["still delivered"]);
    }

    #[test]
    fn clones_share_state() {
        let logger = Logger::new("shared", "info").unwrap();
        let clone = logger.clone();
        let other = Logger::new("shared", "info").unwrap();

        clone.set_level(Severity::Error);
        assert_eq!(logger.level(), Severity::Error);
        assert!(Logger::ptr_eq(&logger, &clone));
        assert!(!Logger::ptr_eq(&logger, &other));

        let (handler, sink) = memory_handler("mem", Severity::Debug);
        clone.add_handler(handler);
        crit!(logger, "seen by the clone's handler");
        assert_eq!(sink.messages().len(), 1);
        assert!(logger.flush().is_ok());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let e = Logger::new("bad", "loud").err().unwrap();
        assert_eq!(*e.kind(), ErrorKind::InvalidLevel);
    }
}
