//! Request middleware injecting a configured logger into every request.
//!
//! The host framework owns the request loop. It builds a [`LoggerMiddleware`]
//! once at startup, then calls [`Middleware::process_resource`] (or
//! [`LoggerMiddleware::on_request`]) for each incoming request, before the
//! request handler runs. Afterwards the handler finds the logger in its
//! resource:
//!
//! ```
//! #[macro_use]
//! extern crate slog;
//! extern crate reqloggers;
//!
//! use reqloggers::{LoggerMiddleware, Middleware, RequestContext};
//!
//! # fn main() -> Result<(), reqloggers::Error> {
//! let middleware = LoggerMiddleware::builder().name("doc-server").level("info").build()?;
//!
//! let mut ctx = RequestContext::new();
//! middleware.process_resource(&mut ctx);
//! if let Some(log) = ctx.log() {
//!     info!(log, "handling request"; "path" => "/health");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`LoggerMiddleware`]: struct.LoggerMiddleware.html
//! [`Middleware::process_resource`]: trait.Middleware.html#tymethod.process_resource
//! [`LoggerMiddleware::on_request`]: struct.LoggerMiddleware.html#method.on_request
use crate::handler::Handler;
use crate::logger::Logger;
use crate::registry::Registry;
use crate::types::LevelSpec;
use crate::{ErrorKind, Result};
use std::sync::Arc;

/// A per-request object the middleware can attach a logger to.
pub trait Resource {
    /// Stores the logger to be used while handling the request.
    fn set_log(&mut self, log: Logger);
}

/// A hook run by the host framework for every request, before the request handler.
pub trait Middleware<R: ?Sized> {
    /// Prepares `resource` for the request handler.
    fn process_resource(&self, resource: &mut R);
}

/// A minimal request resource holding the injected logger.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
    log: Option<Logger>,
}
impl RequestContext {
    /// Makes a context without logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the injected logger, if the middleware ran.
    pub fn log(&self) -> Option<&Logger> {
        self.log.as_ref()
    }
}
impl Resource for RequestContext {
    fn set_log(&mut self, log: Logger) {
        self.log = Some(log);
    }
}

/// Middleware owning one logger and handing it to every request.
#[derive(Debug, Clone)]
pub struct LoggerMiddleware {
    log: Logger,
}
impl LoggerMiddleware {
    /// Makes a `LoggerMiddlewareBuilder` with the default settings.
    pub fn builder() -> LoggerMiddlewareBuilder {
        LoggerMiddlewareBuilder::new()
    }

    /// Wraps an existing logger, without touching its level or handlers.
    pub fn with_logger(log: Logger) -> Self {
        LoggerMiddleware { log }
    }

    /// Returns the owned logger.
    pub fn logger(&self) -> &Logger {
        &self.log
    }

    /// Attaches the owned logger to `resource`.
    pub fn on_request<R: Resource + ?Sized>(&self, resource: &mut R) {
        resource.set_log(self.log.clone());
    }
}
impl<R: Resource + ?Sized> Middleware<R> for LoggerMiddleware {
    fn process_resource(&self, resource: &mut R) {
        self.on_request(resource)
    }
}

#[derive(Debug, Clone)]
enum LoggerSource {
    Create,
    Instance(Logger),
    Registered(String),
}

/// Builder of `LoggerMiddleware`.
///
/// By default the middleware uses the logger named `SERVER` of the global
/// registry (creating it if needed), sets its level to `DEBUG` and attaches
/// no handler.
#[derive(Debug, Clone)]
pub struct LoggerMiddlewareBuilder {
    name: String,
    level: LevelSpec,
    source: LoggerSource,
    handlers: Vec<Arc<Handler>>,
}
impl LoggerMiddlewareBuilder {
    /// Makes a new `LoggerMiddlewareBuilder` instance.
    pub fn new() -> Self {
        LoggerMiddlewareBuilder {
            name: "SERVER".to_owned(),
            level: LevelSpec::from("DEBUG"),
            source: LoggerSource::Create,
            handlers: Vec::new(),
        }
    }

    /// Sets the name of the logger to create (or fetch).
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_owned();
        self
    }

    /// Sets the level of the created logger.
    ///
    /// Ignored when an existing logger is supplied.
    pub fn level<L: Into<LevelSpec>>(&mut self, level: L) -> &mut Self {
        self.level = level.into();
        self
    }

    /// Uses `logger` as is instead of creating one.
    pub fn logger(&mut self, logger: Logger) -> &mut Self {
        self.source = LoggerSource::Instance(logger);
        self
    }

    /// Uses the logger already registered under `name`.
    ///
    /// `build` fails with `ErrorKind::InvalidLoggerInput` if there is none.
    pub fn registered_logger(&mut self, name: &str) -> &mut Self {
        self.source = LoggerSource::Registered(name.to_owned());
        self
    }

    /// Appends a handler to attach.
    pub fn handler<H: Into<Arc<Handler>>>(&mut self, handler: H) -> &mut Self {
        self.handlers.push(handler.into());
        self
    }

    /// Appends several handlers to attach, in order.
    pub fn handlers<I>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<Handler>>,
    {
        self.handlers.extend(handlers.into_iter().map(Into::into));
        self
    }

    /// Builds the middleware, using the global registry.
    pub fn build(&self) -> Result<LoggerMiddleware> {
        track!(self.build_in(Registry::global()))
    }

    /// Builds the middleware, creating or fetching the logger in `registry`.
    pub fn build_in(&self, registry: &Registry) -> Result<LoggerMiddleware> {
        let log = match self.source {
            LoggerSource::Instance(ref logger) => logger.clone(),
            LoggerSource::Registered(ref name) => match registry.get(name) {
                Some(logger) => logger,
                None => track_panic!(
                    ErrorKind::InvalidLoggerInput,
                    "No logger is registered under {:?}",
                    name
                ),
            },
            LoggerSource::Create => {
                let level = track!(self.level.resolve())?;
                let logger = track!(registry.get_or_create(&self.name))?;
                logger.set_level(level);
                logger
            }
        };
        for handler in &self.handlers {
            log.add_handler(Arc::clone(handler));
        }
        Ok(LoggerMiddleware { log })
    }
}
impl Default for LoggerMiddlewareBuilder {
    fn default() -> Self {
        Self::new()
    }
}
