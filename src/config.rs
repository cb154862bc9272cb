use crate::file::RotatingFileConfig;
use crate::handler::Handler;
use crate::middleware::{LoggerMiddleware, LoggerMiddlewareBuilder};
use crate::null::NullHandlerConfig;
use crate::syslog::SyslogConfig;
use crate::terminal::TerminalHandlerConfig;
use crate::types::LevelSpec;
use crate::{Build, HandlerBuilder, Result};
use serde::{Deserialize, Serialize};

/// Configuration of a handler builder.
pub trait Config {
    /// Handler builder.
    type Builder: Build;

    /// Makes a handler builder associated with this configuration.
    fn try_to_builder(&self) -> Result<Self::Builder>;

    /// Builds a handler with this configuration.
    fn build_handler(&self) -> Result<Handler> {
        let builder = track!(self.try_to_builder())?;
        let handler = track!(builder.build())?;
        Ok(handler)
    }
}

/// The configuration of `HandlerBuilder`.
///
/// # Examples
///
/// Null handler.
///
/// ```
/// use reqloggers::HandlerConfig;
///
/// let toml = r#"
/// type = "null"
/// "#;
/// let _config: HandlerConfig = serdeconv::from_toml_str(toml).unwrap();
/// ```
///
/// Terminal handler.
///
/// ```
/// use reqloggers::HandlerConfig;
///
/// let toml = r#"
/// type = "terminal"
/// level = "warning"
/// destination = "stdout"
/// "#;
/// let _config: HandlerConfig = serdeconv::from_toml_str(toml).unwrap();
/// ```
///
/// Rotating file handler.
///
/// ```
/// use reqloggers::HandlerConfig;
///
/// let toml = r#"
/// type = "file"
/// directory = "/var/log/app"
/// filename = "app.log"
/// max_bytes = 1048576
/// backup_count = 5
/// timezone = "utc"
/// "#;
/// let _config: HandlerConfig = serdeconv::from_toml_str(toml).unwrap();
/// ```
///
/// Syslog handler.
///
/// ```
/// use reqloggers::HandlerConfig;
///
/// let toml = r#"
/// type = "syslog"
/// host = "logs.example.com"
/// socket_type = "tcp"
/// facility = "daemon"
/// "#;
/// let _config: HandlerConfig = serdeconv::from_toml_str(toml).unwrap();
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum HandlerConfig {
    File(RotatingFileConfig),
    Null(NullHandlerConfig),
    Syslog(SyslogConfig),
    Terminal(TerminalHandlerConfig),
}
impl Config for HandlerConfig {
    type Builder = HandlerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        match *self {
            HandlerConfig::File(ref c) => track!(c.try_to_builder()).map(HandlerBuilder::File),
            HandlerConfig::Null(ref c) => track!(c.try_to_builder()).map(HandlerBuilder::Null),
            HandlerConfig::Syslog(ref c) => track!(c.try_to_builder()).map(HandlerBuilder::Syslog),
            HandlerConfig::Terminal(ref c) => {
                track!(c.try_to_builder()).map(HandlerBuilder::Terminal)
            }
        }
    }
}
impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig::Terminal(TerminalHandlerConfig::default())
    }
}

/// The configuration of `LoggerMiddlewareBuilder`.
///
/// # Examples
///
/// ```
/// use reqloggers::MiddlewareConfig;
///
/// let toml = r#"
/// name = "api"
/// level = "info"
///
/// [[handlers]]
/// type = "terminal"
///
/// [[handlers]]
/// type = "syslog"
/// host = "127.0.0.1"
/// level = "error"
/// "#;
/// let config: MiddlewareConfig = serdeconv::from_toml_str(toml).unwrap();
/// assert_eq!(config.handlers.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Name of the logger to create (or fetch from the registry).
    pub name: String,

    /// Level of the created logger.
    pub level: LevelSpec,

    /// Name of an already registered logger to use instead of creating one.
    pub logger: Option<String>,

    /// Handlers to attach, in order.
    pub handlers: Vec<HandlerConfig>,
}
impl MiddlewareConfig {
    /// Creates a new `MiddlewareConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds every handler and makes the middleware builder.
    pub fn try_to_builder(&self) -> Result<LoggerMiddlewareBuilder> {
        let mut builder = LoggerMiddlewareBuilder::new();
        builder.name(&self.name);
        builder.level(self.level.clone());
        if let Some(ref name) = self.logger {
            builder.registered_logger(name);
        }
        for config in &self.handlers {
            let handler = track!(config.build_handler())?;
            builder.handler(handler);
        }
        Ok(builder)
    }

    /// Builds the middleware described by this configuration.
    pub fn build_middleware(&self) -> Result<LoggerMiddleware> {
        let builder = track!(self.try_to_builder())?;
        track!(builder.build())
    }
}
impl Default for MiddlewareConfig {
    fn default() -> Self {
        MiddlewareConfig {
            name: "SERVER".to_owned(),
            level: LevelSpec::from("DEBUG"),
            logger: None,
            handlers: Vec::new(),
        }
    }
}
