//! This crate provides a request middleware that injects a configured
//! [slog](https://github.com/slog-rs/slog)-based logger into every request,
//! and builders for frequently used log handlers (size-rotated files, syslog
//! over TCP or UDP, terminal).
//!
//! Every slog level is compiled in, in debug and release builds alike; which
//! records are written is decided at runtime by the levels of the logger and
//! of each handler.
//!
//! # Examples
//!
//! Creates a middleware writing to a rotating file:
//!
//! ```
//! #[macro_use]
//! extern crate slog;
//! extern crate reqloggers;
//!
//! use reqloggers::{Build, LoggerMiddleware, Middleware, RequestContext};
//! use reqloggers::file::RotatingFileHandlerBuilder;
//!
//! # fn main() -> Result<(), reqloggers::Error> {
//! # let dir = tempfile::tempdir().unwrap();
//! let handler = RotatingFileHandlerBuilder::new()
//!     .directory(dir.path().join("log"))
//!     .level("info")
//!     .build()?;
//!
//! let middleware = LoggerMiddleware::builder()
//!     .name("lib-doc")
//!     .handler(handler)
//!     .build()?;
//!
//! // For every request:
//! let mut ctx = RequestContext::new();
//! middleware.process_resource(&mut ctx);
//! if let Some(log) = ctx.log() {
//!     info!(log, "Hello World!"; "path" => "/");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Creates a middleware from configuration text (TOML):
//!
//! ```
//! #[macro_use]
//! extern crate slog;
//! extern crate reqloggers;
//! extern crate serdeconv;
//!
//! use reqloggers::MiddlewareConfig;
//!
//! # fn main() {
//! let config: MiddlewareConfig = serdeconv::from_toml_str(r#"
//! name = "lib-doc-config"
//! level = "debug"
//!
//! [[handlers]]
//! type = "terminal"
//! destination = "stderr"
//! "#).unwrap();
//!
//! let middleware = config.build_middleware().unwrap();
//! info!(middleware.logger(), "Hello World!");
//! # }
//! ```
#![warn(missing_docs)]
#[macro_use]
extern crate slog;
#[macro_use]
extern crate trackable;

pub use crate::build::{Build, HandlerBuilder};
pub use crate::config::{Config, HandlerConfig, MiddlewareConfig};
pub use crate::error::{Error, ErrorKind};
pub use crate::handler::{Handler, Sink};
pub use crate::logger::Logger;
pub use crate::middleware::{
    LoggerMiddleware, LoggerMiddlewareBuilder, Middleware, RequestContext, Resource,
};
pub use crate::misc::set_stdlog_logger;
pub use crate::registry::Registry;
pub use crate::types::resolve_level;

pub mod file;
pub mod format;
pub mod handler;
pub mod null;
pub mod syslog;
pub mod terminal;
pub mod types;

mod build;
mod config;
mod error;
mod logger;
mod middleware;
mod misc;
mod permissions;
mod registry;

/// A specialized `Result` type for this crate.
pub type Result<T> = ::std::result::Result<T, Error>;
