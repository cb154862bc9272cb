use super::{Facility, SocketType, SyslogSink};
use crate::build::BuilderCommon;
use crate::format::LineFormat;
use crate::handler::Handler;
use crate::types::LevelSpec;
use crate::{Build, Result};
use std::sync::Arc;
use std::time::Duration;

/// A handler builder which builds handlers that send log records to a syslog server.
///
/// All settings have defaults: the handler sends to `localhost:514` over UDP
/// with the `user` facility, and accepts records at `INFO` or above.
/// Most applications will want to set at least the `host` and the `facility`.
///
/// Building the handler does not touch the network; the server address is
/// resolved when the first record is written.
///
/// # Example
///
/// ```
/// use reqloggers::Build;
/// use reqloggers::syslog::{Facility, SyslogHandlerBuilder};
///
/// # fn main() -> Result<(), reqloggers::Error> {
/// let handler = SyslogHandlerBuilder::new()
///     .host("127.0.0.1")
///     .port(5514)
///     .socket_type("tcp")
///     .facility(Facility::Local0)
///     .level("warning")
///     .build()?;
/// assert_eq!(handler.name(), "sh");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SyslogHandlerBuilder {
    common: BuilderCommon,
    host: String,
    port: u16,
    socket_type: String,
    facility: Facility,
    ident: Option<String>,
    append_nul: bool,
    timeout: Duration,
}

impl Default for SyslogHandlerBuilder {
    fn default() -> Self {
        SyslogHandlerBuilder {
            common: BuilderCommon::new("sh", "INFO"),
            host: super::config::DEFAULT_HOST.to_owned(),
            port: super::config::DEFAULT_PORT,
            socket_type: "UDP".to_owned(),
            facility: Facility::default(),
            ident: None,
            append_nul: true,
            timeout: Duration::from_secs(super::config::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SyslogHandlerBuilder {
    /// Makes a new `SyslogHandlerBuilder` instance.
    pub fn new() -> Self {
        SyslogHandlerBuilder::default()
    }

    /// Sets the host name (or IP address) of the syslog server.
    pub fn host(&mut self, host: &str) -> &mut Self {
        self.host = host.to_owned();
        self
    }

    /// Sets the port of the syslog server.
    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    /// Sets the transport, `"TCP"` or `"UDP"` (case-insensitive).
    ///
    /// The value is validated by `build`.
    pub fn socket_type(&mut self, socket_type: &str) -> &mut Self {
        self.socket_type = socket_type.to_owned();
        self
    }

    /// Sets the syslog facility to send logs to.
    ///
    /// By default, this is the `user` facility.
    pub fn facility(&mut self, facility: Facility) -> &mut Self {
        self.facility = facility;
        self
    }

    /// Sets a prefix written right after `<PRI>` in every message.
    ///
    /// Syslog daemons usually expect something like `"myapp: "`.
    pub fn ident(&mut self, ident: &str) -> &mut Self {
        self.ident = Some(ident.to_owned());
        self
    }

    /// Sets whether a NUL byte terminates every message (the default).
    pub fn append_nul(&mut self, append_nul: bool) -> &mut Self {
        self.append_nul = append_nul;
        self
    }

    /// Sets the connect and write timeout of TCP connections.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
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

impl Build for SyslogHandlerBuilder {
    fn build(&self) -> Result<Handler> {
        let socket_type = track!(self.socket_type.parse::<SocketType>())?;
        self.common.build_with_sink(|| {
            Ok(SyslogSink::new(
                self.host.clone(),
                self.port,
                socket_type,
                self.facility,
                self.ident.clone(),
                self.append_nul,
                self.timeout,
            ))
        })
    }
}
