use super::{Facility, SocketType, SyslogHandlerBuilder};
use crate::format::LineFormatConfig;
use crate::types::{LevelSpec, SourceLocation, TimeZone};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub(super) const DEFAULT_HOST: &str = "localhost";
pub(super) const DEFAULT_PORT: u16 = 514;
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// The configuration of `SyslogHandlerBuilder`.
///
/// # Examples
///
/// ```
/// use reqloggers::syslog::{Facility, SocketType, SyslogConfig};
///
/// let toml = r#"
/// host = "logs.example.com"
/// socket_type = "tcp"
/// facility = "local2"
/// level = "warning"
/// "#;
/// let config: SyslogConfig = serdeconv::from_toml_str(toml).unwrap();
/// assert_eq!(config.port, 514);
/// assert_eq!(config.socket_type, SocketType::Tcp);
/// assert_eq!(config.facility, Facility::Local2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(default)]
pub struct SyslogConfig {
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

    /// Host name of the syslog server.
    pub host: String,

    /// Port of the syslog server.
    pub port: u16,

    /// Transport (`"TCP"` or `"UDP"`).
    pub socket_type: SocketType,

    /// Syslog facility.
    pub facility: Facility,

    /// Prefix written after `<PRI>`.
    pub ident: Option<String>,

    /// Whether messages are NUL-terminated.
    pub append_nul: bool,

    /// TCP connect and write timeout, in seconds.
    pub timeout_secs: u64,
}

impl SyslogConfig {
    /// Creates a new `SyslogConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        SyslogConfig {
            name: "sh".to_owned(),
            level: LevelSpec::from("INFO"),
            format: LineFormatConfig::default(),
            source_location: SourceLocation::default(),
            timezone: TimeZone::default(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            socket_type: SocketType::default(),
            facility: Facility::default(),
            ident: None,
            append_nul: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config for SyslogConfig {
    type Builder = SyslogHandlerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        let mut b = SyslogHandlerBuilder::new();
        b.name(&self.name);
        b.level(self.level.clone());
        b.format_arc(self.format.to_format(self.timezone, self.source_location));
        b.host(&self.host);
        b.port(self.port);
        b.socket_type(match self.socket_type {
            SocketType::Tcp => "TCP",
            SocketType::Udp => "UDP",
        });
        b.facility(self.facility);
        if let Some(ref ident) = self.ident {
            b.ident(ident);
        }
        b.append_nul(self.append_nul);
        b.timeout(Duration::from_secs(self.timeout_secs));
        Ok(b)
    }
}
