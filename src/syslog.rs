//! Handler that sends log records to a syslog server over UDP or TCP.
//!
//! Each record is sent as `<PRI>` followed by the (optional) ident, the
//! formatted line and a terminating NUL byte. `PRI` combines the
//! [`Facility`] of the handler and the severity of the record.
//!
//! # Delivery
//!
//! The server address is resolved, and for TCP the connection established,
//! when the first record is written. Over UDP delivery is fire-and-forget:
//! an unreachable server is not reported. Over TCP, connection and send
//! failures are returned by [`Handler::handle`] (and reported on stderr when
//! the record is dispatched through a [`Logger`]); the broken stream is
//! dropped and a new connection is attempted on the next record.
//!
//! [`Facility`]: enum.Facility.html
//! [`Handler::handle`]: ../handler/struct.Handler.html#method.handle
//! [`Logger`]: ../struct.Logger.html
pub use self::builder::SyslogHandlerBuilder;
pub use self::config::SyslogConfig;
pub use self::facility::Facility;
pub use self::sink::{SocketType, SyslogSink};

mod builder;
mod config;
mod facility;
mod sink;

#[cfg(test)]
mod tests;
