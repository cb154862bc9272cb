use super::Facility;
use crate::handler::Sink;
use crate::types::Severity;
use crate::{Error, ErrorKind, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// The transport used to reach a syslog server.
///
/// # Examples
///
/// ```
/// use reqloggers::syslog::SocketType;
///
/// assert_eq!(SocketType::default(), SocketType::Udp);
/// assert_eq!("tcp".parse::<SocketType>().ok(), Some(SocketType::Tcp));
/// assert!("SCTP".parse::<SocketType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SocketType {
    /// Stream socket (`"TCP"`).
    #[serde(rename = "TCP")]
    Tcp,

    /// Datagram socket (`"UDP"`).
    #[serde(rename = "UDP")]
    Udp,
}
impl Default for SocketType {
    fn default() -> Self {
        SocketType::Udp
    }
}
impl FromStr for SocketType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TCP" => Ok(SocketType::Tcp),
            "UDP" => Ok(SocketType::Udp),
            _ => track_panic!(
                ErrorKind::InvalidSocketType,
                "Socket type must be TCP or UDP: {:?}",
                s
            ),
        }
    }
}
impl<'de> Deserialize<'de> for SocketType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<SocketType>().map_err(D::Error::custom)
    }
}

/// Maps a severity to its syslog severity code.
pub(crate) fn severity_code(severity: Severity) -> u8 {
    match severity {
        Severity::Trace | Severity::Debug => 7,
        Severity::Info => 6,
        Severity::Warning => 4,
        Severity::Error => 3,
        Severity::Critical => 2,
    }
}

/// Computes the `PRI` part of a syslog message.
pub(crate) fn priority(facility: Facility, severity: Severity) -> u8 {
    facility.code() * 8 + severity_code(severity)
}

/// A sink that sends lines to a remote syslog server.
#[derive(Debug)]
pub struct SyslogSink {
    host: String,
    port: u16,
    socket_type: SocketType,
    facility: Facility,
    ident: Option<String>,
    append_nul: bool,
    timeout: Duration,
    state: Mutex<Connection>,
}

#[derive(Debug, Default)]
struct Connection {
    addr: Option<SocketAddr>,
    udp: Option<UdpSocket>,
    tcp: Option<TcpStream>,
}

impl SyslogSink {
    pub(crate) fn new(
        host: String,
        port: u16,
        socket_type: SocketType,
        facility: Facility,
        ident: Option<String>,
        append_nul: bool,
        timeout: Duration,
    ) -> Self {
        SyslogSink {
            host,
            port,
            socket_type,
            facility,
            ident,
            append_nul,
            timeout,
            state: Mutex::new(Connection::default()),
        }
    }

    /// Returns the transport used to reach the server.
    pub fn socket_type(&self) -> SocketType {
        self.socket_type
    }

    /// Returns the facility of the emitted messages.
    pub fn facility(&self) -> Facility {
        self.facility
    }

    /// Encodes a line as it is sent on the wire.
    pub fn encode(&self, severity: Severity, line: &str) -> Vec<u8> {
        let mut msg = format!("<{}>", priority(self.facility, severity));
        if let Some(ref ident) = self.ident {
            msg.push_str(ident);
        }
        msg.push_str(line);
        let mut bytes = msg.into_bytes();
        if self.append_nul {
            bytes.push(0);
        }
        bytes
    }

    fn lock(&self) -> MutexGuard<Connection> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve(&self, conn: &mut Connection) -> io::Result<SocketAddr> {
        if let Some(addr) = conn.addr {
            return Ok(addr);
        }
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("cannot resolve syslog server address {}:{}", self.host, self.port),
                )
            })?;
        conn.addr = Some(addr);
        Ok(addr)
    }

    fn send_udp(&self, conn: &mut Connection, addr: SocketAddr, msg: &[u8]) -> io::Result<()> {
        if conn.udp.is_none() {
            let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
            conn.udp = Some(UdpSocket::bind(local)?);
        }
        if let Some(ref socket) = conn.udp {
            socket.send_to(msg, addr)?;
        }
        Ok(())
    }

    fn send_tcp(&self, conn: &mut Connection, addr: SocketAddr, msg: &[u8]) -> io::Result<()> {
        if conn.tcp.is_none() {
            let stream = TcpStream::connect_timeout(&addr, self.timeout)?;
            stream.set_write_timeout(Some(self.timeout))?;
            conn.tcp = Some(stream);
        }
        let result = match conn.tcp {
            Some(ref mut stream) => stream.write_all(msg).and_then(|()| stream.flush()),
            None => Ok(()),
        };
        if result.is_err() {
            // Reconnect on the next record.
            conn.tcp = None;
        }
        result
    }
}
impl Sink for SyslogSink {
    fn emit(&self, severity: Severity, line: &str) -> io::Result<()> {
        let msg = self.encode(severity, line);
        let mut conn = self.lock();
        let addr = self.resolve(&mut conn)?;
        match self.socket_type {
            SocketType::Udp => self.send_udp(&mut conn, addr, &msg),
            SocketType::Tcp => self.send_tcp(&mut conn, addr, &msg),
        }
    }

    fn flush(&self) -> io::Result<()> {
        if let Some(ref mut stream) = self.lock().tcp {
            stream.flush()?;
        }
        Ok(())
    }
}
