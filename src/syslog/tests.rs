use super::sink::{priority, severity_code};
use crate::format::BasicLineFormat;
use crate::handler::testing::handle_at;
use crate::syslog::{Facility, SocketType, SyslogHandlerBuilder};
use crate::types::Severity;
use crate::{Build, Config, ErrorKind};
use slog::Level;
use std::io::Read;
use std::net::{TcpListener, UdpSocket};
use std::time::Duration;

#[test]
fn priority_combines_facility_and_severity() {
    assert_eq!(severity_code(Severity::Debug), 7);
    assert_eq!(severity_code(Severity::Info), 6);
    assert_eq!(severity_code(Severity::Warning), 4);
    assert_eq!(severity_code(Severity::Error), 3);
    assert_eq!(severity_code(Severity::Critical), 2);

    assert_eq!(priority(Facility::User, Severity::Info), 14);
    assert_eq!(priority(Facility::Local0, Severity::Error), 131);
    assert_eq!(priority(Facility::Kern, Severity::Critical), 2);
}

#[test]
fn invalid_socket_type_is_rejected_at_build_time() {
    let e = SyslogHandlerBuilder::new()
        .socket_type("SCTP")
        .build()
        .err()
        .unwrap();
    assert_eq!(*e.kind(), ErrorKind::InvalidSocketType);
}

#[test]
fn invalid_level_is_rejected_at_build_time() {
    let e = SyslogHandlerBuilder::new().level("chatty").build().err().unwrap();
    assert_eq!(*e.kind(), ErrorKind::InvalidLevel);
}

#[test]
fn build_does_not_touch_the_network() {
    // Nothing listens there, and nothing is resolved until the first record.
    let handler = SyslogHandlerBuilder::new()
        .host("unresolvable.invalid")
        .socket_type("tcp")
        .build()
        .unwrap();
    assert_eq!(handler.name(), "sh");
    assert_eq!(handler.level(), Severity::Info);
}

#[test]
fn sends_datagrams_over_udp() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let port = server.local_addr().unwrap().port();

    let handler = SyslogHandlerBuilder::new()
        .host("127.0.0.1")
        .port(port)
        .facility(Facility::Local0)
        .ident("app: ")
        .format(BasicLineFormat)
        .build()
        .unwrap();

    handle_at(&handler, Level::Debug, "filtered out").unwrap();
    handle_at(&handler, Level::Warning, "disk almost full").unwrap();

    let mut buf = [0; 1024];
    let (size, _) = server.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..size], &b"<132>app: disk almost full\0"[..]);
}

#[test]
fn sends_stream_over_tcp() {
    let server = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = server.local_addr().unwrap().port();

    let handler = SyslogHandlerBuilder::new()
        .host("127.0.0.1")
        .port(port)
        .socket_type("TCP")
        .level(Severity::Debug)
        .append_nul(false)
        .format(BasicLineFormat)
        .build()
        .unwrap();

    handle_at(&handler, Level::Info, "hello").unwrap();
    handle_at(&handler, Level::Error, "failed").unwrap();
    drop(handler);

    let (mut conn, _) = server.accept().unwrap();
    let mut received = String::new();
    conn.read_to_string(&mut received).unwrap();
    assert_eq!(received, "<14>hello<11>failed");
}

#[test]
fn tcp_connection_failures_surface_on_write() {
    // Grab a free port, then close the listener so the connection is refused.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let handler = SyslogHandlerBuilder::new()
        .host("127.0.0.1")
        .port(port)
        .socket_type("tcp")
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    assert!(handle_at(&handler, Level::Error, "nobody listens").is_err());
    assert!(handle_at(&handler, Level::Error, "still nobody").is_err());
}

#[test]
fn encodes_without_nul_or_ident() {
    let handler = SyslogHandlerBuilder::new()
        .append_nul(false)
        .facility(Facility::Daemon)
        .build()
        .unwrap();
    let sink = handler.sink();
    assert!(sink.flush().is_ok());

    let sink = super::SyslogSink::new(
        "localhost".to_owned(),
        514,
        SocketType::Udp,
        Facility::Daemon,
        None,
        false,
        Duration::from_secs(1),
    );
    assert_eq!(sink.encode(Severity::Info, "up"), b"<30>up".to_vec());
    assert_eq!(sink.facility(), Facility::Daemon);
    assert_eq!(sink.socket_type(), SocketType::Udp);
}

#[test]
fn config_builds_a_handler() {
    let toml = r#"
name = "remote"
host = "127.0.0.1"
port = 6514
socket_type = "udp"
facility = "local4"
level = "error"
ident = "svc: "
"#;
    let config: super::SyslogConfig = serdeconv::from_toml_str(toml).unwrap();
    assert_eq!(config.facility, Facility::Local4);
    assert!(config.append_nul);

    let handler = config.build_handler().unwrap();
    assert_eq!(handler.name(), "remote");
    assert_eq!(handler.level(), Severity::Error);

    let bad = serdeconv::from_toml_str::<super::SyslogConfig>(r#"socket_type = "raw""#);
    assert!(bad.is_err());
}
