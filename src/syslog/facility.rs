use crate::error::{Error, ErrorKind};
use crate::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A syslog facility.
///
/// The numeric codes are the ones defined by RFC 5424, so they do not depend
/// on the platform the logger runs on.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[non_exhaustive]
pub enum Facility {
    #[serde(rename = "kern")]
    Kern,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "mail")]
    Mail,
    #[serde(rename = "daemon")]
    Daemon,
    #[serde(rename = "auth")]
    Auth,
    #[serde(rename = "syslog")]
    Syslog,
    #[serde(rename = "lpr")]
    Lpr,
    #[serde(rename = "news")]
    News,
    #[serde(rename = "uucp")]
    Uucp,
    #[serde(rename = "cron")]
    Cron,

    /// Log messages containing sensitive information.
    #[serde(rename = "authpriv")]
    AuthPriv,

    #[serde(rename = "ftp")]
    Ftp,

    /// Network Time Protocol daemon.
    #[serde(rename = "ntp")]
    Ntp,

    /// Log audit.
    #[serde(rename = "security")]
    Security,

    /// Log alert.
    #[serde(rename = "console")]
    Console,

    /// Scheduling daemon (facility 15).
    #[serde(rename = "solaris-cron")]
    SolarisCron,

    #[serde(rename = "local0")]
    Local0,
    #[serde(rename = "local1")]
    Local1,
    #[serde(rename = "local2")]
    Local2,
    #[serde(rename = "local3")]
    Local3,
    #[serde(rename = "local4")]
    Local4,
    #[serde(rename = "local5")]
    Local5,
    #[serde(rename = "local6")]
    Local6,
    #[serde(rename = "local7")]
    Local7,
}

impl Facility {
    /// Gets the name of this `Facility`, in lowercase.
    ///
    /// The `FromStr` implementation accepts the same names, but it is
    /// case-insensitive.
    pub fn name(self) -> &'static str {
        match self {
            Facility::Kern => "kern",
            Facility::User => "user",
            Facility::Mail => "mail",
            Facility::Daemon => "daemon",
            Facility::Auth => "auth",
            Facility::Syslog => "syslog",
            Facility::Lpr => "lpr",
            Facility::News => "news",
            Facility::Uucp => "uucp",
            Facility::Cron => "cron",
            Facility::AuthPriv => "authpriv",
            Facility::Ftp => "ftp",
            Facility::Ntp => "ntp",
            Facility::Security => "security",
            Facility::Console => "console",
            Facility::SolarisCron => "solaris-cron",
            Facility::Local0 => "local0",
            Facility::Local1 => "local1",
            Facility::Local2 => "local2",
            Facility::Local3 => "local3",
            Facility::Local4 => "local4",
            Facility::Local5 => "local5",
            Facility::Local6 => "local6",
            Facility::Local7 => "local7",
        }
    }

    /// Returns the numeric code of this facility.
    pub fn code(self) -> u8 {
        match self {
            Facility::Kern => 0,
            Facility::User => 1,
            Facility::Mail => 2,
            Facility::Daemon => 3,
            Facility::Auth => 4,
            Facility::Syslog => 5,
            Facility::Lpr => 6,
            Facility::News => 7,
            Facility::Uucp => 8,
            Facility::Cron => 9,
            Facility::AuthPriv => 10,
            Facility::Ftp => 11,
            Facility::Ntp => 12,
            Facility::Security => 13,
            Facility::Console => 14,
            Facility::SolarisCron => 15,
            Facility::Local0 => 16,
            Facility::Local1 => 17,
            Facility::Local2 => 18,
            Facility::Local3 => 19,
            Facility::Local4 => 20,
            Facility::Local5 => 21,
            Facility::Local6 => 22,
            Facility::Local7 => 23,
        }
    }
}

impl Default for Facility {
    fn default() -> Self {
        Facility::User
    }
}

impl Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kern" => Ok(Facility::Kern),
            "user" => Ok(Facility::User),
            "mail" => Ok(Facility::Mail),
            "daemon" => Ok(Facility::Daemon),
            "auth" => Ok(Facility::Auth),
            "syslog" => Ok(Facility::Syslog),
            "lpr" => Ok(Facility::Lpr),
            "news" => Ok(Facility::News),
            "uucp" => Ok(Facility::Uucp),
            "cron" => Ok(Facility::Cron),
            "authpriv" => Ok(Facility::AuthPriv),
            "ftp" => Ok(Facility::Ftp),
            "ntp" => Ok(Facility::Ntp),
            "security" => Ok(Facility::Security),
            "console" => Ok(Facility::Console),
            "solaris-cron" => Ok(Facility::SolarisCron),
            "local0" => Ok(Facility::Local0),
            "local1" => Ok(Facility::Local1),
            "local2" => Ok(Facility::Local2),
            "local3" => Ok(Facility::Local3),
            "local4" => Ok(Facility::Local4),
            "local5" => Ok(Facility::Local5),
            "local6" => Ok(Facility::Local6),
            "local7" => Ok(Facility::Local7),
            _ => track_panic!(
                ErrorKind::InvalidFacility,
                "unrecognized syslog facility name `{}`",
                s
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Facility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Facility>().map_err(D::Error::custom)
    }
}

#[test]
fn test_facility_from_str() {
    assert_eq!(Facility::from_str("daemon").ok(), Some(Facility::Daemon));
    assert_eq!(Facility::from_str("LOCAL3").ok(), Some(Facility::Local3));
    assert_eq!(
        Facility::from_str("solaris-cron").ok(),
        Some(Facility::SolarisCron)
    );

    let e = Facility::from_str("foobar").err().unwrap();
    assert_eq!(*e.kind(), ErrorKind::InvalidFacility);
}

#[test]
fn test_facility_codes() {
    assert_eq!(Facility::default().code(), 1);
    assert_eq!(Facility::Local7.code(), 23);
    assert_eq!(Facility::from_str(Facility::AuthPriv.name()).ok(), Some(Facility::AuthPriv));
}
