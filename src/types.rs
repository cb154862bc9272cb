//! Commonly used types.
use crate::{Error, ErrorKind, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slog::Level;
use std::fmt;
use std::str::FromStr;

/// The severity of a log record.
///
/// # Examples
///
/// The default value:
///
/// ```
/// use reqloggers::types::Severity;
///
/// assert_eq!(Severity::default(), Severity::Info);
/// ```
///
/// Names are matched case-insensitively:
///
/// ```
/// use reqloggers::types::Severity;
///
/// assert_eq!("WARNING".parse::<Severity>().ok(), Some(Severity::Warning));
/// assert_eq!("warn".parse::<Severity>().ok(), Some(Severity::Warning));
/// assert!("verbose".parse::<Severity>().is_err());
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}
impl Severity {
    /// Converts `Severity` to `Level`.
    pub fn as_level(&self) -> Level {
        match *self {
            Severity::Trace => Level::Trace,
            Severity::Debug => Level::Debug,
            Severity::Info => Level::Info,
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
            Severity::Critical => Level::Critical,
        }
    }

    /// Converts `Level` to `Severity`.
    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => Severity::Trace,
            Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
            Level::Critical => Severity::Critical,
        }
    }

    /// Returns the numeric rank of this severity.
    ///
    /// The values follow the widespread `10, 20, .., 50` convention, with `Trace` below `Debug`.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Trace => 5,
            Severity::Debug => 10,
            Severity::Info => 20,
            Severity::Warning => 30,
            Severity::Error => 40,
            Severity::Critical => 50,
        }
    }

    /// Returns the upper-case name used in formatted log lines (e.g. `"WARNING"`).
    pub fn name(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Returns `true` if a record of `level` passes a threshold of `self`.
    pub fn accepts(self, level: Level) -> bool {
        level.is_at_least(self.as_level())
    }

    pub(crate) fn to_index(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_index(index: u8) -> Self {
        match index {
            0 => Severity::Trace,
            1 => Severity::Debug,
            2 => Severity::Info,
            3 => Severity::Warning,
            4 => Severity::Error,
            _ => Severity::Critical,
        }
    }
}
impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}
impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Severity {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => track_panic!(ErrorKind::InvalidLevel, "Undefined severity: {:?}", s),
        }
    }
}
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Severity>().map_err(D::Error::custom)
    }
}

/// A severity that has either been resolved already or is still given by name.
///
/// Builders and configurations keep the level in this form and resolve it with
/// [`resolve_level`] when they are built, so an unknown name is reported at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSpec {
    /// A case-insensitive severity name such as `"INFO"`.
    Name(String),

    /// An already resolved severity.
    Severity(Severity),
}
impl LevelSpec {
    /// Resolves this level into a `Severity`.
    pub fn resolve(&self) -> Result<Severity> {
        match *self {
            LevelSpec::Severity(severity) => Ok(severity),
            LevelSpec::Name(ref name) => track!(name.parse::<Severity>()),
        }
    }
}
impl Default for LevelSpec {
    fn default() -> Self {
        LevelSpec::Severity(Severity::default())
    }
}
impl From<Severity> for LevelSpec {
    fn from(f: Severity) -> Self {
        LevelSpec::Severity(f)
    }
}
impl From<Level> for LevelSpec {
    fn from(f: Level) -> Self {
        LevelSpec::Severity(Severity::from_level(f))
    }
}
impl<'a> From<&'a str> for LevelSpec {
    fn from(f: &'a str) -> Self {
        LevelSpec::Name(f.to_owned())
    }
}
impl From<String> for LevelSpec {
    fn from(f: String) -> Self {
        LevelSpec::Name(f)
    }
}
impl Serialize for LevelSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            LevelSpec::Name(ref name) => serializer.serialize_str(name),
            LevelSpec::Severity(severity) => severity.serialize(serializer),
        }
    }
}
impl<'de> Deserialize<'de> for LevelSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(LevelSpec::Name)
    }
}

/// Resolves a severity name (or an already resolved severity) into a `Severity`.
///
/// Names are matched case-insensitively. An unknown name is an `InvalidLevel` error.
///
/// # Examples
///
/// ```
/// use reqloggers::types::{resolve_level, Severity};
/// use reqloggers::ErrorKind;
///
/// assert_eq!(resolve_level("debug").ok(), Some(Severity::Debug));
/// assert_eq!(resolve_level(Severity::Error).ok(), Some(Severity::Error));
///
/// let e = resolve_level("loud").err().unwrap();
/// assert_eq!(*e.kind(), ErrorKind::InvalidLevel);
/// ```
pub fn resolve_level<L: Into<LevelSpec>>(level: L) -> Result<Severity> {
    let level: LevelSpec = level.into();
    track!(level.resolve())
}

/// Time Zone.
///
/// # Examples
///
/// The default value:
///
/// ```
/// use reqloggers::types::TimeZone;
///
/// assert_eq!(TimeZone::default(), TimeZone::Local);
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZone {
    Utc,
    Local,
}
impl Default for TimeZone {
    fn default() -> Self {
        TimeZone::Local
    }
}

/// Source Location.
///
/// # Examples
///
/// The default value:
///
/// ```
/// use reqloggers::types::SourceLocation;
///
/// assert_eq!(SourceLocation::default(), SourceLocation::ModuleFunctionAndLine);
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    None,
    ModuleAndLine,
    ModuleFunctionAndLine,
}
impl Default for SourceLocation {
    fn default() -> Self {
        SourceLocation::ModuleFunctionAndLine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_names_are_case_insensitive() {
        for (name, expected) in &[
            ("debug", Severity::Debug),
            ("INFO", Severity::Info),
            ("Warning", Severity::Warning),
            ("eRRoR", Severity::Error),
            ("CRITICAL", Severity::Critical),
            ("fatal", Severity::Critical),
        ] {
            assert_eq!(resolve_level(*name).ok(), Some(*expected), "{}", name);
        }
    }

    #[test]
    fn resolved_severities_keep_their_order() {
        let levels = ["debug", "info", "warning", "error", "critical"]
            .iter()
            .map(|name| resolve_level(*name).unwrap())
            .collect::<Vec<_>>();
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert!(levels.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        for name in &["", "verbose", "notice", "info "] {
            let e = resolve_level(*name).err().unwrap();
            assert_eq!(*e.kind(), ErrorKind::InvalidLevel);
        }
    }

    #[test]
    fn resolved_severity_is_returned_unchanged() {
        assert_eq!(resolve_level(Severity::Trace).ok(), Some(Severity::Trace));
        assert_eq!(resolve_level(Level::Error).ok(), Some(Severity::Error));
    }

    #[test]
    fn severity_index_round_trips() {
        for s in &[
            Severity::Trace,
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ] {
            assert_eq!(Severity::from_index(s.to_index()), *s);
            assert_eq!(Severity::from_level(s.as_level()), *s);
        }
    }

    #[test]
    fn threshold_accepts_records_at_or_above() {
        assert!(Severity::Info.accepts(Level::Info));
        assert!(Severity::Info.accepts(Level::Critical));
        assert!(!Severity::Info.accepts(Level::Debug));
    }
}
