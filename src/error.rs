use std::io;
use trackable::error::ErrorKind as TrackableErrorKind;
use trackable::error::{ErrorKindExt, TrackableError};

/// The error type for this crate.
pub type Error = TrackableError<ErrorKind>;

/// A list of error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Unrecognized severity name.
    InvalidLevel,

    /// Unrecognized syslog transport name (neither TCP nor UDP).
    InvalidSocketType,

    /// Unrecognized syslog facility name.
    InvalidFacility,

    /// Unrecognized file open mode.
    InvalidFileMode,

    /// A caller supplied logger could not be used by the middleware.
    InvalidLoggerInput,

    /// Directory creation or file open failure.
    Io,

    /// Other invalid input.
    Invalid,

    /// Unknown error.
    Other,
}
impl TrackableErrorKind for ErrorKind {}

pub(crate) fn io_error(e: io::Error) -> Error {
    ErrorKind::Io.cause(e)
}
