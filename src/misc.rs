use crate::error::ErrorKind;
use crate::logger::Logger;
use crate::types::{SourceLocation, TimeZone};
use crate::Result;
use slog::Record;
use slog_scope::GlobalLoggerGuard;
use std::fmt;
use trackable::error::ErrorKindExt;

/// Sets the logger for the log records emitted via `log` crate.
///
/// Records emitted through the `log` macros are routed to `logger` (and its
/// handlers) until the returned guard is dropped.
pub fn set_stdlog_logger(logger: &Logger) -> Result<GlobalLoggerGuard> {
    let guard = slog_scope::set_global_logger(slog::Logger::clone(logger));
    track!(slog_stdlog::init().map_err(|e| ErrorKind::Other.cause(e)))?;
    Ok(guard)
}

/// Writes the current time as `YYYY-MM-DD hh:mm:ss,mmm`.
pub fn write_timestamp(f: &mut dyn fmt::Write, timezone: TimeZone) -> fmt::Result {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
    match timezone {
        TimeZone::Utc => write!(f, "{}", chrono::Utc::now().format(FORMAT)),
        TimeZone::Local => write!(f, "{}", chrono::Local::now().format(FORMAT)),
    }
}

/// Writes ` [module:function:line]` (or a shorter variant) for `record`.
pub fn write_source_location(
    f: &mut dyn fmt::Write,
    record: &Record,
    location: SourceLocation,
) -> fmt::Result {
    match location {
        SourceLocation::None => Ok(()),
        SourceLocation::ModuleAndLine => write!(f, " [{}:{}]", record.module(), record.line()),
        SourceLocation::ModuleFunctionAndLine if record.function().is_empty() => {
            write!(f, " [{}:{}]", record.module(), record.line())
        }
        SourceLocation::ModuleFunctionAndLine => write!(
            f,
            " [{}:{}:{}]",
            record.module(),
            record.function(),
            record.line()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::memory_handler;
    use crate::types::Severity;

    #[test]
    fn log_facade_records_reach_the_logger() {
        let logger = Logger::new("misc-tests-stdlog", "info").unwrap();
        let (handler, sink) = memory_handler("mem", Severity::Debug);
        logger.add_handler(handler);

        let _guard = set_stdlog_logger(&logger).unwrap();
        log::warn!("from the log facade");
        log::debug!("below the logger level");
        assert_eq!(sink.messages(), vec!["from the log facade"]);
    }

    #[test]
    fn timestamp_layout() {
        let mut s = String::new();
        write_timestamp(&mut s, TimeZone::Utc).unwrap();
        // e.g. "2024-01-31 23:59:59,123"
        assert_eq!(s.len(), 23);
        assert_eq!(&s[19..20], ",");
    }
}
