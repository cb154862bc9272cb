//! Ways to format a log record into a single line of text.
//!
//! See [`LineFormat`] for more details.
//!
//! [`LineFormat`]: trait.LineFormat.html
use crate::misc;
use crate::types::{Severity, SourceLocation, TimeZone};
use serde::{Deserialize, Serialize};
use slog::{OwnedKVList, Record, KV};
use std::cell::Cell;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

/// A way to format log records, together with the name of the emitting logger, into lines.
pub trait LineFormat: Sync + Send + Debug {
    /// Formats a log record into the given `Formatter`.
    ///
    /// Note that this method returns `slog::Result`, not `std::fmt::Result`.
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result;

    /// Formats a log record into a new `String`.
    fn to_string(
        &self,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result<String> {
        struct ClosureAsDisplay<F: Fn(&mut fmt::Formatter) -> fmt::Result>(F);
        impl<F: Fn(&mut fmt::Formatter) -> fmt::Result> Display for ClosureAsDisplay<F> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.0(f)
            }
        }

        // `Display::fmt` only gets `&self`, so the error is smuggled out through a `Cell`.
        let result: Cell<Option<slog::Error>> = Cell::new(None);
        let s = ClosureAsDisplay(|f| {
            if let Err(e) = LineFormat::fmt(self, f, logger, record, values) {
                result.set(Some(e));
            }
            Ok(())
        })
        .to_string();

        if let Some(e) = result.take() {
            Err(e)
        } else {
            Ok(s)
        }
    }
}

impl<T: LineFormat + ?Sized> LineFormat for &T {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result {
        LineFormat::fmt(&**self, f, logger, record, values)
    }
}

impl<T: LineFormat + ?Sized> LineFormat for Box<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result {
        LineFormat::fmt(&**self, f, logger, record, values)
    }
}

impl<T: LineFormat + ?Sized> LineFormat for Arc<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result {
        LineFormat::fmt(&**self, f, logger, record, values)
    }
}

/// A [`LineFormat`] that writes only the [`msg`] part of a log [`Record`].
///
/// [`msg`]: https://docs.rs/slog/2/slog/struct.Record.html#method.msg
/// [`LineFormat`]: trait.LineFormat.html
/// [`Record`]: https://docs.rs/slog/2/slog/struct.Record.html
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicLineFormat;
impl LineFormat for BasicLineFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        _: &str,
        record: &Record,
        _: &OwnedKVList,
    ) -> slog::Result {
        write!(f, "{}", record.msg())?;
        Ok(())
    }
}

/// A [`LineFormat`] implementation that calls a closure to perform the
/// formatting.
///
/// # Example
///
/// ```
/// use reqloggers::Build;
/// use reqloggers::format::CustomLineFormat;
/// use reqloggers::null::NullHandlerBuilder;
///
/// let handler = NullHandlerBuilder::new()
///     .format(CustomLineFormat(|f, logger, record, _| {
///         write!(f, "{}: {}", logger, record.msg())?;
///         Ok(())
///     }))
///     .build()
///     .unwrap();
/// # let _ = handler;
/// ```
///
/// [`LineFormat`]: trait.LineFormat.html
pub struct CustomLineFormat<
    T: Fn(&mut fmt::Formatter, &str, &Record, &OwnedKVList) -> slog::Result + Send + Sync,
>(pub T);
impl<T: Fn(&mut fmt::Formatter, &str, &Record, &OwnedKVList) -> slog::Result + Send + Sync>
    LineFormat for CustomLineFormat<T>
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result {
        self.0(f, logger, record, values)
    }
}
impl<T: Fn(&mut fmt::Formatter, &str, &Record, &OwnedKVList) -> slog::Result + Send + Sync> Debug
    for CustomLineFormat<T>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomLineFormat").finish()
    }
}

/// Copies input to output, escaping `\`, `"` and `]` the way RFC 5424 PARAM-VALUEs are escaped.
struct ValueEscaper<W: fmt::Write>(W);

impl<W: fmt::Write> fmt::Write for ValueEscaper<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(index) = rest.find(|c| c == '\\' || c == '"' || c == ']') {
            self.0.write_str(&rest[..index])?;
            // All three delimiters are ASCII, so `index + 1` is a char boundary.
            self.write_char(rest.as_bytes()[index] as char)?;
            rest = &rest[(index + 1)..];
        }
        self.0.write_str(rest)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        match c {
            '\\' => self.0.write_str(r"\\"),
            '"' => self.0.write_str("\\\""),
            ']' => self.0.write_str("\\]"),
            _ => self.0.write_char(c),
        }
    }
}

/// The default [`LineFormat`].
///
/// Produces lines of the form
/// `<timestamp> - <logger> - <LEVEL> - <message> [<module>:<function>:<line>]`.
/// Key-value pairs of the record, if any, are placed between the message and
/// the source location as ` [key1="value1" key2="value2"]`.
///
/// The slog logging macros do not record the enclosing function, so records
/// emitted through them end with `[<module>:<line>]`. The function part only
/// appears for records that carry a function name.
///
/// [`LineFormat`]: trait.LineFormat.html
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultLineFormat {
    timezone: TimeZone,
    source_location: SourceLocation,
}
impl DefaultLineFormat {
    /// Makes a new `DefaultLineFormat` instance.
    pub fn new(timezone: TimeZone, source_location: SourceLocation) -> Self {
        DefaultLineFormat {
            timezone,
            source_location,
        }
    }
}
impl LineFormat for DefaultLineFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
        logger: &str,
        record: &Record,
        values: &OwnedKVList,
    ) -> slog::Result {
        struct SerializerImpl<'a, 'b> {
            f: &'a mut fmt::Formatter<'b>,
            is_first_kv: bool,
        }

        impl<'a, 'b> SerializerImpl<'a, 'b> {
            fn finish(&mut self) -> slog::Result {
                if !self.is_first_kv {
                    write!(self.f, "]")?;
                }
                Ok(())
            }
        }

        impl<'a, 'b> slog::Serializer for SerializerImpl<'a, 'b> {
            fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
                use std::fmt::Write;

                self.f.write_str(if self.is_first_kv { " [" } else { " " })?;
                self.is_first_kv = false;
                write!(self.f, "{}=\"", key)?;
                write!(ValueEscaper(&mut self.f), "{}", val)?;
                self.f.write_char('"')?;
                Ok(())
            }
        }

        misc::write_timestamp(f, self.timezone)?;
        write!(
            f,
            " - {} - {} - {}",
            logger,
            Severity::from_level(record.level()),
            record.msg()
        )?;
        {
            let mut serializer = SerializerImpl {
                f: &mut *f,
                is_first_kv: true,
            };
            record.kv().serialize(record, &mut serializer)?;
            values.serialize(record, &mut serializer)?;
            serializer.finish()?;
        }
        misc::write_source_location(f, record, self.source_location)?;
        Ok(())
    }
}

/// Enumeration of built-in `LineFormat`s, for use with serde.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum LineFormatConfig {
    /// [`DefaultLineFormat`](struct.DefaultLineFormat.html).
    Default,

    /// [`BasicLineFormat`](struct.BasicLineFormat.html).
    Basic,
}
impl Default for LineFormatConfig {
    fn default() -> Self {
        LineFormatConfig::Default
    }
}
impl LineFormatConfig {
    /// Makes the format described by this configuration.
    pub fn to_format(
        &self,
        timezone: TimeZone,
        source_location: SourceLocation,
    ) -> Arc<dyn LineFormat> {
        match *self {
            LineFormatConfig::Default => {
                Arc::new(DefaultLineFormat::new(timezone, source_location))
            }
            LineFormatConfig::Basic => Arc::new(BasicLineFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{Level, RecordLocation, RecordStatic};

    fn escape(input: &str) -> String {
        let mut e = ValueEscaper(String::new());
        fmt::Write::write_str(&mut e, input).unwrap();
        e.0
    }

    #[test]
    fn value_escaper_escapes_delimiters() {
        assert_eq!(escape(""), "");
        assert_eq!(escape("foo"), "foo");
        assert_eq!(escape("[foo]"), "[foo\\]");
        assert_eq!(escape("\\\"]"), "\\\\\\\"\\]");
        assert_eq!(escape("a\"b\"c"), "a\\\"b\\\"c");
    }

    #[test]
    fn default_line_format() {
        let format = DefaultLineFormat::new(TimeZone::Utc, SourceLocation::ModuleAndLine);
        let line = format
            .to_string(
                "SERVER",
                &record!(
                    Level::Warning,
                    "",
                    &format_args!("disk {} almost full", "/var"),
                    b!("used" => "97%")
                ),
                &o!().into(),
            )
            .expect("formatting failed");

        let (timestamp, rest) = line.split_at(23);
        assert_eq!(timestamp.as_bytes()[4], b'-');
        assert_eq!(timestamp.as_bytes()[19], b',');
        assert!(rest.starts_with(" - SERVER - WARNING - disk /var almost full [used=\"97%\"] ["));
        assert!(rest.contains(&format!("] [{}:", module_path!())), "{}", line);
        assert!(rest.ends_with(']'));
    }

    #[test]
    fn macro_records_have_no_function_name() {
        let line = DefaultLineFormat::default()
            .to_string(
                "app",
                &record!(Level::Info, "", &format_args!("hello"), b!()),
                &o!().into(),
            )
            .unwrap();
        let location = &line[line.rfind(" [").unwrap()..];
        assert!(location.starts_with(&format!(" [{}:", module_path!())), "{}", line);

        let line_number = &location[module_path!().len() + 3..location.len() - 1];
        assert!(line_number.parse::<u32>().is_ok(), "{}", line);
    }

    #[test]
    fn function_name_is_written_when_present() {
        static RECORD: RecordStatic<'static> = RecordStatic {
            location: &RecordLocation {
                file: "api.rs",
                line: 7,
                column: 1,
                function: "handle",
                module: "app::api",
            },
            level: Level::Info,
            tag: "",
        };
        fn format_with(format: DefaultLineFormat) -> String {
            format
                .to_string(
                    "app",
                    &Record::new(&RECORD, &format_args!("served"), b!()),
                    &o!().into(),
                )
                .unwrap()
        }

        let line = format_with(DefaultLineFormat::default());
        assert!(line.ends_with(" - app - INFO - served [app::api:handle:7]"), "{}", line);

        let line = format_with(DefaultLineFormat::new(
            TimeZone::Utc,
            SourceLocation::ModuleAndLine,
        ));
        assert!(line.ends_with(" [app::api:7]"), "{}", line);
    }

    #[test]
    fn default_line_format_without_location() {
        let format = DefaultLineFormat::new(TimeZone::Local, SourceLocation::None);
        let line = format
            .to_string(
                "app",
                &record!(Level::Info, "", &format_args!("hello"), b!()),
                &o!("request" => 7).into(),
            )
            .unwrap();
        assert!(line.ends_with(" - app - INFO - hello [request=\"7\"]"), "{}", line);
    }

    #[test]
    fn basic_and_custom_formats() {
        fn format_with(format: &dyn LineFormat) -> slog::Result<String> {
            format.to_string(
                "x",
                &record!(Level::Error, "", &format_args!("boom"), b!("k" => 1)),
                &o!().into(),
            )
        }
        assert_eq!(format_with(&BasicLineFormat).unwrap(), "boom");

        let custom = CustomLineFormat(|f, logger, record, _| {
            write!(f, "{}|{}", logger, record.msg())?;
            Ok(())
        });
        assert_eq!(format_with(&custom).unwrap(), "x|boom");

        let failing = CustomLineFormat(|_, _, _, _| Err(slog::Error::Other));
        assert!(format_with(&failing).is_err());
    }
}
