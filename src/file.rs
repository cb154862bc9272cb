//! Rotating file handler.
use crate::build::BuilderCommon;
use crate::error::io_error;
use crate::format::{LineFormat, LineFormatConfig};
use crate::handler::{Handler, Sink};
use crate::permissions::restrict_file_permissions;
use crate::types::{LevelSpec, Severity, SourceLocation, TimeZone};
use crate::{Build, Config, Error, ErrorKind, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

const DEFAULT_DIRECTORY: &str = "log";
const DEFAULT_FILENAME: &str = "server.log";
const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_BACKUP_COUNT: usize = 10;

/// A handler builder which builds handlers that write log records to a size-rotated file.
///
/// The directory of the log file (and all of its ancestors) is created if missing.
///
/// # Example
///
/// ```
/// use reqloggers::Build;
/// use reqloggers::file::RotatingFileHandlerBuilder;
///
/// # let dir = tempfile::tempdir().unwrap();
/// let handler = RotatingFileHandlerBuilder::new()
///     .directory(dir.path().join("nested/log"))
///     .filename("app.log")
///     .max_bytes(1024 * 1024)
///     .backup_count(3)
///     .level("warning")
///     .build()
///     .unwrap();
/// assert_eq!(handler.name(), "rfh");
/// ```
#[derive(Debug)]
pub struct RotatingFileHandlerBuilder {
    common: BuilderCommon,
    directory: PathBuf,
    filename: PathBuf,
    mode: FileMode,
    max_bytes: u64,
    backup_count: usize,
    restrict_permissions: bool,
}
impl RotatingFileHandlerBuilder {
    /// Makes a new `RotatingFileHandlerBuilder` instance.
    ///
    /// The defaults are `log/server.log`, append mode, 10 MiB per file, 10
    /// backups, level `INFO` and handler name `rfh`.
    pub fn new() -> Self {
        RotatingFileHandlerBuilder {
            common: BuilderCommon::new("rfh", "INFO"),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            filename: PathBuf::from(DEFAULT_FILENAME),
            mode: FileMode::default(),
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            restrict_permissions: false,
        }
    }

    /// Sets the directory of the log file.
    pub fn directory<P: AsRef<Path>>(&mut self, directory: P) -> &mut Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Sets the name of the log file.
    pub fn filename<P: AsRef<Path>>(&mut self, filename: P) -> &mut Self {
        self.filename = filename.as_ref().to_path_buf();
        self
    }

    /// Sets the mode in which the log file is opened.
    pub fn mode(&mut self, mode: FileMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets the size (in bytes) at which the log file is rotated.
    ///
    /// `0` disables rotation.
    pub fn max_bytes(&mut self, max_bytes: u64) -> &mut Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Sets the number of rotated files to keep.
    ///
    /// `0` disables rotation.
    pub fn backup_count(&mut self, count: usize) -> &mut Self {
        self.backup_count = count;
        self
    }

    /// Restricts the permissions of the log files to `600` (Unix only).
    pub fn restrict_permissions(&mut self, restrict: bool) -> &mut Self {
        self.restrict_permissions = restrict;
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

    /// Returns the path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}
impl Default for RotatingFileHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
impl Build for RotatingFileHandlerBuilder {
    fn build(&self) -> Result<Handler> {
        self.common.build_with_sink(|| {
            track!(RotatingFile::open_with(
                self.path(),
                self.mode,
                self.max_bytes,
                self.backup_count,
                self.restrict_permissions
            ))
        })
    }
}

/// The mode in which a log file is opened.
///
/// # Examples
///
/// ```
/// use reqloggers::file::FileMode;
///
/// assert_eq!(FileMode::default(), FileMode::Append);
/// assert_eq!("w".parse::<FileMode>().ok(), Some(FileMode::Truncate));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Keep the existing content (`"a"`).
    Append,

    /// Discard the existing content when the file is opened (`"w"`).
    Truncate,
}
impl Default for FileMode {
    fn default() -> Self {
        FileMode::Append
    }
}
impl FromStr for FileMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "append" => Ok(FileMode::Append),
            "w" | "truncate" => Ok(FileMode::Truncate),
            _ => track_panic!(ErrorKind::InvalidFileMode, "Undefined file mode: {:?}", s),
        }
    }
}
impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<FileMode>().map_err(D::Error::custom)
    }
}

/// A log file that rotates itself when it grows past a size limit.
///
/// When writing a line would make the file reach `max_bytes`, the file is
/// renamed to `<path>.1` (previous backups shift to `<path>.2`, `<path>.3`,
/// ...; the ones beyond `backup_count` are removed) and a new empty file is
/// opened at `path`. If either `max_bytes` or `backup_count` is zero the file
/// is never rotated.
#[derive(Debug)]
pub struct RotatingFile {
    inner: Mutex<FileAppender>,
}
impl RotatingFile {
    /// Creates the ancestor directories of `path` if needed, then opens the file.
    pub fn open<P: AsRef<Path>>(
        path: P,
        mode: FileMode,
        max_bytes: u64,
        backup_count: usize,
    ) -> Result<Self> {
        track!(Self::open_with(path, mode, max_bytes, backup_count, false))
    }

    pub(crate) fn open_with<P: AsRef<Path>>(
        path: P,
        mode: FileMode,
        max_bytes: u64,
        backup_count: usize,
        restrict_permissions: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            track!(fs::create_dir_all(dir).map_err(io_error), "dir={:?}", dir)?;
        }

        // Appending is required for rotation to be meaningful.
        let mode = if max_bytes > 0 { FileMode::Append } else { mode };
        let mut appender = FileAppender {
            path,
            file: None,
            written: 0,
            mode,
            max_bytes,
            backup_count,
            restrict_permissions,
        };
        track!(appender.reopen().map_err(io_error), "path={:?}", appender.path)?;
        Ok(RotatingFile {
            inner: Mutex::new(appender),
        })
    }

    fn lock(&self) -> MutexGuard<FileAppender> {
        // A poisoned appender is still in a usable state: at worst a line was partially written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
impl Sink for RotatingFile {
    fn emit(&self, _severity: Severity, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.lock().append(&buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

#[derive(Debug)]
struct FileAppender {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    mode: FileMode,
    max_bytes: u64,
    backup_count: usize,
    restrict_permissions: bool,
}
impl FileAppender {
    fn reopen(&mut self) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.create(true);
        match self.mode {
            FileMode::Append => options.append(true),
            FileMode::Truncate => options.write(true).truncate(true),
        };
        let mut file = options.open(&self.path)?;
        if self.restrict_permissions {
            file = restrict_file_permissions(file)?;
        }
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn reopen_if_needed(&mut self) -> io::Result<()> {
        if self.file.is_none() || !self.path.exists() {
            self.mode = FileMode::Append;
            self.reopen()?;
        }
        Ok(())
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && self.written > 0
            && self.written + incoming >= self.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        let oldest = backup_path(&self.path, self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for i in (1..self.backup_count).rev() {
            let from = backup_path(&self.path, i);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, i + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, backup_path(&self.path, 1))?;
        }
        self.reopen()
    }

    fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        self.reopen_if_needed()?;
        if self.should_rotate(buf.len() as u64) {
            self.rotate()?;
        }
        if let Some(ref mut f) = self.file {
            f.write_all(buf)?;
            f.flush()?;
            self.written += buf.len() as u64;
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Cannot open file: {:?}", self.path),
            ))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut f) = self.file {
            f.flush()?;
        }
        Ok(())
    }
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// The configuration of `RotatingFileHandlerBuilder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(default)]
pub struct RotatingFileConfig {
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

    /// Directory of the log file.
    pub directory: PathBuf,

    /// Name of the log file.
    pub filename: PathBuf,

    /// Open mode (`a` or `w`).
    pub mode: FileMode,

    /// Size at which the log file is rotated.
    pub max_bytes: u64,

    /// Number of rotated files to keep.
    pub backup_count: usize,

    /// Whether to restrict the permissions of the log files to `600`.
    pub restrict_permissions: bool,
}
impl RotatingFileConfig {
    /// Creates a new `RotatingFileConfig` with default settings.
    pub fn new() -> Self {
        Default::default()
    }
}
impl Default for RotatingFileConfig {
    fn default() -> Self {
        RotatingFileConfig {
            name: "rfh".to_owned(),
            level: LevelSpec::from("INFO"),
            format: LineFormatConfig::default(),
            source_location: SourceLocation::default(),
            timezone: TimeZone::default(),
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            filename: PathBuf::from(DEFAULT_FILENAME),
            mode: FileMode::default(),
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            restrict_permissions: false,
        }
    }
}
impl Config for RotatingFileConfig {
    type Builder = RotatingFileHandlerBuilder;
    fn try_to_builder(&self) -> Result<Self::Builder> {
        let mut builder = RotatingFileHandlerBuilder::new();
        builder.name(&self.name);
        builder.level(self.level.clone());
        builder.format_arc(self.format.to_format(self.timezone, self.source_location));
        builder.directory(&self.directory);
        builder.filename(&self.filename);
        builder.mode(self.mode);
        builder.max_bytes(self.max_bytes);
        builder.backup_count(self.backup_count);
        builder.restrict_permissions(self.restrict_permissions);
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BasicLineFormat;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let mut builder = RotatingFileHandlerBuilder::new();
        builder.directory(&nested).filename("server.log");

        let handler = builder.build().unwrap();
        assert!(nested.join("server.log").exists());
        assert_eq!(handler.name(), "rfh");
        assert_eq!(handler.level(), Severity::Info);

        // Directory creation is idempotent.
        builder.build().unwrap();
    }

    #[test]
    fn directory_creation_failure_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let e = RotatingFile::open(blocker.join("sub/server.log"), FileMode::Append, 0, 0)
            .err()
            .unwrap();
        assert_eq!(*e.kind(), ErrorKind::Io);
    }

    #[test]
    fn invalid_level_builds_nothing() {
        let dir = TempDir::new().unwrap();
        let e = RotatingFileHandlerBuilder::new()
            .directory(dir.path().join("never"))
            .level("loud")
            .build()
            .err()
            .unwrap();
        assert_eq!(*e.kind(), ErrorKind::InvalidLevel);
        assert!(!dir.path().join("never").exists());
    }

    #[test]
    fn rotates_and_discards_oldest_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rot.log");
        let file = RotatingFile::open(&path, FileMode::Append, 10, 2).unwrap();

        for line in &["first", "second", "third", "fourth"] {
            file.emit(Severity::Info, line).unwrap();
        }

        assert_eq!(read(&path), "fourth\n");
        assert_eq!(read(&backup_path(&path, 1)), "third\n");
        assert_eq!(read(&backup_path(&path, 2)), "second\n");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn keeps_lines_together_below_the_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small.log");
        let file = RotatingFile::open(&path, FileMode::Append, 100, 1).unwrap();

        file.emit(Severity::Info, "one").unwrap();
        file.emit(Severity::Info, "two").unwrap();
        assert_eq!(read(&path), "one\ntwo\n");
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn zero_backup_count_never_rotates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grow.log");
        let file = RotatingFile::open(&path, FileMode::Append, 4, 0).unwrap();

        file.emit(Severity::Info, "aaaa").unwrap();
        file.emit(Severity::Info, "bbbb").unwrap();
        assert_eq!(read(&path), "aaaa\nbbbb\n");
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn open_modes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mode.log");
        fs::write(&path, "old\n").unwrap();

        RotatingFile::open(&path, FileMode::Append, 0, 0)
            .unwrap()
            .emit(Severity::Info, "appended")
            .unwrap();
        assert_eq!(read(&path), "old\nappended\n");

        RotatingFile::open(&path, FileMode::Truncate, 0, 0)
            .unwrap()
            .emit(Severity::Info, "fresh")
            .unwrap();
        assert_eq!(read(&path), "fresh\n");

        // Rotation forces append mode.
        RotatingFile::open(&path, FileMode::Truncate, 1024, 1)
            .unwrap()
            .emit(Severity::Info, "kept")
            .unwrap();
        assert_eq!(read(&path), "fresh\nkept\n");

        assert_eq!(
            *"x".parse::<FileMode>().err().unwrap().kind(),
            ErrorKind::InvalidFileMode
        );
    }

    #[test]
    fn reopens_removed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.log");
        let file = RotatingFile::open(&path, FileMode::Append, 0, 0).unwrap();

        file.emit(Severity::Info, "before").unwrap();
        fs::remove_file(&path).unwrap();
        file.emit(Severity::Info, "after").unwrap();
        assert_eq!(read(&path), "after\n");
    }

    #[cfg(unix)]
    #[test]
    fn restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        RotatingFileHandlerBuilder::new()
            .directory(dir.path())
            .restrict_permissions(true)
            .build()
            .unwrap();
        let mode = fs::metadata(dir.path().join("server.log"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn handler_writes_formatted_lines() {
        let dir = TempDir::new().unwrap();
        let handler = RotatingFileHandlerBuilder::new()
            .directory(dir.path())
            .filename("fmt.log")
            .format(BasicLineFormat)
            .level(Severity::Debug)
            .build()
            .unwrap();

        handler
            .handle(
                "SERVER",
                &record!(slog::Level::Debug, "", &format_args!("hello {}", 42), b!()),
                &o!().into(),
            )
            .unwrap();
        assert_eq!(read(&dir.path().join("fmt.log")), "hello 42\n");
    }

    #[test]
    fn config_defaults() {
        let config: RotatingFileConfig = serdeconv::from_toml_str("").unwrap();
        assert_eq!(config.name, "rfh");
        assert_eq!(config.directory, PathBuf::from("log"));
        assert_eq!(config.filename, PathBuf::from("server.log"));
        assert_eq!(config.max_bytes, 10_485_760);
        assert_eq!(config.backup_count, 10);
        assert_eq!(config.mode, FileMode::Append);
        assert_eq!(config.level.resolve().ok(), Some(Severity::Info));
    }
}
