//! Restricting the permissions of log files.
use std::fs::File;
use std::io;

/// Sets the mode of a log file to `600`.
///
/// This ensures the log files are not world-readable.
#[cfg(unix)]
pub fn restrict_file_permissions(file: File) -> io::Result<File> {
    use std::os::unix::fs::PermissionsExt;
    let mut perm = file.metadata()?.permissions();
    perm.set_mode(0o600);
    file.set_permissions(perm)?;
    Ok(file)
}

/// Leaves the permissions unchanged on platforms without Unix file modes.
#[cfg(not(unix))]
pub fn restrict_file_permissions(file: File) -> io::Result<File> {
    Ok(file)
}
