//! Whole-file access to settings files.

use std::path::{Path, PathBuf};

use super::SettingsError;

/// Directory containing the running executable.
///
/// Falls back to the working directory when the executable path is unknown.
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Finds a settings file.
///
/// The path is tried as given first. When nothing exists there, it is retried
/// relative to `exe_dir`. An absolute `path` joined onto `exe_dir` is just
/// `path` again, so absolute paths effectively get a single attempt.
pub fn locate(path: &Path, exe_dir: &Path) -> Result<PathBuf, SettingsError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let fallback = exe_dir.join(path);
    if fallback.is_file() {
        return Ok(fallback);
    }

    Err(SettingsError::FileNotFound(fallback))
}

/// Reads a file into lines, without line terminators.
pub fn read_lines(path: &Path) -> Result<Vec<String>, SettingsError> {
    Ok(read_to_string(path)?.lines().map(str::to_owned).collect())
}

/// Reads a whole file, mapping a missing file to [`SettingsError::FileNotFound`].
pub fn read_to_string(path: &Path) -> Result<String, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SettingsError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Replaces the whole contents of a file.
pub fn write(path: &Path, contents: &str) -> Result<(), SettingsError> {
    std::fs::write(path, contents).map_err(|e| SettingsError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
