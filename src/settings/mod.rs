//! Loading, resolving and persisting `name=value` settings files.

mod error;
pub(crate) mod file;
mod parse;
mod persist;
mod resolve;
mod resolved;
mod typed;

use std::path::Path;

pub use error::SettingsError;
pub use parse::{parse_lines, RawEntry};
pub use persist::persist_line;
pub use resolve::{resolve, Builtins};
pub use resolved::Settings;

/// Locates, reads, parses and resolves a settings file.
///
/// `path` is tried as given, then relative to `exe_dir`, which is also the
/// value of `$PATH`.
pub fn load(path: &Path, exe_dir: &Path) -> Result<Settings, SettingsError> {
    let path = file::locate(path, exe_dir)?;
    let lines = file::read_lines(&path)?;
    let raw = parse_lines(&lines, &path)?;
    let settings = resolve(&raw, &Builtins::now(exe_dir));

    tracing::debug!(path = %path.display(), entries = settings.len(), "loaded settings");
    Ok(settings)
}

impl Settings {
    /// Parses and resolves settings from text.
    ///
    /// `$PATH` expands to the directory of the running executable.
    pub fn parse_str(text: &str) -> Result<Self, SettingsError> {
        let raw = parse_lines(text.lines(), Path::new("<string>"))?;
        Ok(resolve(&raw, &Builtins::now(&file::exe_dir())))
    }
}
