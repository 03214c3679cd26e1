//! Variable substitution for settings values.
//!
//! A value may reference another entry of the same file as `$name`, the
//! execution directory as `$PATH`, and today's date as `$TIMESTAMP`
//! (`YYYYMMDD`).
//!
//! References are expanded in a single pass with the referenced entry's raw
//! value. Text substituted in is not scanned again, so given
//!
//! ```text
//! a=hello
//! b=$a world
//! c=$b!
//! ```
//!
//! `c` resolves to `$a world!`, not `hello world!`.

use std::path::Path;

use super::parse::RawEntry;
use super::Settings;

/// Values for the builtin `$PATH` and `$TIMESTAMP` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builtins {
    pub path: String,
    pub timestamp: String,
}

impl Builtins {
    /// Builtins for `exe_dir`, stamped with the current local date.
    pub fn now(exe_dir: &Path) -> Self {
        Self {
            path: exe_dir.display().to_string(),
            timestamp: chrono::Local::now().format("%Y%m%d").to_string(),
        }
    }
}

/// Resolves references and cleans up whitespace, producing the final settings.
pub fn resolve(raw: &[RawEntry], builtins: &Builtins) -> Settings {
    let entries = raw
        .iter()
        .map(|entry| {
            let mut value = entry.value.clone();

            if value.contains('$') {
                value = substitute_references(&value, &entry.name, raw);
            }
            if value.contains('$') {
                value = value
                    .replace("$PATH", &builtins.path)
                    .replace("$TIMESTAMP", &builtins.timestamp);
            }

            let value = value.replace(['\n', '\r', '\t'], " ");
            (entry.name.clone(), value.trim().to_owned())
        })
        .collect();

    Settings::from_entries(entries)
}

/// Replaces `$name` with the raw value of entry `name`.
///
/// At each `$` the longest entry name that matches wins. An entry never
/// substitutes into itself, and unknown references are left as they are.
fn substitute_references(value: &str, own_name: &str, raw: &[RawEntry]) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let target = raw
            .iter()
            .filter(|e| e.name != own_name && after.starts_with(e.name.as_str()))
            .max_by_key(|e| e.name.len());

        match target {
            Some(entry) => {
                result.push_str(&entry.value);
                rest = &after[entry.name.len()..];
            }
            None => {
                result.push('$');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}
