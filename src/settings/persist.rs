//! In-place updates of single settings.

use std::path::Path;

use super::{file, SettingsError};

/// Rewrites the first line starting with `name=` to `name=value`.
///
/// Every other byte of the file is kept, including line terminators. Returns
/// `Ok(false)` without writing when no line starts with `name=`. Continuation
/// lines that followed the old value are left in place.
pub fn persist_line(path: &Path, name: &str, value: &str) -> Result<bool, SettingsError> {
    if !path.is_file() {
        return Err(SettingsError::FileNotFound(path.to_path_buf()));
    }

    let contents = file::read_to_string(path)?;
    let prefix = format!("{name}=");
    let mut output = String::with_capacity(contents.len() + value.len());
    let mut updated = false;

    for line in contents.split_inclusive('\n') {
        if !updated && line.starts_with(&prefix) {
            output.push_str(&prefix);
            output.push_str(value);
            output.push_str(line_ending(line));
            updated = true;
        } else {
            output.push_str(line);
        }
    }

    if updated {
        file::write(path, &output)?;
    }
    tracing::debug!(path = %path.display(), name, updated, "persist setting");

    Ok(updated)
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_rewrites_matching_line() {
        let file = file_with("# settings\r\nx=1\r\n\ty = spaced\ny=2");

        assert!(persist_line(file.path(), "x", "42").unwrap());
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "# settings\r\nx=42\r\n\ty = spaced\ny=2");
    }

    #[test]
    fn test_only_first_match() {
        let file = file_with("x=1\nx=2\n");

        assert!(persist_line(file.path(), "x", "9").unwrap());
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "x=9\nx=2\n");
    }

    #[test]
    fn test_last_line_without_terminator() {
        let file = file_with("a=1\nb=2");

        assert!(persist_line(file.path(), "b", "3").unwrap());
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "a=1\nb=3");
    }

    #[test]
    fn test_prefix_must_include_equals() {
        let file = file_with("xy=1\nx =2\n");

        assert!(!persist_line(file.path(), "x", "3").unwrap());
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "xy=1\nx =2\n");
    }

    #[test]
    fn test_missing_file() {
        let result = persist_line(Path::new("/nonexistent/config.properties"), "x", "1");
        assert!(matches!(result, Err(SettingsError::FileNotFound(_))));
    }
}
