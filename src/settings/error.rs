use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("settings file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "key '{name}' appears more than once in '{path}'; \
         check for a setting that was accidentally uncommented"
    )]
    DuplicateKey { path: PathBuf, name: String },

    #[error("setting '{name}' is used both as a plain key and as a list")]
    ListConflict { name: String },

    #[error("failed to deserialize settings: {0}")]
    DeserializeError(#[from] serde::de::value::Error),
}
