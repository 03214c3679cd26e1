use crate::bind::BindError;
use crate::settings::SettingsError;
use thiserror::Error;

/// Top-level error type for the propbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("binding error: {0}")]
    Bind(#[from] BindError),
}
