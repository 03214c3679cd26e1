//! Flat `name=value` settings files, resolved once and bound onto your types.
//!
//! ```text
//! # comment
//! firstName=Ada
//! greeting=hello $firstName
//! logDir=$PATH/logs-$TIMESTAMP
//! query=Select a,b
//!    from t
//! sizes.0=10
//! sizes.1=20
//! ```

pub mod bind;
pub mod context;
mod error;
pub mod settings;

pub use bind::{Bind, BindError, Binding, FromSetting, Scalar, Slot};
pub use context::{AppSettings, AppSettingsBuilder, DEFAULT_FILE_NAME};
pub use error::Error;
pub use settings::{Settings, SettingsError};
