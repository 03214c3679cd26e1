use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("invalid number for '{key}': '{value}' is not a valid {expected}")]
    InvalidNumberFormat {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("invalid boolean for '{key}': expected 'true' or 'false', got '{value}'")]
    InvalidBoolean { key: String, value: String },

    #[error("invalid value for '{key}': '{value}' is not a member of {type_name} {variants:?}")]
    InvalidEnumValue {
        key: String,
        value: String,
        type_name: &'static str,
        variants: &'static [&'static str],
    },

    #[error("invalid date for '{key}': '{value}'")]
    InvalidDateFormat { key: String, value: String },

    #[error("setting '{key}' does not match any field")]
    UnmatchedSetting { key: String },
}
