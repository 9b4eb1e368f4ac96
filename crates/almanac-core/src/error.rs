use thiserror::Error;

/// Validation and contract errors exposed by `almanac-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "invalid category '{value}', expected one of congressional, economic, judicial, regulatory, all"
    )]
    InvalidCategory { value: String },
    #[error(
        "invalid source '{value}', expected one of congress, fred, treasury, courtlistener, regulations"
    )]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("record field '{field}' cannot be empty")]
    EmptyRecordField { field: &'static str },
    #[error("record id '{id}' must start with a source tag")]
    UntaggedRecordId { id: String },

    #[error("configuration value '{key}' is invalid: '{value}'")]
    InvalidConfig { key: &'static str, value: String },
}
