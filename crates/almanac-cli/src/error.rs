use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] almanac_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_usage_errors() {
        let error = CliError::from(almanac_core::ValidationError::InvalidConfig {
            key: "ALMANAC_ADAPTER_TIMEOUT_MS",
            value: String::from("soon"),
        });
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("ALMANAC_ADAPTER_TIMEOUT_MS"));
    }
}
