//! Configuration error types.

/// Errors that can occur when loading, saving, parsing or validating
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A value is out of range. Carries the offending setting's path.
    #[error("invalid setting `{setting}`: {reason}")]
    Invalid { setting: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(setting: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            setting,
            reason: reason.to_string(),
        }
    }
}
