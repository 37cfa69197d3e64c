//! Error types for configuration loading and provider construction.

/// Errors that can occur while reading configuration or building providers
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing environment variable {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable is present but cannot be parsed
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// Name of the offending variable
        var: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Invalid RPC URL format
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, #[source] url::ParseError),

    /// The signing credential is not a valid private key
    #[error("Invalid signing key: {0}")]
    InvalidSigner(#[source] alloy_signer_local::LocalSignerError),
}

impl ConfigError {
    /// Helper to create an `InvalidValue` error.
    pub fn invalid_value(var: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            var,
            reason: reason.into(),
        }
    }
}
