//! Error types for the assetledger library.
//!
//! This module provides strongly-typed errors for all public APIs in assetledger.
//! It follows a hybrid approach:
//!
//! - **Concern-specific errors** for fine-grained handling ([`ValidationError`],
//!   [`RemoteError`], [`RemoteCallError`], [`ConfigError`])
//! - **Unified error type** ([`LedgerError`]) returned by every façade operation
//!
//! # Architecture
//!
//! - [`ValidationError`] - An argument failed its shape check; raised before any
//!   cache lookup or network access
//! - [`RemoteError`] - Native failure of the remote ledger surface
//! - [`RemoteCallError`] - A remote failure (or elapsed deadline) normalized with
//!   the operation prefix; never cached
//! - [`ConfigError`] - Environment / provider construction failures
//!
//! # Examples
//!
//! ```rust,ignore
//! use assetledger::{LedgerClient, LedgerError};
//!
//! async fn example(client: &LedgerClient<impl assetledger::LedgerRemote>) {
//!     match client.get_details("42").await {
//!         Ok(details) => println!("Owner: {}", details.owner),
//!         Err(LedgerError::Validation { source, .. }) => {
//!             eprintln!("Fix the input: {}", source);
//!         }
//!         Err(LedgerError::Remote(err)) if err.is_timeout() => {
//!             eprintln!("Ledger too slow, try again: {}", err);
//!         }
//!         Err(e) => eprintln!("Other error: {}", e),
//!     }
//! }
//! ```

mod config;
mod remote;
mod validation;

pub use config::ConfigError;
pub use remote::{RemoteCallError, RemoteError};
pub use validation::{ValidationError, ValidationKind};

/// Unified error type for façade operations.
///
/// Every variant names the logical operation (its prefix) and the proximate
/// cause, so callers never need to understand the remote surface's native
/// error shape.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An argument failed validation; the remote surface was not touched.
    #[error("{prefix}: {source}")]
    Validation {
        /// Operation prefix the call was issued under
        prefix: String,
        /// The validation failure
        #[source]
        source: ValidationError,
    },

    /// The remote call failed or timed out.
    #[error(transparent)]
    Remote(#[from] RemoteCallError),

    /// The remote surface answered with a response of the wrong shape for the
    /// operation.
    #[error("{prefix}: unexpected response, expected {expected}")]
    UnexpectedResponse {
        /// Operation prefix the call was issued under
        prefix: String,
        /// Name of the response shape the operation expects
        expected: &'static str,
    },
}

impl LedgerError {
    /// Helper to create a `Validation` error.
    pub fn validation(prefix: impl Into<String>, source: ValidationError) -> Self {
        LedgerError::Validation {
            prefix: prefix.into(),
            source,
        }
    }

    /// Helper to create an `UnexpectedResponse` error.
    pub fn unexpected_response(prefix: impl Into<String>, expected: &'static str) -> Self {
        LedgerError::UnexpectedResponse {
            prefix: prefix.into(),
            expected,
        }
    }

    /// Returns the operation prefix this error was raised under.
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self {
            Self::Validation { prefix, .. } | Self::UnexpectedResponse { prefix, .. } => prefix,
            Self::Remote(err) => err.prefix(),
        }
    }

    /// Returns true if the call was rejected by validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the remote call error, if the call reached the remote stage.
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteCallError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}
