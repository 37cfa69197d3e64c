//! Error types for calls against the remote ledger.
//!
//! [`RemoteError`] is the native failure shape of a [`LedgerRemote`](crate::LedgerRemote)
//! implementation. The façade never hands it to callers directly: every failure
//! is normalized into a [`RemoteCallError`] that carries the operation prefix.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::TxHash;

/// Errors produced by the remote ledger surface.
///
/// This error type captures the failure modes of talking to the asset ledger
/// contract. It includes the contract method being called to aid in debugging.
///
/// # Examples
///
/// ```rust
/// use assetledger::RemoteError;
///
/// let error = RemoteError::rejected("approveAssetTransfer", "caller is not the recipient");
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The contract call or transaction submission failed.
    ///
    /// Covers transport failures, reverts during `eth_call` or gas estimation,
    /// and ABI decoding errors reported by the contract binding.
    #[error("contract call {method} failed: {source}")]
    Contract {
        /// Contract method that was called
        method: &'static str,
        /// The underlying contract binding error
        #[source]
        source: alloy_contract::Error,
    },

    /// A submitted transaction could not be confirmed.
    #[error("transaction {tx_hash} was not confirmed: {source}")]
    Confirmation {
        /// Hash of the submitted transaction
        tx_hash: TxHash,
        /// The underlying watcher error
        #[source]
        source: alloy_provider::PendingTransactionError,
    },

    /// A submitted transaction was mined but reverted.
    #[error("transaction {tx_hash} for {method} reverted")]
    Reverted {
        /// Contract method the transaction invoked
        method: &'static str,
        /// Hash of the reverted transaction
        tx_hash: TxHash,
    },

    /// The remote side refused the request.
    #[error("{method} rejected: {reason}")]
    Rejected {
        /// Contract method that was called
        method: &'static str,
        /// Reason reported by the remote side
        reason: String,
    },

    /// The request never reached the remote side, or its answer never came back.
    #[error("{method} transport failure: {source}")]
    Transport {
        /// Contract method that was called
        method: &'static str,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RemoteError {
    /// Helper to create a `Contract` error.
    pub fn contract(method: &'static str, source: alloy_contract::Error) -> Self {
        RemoteError::Contract { method, source }
    }

    /// Helper to create a `Rejected` error.
    pub fn rejected(method: &'static str, reason: impl Into<String>) -> Self {
        RemoteError::Rejected {
            method,
            reason: reason.into(),
        }
    }

    /// Helper to create a `Transport` error from any error type.
    pub fn transport(
        method: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RemoteError::Transport {
            method,
            source: Box::new(source),
        }
    }
}

/// Normalized failure of a façade call that reached the remote stage.
///
/// Cloneable so every caller sharing an in-flight call receives the same error.
/// The original [`RemoteError`] stays reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteCallError {
    /// The remote operation failed in any of its phases.
    #[error("{prefix}: {source}")]
    Failed {
        /// Operation prefix the call was issued under
        prefix: String,
        /// The remote surface's own error
        #[source]
        source: Arc<RemoteError>,
    },

    /// The remote operation did not resolve before the deadline.
    #[error("{prefix}: remote call timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Operation prefix the call was issued under
        prefix: String,
        /// The deadline that elapsed
        timeout: Duration,
    },
}

impl RemoteCallError {
    /// Wrap a remote failure with the operation prefix.
    pub fn failed(prefix: impl Into<String>, source: RemoteError) -> Self {
        RemoteCallError::Failed {
            prefix: prefix.into(),
            source: Arc::new(source),
        }
    }

    /// Create a `Timeout` error for the given prefix.
    pub fn timeout(prefix: impl Into<String>, timeout: Duration) -> Self {
        RemoteCallError::Timeout {
            prefix: prefix.into(),
            timeout,
        }
    }

    /// Returns the operation prefix the call was issued under.
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self {
            Self::Failed { prefix, .. } | Self::Timeout { prefix, .. } => prefix,
        }
    }

    /// Returns true if the call failed because its deadline elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the remote surface's error, if the call got an answer at all.
    #[must_use]
    pub fn remote_error(&self) -> Option<&RemoteError> {
        match self {
            Self::Failed { source, .. } => Some(source.as_ref()),
            Self::Timeout { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_failed_keeps_prefix_and_cause() {
        let err = RemoteCallError::failed(
            "create",
            RemoteError::rejected("createAsset", "not authorized"),
        );

        assert_eq!(err.prefix(), "create");
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "create: createAsset rejected: not authorized");

        let source = err.source().expect("source should be kept");
        assert_eq!(source.to_string(), "createAsset rejected: not authorized");
    }

    #[test]
    fn test_timeout_display() {
        let err = RemoteCallError::timeout("assetDetails", Duration::from_millis(250));
        assert!(err.is_timeout());
        assert!(err.remote_error().is_none());
        assert_eq!(err.to_string(), "assetDetails: remote call timed out after 250ms");
    }

    #[test]
    fn test_transport_helper_boxes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = RemoteError::transport("listAssetsOwned", io);
        assert!(err.to_string().contains("connection refused"));
        assert!(err.source().is_some());
    }
}
