//! Error types for argument validation.
//!
//! Validation runs before any cache lookup or network access, so these errors
//! are always recoverable by correcting the input.

use std::fmt;

/// The kind of input a validation check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// A ledger asset identifier
    Id,
    /// An owner / recipient account address
    Address,
}

impl ValidationKind {
    /// Returns the short name used in error messages
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when an argument fails its shape check.
///
/// # Examples
///
/// ```rust
/// use assetledger::{ValidationError, Validator};
///
/// let validator = Validator::new();
///
/// let err = validator.validate_id("abc").unwrap_err();
/// assert!(matches!(err, ValidationError::Invalid { .. }));
///
/// // The same input is answered from the validation cache on the next check
/// let err = validator.validate_id("abc").unwrap_err();
/// assert!(err.is_cached());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The input failed the predicate for its kind.
    #[error("invalid {kind}: {input:?}")]
    Invalid {
        /// Which check failed
        kind: ValidationKind,
        /// The rejected input, as supplied by the caller
        input: String,
    },

    /// The input was rejected by an earlier check and the failure was replayed
    /// from the validation cache.
    #[error("invalid {kind}: {input:?} (cached failure)")]
    CachedInvalid {
        /// Which check failed
        kind: ValidationKind,
        /// The rejected input, as supplied by the caller
        input: String,
    },
}

impl ValidationError {
    /// Create an `Invalid` error for the given kind and input.
    pub fn invalid(kind: ValidationKind, input: impl Into<String>) -> Self {
        ValidationError::Invalid {
            kind,
            input: input.into(),
        }
    }

    /// Returns the kind of check that failed.
    #[must_use]
    pub fn kind(&self) -> ValidationKind {
        match self {
            Self::Invalid { kind, .. } | Self::CachedInvalid { kind, .. } => *kind,
        }
    }

    /// Returns true if this failure was replayed from the validation cache.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::CachedInvalid { .. })
    }

    /// Convert a fresh failure into its cached-replay form.
    pub(crate) fn into_cached(self) -> Self {
        match self {
            Self::Invalid { kind, input } | Self::CachedInvalid { kind, input } => {
                Self::CachedInvalid { kind, input }
            }
        }
    }
}
