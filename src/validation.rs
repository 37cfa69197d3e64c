// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Argument validation for ledger calls
//!
//! Every façade operation runs its arguments through a [`Validator`] before the
//! cache is consulted or the network is touched. Checks parse rather than merely
//! inspect: a passing id check yields an [`AssetId`], a passing address check
//! yields an [`Address`].
//!
//! Outcomes are memoized per `(kind, input)`. A repeated check of the same input
//! does not re-run the predicate; a remembered failure is replayed as
//! [`ValidationError::CachedInvalid`] so callers can tell it apart from a fresh
//! rejection.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::Address;
use tracing::{debug, trace};

use crate::errors::{ValidationError, ValidationKind};
use crate::types::asset::AssetId;

/// Number of hex digits in an account address
const ADDRESS_HEX_LEN: usize = 40;

/// Parse a caller-supplied asset id.
///
/// Accepts a decimal `uint32` with surrounding whitespace. Rejects empty input,
/// anything non-numeric, values out of `uint32` range, and zero.
///
/// # Examples
///
/// ```
/// use assetledger::validation::parse_asset_id;
///
/// assert_eq!(parse_asset_id("42").map(|id| id.get()), Some(42));
/// assert!(parse_asset_id("").is_none());
/// assert!(parse_asset_id("0").is_none());
/// assert!(parse_asset_id("4x2").is_none());
/// ```
pub fn parse_asset_id(input: &str) -> Option<AssetId> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u32>().ok().and_then(AssetId::new)
}

/// Parse a caller-supplied account address.
///
/// The input must be `0x` followed by exactly 40 hex digits. All-lowercase and
/// all-uppercase digits are accepted as-is; mixed case must carry a valid
/// EIP-55 checksum.
///
/// # Examples
///
/// ```
/// use assetledger::validation::parse_address;
///
/// assert!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_some());
/// assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_some());
/// assert!(parse_address("not-an-address").is_none());
/// ```
pub fn parse_address(input: &str) -> Option<Address> {
    let digits = input.strip_prefix("0x")?;
    if digits.len() != ADDRESS_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(input, None).ok()
    } else {
        input.parse().ok()
    }
}

/// Memoizing argument validator
///
/// Holds one outcome table per validation kind. Both predicates are
/// deterministic, so a remembered outcome can never go stale.
///
/// By default the tables grow with every distinct input, including every
/// distinct malformed one. [`with_max_entries`](Self::with_max_entries) caps
/// each table; a full table is cleared before the next outcome is stored, after
/// which previously remembered failures are reported as fresh
/// [`ValidationError::Invalid`] again.
///
/// # Examples
///
/// ```
/// use assetledger::Validator;
///
/// let validator = Validator::new();
///
/// let id = validator.validate_id("7").unwrap();
/// assert_eq!(id.get(), 7);
///
/// assert!(validator.validate_address("0x12").is_err());
/// assert_eq!(validator.cached_outcomes(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    ids: Mutex<HashMap<String, Option<AssetId>>>,
    addresses: Mutex<HashMap<String, Option<Address>>>,
    max_entries: Option<usize>,
}

impl Validator {
    /// Creates a validator with empty outcome tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each outcome table at `max_entries` (at least one)
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries.max(1));
        self
    }

    /// Validate an asset id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] the first time an input is rejected
    /// and [`ValidationError::CachedInvalid`] on every later check of the same
    /// input.
    pub fn validate_id(&self, input: &str) -> Result<AssetId, ValidationError> {
        memoized(&self.ids, self.max_entries, ValidationKind::Id, input, parse_asset_id)
    }

    /// Validate an owner or recipient address.
    ///
    /// # Errors
    ///
    /// Same contract as [`validate_id`](Self::validate_id).
    pub fn validate_address(&self, input: &str) -> Result<Address, ValidationError> {
        memoized(
            &self.addresses,
            self.max_entries,
            ValidationKind::Address,
            input,
            parse_address,
        )
    }

    /// Number of remembered outcomes across all kinds
    pub fn cached_outcomes(&self) -> usize {
        lock(&self.ids).len() + lock(&self.addresses).len()
    }
}

fn memoized<T: Copy>(
    table: &Mutex<HashMap<String, Option<T>>>,
    max_entries: Option<usize>,
    kind: ValidationKind,
    input: &str,
    check: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    let mut table = lock(table);

    if let Some(outcome) = table.get(input) {
        trace!(kind = %kind, input, passed = outcome.is_some(), "Validation cache hit");
        return outcome.ok_or_else(|| ValidationError::invalid(kind, input).into_cached());
    }

    let outcome = check(input);
    if max_entries.is_some_and(|max| table.len() >= max) {
        debug!(kind = %kind, dropped = table.len(), "Validation cache full, clearing");
        table.clear();
    }
    table.insert(input.to_owned(), outcome);
    outcome.ok_or_else(|| ValidationError::invalid(kind, input))
}

/// Outcome tables are plain maps, so a panic while holding the lock cannot
/// leave them half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
