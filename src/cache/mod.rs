// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Result caching for ledger calls.
//!
//! This module provides the structured [`CacheKey`] the façade derives for
//! every call, and [`CallCache`], the memoizing table that guarantees at most
//! one remote call per key:
//!
//! - a completed success is stored and served to every later caller
//! - a call still in flight is shared with every concurrent caller for the key
//! - a failure is handed to everyone waiting on it and then forgotten

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

mod memo;

pub use memo::{CallCache, Lookup, LookupSource, Pending};

/// One typed argument of a cache key
///
/// Arguments keep their type inside the key, so `Id(7)` and `Text("7")` are
/// different parts and no value can smuggle a separator into the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// An asset id
    Id(u32),
    /// An account address (canonical, case-insensitive)
    Address(Address),
    /// Free text such as an asset name
    Text(String),
}

impl fmt::Display for KeyPart {
    /// Length-prefixed text so the rendered key stays unambiguous in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Address(address) => write!(f, "addr:{address}"),
            Self::Text(text) => write!(f, "text[{}]:{text}", text.len()),
        }
    }
}

/// Key for caching the result of one ledger call
///
/// Derived from the operation prefix, the remote method and the ordered,
/// already-validated arguments. Two calls map to the same key exactly when all
/// three are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub(crate) prefix: String,
    pub(crate) method: &'static str,
    pub(crate) args: Vec<KeyPart>,
}

impl CacheKey {
    /// Creates a new cache key
    pub fn new(prefix: impl Into<String>, method: &'static str, args: Vec<KeyPart>) -> Self {
        Self {
            prefix: prefix.into(),
            method,
            args,
        }
    }

    /// Operation prefix this key was derived from
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Remote method this key was derived from
    pub fn method(&self) -> &'static str {
        self.method
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}(", self.prefix, self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of calls answered from a stored result
    pub hits: u64,
    /// Number of calls that started a remote call
    pub misses: u64,
    /// Number of calls that joined a remote call already in flight
    pub joined: u64,
    /// Number of remote calls that failed (and were not cached)
    pub failures: u64,
    /// Number of entries evicted due to size limits
    pub evictions: u64,
    /// Current number of stored results
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    ///
    /// Joined calls count as hits: they did not cost a remote call.
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.joined;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            (served as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, joined={}, failures={}, evictions={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.joined,
            self.failures,
            self.evictions,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Monotonic sequence number for deterministic LRU ordering
///
/// Lower sequence numbers are considered older.
///
/// # Examples
///
/// ```
/// use assetledger::cache::AccessSequence;
///
/// let seq1 = AccessSequence::default();
/// let seq2 = seq1.next();
/// assert!(seq1 < seq2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessSequence(u64);

impl AccessSequence {
    /// Returns the next sequence number
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}
