// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Asset ledger record types

use std::fmt;
use std::num::NonZeroU32;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Identifier of a record in the asset ledger
///
/// The contract stores ids as `uint32` and never hands out id zero, so the
/// inner value is non-zero by construction. Build one through
/// [`Validator::validate_id`](crate::Validator::validate_id) when the id comes
/// from user input.
///
/// # Examples
///
/// ```
/// use assetledger::AssetId;
///
/// let id = AssetId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(AssetId::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(NonZeroU32);

impl AssetId {
    /// Create an asset id, returning `None` for zero
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Get the raw `uint32` value
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full record for one asset, as returned by `retrieveAssetDetails`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
    /// Raw id echoed back by the contract
    pub id: u32,
    /// Current owner
    pub owner: Address,
    pub name: String,
    pub description: String,
    /// False when the id has never been registered or was removed
    pub exists: bool,
}

/// Short listing entry for one asset, as returned by `listAllAssets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: u32,
    pub owner: Address,
    pub name: String,
}
