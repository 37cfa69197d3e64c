// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The enumerated set of ledger operations
//!
//! A [`LedgerCall`] carries raw caller input. Validating it produces a
//! [`ValidatedCall`] whose arguments are typed, and only a validated call can
//! derive a cache key or reach the remote surface.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, KeyPart};
use crate::errors::{RemoteError, ValidationError};
use crate::remote::{methods, LedgerRemote};
use crate::types::asset::{AssetDetails, AssetId, AssetSummary};
use crate::types::tx::TxConfirmation;
use crate::validation::Validator;

/// Stable prefixes of the façade operations
pub mod prefix {
    pub const CREATE: &str = "create";
    pub const TRANSFER: &str = "transfer";
    pub const COMPLETE_TRANSFER: &str = "completeTransfer";
    pub const GET_DETAILS: &str = "getDetails";
    pub const GET_HISTORY: &str = "getHistory";
    pub const LIST_OWNED_BY: &str = "listOwnedBy";
    pub const GET_ALL_SUMMARIES: &str = "getAllSummaries";
}

/// A ledger operation with unvalidated arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCall {
    /// Register a new asset owned by the signer
    CreateAsset { name: String, description: String },
    /// Offer an asset to a new owner
    InitiateTransfer { asset_id: String, new_owner: String },
    /// Accept a transfer offered to the signer
    ApproveTransfer { asset_id: String },
    /// Read one asset's record
    AssetDetails { asset_id: String },
    /// Read an asset's ownership history
    AssetHistory { asset_id: String },
    /// List the assets an address holds
    AssetsOwned { owner: String },
    /// Read a summary of every asset
    AllSummaries,
}

impl LedgerCall {
    /// Contract method this call invokes
    pub fn method(&self) -> &'static str {
        match self {
            Self::CreateAsset { .. } => methods::CREATE_ASSET,
            Self::InitiateTransfer { .. } => methods::INITIATE_TRANSFER,
            Self::ApproveTransfer { .. } => methods::APPROVE_TRANSFER,
            Self::AssetDetails { .. } => methods::ASSET_DETAILS,
            Self::AssetHistory { .. } => methods::ASSET_HISTORY,
            Self::AssetsOwned { .. } => methods::ASSETS_OWNED,
            Self::AllSummaries => methods::ALL_ASSETS,
        }
    }

    /// Returns true for operations that submit a transaction
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::CreateAsset { .. } | Self::InitiateTransfer { .. } | Self::ApproveTransfer { .. }
        )
    }

    /// Check every argument that has a shape.
    ///
    /// Ids are checked before addresses, so a call with both wrong reports the
    /// id. Names and descriptions are free text and pass through unchanged.
    pub fn validate(&self, validator: &Validator) -> Result<ValidatedCall, ValidationError> {
        Ok(match self {
            Self::CreateAsset { name, description } => ValidatedCall::CreateAsset {
                name: name.clone(),
                description: description.clone(),
            },
            Self::InitiateTransfer {
                asset_id,
                new_owner,
            } => ValidatedCall::InitiateTransfer {
                asset_id: validator.validate_id(asset_id)?,
                new_owner: validator.validate_address(new_owner)?,
            },
            Self::ApproveTransfer { asset_id } => ValidatedCall::ApproveTransfer {
                asset_id: validator.validate_id(asset_id)?,
            },
            Self::AssetDetails { asset_id } => ValidatedCall::AssetDetails {
                asset_id: validator.validate_id(asset_id)?,
            },
            Self::AssetHistory { asset_id } => ValidatedCall::AssetHistory {
                asset_id: validator.validate_id(asset_id)?,
            },
            Self::AssetsOwned { owner } => ValidatedCall::AssetsOwned {
                owner: validator.validate_address(owner)?,
            },
            Self::AllSummaries => ValidatedCall::AllSummaries,
        })
    }
}

/// A ledger operation whose arguments passed validation
///
/// Variants mirror [`LedgerCall`] with parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedCall {
    /// See [`LedgerCall::CreateAsset`]
    CreateAsset { name: String, description: String },
    /// See [`LedgerCall::InitiateTransfer`]
    InitiateTransfer { asset_id: AssetId, new_owner: Address },
    /// See [`LedgerCall::ApproveTransfer`]
    ApproveTransfer { asset_id: AssetId },
    /// See [`LedgerCall::AssetDetails`]
    AssetDetails { asset_id: AssetId },
    /// See [`LedgerCall::AssetHistory`]
    AssetHistory { asset_id: AssetId },
    /// See [`LedgerCall::AssetsOwned`]
    AssetsOwned { owner: Address },
    /// See [`LedgerCall::AllSummaries`]
    AllSummaries,
}

impl ValidatedCall {
    /// Contract method this call invokes
    pub fn method(&self) -> &'static str {
        match self {
            Self::CreateAsset { .. } => methods::CREATE_ASSET,
            Self::InitiateTransfer { .. } => methods::INITIATE_TRANSFER,
            Self::ApproveTransfer { .. } => methods::APPROVE_TRANSFER,
            Self::AssetDetails { .. } => methods::ASSET_DETAILS,
            Self::AssetHistory { .. } => methods::ASSET_HISTORY,
            Self::AssetsOwned { .. } => methods::ASSETS_OWNED,
            Self::AllSummaries => methods::ALL_ASSETS,
        }
    }

    /// Derive the cache key for this call issued under `prefix`.
    ///
    /// Built from parsed values, so inputs that validate to the same id or
    /// address (`"7"` and `" 7 "`, lower and checksummed hex) share a key.
    pub fn cache_key(&self, prefix: &str) -> CacheKey {
        let args = match self {
            Self::CreateAsset { name, description } => {
                vec![KeyPart::Text(name.clone()), KeyPart::Text(description.clone())]
            }
            Self::InitiateTransfer {
                asset_id,
                new_owner,
            } => vec![KeyPart::Id(asset_id.get()), KeyPart::Address(*new_owner)],
            Self::ApproveTransfer { asset_id }
            | Self::AssetDetails { asset_id }
            | Self::AssetHistory { asset_id } => vec![KeyPart::Id(asset_id.get())],
            Self::AssetsOwned { owner } => vec![KeyPart::Address(*owner)],
            Self::AllSummaries => Vec::new(),
        };
        CacheKey::new(prefix, self.method(), args)
    }

    /// Run this call against `remote`.
    ///
    /// Writes are submitted and then confirmed; the two phases succeed or fail
    /// together.
    pub async fn dispatch<R>(self, remote: &R) -> Result<LedgerResponse, RemoteError>
    where
        R: LedgerRemote + ?Sized,
    {
        let submitted = match self {
            Self::CreateAsset { name, description } => {
                remote.create_asset(&name, &description).await?
            }
            Self::InitiateTransfer {
                asset_id,
                new_owner,
            } => remote.initiate_transfer(asset_id, new_owner).await?,
            Self::ApproveTransfer { asset_id } => remote.approve_transfer(asset_id).await?,
            Self::AssetDetails { asset_id } => {
                return remote.asset_details(asset_id).await.map(LedgerResponse::Details)
            }
            Self::AssetHistory { asset_id } => {
                return remote.asset_history(asset_id).await.map(LedgerResponse::History)
            }
            Self::AssetsOwned { owner } => {
                return remote.assets_owned(owner).await.map(LedgerResponse::Owned)
            }
            Self::AllSummaries => {
                return remote.all_summaries().await.map(LedgerResponse::Summaries)
            }
        };

        remote
            .wait_for_confirmation(submitted)
            .await
            .map(LedgerResponse::Confirmed)
    }
}

/// Successful outcome of a ledger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerResponse {
    /// A write that was submitted and mined
    Confirmed(TxConfirmation),
    Details(AssetDetails),
    /// Every owner the asset has had, oldest first
    History(Vec<Address>),
    Owned(Vec<AssetId>),
    Summaries(Vec<AssetSummary>),
}

impl LedgerResponse {
    /// Name of the response shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Confirmed(_) => "confirmation",
            Self::Details(_) => "details",
            Self::History(_) => "history",
            Self::Owned(_) => "owned assets",
            Self::Summaries(_) => "summaries",
        }
    }
}
