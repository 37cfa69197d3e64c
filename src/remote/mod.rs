// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The remote ledger surface
//!
//! [`LedgerRemote`] is the seam between the memoizing façade and whatever
//! actually talks to the asset ledger. It exposes one method per contract
//! operation and receives arguments that have already been validated.
//!
//! [`ContractRemote`] is the production implementation over an alloy contract
//! binding. Tests substitute their own implementation.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::errors::RemoteError;
use crate::types::asset::{AssetDetails, AssetId, AssetSummary};
use crate::types::tx::{SubmittedTx, TxConfirmation};

mod contract;

pub use contract::{AssetLedger, ContractRemote};

/// Contract method names, as they appear in the `AssetLedger` ABI
pub mod methods {
    pub const CREATE_ASSET: &str = "createAsset";
    pub const INITIATE_TRANSFER: &str = "initiateAssetTransfer";
    pub const APPROVE_TRANSFER: &str = "approveAssetTransfer";
    pub const ASSET_DETAILS: &str = "retrieveAssetDetails";
    pub const ASSET_HISTORY: &str = "retrieveAssetHistory";
    pub const ASSETS_OWNED: &str = "listAssetsOwned";
    pub const ALL_ASSETS: &str = "listAllAssets";
}

/// Asynchronous surface of the asset ledger contract
///
/// Writes are split into submission and confirmation: the three state-changing
/// methods return as soon as the node accepts the transaction, and
/// [`wait_for_confirmation`](Self::wait_for_confirmation) resolves once it is
/// mined. A transaction that is mined but reverted must surface as
/// [`RemoteError::Reverted`].
///
/// Implementations must not retry on their own.
#[async_trait]
pub trait LedgerRemote: Send + Sync {
    /// Submit `createAsset(name, description)`
    async fn create_asset(&self, name: &str, description: &str)
        -> Result<SubmittedTx, RemoteError>;

    /// Submit `initiateAssetTransfer(id, newOwner)`
    async fn initiate_transfer(
        &self,
        asset_id: AssetId,
        new_owner: Address,
    ) -> Result<SubmittedTx, RemoteError>;

    /// Submit `approveAssetTransfer(id)`
    async fn approve_transfer(&self, asset_id: AssetId) -> Result<SubmittedTx, RemoteError>;

    /// Wait until a submitted transaction is mined
    async fn wait_for_confirmation(&self, tx: SubmittedTx)
        -> Result<TxConfirmation, RemoteError>;

    /// Call `retrieveAssetDetails(id)`
    async fn asset_details(&self, asset_id: AssetId) -> Result<AssetDetails, RemoteError>;

    /// Call `retrieveAssetHistory(id)`
    async fn asset_history(&self, asset_id: AssetId) -> Result<Vec<Address>, RemoteError>;

    /// Call `listAssetsOwned(owner)`
    async fn assets_owned(&self, owner: Address) -> Result<Vec<AssetId>, RemoteError>;

    /// Call `listAllAssets()`
    async fn all_summaries(&self) -> Result<Vec<AssetSummary>, RemoteError>;
}
