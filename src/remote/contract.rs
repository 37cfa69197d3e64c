// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`LedgerRemote`] over the on-chain `AssetLedger` contract

use alloy_network::ReceiptResponse;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider};
use async_trait::async_trait;
use tracing::{debug, info, Instrument};

use crate::config::constants::DEFAULT_REQUIRED_CONFIRMATIONS;
use crate::errors::RemoteError;
use crate::remote::{methods, LedgerRemote};
use crate::tracing::spans;
use crate::types::asset::{AssetDetails, AssetId, AssetSummary};
use crate::types::tx::{SubmittedTx, TxConfirmation};

alloy_sol_types::sol! {
    #[sol(rpc)]
    contract AssetLedger {
        struct AssetRecord {
            uint32 id;
            address owner;
            string name;
        }

        function createAsset(string name, string description) external;
        function initiateAssetTransfer(uint32 id, address newOwner) external;
        function approveAssetTransfer(uint32 id) external;
        function retrieveAssetDetails(uint32 id) external view returns (
            uint32 id,
            address owner,
            string name,
            string description,
            bool exists
        );
        function retrieveAssetHistory(uint32 id) external view returns (address[] memory);
        function listAssetsOwned(address owner) external view returns (uint32[] memory);
        function listAllAssets() external view returns (AssetRecord[] memory);
    }
}

/// Contract-backed ledger surface
///
/// Reads go through `eth_call`; writes are signed by the provider's wallet and
/// confirmed by polling for the receipt.
///
/// # Example
///
/// ```rust,ignore
/// use assetledger::remote::ContractRemote;
///
/// let remote = ContractRemote::new(contract_address, provider)
///     .with_required_confirmations(2);
/// ```
#[derive(Clone)]
pub struct ContractRemote {
    contract: AssetLedger::AssetLedgerInstance<DynProvider>,
    required_confirmations: u64,
}

impl ContractRemote {
    /// Bind to the ledger deployed at `address`
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: AssetLedger::new(address, provider),
            required_confirmations: DEFAULT_REQUIRED_CONFIRMATIONS,
        }
    }

    /// Number of blocks a write must be buried under before it counts as confirmed
    #[must_use]
    pub fn with_required_confirmations(mut self, confirmations: u64) -> Self {
        self.required_confirmations = confirmations.max(1);
        self
    }

    /// Address of the bound contract
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

impl std::fmt::Debug for ContractRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractRemote")
            .field("address", self.contract.address())
            .field("required_confirmations", &self.required_confirmations)
            .finish()
    }
}

#[async_trait]
impl LedgerRemote for ContractRemote {
    async fn create_asset(
        &self,
        name: &str,
        description: &str,
    ) -> Result<SubmittedTx, RemoteError> {
        const METHOD: &str = methods::CREATE_ASSET;
        let pending = self
            .contract
            .createAsset(name.to_owned(), description.to_owned())
            .send()
            .await
            .map_err(|e| RemoteError::contract(METHOD, e))?;

        debug!(method = METHOD, tx_hash = %pending.tx_hash(), "Transaction submitted");
        Ok(SubmittedTx::new(METHOD, *pending.tx_hash()))
    }

    async fn initiate_transfer(
        &self,
        asset_id: AssetId,
        new_owner: Address,
    ) -> Result<SubmittedTx, RemoteError> {
        const METHOD: &str = methods::INITIATE_TRANSFER;
        let pending = self
            .contract
            .initiateAssetTransfer(asset_id.get(), new_owner)
            .send()
            .await
            .map_err(|e| RemoteError::contract(METHOD, e))?;

        debug!(method = METHOD, tx_hash = %pending.tx_hash(), "Transaction submitted");
        Ok(SubmittedTx::new(METHOD, *pending.tx_hash()))
    }

    async fn approve_transfer(&self, asset_id: AssetId) -> Result<SubmittedTx, RemoteError> {
        const METHOD: &str = methods::APPROVE_TRANSFER;
        let pending = self
            .contract
            .approveAssetTransfer(asset_id.get())
            .send()
            .await
            .map_err(|e| RemoteError::contract(METHOD, e))?;

        debug!(method = METHOD, tx_hash = %pending.tx_hash(), "Transaction submitted");
        Ok(SubmittedTx::new(METHOD, *pending.tx_hash()))
    }

    async fn wait_for_confirmation(
        &self,
        tx: SubmittedTx,
    ) -> Result<TxConfirmation, RemoteError> {
        let span = spans::confirm_transaction(tx.method, tx.tx_hash, self.required_confirmations);

        async {
            let receipt = PendingTransactionBuilder::new(
                self.contract.provider().root().clone(),
                tx.tx_hash,
            )
            .with_required_confirmations(self.required_confirmations)
            .get_receipt()
            .await
            .map_err(|source| RemoteError::Confirmation {
                tx_hash: tx.tx_hash,
                source,
            })?;

            if !receipt.status() {
                return Err(RemoteError::Reverted {
                    method: tx.method,
                    tx_hash: tx.tx_hash,
                });
            }

            let confirmation = TxConfirmation {
                tx_hash: tx.tx_hash,
                block_number: receipt.block_number(),
                gas_used: receipt.gas_used(),
            };
            info!(
                block_number = ?confirmation.block_number,
                gas_used = confirmation.gas_used,
                "Transaction confirmed"
            );
            Ok(confirmation)
        }
        .instrument(span)
        .await
    }

    async fn asset_details(&self, asset_id: AssetId) -> Result<AssetDetails, RemoteError> {
        let details = self
            .contract
            .retrieveAssetDetails(asset_id.get())
            .call()
            .await
            .map_err(|e| RemoteError::contract(methods::ASSET_DETAILS, e))?;

        Ok(AssetDetails {
            id: details.id,
            owner: details.owner,
            name: details.name,
            description: details.description,
            exists: details.exists,
        })
    }

    async fn asset_history(&self, asset_id: AssetId) -> Result<Vec<Address>, RemoteError> {
        self.contract
            .retrieveAssetHistory(asset_id.get())
            .call()
            .await
            .map_err(|e| RemoteError::contract(methods::ASSET_HISTORY, e))
    }

    async fn assets_owned(&self, owner: Address) -> Result<Vec<AssetId>, RemoteError> {
        let ids = self
            .contract
            .listAssetsOwned(owner)
            .call()
            .await
            .map_err(|e| RemoteError::contract(methods::ASSETS_OWNED, e))?;

        owned_ids(ids)
    }

    async fn all_summaries(&self) -> Result<Vec<AssetSummary>, RemoteError> {
        let records = self
            .contract
            .listAllAssets()
            .call()
            .await
            .map_err(|e| RemoteError::contract(methods::ALL_ASSETS, e))?;

        Ok(records
            .into_iter()
            .map(|record| AssetSummary {
                id: record.id,
                owner: record.owner,
                name: record.name,
            })
            .collect())
    }
}

/// Convert raw ids from `listAssetsOwned`. The ledger never issues id zero, so
/// a zero is reported rather than dropped.
fn owned_ids(ids: Vec<u32>) -> Result<Vec<AssetId>, RemoteError> {
    ids.into_iter()
        .enumerate()
        .map(|(index, id)| {
            AssetId::new(id).ok_or_else(|| {
                RemoteError::rejected(
                    methods::ASSETS_OWNED,
                    format!("returned asset id 0 at position {index}"),
                )
            })
        })
        .collect()
}
