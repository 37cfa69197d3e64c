// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for ledger client integration tests
//!
//! Provides a scripted [`LedgerRemote`] so the client can be exercised without
//! a node or a deployed contract.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::{address, Address, TxHash};
use assetledger::remote::methods;
use assetledger::{
    AssetDetails, AssetId, AssetSummary, LedgerRemote, RemoteError, SubmittedTx, TxConfirmation,
};
use async_trait::async_trait;

/// Counted under this name in [`MockLedger::calls`]
pub const CONFIRM: &str = "waitForConfirmation";

/// Owner reported for every asset unless overridden
pub const OWNER: Address = address!("00000000000000000000000000000000000abc00");

/// Checksummed form of an address that passes validation
pub const VALID_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

/// Scripted ledger surface
///
/// Every method call is counted, then optionally delayed, then either fails
/// (if a failure is scripted for that method) or answers from canned data.
///
/// # Example
///
/// ```rust,ignore
/// let mock = Arc::new(MockLedger::new().with_delay(Duration::from_millis(50)));
/// mock.fail_next(methods::CREATE_ASSET, 1);
///
/// let client = LedgerClient::new(Arc::clone(&mock));
/// assert!(client.create_asset("Gold", "desc").await.is_err());
/// assert_eq!(mock.calls(methods::CREATE_ASSET), 1);
/// ```
#[derive(Default)]
pub struct MockLedger {
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, usize>>,
    reverts: Mutex<usize>,
    owned: Mutex<HashMap<Address, Vec<AssetId>>>,
    summaries: Vec<AssetSummary>,
    delay: Option<Duration>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `delay` after counting it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Assets reported by `listAssetsOwned(owner)`
    pub fn with_owned(self, owner: Address, ids: &[u32]) -> Self {
        let ids = ids.iter().copied().filter_map(AssetId::new).collect();
        self.owned.lock().unwrap().insert(owner, ids);
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<AssetSummary>) -> Self {
        self.summaries = summaries;
        self
    }

    /// Make the next `times` calls to `method` fail with a network error
    pub fn fail_next(&self, method: &'static str, times: usize) {
        *self.failures.lock().unwrap().entry(method).or_default() += times;
    }

    /// Make the next `times` confirmations report a reverted transaction
    pub fn revert_next(&self, times: usize) {
        *self.reverts.lock().unwrap() += times;
    }

    /// Number of times `method` was called
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Number of calls across all methods
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    async fn enter(&self, method: &'static str) -> Result<(), RemoteError> {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(method) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(RemoteError::transport(
                    method,
                    std::io::Error::new(std::io::ErrorKind::ConnectionReset, "network error"),
                ))
            }
            _ => Ok(()),
        }
    }

    fn submitted(&self, method: &'static str) -> SubmittedTx {
        let nonce = self.total_calls() as u8;
        SubmittedTx::new(method, TxHash::with_last_byte(nonce))
    }
}

/// Canned details for `id`
pub fn details_for(id: u32) -> AssetDetails {
    AssetDetails {
        id,
        owner: OWNER,
        name: format!("asset-{id}"),
        description: format!("description of asset {id}"),
        exists: true,
    }
}

#[async_trait]
impl LedgerRemote for MockLedger {
    async fn create_asset(
        &self,
        _name: &str,
        _description: &str,
    ) -> Result<SubmittedTx, RemoteError> {
        self.enter(methods::CREATE_ASSET).await?;
        Ok(self.submitted(methods::CREATE_ASSET))
    }

    async fn initiate_transfer(
        &self,
        _asset_id: AssetId,
        _new_owner: Address,
    ) -> Result<SubmittedTx, RemoteError> {
        self.enter(methods::INITIATE_TRANSFER).await?;
        Ok(self.submitted(methods::INITIATE_TRANSFER))
    }

    async fn approve_transfer(&self, _asset_id: AssetId) -> Result<SubmittedTx, RemoteError> {
        self.enter(methods::APPROVE_TRANSFER).await?;
        Ok(self.submitted(methods::APPROVE_TRANSFER))
    }

    async fn wait_for_confirmation(
        &self,
        tx: SubmittedTx,
    ) -> Result<TxConfirmation, RemoteError> {
        self.enter(CONFIRM).await?;

        let mut reverts = self.reverts.lock().unwrap();
        if *reverts > 0 {
            *reverts -= 1;
            return Err(RemoteError::Reverted {
                method: tx.method,
                tx_hash: tx.tx_hash,
            });
        }

        Ok(TxConfirmation {
            tx_hash: tx.tx_hash,
            block_number: Some(100),
            gas_used: 21_000,
        })
    }

    async fn asset_details(&self, asset_id: AssetId) -> Result<AssetDetails, RemoteError> {
        self.enter(methods::ASSET_DETAILS).await?;
        Ok(details_for(asset_id.get()))
    }

    async fn asset_history(&self, _asset_id: AssetId) -> Result<Vec<Address>, RemoteError> {
        self.enter(methods::ASSET_HISTORY).await?;
        Ok(vec![OWNER])
    }

    async fn assets_owned(&self, owner: Address) -> Result<Vec<AssetId>, RemoteError> {
        self.enter(methods::ASSETS_OWNED).await?;
        Ok(self
            .owned
            .lock()
            .unwrap()
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn all_summaries(&self) -> Result<Vec<AssetSummary>, RemoteError> {
        self.enter(methods::ALL_ASSETS).await?;
        Ok(self.summaries.clone())
    }
}
