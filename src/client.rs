// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The memoizing, validating ledger client
//!
//! Every operation flows through [`LedgerClient::invoke_with_deadline`]:
//!
//! 1. validate the raw arguments (failures never reach the network)
//! 2. derive the cache key from prefix, method and parsed arguments
//! 3. answer from the cache, join a call already in flight, or start one
//! 4. store a success, hand a failure back without storing it
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use assetledger::{ContractRemote, LedgerClient};
//!
//! let client = LedgerClient::new(Arc::new(ContractRemote::new(address, provider)));
//!
//! let details = client.get_details("42").await?;
//! // Served from the cache, no second `eth_call`
//! let again = client.get_details("42").await?;
//! assert_eq!(details, again);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use tracing::{debug, info, warn, Instrument, Span};

use crate::cache::{CacheStats, CallCache, LookupSource};
use crate::call::{prefix, LedgerCall, LedgerResponse};
use crate::errors::{LedgerError, RemoteCallError};
use crate::remote::LedgerRemote;
use crate::tracing::spans;
use crate::types::asset::{AssetDetails, AssetId, AssetSummary};
use crate::types::tx::TxConfirmation;
use crate::validation::Validator;

/// Validating, memoizing façade over a [`LedgerRemote`]
///
/// Owns its result cache and validation cache; both live as long as the client.
/// Clone the surrounding `Arc` to share one client (and so one cache) between
/// tasks.
pub struct LedgerClient<R: ?Sized> {
    remote: Arc<R>,
    cache: CallCache<LedgerResponse, RemoteCallError>,
    validator: Validator,
    default_deadline: Option<Duration>,
}

impl<R> LedgerClient<R>
where
    R: LedgerRemote + ?Sized + 'static,
{
    /// Creates a client with an unbounded cache and no deadline
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            remote,
            cache: CallCache::new(),
            validator: Validator::new(),
            default_deadline: None,
        }
    }

    /// Bound the result cache, evicting least recently used results.
    ///
    /// The same bound caps each of the validator's outcome tables.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.cache = CallCache::new().with_max_entries(max_entries);
        self.validator = Validator::new().with_max_entries(max_entries);
        self
    }

    /// Deadline applied by [`invoke`](Self::invoke) and the typed operations
    #[must_use]
    pub fn with_default_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = Some(deadline);
        self
    }

    /// Run `call` under `prefix` with the client's default deadline.
    pub async fn invoke(
        &self,
        prefix: &str,
        call: LedgerCall,
    ) -> Result<LedgerResponse, LedgerError> {
        self.invoke_with_deadline(prefix, call, self.default_deadline)
            .await
    }

    /// Run `call` under `prefix`, bounded by `deadline`.
    ///
    /// The deadline of the caller that starts a remote call bounds that call; a
    /// call cut short is a failure and is not cached. A caller that joins a call
    /// already in flight stops waiting when its own deadline elapses, without
    /// affecting the shared call.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if an argument is malformed. The remote
    ///   surface is not touched.
    /// - [`LedgerError::Remote`] if the remote call failed or timed out.
    pub async fn invoke_with_deadline(
        &self,
        prefix: &str,
        call: LedgerCall,
        deadline: Option<Duration>,
    ) -> Result<LedgerResponse, LedgerError> {
        let span = spans::invoke(prefix, call.method());

        async move {
            let validated = call.validate(&self.validator).map_err(|source| {
                warn!(error = %source, "Rejected invalid argument");
                LedgerError::validation(prefix, source)
            })?;
            let key = validated.cache_key(prefix);

            let make_call = || {
                let remote = Arc::clone(&self.remote);
                let prefix = prefix.to_owned();
                let span = spans::remote_call(&key, deadline.map(|d| d.as_millis()));

                async move {
                    let outcome = match deadline {
                        Some(limit) => {
                            tokio::time::timeout(limit, validated.dispatch(remote.as_ref()))
                                .await
                                .map_err(|_| RemoteCallError::timeout(&prefix, limit))?
                        }
                        None => validated.dispatch(remote.as_ref()).await,
                    };
                    outcome.map_err(|source| RemoteCallError::failed(prefix, source))
                }
                .instrument(span)
            };

            let pending = self.cache.start(key.clone(), make_call);
            let source = pending.source();
            Span::current().record("source", tracing::field::debug(source));

            let lookup = match (source, deadline) {
                (LookupSource::Joined, Some(limit)) => {
                    tokio::time::timeout(limit, pending.wait())
                        .await
                        .map_err(|_| {
                            warn!(
                                key = %key,
                                timeout_ms = limit.as_millis() as u64,
                                "Gave up waiting on in-flight call"
                            );
                            RemoteCallError::timeout(prefix, limit)
                        })?
                }
                _ => pending.wait().await,
            };

            match (&lookup.result, lookup.source) {
                (Ok(_), LookupSource::Cached) => debug!(key = %key, "Served from cache"),
                (Ok(_), LookupSource::Joined) => debug!(key = %key, "Shared in-flight result"),
                (Ok(response), LookupSource::Fresh) => {
                    info!(key = %key, response = response.kind(), "Fresh result cached")
                }
                (Err(error), _) => warn!(key = %key, error = %error, "Remote call failed"),
            }

            Ok(lookup.result?)
        }
        .instrument(span)
        .await
    }

    /// Create an asset and wait for the transaction to be mined.
    pub async fn create_asset(
        &self,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<TxConfirmation, LedgerError> {
        let call = LedgerCall::CreateAsset {
            name: name.as_ref().to_owned(),
            description: description.as_ref().to_owned(),
        };
        expect_confirmed(prefix::CREATE, self.invoke(prefix::CREATE, call).await?)
    }

    /// Offer an asset to `new_owner` and wait for the transaction to be mined.
    pub async fn initiate_transfer(
        &self,
        asset_id: impl AsRef<str>,
        new_owner: impl AsRef<str>,
    ) -> Result<TxConfirmation, LedgerError> {
        let call = LedgerCall::InitiateTransfer {
            asset_id: asset_id.as_ref().to_owned(),
            new_owner: new_owner.as_ref().to_owned(),
        };
        expect_confirmed(prefix::TRANSFER, self.invoke(prefix::TRANSFER, call).await?)
    }

    /// Accept a pending transfer and wait for the transaction to be mined.
    pub async fn complete_transfer(
        &self,
        asset_id: impl AsRef<str>,
    ) -> Result<TxConfirmation, LedgerError> {
        let call = LedgerCall::ApproveTransfer {
            asset_id: asset_id.as_ref().to_owned(),
        };
        expect_confirmed(
            prefix::COMPLETE_TRANSFER,
            self.invoke(prefix::COMPLETE_TRANSFER, call).await?,
        )
    }

    /// Fetch an asset's full record, including its `exists` flag.
    pub async fn get_details(&self, asset_id: impl AsRef<str>) -> Result<AssetDetails, LedgerError> {
        let call = LedgerCall::AssetDetails {
            asset_id: asset_id.as_ref().to_owned(),
        };
        match self.invoke(prefix::GET_DETAILS, call).await? {
            LedgerResponse::Details(details) => Ok(details),
            _ => Err(LedgerError::unexpected_response(prefix::GET_DETAILS, "details")),
        }
    }

    /// Fetch the owners the ledger has recorded for an asset.
    pub async fn get_history(&self, asset_id: impl AsRef<str>) -> Result<Vec<Address>, LedgerError> {
        let call = LedgerCall::AssetHistory {
            asset_id: asset_id.as_ref().to_owned(),
        };
        match self.invoke(prefix::GET_HISTORY, call).await? {
            LedgerResponse::History(history) => Ok(history),
            _ => Err(LedgerError::unexpected_response(prefix::GET_HISTORY, "history")),
        }
    }

    /// List the ids of the assets `owner` currently holds.
    ///
    /// Checksummed and lowercase spellings of the same address share one cache
    /// entry.
    pub async fn list_owned_by(&self, owner: impl AsRef<str>) -> Result<Vec<AssetId>, LedgerError> {
        let call = LedgerCall::AssetsOwned {
            owner: owner.as_ref().to_owned(),
        };
        match self.invoke(prefix::LIST_OWNED_BY, call).await? {
            LedgerResponse::Owned(ids) => Ok(ids),
            _ => Err(LedgerError::unexpected_response(
                prefix::LIST_OWNED_BY,
                "owned assets",
            )),
        }
    }

    /// Fetch id, owner and name for every asset on the ledger.
    pub async fn get_all_summaries(&self) -> Result<Vec<AssetSummary>, LedgerError> {
        match self
            .invoke(prefix::GET_ALL_SUMMARIES, LedgerCall::AllSummaries)
            .await?
        {
            LedgerResponse::Summaries(summaries) => Ok(summaries),
            _ => Err(LedgerError::unexpected_response(
                prefix::GET_ALL_SUMMARIES,
                "summaries",
            )),
        }
    }

    /// Returns current result cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The validator guarding this client's calls
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// The remote surface this client calls
    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }
}

fn expect_confirmed(prefix: &str, response: LedgerResponse) -> Result<TxConfirmation, LedgerError> {
    match response {
        LedgerResponse::Confirmed(confirmation) => Ok(confirmation),
        _ => Err(LedgerError::unexpected_response(prefix, "confirmation")),
    }
}

impl<R: ?Sized> fmt::Debug for LedgerClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerClient")
            .field("cache", &self.cache)
            .field("validator", &self.validator)
            .field("default_deadline", &self.default_deadline)
            .finish_non_exhaustive()
    }
}
