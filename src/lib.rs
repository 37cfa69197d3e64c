// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Validated, memoizing client for an on-chain asset ledger.
//!
//! [`LedgerClient`] sits in front of a [`LedgerRemote`] and routes every
//! operation through one path: validate the arguments, consult the result
//! cache, call the remote surface on a miss, and remember successes. Failures
//! are never cached, and concurrent callers for the same call share a single
//! remote request.

pub mod bootstrap;
pub mod cache;
pub mod call;
mod client;
pub mod config;
pub mod errors;
pub mod provider;
pub mod remote;
pub(crate) mod tracing;
pub mod transport;
pub mod types;
pub mod validation;

pub use cache::{CacheKey, CacheStats, CallCache};
pub use call::{LedgerCall, LedgerResponse, ValidatedCall};
pub use client::LedgerClient;
pub use config::LedgerConfig;
pub use errors::{
    ConfigError, LedgerError, RemoteCallError, RemoteError, ValidationError, ValidationKind,
};
pub use remote::{ContractRemote, LedgerRemote};
pub use types::asset::{AssetDetails, AssetId, AssetSummary};
pub use types::tx::{SubmittedTx, TxConfirmation};
pub use validation::Validator;
