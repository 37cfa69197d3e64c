// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for ledger operations.
//!
//! Telemetry is kept apart from business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here, attached
//! with [`tracing::Instrument`] so the span survives await points.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use alloy_primitives::TxHash;
use tracing::{Level, Span};

use crate::cache::CacheKey;

/// Create span for one façade call.
///
/// Parent: None (root span for this operation)
/// Children: remote_call span on a cache miss
#[inline]
pub(crate) fn invoke(prefix: &str, method: &'static str) -> Span {
    tracing::span!(
        Level::INFO,
        "ledger.invoke",
        prefix = %prefix,
        method = method,
        source = tracing::field::Empty,
    )
}

/// Create span for the remote call started on a cache miss.
///
/// Parent: invoke span of the caller that started the call
/// Children: confirm_transaction span for writes, RPC spans from the transport
#[inline]
pub(crate) fn remote_call(key: &CacheKey, deadline_ms: Option<u128>) -> Span {
    tracing::debug_span!(
        "ledger.remote_call",
        key = %key,
        deadline_ms = ?deadline_ms,
    )
}

/// Create span for waiting on a submitted transaction.
///
/// Parent: remote_call span
/// Children: receipt polling RPC calls
#[inline]
pub(crate) fn confirm_transaction(method: &'static str, tx_hash: TxHash, confirmations: u64) -> Span {
    tracing::debug_span!(
        "ledger.confirm_transaction",
        method = method,
        tx_hash = %tx_hash,
        confirmations = confirmations,
    )
}
