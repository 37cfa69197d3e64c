// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Two-phase write types: submission handle and confirmation

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Handle to a state-changing transaction that has been submitted but not yet
/// confirmed
///
/// Returned by the write methods of [`LedgerRemote`](crate::LedgerRemote) and
/// consumed by [`LedgerRemote::wait_for_confirmation`](crate::LedgerRemote::wait_for_confirmation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTx {
    /// Contract method the transaction invokes
    pub method: &'static str,
    /// Hash of the submitted transaction
    pub tx_hash: TxHash,
}

impl SubmittedTx {
    pub const fn new(method: &'static str, tx_hash: TxHash) -> Self {
        Self { method, tx_hash }
    }
}

/// Durable outcome of a confirmed, successful transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfirmation {
    /// Hash of the confirmed transaction
    pub tx_hash: TxHash,
    /// Block the transaction was included in, when the node reports it
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction
    pub gas_used: u64,
}
