// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across assetledger.
//!
//! This module provides types for the ledger's domain concepts:
//! - Asset ids and records
//! - Two-phase write handles and confirmations

pub mod asset;
pub mod tx;

// Note: Public types are re-exported from lib.rs, not here
