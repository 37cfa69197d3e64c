// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for Alloy providers.
//!
//! Tower middleware wrapped around the JSON-RPC client. Only logging lives
//! here: the ledger client never retries or throttles on its own, so a failed
//! request surfaces to the caller as-is.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use assetledger::transport::LoggingLayer;
//! use alloy_rpc_client::ClientBuilder;
//!
//! let client = ClientBuilder::default()
//!     .layer(LoggingLayer::new())
//!     .http(rpc_url);
//! ```

mod logging;

pub use logging::{LoggingLayer, LoggingService};
