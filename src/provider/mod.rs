// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Signing provider construction
//!
//! The contract remote needs a provider that can both read and send
//! transactions. This module builds one over HTTP with the recommended fillers
//! (nonce, gas, chain id) and a local wallet, then erases its type so the rest
//! of the crate only sees a [`DynProvider`](alloy_provider::DynProvider).
//!
//! # Examples
//!
//! ```rust,ignore
//! use assetledger::provider::{create_signing_provider, logging_layer};
//! use assetledger::LedgerConfig;
//!
//! let config = LedgerConfig::from_env()?;
//! let provider =
//!     create_signing_provider(config.url()?, config.signer()?, logging_layer(&config));
//! ```

mod factory;

pub use factory::{create_signing_provider, logging_layer, signing_provider_from_config};
