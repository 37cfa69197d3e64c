// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider factory functions

use alloy_network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_client::ClientBuilder;
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;
use url::Url;

use crate::config::LedgerConfig;
use crate::errors::ConfigError;
use crate::transport::LoggingLayer;

/// Create an HTTP provider that signs with `signer`
///
/// When `logging` is given, every JSON-RPC request passes through that
/// [`LoggingLayer`].
///
/// # Examples
///
/// ```rust,ignore
/// use assetledger::provider::create_signing_provider;
/// use assetledger::transport::LoggingLayer;
///
/// let provider = create_signing_provider(
///     "http://localhost:8545".parse()?,
///     signer,
///     Some(LoggingLayer::new().with_payloads()),
/// );
/// ```
pub fn create_signing_provider(
    url: Url,
    signer: PrivateKeySigner,
    logging: Option<LoggingLayer>,
) -> DynProvider {
    debug!(url = %url, signer = %signer.address(), ?logging, "Building signing provider");
    let wallet = EthereumWallet::from(signer);

    if let Some(layer) = logging {
        let client = ClientBuilder::default().layer(layer).http(url);

        ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(client)
            .erased()
    } else {
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(url)
            .erased()
    }
}

/// Create the signing provider described by `config`
///
/// # Errors
///
/// Returns an error if the endpoint URL or the signing key is malformed
pub fn signing_provider_from_config(config: &LedgerConfig) -> Result<DynProvider, ConfigError> {
    Ok(create_signing_provider(
        config.url()?,
        config.signer()?,
        logging_layer(config),
    ))
}

/// The transport logging `config` asks for, if any
pub fn logging_layer(config: &LedgerConfig) -> Option<LoggingLayer> {
    match (config.rpc_logging, config.rpc_log_payloads) {
        (_, true) => Some(LoggingLayer::new().with_payloads()),
        (true, false) => Some(LoggingLayer::new()),
        (false, false) => None,
    }
}
