// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::info;

use crate::{provider::signing_provider_from_config, ContractRemote, LedgerClient, LedgerConfig};

/// Main entry point for the application.
///
/// Lists every asset owned by the configured signer, with its details and
/// ownership history, then reports how the result cache fared.
pub async fn run() -> anyhow::Result<()> {
    let config = LedgerConfig::from_env()?;
    info!(config = ?config, "Loaded configuration");

    let client = build_client(&config)?;
    let owner = config.signer()?.address();
    let owner = owner.to_checksum(None);

    let owned = client.list_owned_by(&owner).await?;
    info!(owner = %owner, count = owned.len(), "Assets owned by signer");

    for asset_id in &owned {
        let id = asset_id.to_string();
        let details = client.get_details(&id).await?;
        let history = client.get_history(&id).await?;
        info!(
            id = details.id,
            name = %details.name,
            description = %details.description,
            exists = details.exists,
            previous_owners = history.len(),
            "Asset"
        );
    }

    let summaries = client.get_all_summaries().await?;
    info!(count = summaries.len(), "Assets on the ledger");

    // A second pass must be served entirely from the cache
    client.list_owned_by(&owner).await?;

    info!(stats = %client.cache_stats(), "Cache statistics");

    Ok(())
}

/// Assemble a client for the contract described by `config`.
pub fn build_client(config: &LedgerConfig) -> anyhow::Result<LedgerClient<ContractRemote>> {
    let provider = signing_provider_from_config(config)?;
    let remote = ContractRemote::new(config.contract_address, provider)
        .with_required_confirmations(config.required_confirmations);

    let mut client = LedgerClient::new(Arc::new(remote));
    if let Some(timeout) = config.call_timeout {
        client = client.with_default_deadline(timeout);
    }
    if let Some(max_entries) = config.cache_max_entries {
        client = client.with_max_entries(max_entries);
    }
    Ok(client)
}
