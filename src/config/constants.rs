//! Defaults and environment variable names
//!
//! This module centralizes the constants used when loading a
//! [`LedgerConfig`](super::LedgerConfig) and building the contract remote.

/// Confirmations a write needs before it counts as mined
pub const DEFAULT_REQUIRED_CONFIRMATIONS: u64 = 1;

/// Environment variable names read by [`LedgerConfig::from_env`](super::LedgerConfig::from_env)
pub mod env {
    /// RPC endpoint of the node that hosts the ledger
    pub const RPC_URL: &str = "INFURA_URL";

    /// Hex-encoded secp256k1 private key used to sign writes
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";

    /// Address of the deployed `AssetLedger` contract
    pub const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";

    /// Per-call deadline in milliseconds (unset means no deadline)
    pub const CALL_TIMEOUT_MS: &str = "LEDGER_CALL_TIMEOUT_MS";

    /// Confirmations required for writes
    pub const CONFIRMATIONS: &str = "LEDGER_CONFIRMATIONS";

    /// Bound on cached results (unset means unbounded)
    pub const CACHE_MAX_ENTRIES: &str = "LEDGER_CACHE_MAX_ENTRIES";

    /// Set to `true`/`1` to log every JSON-RPC request
    pub const RPC_LOGGING: &str = "LEDGER_RPC_LOGGING";

    /// Set to `true`/`1` to also log request and response payloads
    /// (implies [`RPC_LOGGING`])
    pub const RPC_LOG_PAYLOADS: &str = "LEDGER_RPC_LOG_PAYLOADS";
}
