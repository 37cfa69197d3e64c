//! Configuration for the ledger client
//!
//! [`LedgerConfig`] collects everything needed to reach the ledger: the RPC
//! endpoint, the signing credential, the contract address, and the client's
//! tuning knobs.
//!
//! # Example: From the environment
//!
//! ```rust,ignore
//! use assetledger::LedgerConfig;
//!
//! // Reads `.env` first, then the process environment
//! let config = LedgerConfig::from_env()?;
//! ```
//!
//! # Example: Built in code
//!
//! ```rust
//! use assetledger::LedgerConfig;
//! use alloy_primitives::address;
//! use std::time::Duration;
//!
//! let config = LedgerConfig::new(
//!     "http://localhost:8545",
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//!     address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
//! )
//! .with_call_timeout(Duration::from_secs(30))
//! .with_cache_max_entries(10_000);
//!
//! assert_eq!(config.required_confirmations, 1);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::errors::ConfigError;
use crate::validation::parse_address;

pub mod constants;

use constants::{env, DEFAULT_REQUIRED_CONFIRMATIONS};

/// Configuration for a ledger client
///
/// The signing credential is never printed; `Debug` shows it redacted.
#[derive(Clone)]
pub struct LedgerConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Hex-encoded private key used to sign writes
    private_key: String,

    /// Address of the deployed ledger contract
    pub contract_address: Address,

    /// Deadline for each call
    /// Default: None (calls wait as long as the node takes)
    pub call_timeout: Option<Duration>,

    /// Confirmations a write needs before it counts as mined
    /// Default: 1
    pub required_confirmations: u64,

    /// Bound on cached results
    /// Default: None (unbounded)
    pub cache_max_entries: Option<usize>,

    /// Log every JSON-RPC request through the transport
    /// Default: false
    pub rpc_logging: bool,

    /// Also log JSON-RPC payloads at TRACE level; turns on `rpc_logging`
    /// Default: false
    pub rpc_log_payloads: bool,
}

impl LedgerConfig {
    /// Create a configuration with default tuning
    pub fn new(
        rpc_url: impl Into<String>,
        private_key: impl Into<String>,
        contract_address: Address,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            private_key: private_key.into(),
            contract_address,
            call_timeout: None,
            required_confirmations: DEFAULT_REQUIRED_CONFIRMATIONS,
            cache_max_entries: None,
            rpc_logging: false,
            rpc_log_payloads: false,
        }
    }

    /// Set the per-call deadline
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Set the confirmations required for writes
    #[must_use]
    pub fn with_required_confirmations(mut self, confirmations: u64) -> Self {
        self.required_confirmations = confirmations;
        self
    }

    /// Bound the result cache
    #[must_use]
    pub fn with_cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = Some(max_entries);
        self
    }

    /// Enable or disable JSON-RPC request logging
    #[must_use]
    pub fn with_rpc_logging(mut self, enabled: bool) -> Self {
        self.rpc_logging = enabled;
        self
    }

    /// Enable or disable payload logging. Enabling it also enables request
    /// logging.
    #[must_use]
    pub fn with_rpc_log_payloads(mut self, enabled: bool) -> Self {
        self.rpc_log_payloads = enabled;
        if enabled {
            self.rpc_logging = true;
        }
        self
    }

    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variables may come from the process
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEnvVar`] if the RPC URL, private key or contract
    ///   address is unset
    /// - [`ConfigError::InvalidValue`] if a variable cannot be parsed
    /// - [`ConfigError::InvalidUrl`] / [`ConfigError::InvalidSigner`] if the
    ///   endpoint or key is malformed
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| var(name).ok_or(ConfigError::MissingEnvVar(name));

        let contract_address = required(env::CONTRACT_ADDRESS)?;
        let contract_address = parse_address(&contract_address).ok_or_else(|| {
            ConfigError::invalid_value(env::CONTRACT_ADDRESS, "not a 0x-prefixed 20-byte address")
        })?;

        let mut config = Self::new(
            required(env::RPC_URL)?,
            required(env::PRIVATE_KEY)?,
            contract_address,
        );

        // Fail fast on a malformed endpoint or key rather than at first use
        config.url()?;
        config.signer()?;

        if let Some(ms) = var(env::CALL_TIMEOUT_MS) {
            let ms: u64 = parse_positive(env::CALL_TIMEOUT_MS, &ms)?;
            config = config.with_call_timeout(Duration::from_millis(ms));
        }
        if let Some(confirmations) = var(env::CONFIRMATIONS) {
            config = config
                .with_required_confirmations(parse_positive(env::CONFIRMATIONS, &confirmations)?);
        }
        if let Some(max_entries) = var(env::CACHE_MAX_ENTRIES) {
            config = config
                .with_cache_max_entries(parse_positive(env::CACHE_MAX_ENTRIES, &max_entries)?);
        }
        if let Some(flag) = var(env::RPC_LOGGING) {
            config = config.with_rpc_logging(parse_flag(env::RPC_LOGGING, &flag)?);
        }
        if let Some(flag) = var(env::RPC_LOG_PAYLOADS) {
            config = config.with_rpc_log_payloads(parse_flag(env::RPC_LOG_PAYLOADS, &flag)?);
        }

        Ok(config)
    }

    /// Parse the RPC endpoint
    pub fn url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.rpc_url).map_err(|e| ConfigError::InvalidUrl(self.rpc_url.clone(), e))
    }

    /// Parse the signing credential
    pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
        PrivateKeySigner::from_str(&self.private_key).map_err(ConfigError::InvalidSigner)
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: fmt::Display,
{
    let parsed: T = value
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_value(var, e.to_string()))?;
    if parsed <= T::default() {
        return Err(ConfigError::invalid_value(var, "must be greater than zero"));
    }
    Ok(parsed)
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid_value(
            var,
            format!("expected true or false, got {other:?}"),
        )),
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("call_timeout", &self.call_timeout)
            .field("required_confirmations", &self.required_confirmations)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("rpc_logging", &self.rpc_logging)
            .field("rpc_log_payloads", &self.rpc_log_payloads)
            .finish()
    }
}
