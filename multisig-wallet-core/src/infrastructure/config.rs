//! Deployment configuration
//!
//! Read from the environment (with `.env` support), falling back to safe
//! defaults for every key.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::shared::constants::{
    DEFAULT_BALANCE_POLL_INTERVAL, DEFAULT_DEPLOYMENT_TOKEN, ENV_BALANCE_POLL_INTERVAL_MS,
    ENV_DEPLOYMENT_TOKEN, ENV_REQUIRED_CONFIRMATIONS, REQUIRED_CONFIRMATION_COUNT,
};
use crate::shared::error::WalletError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Token of the account that funds the deployment
    pub deployment_token: String,
    /// Owner signatures required by the deployed multisig
    pub required_confirmation_count: usize,
    /// Period of the polling balance observer
    pub balance_poll_interval: Duration,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            deployment_token: DEFAULT_DEPLOYMENT_TOKEN.to_string(),
            required_confirmation_count: REQUIRED_CONFIRMATION_COUNT,
            balance_poll_interval: DEFAULT_BALANCE_POLL_INTERVAL,
        }
    }
}

impl DeploymentConfig {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self, WalletError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(token) = lookup(ENV_DEPLOYMENT_TOKEN) {
            config.deployment_token = token;
        }
        if let Some(count) = lookup(ENV_REQUIRED_CONFIRMATIONS) {
            config.required_confirmation_count = count.trim().parse().map_err(|e| {
                WalletError::config(format!("Invalid {}: {}", ENV_REQUIRED_CONFIRMATIONS, e))
            })?;
        }
        if let Some(millis) = lookup(ENV_BALANCE_POLL_INTERVAL_MS) {
            let millis: u64 = millis.trim().parse().map_err(|e| {
                WalletError::config(format!("Invalid {}: {}", ENV_BALANCE_POLL_INTERVAL_MS, e))
            })?;
            config.balance_poll_interval = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.deployment_token.trim().is_empty() {
            return Err(WalletError::config("Deployment token cannot be empty"));
        }
        if self.required_confirmation_count == 0 {
            return Err(WalletError::config("Required confirmation count must be positive"));
        }
        if self.balance_poll_interval.is_zero() {
            return Err(WalletError::config("Balance poll interval must be positive"));
        }
        Ok(())
    }
}
