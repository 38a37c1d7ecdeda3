//! Constants for the wallet core
//!
//! This module contains all constants used throughout the wallet core.

use std::time::Duration;

// Deployment constants
pub const REQUIRED_CONFIRMATION_COUNT: usize = 2;
pub const DEFAULT_DEPLOYMENT_TOKEN: &str = "ETH";
pub const DEFAULT_BALANCE_POLL_INTERVAL: Duration = Duration::from_secs(5);

// Environment keys
pub const ENV_DEPLOYMENT_TOKEN: &str = "WALLET_DEPLOYMENT_TOKEN";
pub const ENV_REQUIRED_CONFIRMATIONS: &str = "WALLET_REQUIRED_CONFIRMATIONS";
pub const ENV_BALANCE_POLL_INTERVAL_MS: &str = "WALLET_BALANCE_POLL_INTERVAL_MS";

// Address constants
pub const ADDRESS_HEX_LENGTH: usize = 40;
