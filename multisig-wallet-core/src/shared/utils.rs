//! Utility functions for the wallet core
//!
//! This module contains common utility functions used throughout the wallet core.

use chrono::{DateTime, Utc};

use crate::shared::constants::ADDRESS_HEX_LENGTH;
use crate::shared::error::WalletError;

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), WalletError> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::validation("Address must start with 0x"))?;

    if digits.len() != ADDRESS_HEX_LENGTH {
        return Err(WalletError::validation("Address must be 42 characters long"));
    }

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ethereum_address() {
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_ok());
        assert!(validate_ethereum_address("742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").is_err());
        assert!(validate_ethereum_address("0x742d").is_err());
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8bZ").is_err());
    }

    #[test]
    fn test_generate_id() {
        assert_ne!(generate_id(), generate_id());
    }
}
