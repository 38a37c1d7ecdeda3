use serde::{Deserialize, Serialize};
use std::fmt;

// Basic types for wallet operations
pub type Address = String;
pub type TokenInt = u128;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(crate::shared::utils::generate_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

entity_id!(
    /// Wallet entity identifier
    WalletId
);
entity_id!(
    /// Portfolio entity identifier
    PortfolioId
);
entity_id!(
    /// Transaction entity identifier
    TransactionId
);

/// Account identifier: one account per token per wallet
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    pub token: String,
    pub wallet_id: WalletId,
}

impl AccountId {
    pub fn new(token: impl Into<String>, wallet_id: WalletId) -> Self {
        Self {
            token: token.into(),
            wallet_id,
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.wallet_id, self.token)
    }
}

/// Blockchain transaction hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(String);

impl TransactionHash {
    /// Number of bytes in a 256-bit transaction hash
    pub const SIZE: usize = 32;

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// True when the hash is `0x`-prefixed hex of exactly 32 bytes
    pub fn is_well_formed(&self) -> bool {
        let digits = self.0.strip_prefix("0x").unwrap_or(&self.0);
        matches!(hex::decode(digits), Ok(bytes) if bytes.len() == Self::SIZE)
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount of a specific token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub amount: TokenInt,
    pub token: String,
}

impl TokenAmount {
    pub fn new(amount: TokenInt, token: impl Into<String>) -> Self {
        Self {
            amount,
            token: token.into(),
        }
    }
}
