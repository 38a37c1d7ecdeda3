//! Account repository for data access

use async_trait::async_trait;

use crate::domain::entities::Account;
use crate::shared::error::WalletError;
use crate::shared::types::{AccountId, WalletId};

/// Account repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Save an account, replacing any previous version
    async fn save(&self, account: &Account) -> Result<(), WalletError>;

    /// Find an account by token and wallet
    async fn find(&self, id: &AccountId) -> Result<Option<Account>, WalletError>;

    /// All accounts of a wallet
    async fn find_by_wallet(&self, wallet_id: &WalletId) -> Result<Vec<Account>, WalletError>;
}
