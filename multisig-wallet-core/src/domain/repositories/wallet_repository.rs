//! Wallet repository for data access

use async_trait::async_trait;

use crate::domain::entities::Wallet;
use crate::shared::error::WalletError;
use crate::shared::types::WalletId;

/// Wallet repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Allocate an identifier for a new wallet
    fn next_id(&self) -> WalletId;

    /// Save a wallet, replacing any previous version
    async fn save(&self, wallet: &Wallet) -> Result<(), WalletError>;

    /// Find a wallet by its identifier
    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, WalletError>;
}
