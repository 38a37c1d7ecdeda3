//! Transaction repository for data access
//!
//! This module handles transaction data persistence and retrieval.

use async_trait::async_trait;

use crate::domain::entities::Transaction;
use crate::shared::error::WalletError;
use crate::shared::types::{TransactionId, WalletId};

/// Transaction repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    fn next_id(&self) -> TransactionId;

    /// Save a transaction
    async fn save(&self, transaction: &Transaction) -> Result<(), WalletError>;

    /// Get transaction by id
    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, WalletError>;

    /// List transactions for wallet, oldest first
    async fn find_by_wallet(&self, wallet_id: &WalletId) -> Result<Vec<Transaction>, WalletError>;
}
