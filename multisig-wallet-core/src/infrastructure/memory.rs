//! In-memory repositories
//!
//! Process-local implementations of the domain repositories. Entities are
//! stored by value; callers always work on copies and persist them with
//! `save`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Account, Portfolio, Transaction, Wallet};
use crate::domain::repositories::{
    AccountRepository, PortfolioRepository, TransactionRepository, WalletRepository,
};
use crate::shared::error::WalletError;
use crate::shared::types::{AccountId, PortfolioId, TransactionId, WalletId};

#[derive(Default)]
pub struct InMemoryWalletRepository {
    wallets: Arc<RwLock<HashMap<WalletId, Wallet>>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    fn next_id(&self) -> WalletId {
        WalletId::generate()
    }

    async fn save(&self, wallet: &Wallet) -> Result<(), WalletError> {
        let mut wallets = self.wallets.write().await;
        wallets.insert(wallet.id().clone(), wallet.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, WalletError> {
        let wallets = self.wallets.read().await;
        Ok(wallets.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: &Account) -> Result<(), WalletError> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id().clone(), account.clone());
        Ok(())
    }

    async fn find(&self, id: &AccountId) -> Result<Option<Account>, WalletError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn find_by_wallet(&self, wallet_id: &WalletId) -> Result<Vec<Account>, WalletError> {
        let accounts = self.accounts.read().await;
        let mut found: Vec<Account> = accounts
            .values()
            .filter(|account| account.wallet_id() == wallet_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.token().cmp(b.token()));
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryPortfolioRepository {
    portfolio: Arc<RwLock<Option<Portfolio>>>,
}

impl InMemoryPortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioRepository for InMemoryPortfolioRepository {
    fn next_id(&self) -> PortfolioId {
        PortfolioId::generate()
    }

    async fn save(&self, portfolio: &Portfolio) -> Result<(), WalletError> {
        *self.portfolio.write().await = Some(portfolio.clone());
        Ok(())
    }

    async fn portfolio(&self) -> Result<Option<Portfolio>, WalletError> {
        Ok(self.portfolio.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    fn next_id(&self) -> TransactionId {
        TransactionId::generate()
    }

    async fn save(&self, transaction: &Transaction) -> Result<(), WalletError> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(transaction.id().clone(), transaction.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TransactionId) -> Result<Option<Transaction>, WalletError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(id).cloned())
    }

    /// Transactions of a wallet, oldest first
    async fn find_by_wallet(&self, wallet_id: &WalletId) -> Result<Vec<Transaction>, WalletError> {
        let transactions = self.transactions.read().await;
        let mut found: Vec<Transaction> = transactions
            .values()
            .filter(|transaction| transaction.wallet_id() == wallet_id)
            .cloned()
            .collect();
        found.sort_by_key(|transaction| transaction.created_date());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Owner, OwnerType, TransactionType};

    fn wallet() -> Wallet {
        Wallet::new(
            WalletId::generate(),
            Owner::new("0x3333333333333333333333333333333333333333"),
            OwnerType::ThisDevice,
        )
    }

    #[tokio::test]
    async fn test_wallet_save_and_find() {
        let repository = InMemoryWalletRepository::new();
        let wallet = wallet();

        assert!(repository.find_by_id(wallet.id()).await.unwrap().is_none());
        repository.save(&wallet).await.unwrap();
        assert_eq!(repository.find_by_id(wallet.id()).await.unwrap(), Some(wallet));
    }

    #[tokio::test]
    async fn test_saved_wallet_is_a_copy() {
        let repository = InMemoryWalletRepository::new();
        let mut wallet = wallet();
        repository.save(&wallet).await.unwrap();

        wallet
            .add_owner(
                Owner::new("0x1111111111111111111111111111111111111111"),
                OwnerType::BrowserExtension,
            )
            .unwrap();

        let stored = repository.find_by_id(wallet.id()).await.unwrap().unwrap();
        assert!(stored.owner(OwnerType::BrowserExtension).is_none());
    }

    #[tokio::test]
    async fn test_accounts_by_wallet() {
        let repository = InMemoryAccountRepository::new();
        let wallet_id = WalletId::from("wallet");
        let other = WalletId::from("other");

        repository.save(&Account::new(AccountId::new("GNO", wallet_id.clone()), 5, 0)).await.unwrap();
        repository.save(&Account::new(AccountId::new("ETH", wallet_id.clone()), 1, 0)).await.unwrap();
        repository.save(&Account::new(AccountId::new("ETH", other), 9, 0)).await.unwrap();

        let accounts = repository.find_by_wallet(&wallet_id).await.unwrap();
        let tokens: Vec<&str> = accounts.iter().map(|account| account.token()).collect();
        assert_eq!(tokens, vec!["ETH", "GNO"]);
    }

    #[tokio::test]
    async fn test_single_portfolio() {
        let repository = InMemoryPortfolioRepository::new();
        assert!(repository.portfolio().await.unwrap().is_none());

        let mut portfolio = Portfolio::new(repository.next_id());
        repository.save(&portfolio).await.unwrap();
        portfolio.add_wallet(WalletId::from("wallet")).unwrap();
        repository.save(&portfolio).await.unwrap();

        let stored = repository.portfolio().await.unwrap().unwrap();
        assert_eq!(stored.selected_wallet(), Some(&WalletId::from("wallet")));
    }

    #[tokio::test]
    async fn test_transactions_by_wallet() {
        let repository = InMemoryTransactionRepository::new();
        let wallet_id = WalletId::from("wallet");
        let transaction = Transaction::new(
            repository.next_id(),
            TransactionType::Transfer,
            wallet_id.clone(),
            AccountId::new("ETH", wallet_id.clone()),
        );
        repository.save(&transaction).await.unwrap();

        assert_eq!(repository.find_by_wallet(&wallet_id).await.unwrap(), vec![transaction.clone()]);
        assert!(repository.find_by_wallet(&WalletId::from("other")).await.unwrap().is_empty());
        assert_eq!(repository.find_by_id(transaction.id()).await.unwrap(), Some(transaction));
    }
}
