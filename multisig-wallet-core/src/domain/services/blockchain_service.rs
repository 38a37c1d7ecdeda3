//! Blockchain collaborator port
//!
//! The wallet core never talks to a node directly. Key management, contract
//! deployment and balance observation are delegated to an implementation of
//! `BlockchainDomainService`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::shared::error::WalletError;
use crate::shared::types::{Address, TokenInt, TransactionHash};

/// Parameters of a wallet contract that is about to be deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletCreationData {
    /// Address the contract will be deployed to
    pub wallet_address: Address,
    /// Amount that must be funded to that address before deployment
    pub fee: TokenInt,
}

/// Answer of a balance observer after each update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceObserverResponse {
    ContinueObserving,
    StopObserving,
}

/// Receives balance updates for an observed address.
///
/// Calls may arrive on any task and at any cadence. Once an observer answers
/// `StopObserving` the collaborator must not call it again for that
/// observation.
#[async_trait]
pub trait BalanceObserver: Send + Sync {
    async fn did_update_balance(&self, address: &str, new_balance: TokenInt) -> BalanceObserverResponse;
}

/// Handle to a running balance observation
#[cfg_attr(test, mockall::automock)]
pub trait BalanceObservation: Send + Sync {
    /// Stop delivering updates. Calling it again has no effect.
    fn cancel(&self);

    fn is_active(&self) -> bool;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockchainDomainService: Send + Sync {
    /// Create a new externally owned account and keep its key
    async fn generate_externally_owned_account(&self) -> Result<Address, WalletError>;

    /// Forget the key of an externally owned account
    async fn remove_externally_owned_account(&self, address: &str) -> Result<(), WalletError>;

    async fn request_wallet_creation_data(
        &self,
        owners: &[Address],
        confirmation_count: usize,
    ) -> Result<WalletCreationData, WalletError>;

    /// Submit the wallet contract creation. May take a long time.
    async fn execute_wallet_creation_transaction(&self, address: &str) -> Result<TransactionHash, WalletError>;

    /// Wait until the transaction is mined; `true` when it succeeded. May take a long time.
    async fn wait_for_pending_transaction(&self, hash: &TransactionHash) -> Result<bool, WalletError>;

    /// Start delivering balance updates of `address` to `observer` until it
    /// answers `StopObserving` or the returned handle is cancelled
    async fn observe_balance(
        &self,
        address: &str,
        observer: Arc<dyn BalanceObserver>,
    ) -> Result<Box<dyn BalanceObservation>, WalletError>;

    /// Current balance of `address`
    async fn balance(&self, address: &str) -> Result<TokenInt, WalletError>;
}
