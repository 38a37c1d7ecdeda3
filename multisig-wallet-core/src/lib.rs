//! Multisig Wallet Core
//!
//! Deployment orchestration and transaction lifecycle for a multi-owner
//! smart-contract wallet.
//!
//! ## Architecture
//!
//! - **Shared**: Error types, identifiers, constants, and utilities
//! - **Domain**: Wallet, Account, Portfolio and Transaction entities, the
//!   repository ports and the blockchain collaborator port
//! - **Application**: The deployment orchestrator and the derived wallet state
//! - **Infrastructure**: Configuration, in-memory repositories, and balance polling
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use multisig_wallet_core::{
//!     BlockchainDomainService, DeploymentConfig, DomainContext, InMemoryAccountRepository,
//!     InMemoryPortfolioRepository, InMemoryWalletRepository, WalletApplicationService,
//! };
//!
//! # async fn run(blockchain: Arc<dyn BlockchainDomainService>) -> Result<(), multisig_wallet_core::WalletError> {
//! let context = DomainContext::new(
//!     Arc::new(InMemoryWalletRepository::new()),
//!     Arc::new(InMemoryAccountRepository::new()),
//!     Arc::new(InMemoryPortfolioRepository::new()),
//!     blockchain,
//! );
//! let service = WalletApplicationService::new(context, DeploymentConfig::from_env()?);
//!
//! service.create_new_draft_wallet().await?;
//! // add the browser extension and paper wallet owners, then:
//! service.start_deployment().await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types
pub use application::{DomainContext, StatusUpdates, WalletApplicationService, WalletState};
pub use domain::entities::{
    Account, Owner, OwnerType, Portfolio, Signature, Transaction, TransactionStatus, Wallet, WalletStatus,
};
pub use domain::repositories::{AccountRepository, PortfolioRepository, TransactionRepository, WalletRepository};
pub use domain::services::{
    BalanceObservation, BalanceObserver, BalanceObserverResponse, BlockchainDomainService, WalletCreationData,
};
pub use infrastructure::{
    BalancePoller, BalanceSource, BalanceSubscription, DeploymentConfig, InMemoryAccountRepository,
    InMemoryPortfolioRepository, InMemoryTransactionRepository, InMemoryWalletRepository,
};
pub use shared::error::{TransactionError, WalletError};
pub use shared::types::{AccountId, Address, TokenInt, TransactionHash, WalletId};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
///
/// Calling it again after a logger is installed has no effect.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        assert_eq!(NAME, "multisig-wallet-core");
    }
}
