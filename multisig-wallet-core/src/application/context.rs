//! Collaborators of the application services

use std::sync::Arc;

use crate::domain::repositories::{AccountRepository, PortfolioRepository, WalletRepository};
use crate::domain::services::BlockchainDomainService;

/// Repositories and domain services handed to application services at
/// construction time.
#[derive(Clone)]
pub struct DomainContext {
    pub wallet_repository: Arc<dyn WalletRepository>,
    pub account_repository: Arc<dyn AccountRepository>,
    pub portfolio_repository: Arc<dyn PortfolioRepository>,
    pub blockchain_service: Arc<dyn BlockchainDomainService>,
}

impl DomainContext {
    pub fn new(
        wallet_repository: Arc<dyn WalletRepository>,
        account_repository: Arc<dyn AccountRepository>,
        portfolio_repository: Arc<dyn PortfolioRepository>,
        blockchain_service: Arc<dyn BlockchainDomainService>,
    ) -> Self {
        Self {
            wallet_repository,
            account_repository,
            portfolio_repository,
            blockchain_service,
        }
    }
}
