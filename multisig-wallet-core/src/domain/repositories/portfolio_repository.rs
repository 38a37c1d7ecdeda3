//! Portfolio repository for data access

use async_trait::async_trait;

use crate::domain::entities::Portfolio;
use crate::shared::error::WalletError;
use crate::shared::types::PortfolioId;

/// Portfolio repository trait. A device holds at most one portfolio.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    fn next_id(&self) -> PortfolioId;

    async fn save(&self, portfolio: &Portfolio) -> Result<(), WalletError>;

    async fn portfolio(&self) -> Result<Option<Portfolio>, WalletError>;
}
