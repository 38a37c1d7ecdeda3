//! Domain repositories
//!
//! This module contains repository traits for data access
//! following Domain-Driven Design principles. Implementations report
//! failures as `WalletError::Storage`.

pub mod wallet_repository;
pub mod account_repository;
pub mod portfolio_repository;
pub mod transaction_repository;

// Re-export repositories
pub use wallet_repository::*;
pub use account_repository::*;
pub use portfolio_repository::*;
pub use transaction_repository::*;
