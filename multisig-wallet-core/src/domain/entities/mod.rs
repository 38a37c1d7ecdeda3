//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts in the wallet system.

pub mod wallet;
pub mod account;
pub mod portfolio;
pub mod transaction;
pub mod transaction_state;

// Re-export entities
pub use wallet::*;
pub use account::*;
pub use portfolio::*;
pub use transaction::*;
pub use transaction_state::*;
