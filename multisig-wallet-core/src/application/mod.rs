//! Application layer - use cases
//!
//! This module coordinates the domain entities and the blockchain collaborator
//! into the wallet deployment use cases exposed to presentation layers.

pub mod context;
pub mod status_updates;
pub mod wallet_service;
pub mod wallet_state;

// Re-export application components
pub use context::*;
pub use status_updates::*;
pub use wallet_service::*;
pub use wallet_state::*;
