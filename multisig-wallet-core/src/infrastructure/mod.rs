//! Infrastructure layer - adapters for the domain ports
//!
//! This module contains the configuration loader, in-memory repositories and
//! the polling balance observer.

pub mod balance_poller;
pub mod config;
pub mod memory;

// Re-export infrastructure components
pub use balance_poller::*;
pub use config::*;
pub use memory::*;
