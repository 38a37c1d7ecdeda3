//! Domain services
//!
//! Ports to collaborators the domain depends on but does not implement.

pub mod blockchain_service;

pub use blockchain_service::*;
