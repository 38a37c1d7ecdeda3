//! Error handling for the wallet core
//!
//! This module defines the error types used throughout the wallet core.

use thiserror::Error;

use crate::domain::entities::{OwnerType, TransactionStatus, WalletStatus};

/// Wallet error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("One or more owners are missing")]
    OneOrMoreOwnersAreMissing,

    #[error("Selected wallet not found")]
    SelectedWalletNotFound,

    #[error("Operation is not allowed in the current wallet state")]
    InvalidWalletState,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Wallet has no blockchain address")]
    MissingWalletAddress,

    #[error("Illegal wallet transition: {operation} from {from:?}")]
    InvalidStateTransition {
        operation: &'static str,
        from: WalletStatus,
    },

    #[error("Owner of kind {0:?} already exists")]
    OwnerAlreadyExists(OwnerType),

    #[error("Owner of kind {0:?} not found")]
    OwnerNotFound(OwnerType),

    #[error("Blockchain address is already set")]
    BlockchainAddressAlreadySet,

    #[error("Wallet already exists: {0}")]
    WalletAlreadyExists(String),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Blockchain error: {0}")]
    Blockchain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a blockchain collaborator error
    pub fn blockchain(message: impl Into<String>) -> Self {
        Self::Blockchain(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Domain errors are recoverable failures surfaced to the caller. Everything
    /// else is either a precondition violation or a collaborator failure.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::OneOrMoreOwnersAreMissing
                | Self::SelectedWalletNotFound
                | Self::InvalidWalletState
                | Self::AccountNotFound
                | Self::MissingWalletAddress
        )
    }
}

/// Errors raised by the transaction state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction parameters cannot be edited in {0:?} status")]
    InvalidStatusForEditing(TransactionStatus),

    #[error("Transaction signatures cannot be changed in {0:?} status")]
    InvalidStatusForSigning(TransactionStatus),

    #[error("Transaction hash cannot be set in {0:?} status")]
    InvalidStatusForSetHash(TransactionStatus),

    #[error("Illegal state transition: {verb} transaction from {from:?}")]
    IllegalTransition {
        verb: &'static str,
        from: TransactionStatus,
    },

    #[error("Transaction sender is not set")]
    SenderNotSet,

    #[error("Transaction recipient is not set")]
    RecipientNotSet,

    #[error("Transaction amount is not set")]
    AmountNotSet,

    #[error("Transaction fee is not set")]
    FeeNotSet,

    #[error("Transaction hash is not set")]
    TransactionHashNotSet,

    #[error("Transaction hash is not 32 bytes of hex: {0}")]
    MalformedTransactionHash(String),
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for WalletError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}
