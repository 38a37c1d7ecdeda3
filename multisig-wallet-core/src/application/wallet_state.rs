//! Effective wallet state
//!
//! What observers see is not the persisted `WalletStatus` alone. While the
//! wallet waits for funding its state also depends on the live balance of
//! the deployment account, so it is recomputed on every query.

use serde::{Deserialize, Serialize};

use crate::domain::entities::WalletStatus;
use crate::shared::types::TokenInt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletState {
    /// No wallet is selected
    None,
    NewDraft,
    ReadyToDeploy,
    DeploymentStarted,
    AddressKnown,
    NotEnoughFunds,
    AccountFunded,
    DeploymentAcceptedByBlockchain,
    DeploymentSuccess,
    DeploymentFailed,
    ReadyToUse,
}

/// States in which the deployment account may be written
pub const VALID_ACCOUNT_UPDATE_STATES: [WalletState; 7] = [
    WalletState::AddressKnown,
    WalletState::ReadyToUse,
    WalletState::NotEnoughFunds,
    WalletState::AccountFunded,
    WalletState::DeploymentAcceptedByBlockchain,
    WalletState::DeploymentSuccess,
    WalletState::DeploymentFailed,
];

impl WalletState {
    /// Derive the effective state from the persisted status and the
    /// deployment account's balance and funding threshold.
    ///
    /// A zero threshold with a zero balance reads as `AddressKnown`, meaning
    /// the threshold has not been set yet.
    pub fn derive(status: WalletStatus, balance: TokenInt, minimum_amount: TokenInt) -> Self {
        match status {
            WalletStatus::NewDraft => WalletState::NewDraft,
            WalletStatus::ReadyToDeploy => WalletState::ReadyToDeploy,
            WalletStatus::DeploymentStarted => WalletState::DeploymentStarted,
            WalletStatus::AddressKnown => {
                if minimum_amount == 0 && balance == 0 {
                    WalletState::AddressKnown
                } else if balance < minimum_amount {
                    WalletState::NotEnoughFunds
                } else {
                    WalletState::AccountFunded
                }
            }
            WalletStatus::DeploymentAcceptedByBlockchain => WalletState::DeploymentAcceptedByBlockchain,
            WalletStatus::DeploymentSuccess => WalletState::DeploymentSuccess,
            WalletStatus::DeploymentFailed => WalletState::DeploymentFailed,
            WalletStatus::ReadyToUse => WalletState::ReadyToUse,
        }
    }

    pub fn allows_account_update(&self) -> bool {
        VALID_ACCOUNT_UPDATE_STATES.contains(self)
    }

    /// True while the balance observer should keep acting on updates
    pub fn is_awaiting_funds(&self) -> bool {
        matches!(self, WalletState::NotEnoughFunds | WalletState::AccountFunded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_known_split_by_balance() {
        let status = WalletStatus::AddressKnown;
        assert_eq!(WalletState::derive(status, 0, 0), WalletState::AddressKnown);
        assert_eq!(WalletState::derive(status, 0, 100), WalletState::NotEnoughFunds);
        assert_eq!(WalletState::derive(status, 50, 100), WalletState::NotEnoughFunds);
        assert_eq!(WalletState::derive(status, 100, 100), WalletState::AccountFunded);
        assert_eq!(WalletState::derive(status, 150, 100), WalletState::AccountFunded);
        assert_eq!(WalletState::derive(status, 5, 0), WalletState::AccountFunded);
    }

    #[test]
    fn test_other_statuses_ignore_balance() {
        assert_eq!(
            WalletState::derive(WalletStatus::DeploymentStarted, 500, 100),
            WalletState::DeploymentStarted
        );
        assert_eq!(WalletState::derive(WalletStatus::ReadyToUse, 0, 100), WalletState::ReadyToUse);
    }

    #[test]
    fn test_account_update_whitelist() {
        assert!(WalletState::AddressKnown.allows_account_update());
        assert!(WalletState::NotEnoughFunds.allows_account_update());
        assert!(!WalletState::DeploymentStarted.allows_account_update());
        assert!(!WalletState::NewDraft.allows_account_update());
        assert!(!WalletState::None.allows_account_update());
    }
}
