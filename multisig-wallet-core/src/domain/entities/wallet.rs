//! Wallet entity and related value objects
//!
//! A wallet starts as a local draft, collects its owners, and is then deployed
//! as a multisig contract. Its persisted status only ever changes through the
//! transition methods below; an illegal transition is reported as
//! `WalletError::InvalidStateTransition` and leaves the wallet untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::error::WalletError;
use crate::shared::types::{Address, WalletId};

/// Persisted deployment status, declared in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletStatus {
    NewDraft,
    ReadyToDeploy,
    DeploymentStarted,
    AddressKnown,
    DeploymentAcceptedByBlockchain,
    DeploymentSuccess,
    DeploymentFailed,
    ReadyToUse,
}

/// Role an owner plays in the multisig
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OwnerType {
    ThisDevice,
    BrowserExtension,
    PaperWallet,
}

impl OwnerType {
    pub const ALL: [OwnerType; 3] = [
        OwnerType::ThisDevice,
        OwnerType::BrowserExtension,
        OwnerType::PaperWallet,
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            OwnerType::ThisDevice => "thisDevice",
            OwnerType::BrowserExtension => "browserExtension",
            OwnerType::PaperWallet => "paperWallet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub address: Address,
}

impl Owner {
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Multisig wallet entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    id: WalletId,
    owners: BTreeMap<OwnerType, Owner>,
    address: Option<Address>,
    status: WalletStatus,
}

impl Wallet {
    /// Create a new draft wallet with its first owner
    pub fn new(id: WalletId, owner: Owner, kind: OwnerType) -> Self {
        let mut owners = BTreeMap::new();
        owners.insert(kind, owner);
        Self {
            id,
            owners,
            address: None,
            status: WalletStatus::NewDraft,
        }
    }

    pub fn id(&self) -> &WalletId {
        &self.id
    }

    pub fn status(&self) -> WalletStatus {
        self.status
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn owner(&self, kind: OwnerType) -> Option<&Owner> {
        self.owners.get(&kind)
    }

    pub fn owners(&self) -> impl Iterator<Item = (&OwnerType, &Owner)> {
        self.owners.iter()
    }

    pub fn has_all_owners(&self) -> bool {
        OwnerType::ALL.iter().all(|kind| self.owners.contains_key(kind))
    }

    // Owners

    pub fn add_owner(&mut self, owner: Owner, kind: OwnerType) -> Result<(), WalletError> {
        self.assert_owners_editable("add_owner")?;
        if self.owners.contains_key(&kind) {
            return Err(WalletError::OwnerAlreadyExists(kind));
        }
        self.owners.insert(kind, owner);
        Ok(())
    }

    pub fn replace_owner(&mut self, owner: Owner, kind: OwnerType) -> Result<(), WalletError> {
        self.assert_owners_editable("replace_owner")?;
        match self.owners.get_mut(&kind) {
            Some(existing) => {
                *existing = owner;
                Ok(())
            }
            None => Err(WalletError::OwnerNotFound(kind)),
        }
    }

    pub fn remove_owner(&mut self, kind: OwnerType) -> Result<Owner, WalletError> {
        self.assert_owners_editable("remove_owner")?;
        self.owners.remove(&kind).ok_or(WalletError::OwnerNotFound(kind))
    }

    fn assert_owners_editable(&self, operation: &'static str) -> Result<(), WalletError> {
        match self.status {
            WalletStatus::NewDraft | WalletStatus::ReadyToDeploy | WalletStatus::ReadyToUse => Ok(()),
            _ => Err(self.illegal(operation)),
        }
    }

    // Deployment pipeline

    pub fn mark_ready_to_deploy(&mut self) -> Result<(), WalletError> {
        self.assert_status("mark_ready_to_deploy", &[WalletStatus::NewDraft])?;
        if !self.has_all_owners() {
            return Err(WalletError::OneOrMoreOwnersAreMissing);
        }
        self.status = WalletStatus::ReadyToDeploy;
        Ok(())
    }

    pub fn start_deployment(&mut self) -> Result<(), WalletError> {
        self.assert_status("start_deployment", &[WalletStatus::ReadyToDeploy])?;
        self.status = WalletStatus::DeploymentStarted;
        Ok(())
    }

    /// Assign the address the wallet contract will be deployed to. Allowed
    /// once per deployment attempt.
    pub fn change_blockchain_address(&mut self, address: Address) -> Result<(), WalletError> {
        self.assert_status("change_blockchain_address", &[WalletStatus::DeploymentStarted])?;
        if self.address.is_some() {
            return Err(WalletError::BlockchainAddressAlreadySet);
        }
        self.address = Some(address);
        self.status = WalletStatus::AddressKnown;
        Ok(())
    }

    pub fn mark_deployment_accepted_by_blockchain(&mut self) -> Result<(), WalletError> {
        self.assert_status(
            "mark_deployment_accepted_by_blockchain",
            &[WalletStatus::AddressKnown],
        )?;
        self.status = WalletStatus::DeploymentAcceptedByBlockchain;
        Ok(())
    }

    pub fn mark_deployment_success(&mut self) -> Result<(), WalletError> {
        self.assert_status(
            "mark_deployment_success",
            &[WalletStatus::DeploymentAcceptedByBlockchain],
        )?;
        self.status = WalletStatus::DeploymentSuccess;
        Ok(())
    }

    pub fn mark_deployment_failed(&mut self) -> Result<(), WalletError> {
        self.assert_status(
            "mark_deployment_failed",
            &[
                WalletStatus::DeploymentStarted,
                WalletStatus::AddressKnown,
                WalletStatus::DeploymentAcceptedByBlockchain,
            ],
        )?;
        self.status = WalletStatus::DeploymentFailed;
        Ok(())
    }

    /// Force the wallet back to `ReadyToDeploy`, dropping the address of the
    /// abandoned attempt.
    pub fn abort_deployment(&mut self) -> Result<(), WalletError> {
        self.assert_status(
            "abort_deployment",
            &[
                WalletStatus::DeploymentStarted,
                WalletStatus::AddressKnown,
                WalletStatus::DeploymentAcceptedByBlockchain,
                WalletStatus::DeploymentFailed,
            ],
        )?;
        self.address = None;
        self.status = WalletStatus::ReadyToDeploy;
        Ok(())
    }

    pub fn finish_deployment(&mut self) -> Result<(), WalletError> {
        self.assert_status("finish_deployment", &[WalletStatus::DeploymentSuccess])?;
        self.status = WalletStatus::ReadyToUse;
        Ok(())
    }

    fn assert_status(&self, operation: &'static str, allowed: &[WalletStatus]) -> Result<(), WalletError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(self.illegal(operation))
        }
    }

    fn illegal(&self, operation: &'static str) -> WalletError {
        log::error!(
            "Illegal wallet transition: {} from {:?} (wallet {})",
            operation,
            self.status,
            self.id
        );
        WalletError::InvalidStateTransition {
            operation,
            from: self.status,
        }
    }
}
