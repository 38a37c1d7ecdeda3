//! Portfolio entity: the set of wallets known to this device

use serde::{Deserialize, Serialize};

use crate::shared::error::WalletError;
use crate::shared::types::{PortfolioId, WalletId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    id: PortfolioId,
    wallets: Vec<WalletId>,
    selected_wallet: Option<WalletId>,
}

impl Portfolio {
    pub fn new(id: PortfolioId) -> Self {
        Self {
            id,
            wallets: Vec::new(),
            selected_wallet: None,
        }
    }

    pub fn id(&self) -> &PortfolioId {
        &self.id
    }

    pub fn wallets(&self) -> &[WalletId] {
        &self.wallets
    }

    pub fn selected_wallet(&self) -> Option<&WalletId> {
        self.selected_wallet.as_ref()
    }

    /// Add a wallet and make it the selected one
    pub fn add_wallet(&mut self, wallet_id: WalletId) -> Result<(), WalletError> {
        if self.wallets.contains(&wallet_id) {
            return Err(WalletError::WalletAlreadyExists(wallet_id.to_string()));
        }
        self.wallets.push(wallet_id.clone());
        self.selected_wallet = Some(wallet_id);
        Ok(())
    }

    pub fn select_wallet(&mut self, wallet_id: &WalletId) -> Result<(), WalletError> {
        if !self.wallets.contains(wallet_id) {
            return Err(WalletError::SelectedWalletNotFound);
        }
        self.selected_wallet = Some(wallet_id.clone());
        Ok(())
    }

    pub fn remove_wallet(&mut self, wallet_id: &WalletId) {
        self.wallets.retain(|id| id != wallet_id);
        if self.selected_wallet.as_ref() == Some(wallet_id) {
            self.selected_wallet = None;
        }
    }
}
