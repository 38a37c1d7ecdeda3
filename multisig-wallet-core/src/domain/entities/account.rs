//! Account entity: a wallet's balance of one token

use serde::{Deserialize, Serialize};

use crate::shared::types::{AccountId, TokenInt, WalletId};

/// Last observed on-chain balance of a token held by a wallet.
///
/// Balance and funding threshold are written by the deployment orchestrator
/// only, so the setters are crate-private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    balance: TokenInt,
    minimum_deployment_transaction_amount: TokenInt,
}

impl Account {
    pub fn new(id: AccountId, balance: TokenInt, minimum_amount: TokenInt) -> Self {
        Self {
            id,
            balance,
            minimum_deployment_transaction_amount: minimum_amount,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn wallet_id(&self) -> &WalletId {
        &self.id.wallet_id
    }

    pub fn token(&self) -> &str {
        &self.id.token
    }

    pub fn balance(&self) -> TokenInt {
        self.balance
    }

    pub fn minimum_deployment_transaction_amount(&self) -> TokenInt {
        self.minimum_deployment_transaction_amount
    }

    pub(crate) fn update(&mut self, new_amount: TokenInt) {
        self.balance = new_amount;
    }

    pub(crate) fn update_minimum_transaction_amount(&mut self, new_amount: TokenInt) {
        self.minimum_deployment_transaction_amount = new_amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_updates() {
        let mut account = Account::new(AccountId::new("ETH", WalletId::from("w")), 0, 0);
        account.update(50);
        account.update_minimum_transaction_amount(100);

        assert_eq!(account.balance(), 50);
        assert_eq!(account.minimum_deployment_transaction_amount(), 100);
        assert_eq!(account.token(), "ETH");
        assert_eq!(account.wallet_id(), &WalletId::from("w"));
    }
}
