//! Transaction entity
//!
//! A transaction is an operation on an account of a wallet. What may be edited
//! and which lifecycle verbs are legal is decided by the state object of its
//! current status (see `transaction_state`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::transaction_state::{Stamp, TransactionState, TransactionStatus, Transition};
use crate::shared::error::TransactionError;
use crate::shared::types::{AccountId, Address, TokenAmount, TransactionHash, TransactionId, WalletId};
use crate::shared::utils::now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletOperation {
    Call,
    DelegateCall,
    Create,
}

/// Estimate of transaction fees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFeeEstimate {
    pub gas: u64,
    pub data_gas: u64,
    pub operational_gas: u64,
    pub gas_price: TokenAmount,
}

/// Owner's signature of the transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub address: Address,
    pub data: Vec<u8>,
}

impl Signature {
    pub fn new(data: Vec<u8>, address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
            data,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0x{}", self.address, hex::encode(&self.data))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    transaction_type: TransactionType,
    wallet_id: WalletId,
    account_id: AccountId,
    status: TransactionStatus,
    sender: Option<Address>,
    recipient: Option<Address>,
    amount: Option<TokenAmount>,
    fee: Option<TokenAmount>,
    fee_estimate: Option<TransactionFeeEstimate>,
    data: Option<Vec<u8>>,
    operation: Option<WalletOperation>,
    nonce: Option<String>,
    /// Wallet-specific transaction hash
    hash: Option<Vec<u8>>,
    /// Blockchain transaction hash
    transaction_hash: Option<TransactionHash>,
    signatures: Vec<Signature>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
    rejected_date: Option<DateTime<Utc>>,
    submitted_date: Option<DateTime<Utc>>,
    processed_date: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        transaction_type: TransactionType,
        wallet_id: WalletId,
        account_id: AccountId,
    ) -> Self {
        let created = now();
        Self {
            id,
            transaction_type,
            wallet_id,
            account_id,
            status: TransactionStatus::Draft,
            sender: None,
            recipient: None,
            amount: None,
            fee: None,
            fee_estimate: None,
            data: None,
            operation: None,
            nonce: None,
            hash: None,
            transaction_hash: None,
            signatures: Vec::new(),
            created_date: created,
            updated_date: created,
            rejected_date: None,
            submitted_date: None,
            processed_date: None,
        }
    }

    // Querying transaction data

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn wallet_id(&self) -> &WalletId {
        &self.wallet_id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    pub fn recipient(&self) -> Option<&Address> {
        self.recipient.as_ref()
    }

    pub fn amount(&self) -> Option<&TokenAmount> {
        self.amount.as_ref()
    }

    pub fn fee(&self) -> Option<&TokenAmount> {
        self.fee.as_ref()
    }

    pub fn fee_estimate(&self) -> Option<&TransactionFeeEstimate> {
        self.fee_estimate.as_ref()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn operation(&self) -> Option<WalletOperation> {
        self.operation
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }

    pub fn transaction_hash(&self) -> Option<&TransactionHash> {
        self.transaction_hash.as_ref()
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn updated_date(&self) -> DateTime<Utc> {
        self.updated_date
    }

    pub fn rejected_date(&self) -> Option<DateTime<Utc>> {
        self.rejected_date
    }

    pub fn submitted_date(&self) -> Option<DateTime<Utc>> {
        self.submitted_date
    }

    pub fn processed_date(&self) -> Option<DateTime<Utc>> {
        self.processed_date
    }

    pub fn is_signed_by(&self, address: &str) -> bool {
        self.signatures.iter().any(|s| s.address == address)
    }

    fn state(&self) -> &'static dyn TransactionState {
        self.status.state()
    }

    // Changing transaction's status

    pub fn proceed(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().proceed(self)?;
        Ok(self.apply(transition))
    }

    pub fn reject(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().reject(self)?;
        Ok(self.apply(transition))
    }

    pub fn succeed(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().succeed(self)?;
        Ok(self.apply(transition))
    }

    pub fn fail(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().fail(self)?;
        Ok(self.apply(transition))
    }

    pub fn discard(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().discard(self)?;
        Ok(self.apply(transition))
    }

    /// Bring a discarded transaction back to draft. Parameters survive,
    /// everything recorded about its blockchain life does not.
    pub fn reset(&mut self) -> Result<&mut Self, TransactionError> {
        let transition = self.state().reset(self)?;
        Ok(self.apply(transition))
    }

    fn apply(&mut self, transition: Transition) -> &mut Self {
        let at = now();
        if transition.clears_blockchain_data {
            self.transaction_hash = None;
            self.rejected_date = None;
            self.submitted_date = None;
            self.processed_date = None;
            self.signatures.clear();
        }
        match transition.stamp {
            Some(Stamp::Rejected) => self.rejected_date = Some(at),
            Some(Stamp::Submitted) => self.submitted_date = Some(at),
            Some(Stamp::Processed) => self.processed_date = Some(at),
            None => {}
        }
        self.status = transition.to;
        self.updated_date = at;
        self
    }

    // Editing transaction draft

    pub fn change_sender(&mut self, sender: Option<Address>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.sender = sender;
        Ok(self.touch())
    }

    pub fn change_recipient(&mut self, recipient: Option<Address>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.recipient = recipient;
        Ok(self.touch())
    }

    pub fn change_amount(&mut self, amount: Option<TokenAmount>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.amount = amount;
        Ok(self.touch())
    }

    pub fn change_fee(&mut self, fee: Option<TokenAmount>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.fee = fee;
        Ok(self.touch())
    }

    pub fn change_fee_estimate(
        &mut self,
        fee_estimate: Option<TransactionFeeEstimate>,
    ) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.fee_estimate = fee_estimate;
        Ok(self.touch())
    }

    pub fn change_data(&mut self, data: Option<Vec<u8>>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.data = data;
        Ok(self.touch())
    }

    pub fn change_operation(&mut self, operation: Option<WalletOperation>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.operation = operation;
        Ok(self.touch())
    }

    pub fn change_nonce(&mut self, nonce: Option<String>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.nonce = nonce;
        Ok(self.touch())
    }

    pub fn change_hash(&mut self, hash: Option<Vec<u8>>) -> Result<&mut Self, TransactionError> {
        self.assert_can_change_parameters()?;
        self.hash = hash;
        Ok(self.touch())
    }

    fn assert_can_change_parameters(&self) -> Result<(), TransactionError> {
        if self.state().can_change_parameters() {
            Ok(())
        } else {
            log::error!("Transaction {} cannot be edited in {:?}", self.id, self.status);
            Err(TransactionError::InvalidStatusForEditing(self.status))
        }
    }

    /// Set the hash of the transaction, retrieved from a blockchain or pre-calculated
    pub fn set_transaction_hash(&mut self, hash: TransactionHash) -> Result<&mut Self, TransactionError> {
        if !self.state().can_change_blockchain_hash() {
            log::error!("Transaction {} hash cannot be set in {:?}", self.id, self.status);
            return Err(TransactionError::InvalidStatusForSetHash(self.status));
        }
        if !hash.is_well_formed() {
            log::error!("Transaction {} got malformed hash {}", self.id, hash);
            return Err(TransactionError::MalformedTransactionHash(hash.value().to_string()));
        }
        self.transaction_hash = Some(hash);
        Ok(self.touch())
    }

    // Signing transaction

    pub fn add_signature(&mut self, signature: Signature) -> Result<&mut Self, TransactionError> {
        self.assert_signatures_editable()?;
        if self.signatures.contains(&signature) {
            return Ok(self);
        }
        self.signatures.push(signature);
        Ok(self.touch())
    }

    pub fn remove_signature(&mut self, signature: &Signature) -> Result<&mut Self, TransactionError> {
        self.assert_signatures_editable()?;
        let index = self.signatures.iter().position(|s| s == signature);
        match index {
            Some(index) => {
                self.signatures.remove(index);
                Ok(self.touch())
            }
            None => Ok(self),
        }
    }

    fn assert_signatures_editable(&self) -> Result<(), TransactionError> {
        if self.state().can_change_signatures() {
            Ok(())
        } else {
            log::error!("Transaction {} signatures cannot change in {:?}", self.id, self.status);
            Err(TransactionError::InvalidStatusForSigning(self.status))
        }
    }

    fn touch(&mut self) -> &mut Self {
        self.updated_date = now();
        self
    }
}
