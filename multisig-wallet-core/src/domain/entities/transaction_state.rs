//! Transaction state objects
//!
//! Every status is backed by a state object that answers two questions: which
//! fields of the transaction may change right now, and what a lifecycle verb
//! does from here. Verbs never mutate the transaction themselves; they inspect
//! it and return the `Transition` to apply, or an error when the verb is not
//! legal in the current status.
//!
//! ```text
//! draft -> signing -> pending -> success | failed
//!            |
//!            +-----> rejected
//! any (except discarded) -> discarded -> (reset) -> draft
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::entities::transaction::Transaction;
use crate::shared::error::TransactionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionStatus {
    /// Any data may change
    Draft,
    /// Parameters are frozen, signatures may still be collected
    Signing,
    /// Submitted to the blockchain
    Pending,
    /// Rejected by an owner, never submitted
    Rejected,
    /// Rejected by the blockchain
    Failed,
    /// Processed and included in the blockchain
    Success,
    /// Archived by the user, still kept in the list
    Discarded,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 7] = [
        TransactionStatus::Draft,
        TransactionStatus::Signing,
        TransactionStatus::Pending,
        TransactionStatus::Rejected,
        TransactionStatus::Failed,
        TransactionStatus::Success,
        TransactionStatus::Discarded,
    ];

    /// State object governing this status
    pub fn state(self) -> &'static dyn TransactionState {
        match self {
            TransactionStatus::Draft => &DraftState,
            TransactionStatus::Signing => &SigningState,
            TransactionStatus::Pending => &PendingState,
            TransactionStatus::Rejected => &RejectedState,
            TransactionStatus::Failed => &FailedState,
            TransactionStatus::Success => &SuccessState,
            TransactionStatus::Discarded => &DiscardedState,
        }
    }
}

/// Timestamp recorded together with a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Rejected,
    Submitted,
    Processed,
}

/// Outcome of a legal verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: TransactionStatus,
    pub stamp: Option<Stamp>,
    pub clears_blockchain_data: bool,
}

impl Transition {
    fn to(status: TransactionStatus) -> Self {
        Self {
            to: status,
            stamp: None,
            clears_blockchain_data: false,
        }
    }

    fn stamped(status: TransactionStatus, stamp: Stamp) -> Self {
        Self {
            to: status,
            stamp: Some(stamp),
            clears_blockchain_data: false,
        }
    }
}

pub trait TransactionState: Send + Sync {
    fn status(&self) -> TransactionStatus;

    fn can_change_parameters(&self) -> bool {
        false
    }

    fn can_change_blockchain_hash(&self) -> bool {
        false
    }

    fn can_change_signatures(&self) -> bool {
        false
    }

    fn proceed(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("proceed"))
    }

    fn reject(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("reject"))
    }

    fn succeed(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("succeed"))
    }

    fn fail(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("fail"))
    }

    fn discard(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Ok(Transition::to(TransactionStatus::Discarded))
    }

    fn reset(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("reset"))
    }

    fn illegal(&self, verb: &'static str) -> TransactionError {
        log::error!("Illegal state transition: {} transaction from {:?}", verb, self.status());
        TransactionError::IllegalTransition {
            verb,
            from: self.status(),
        }
    }
}

struct DraftState;

impl TransactionState for DraftState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Draft
    }

    fn can_change_parameters(&self) -> bool {
        true
    }

    fn can_change_blockchain_hash(&self) -> bool {
        true
    }

    fn can_change_signatures(&self) -> bool {
        true
    }

    fn proceed(&self, tx: &Transaction) -> Result<Transition, TransactionError> {
        if tx.sender().is_none() {
            return Err(TransactionError::SenderNotSet);
        }
        if tx.recipient().is_none() {
            return Err(TransactionError::RecipientNotSet);
        }
        if tx.amount().is_none() {
            return Err(TransactionError::AmountNotSet);
        }
        if tx.fee().is_none() {
            return Err(TransactionError::FeeNotSet);
        }
        Ok(Transition::to(TransactionStatus::Signing))
    }
}

struct SigningState;

impl TransactionState for SigningState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Signing
    }

    fn can_change_blockchain_hash(&self) -> bool {
        true
    }

    fn can_change_signatures(&self) -> bool {
        true
    }

    fn proceed(&self, tx: &Transaction) -> Result<Transition, TransactionError> {
        if tx.transaction_hash().is_none() {
            return Err(TransactionError::TransactionHashNotSet);
        }
        Ok(Transition::stamped(TransactionStatus::Pending, Stamp::Submitted))
    }

    fn reject(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Ok(Transition::stamped(TransactionStatus::Rejected, Stamp::Rejected))
    }
}

struct PendingState;

impl TransactionState for PendingState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Pending
    }

    fn succeed(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Ok(Transition::stamped(TransactionStatus::Success, Stamp::Processed))
    }

    fn fail(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Ok(Transition::stamped(TransactionStatus::Failed, Stamp::Processed))
    }
}

struct RejectedState;

impl TransactionState for RejectedState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Rejected
    }
}

struct FailedState;

impl TransactionState for FailedState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Failed
    }
}

struct SuccessState;

impl TransactionState for SuccessState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Success
    }
}

struct DiscardedState;

impl TransactionState for DiscardedState {
    fn status(&self) -> TransactionStatus {
        TransactionStatus::Discarded
    }

    fn discard(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Err(self.illegal("discard"))
    }

    fn reset(&self, _tx: &Transaction) -> Result<Transition, TransactionError> {
        Ok(Transition {
            to: TransactionStatus::Draft,
            stamp: None,
            clears_blockchain_data: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_objects_report_their_status() {
        for status in TransactionStatus::ALL {
            assert_eq!(status.state().status(), status);
        }
    }

    #[test]
    fn test_capabilities() {
        let draft = TransactionStatus::Draft.state();
        assert!(draft.can_change_parameters());
        assert!(draft.can_change_signatures());
        assert!(draft.can_change_blockchain_hash());

        let signing = TransactionStatus::Signing.state();
        assert!(!signing.can_change_parameters());
        assert!(signing.can_change_signatures());
        assert!(signing.can_change_blockchain_hash());

        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Rejected,
            TransactionStatus::Failed,
            TransactionStatus::Success,
            TransactionStatus::Discarded,
        ] {
            let state = status.state();
            assert!(!state.can_change_parameters());
            assert!(!state.can_change_signatures());
            assert!(!state.can_change_blockchain_hash());
        }
    }
}
