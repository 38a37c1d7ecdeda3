//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use multisig_wallet_core::{
    Address, BalanceObservation, BalanceObserver, BalanceObserverResponse, BlockchainDomainService, DeploymentConfig,
    DomainContext, InMemoryAccountRepository, InMemoryPortfolioRepository, InMemoryWalletRepository,
    OwnerType, TokenInt, TransactionHash, Wallet, WalletApplicationService, WalletCreationData,
    WalletError, WalletId, WalletRepository, WalletStatus,
};

pub const WALLET_ADDRESS: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const EXTENSION: &str = "0x1111111111111111111111111111111111111111";
pub const PAPER: &str = "0x2222222222222222222222222222222222222222";
pub const DEPLOYMENT_FEE: TokenInt = 100;

/// Observation handle that only records cancellation
pub struct ScriptedObservation {
    active: Arc<AtomicBool>,
}

impl BalanceObservation for ScriptedObservation {
    fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

struct RegisteredObserver {
    address: Address,
    observer: Arc<dyn BalanceObserver>,
    active: Arc<AtomicBool>,
}

/// Blockchain collaborator with scripted answers that records what it was asked
pub struct ScriptedBlockchain {
    generated_keys: AtomicUsize,
    creation_data: Mutex<Result<WalletCreationData, WalletError>>,
    creation_result: Mutex<Result<TransactionHash, WalletError>>,
    confirmation: Mutex<Result<bool, WalletError>>,
    balance: Mutex<Result<TokenInt, WalletError>>,
    /// Every observer ever registered, oldest first
    observers: Mutex<Vec<RegisteredObserver>>,
    creation_requests: Mutex<Vec<(Vec<Address>, usize)>>,
    removed_accounts: Mutex<Vec<Address>>,
    executions: AtomicUsize,
    confirmations_awaited: AtomicUsize,
    /// When set, wallet creation blocks until released
    execution_gate: Mutex<Option<Arc<Notify>>>,
    pub execution_started: Notify,
}

impl ScriptedBlockchain {
    pub fn new() -> Self {
        Self {
            generated_keys: AtomicUsize::new(0),
            creation_data: Mutex::new(Ok(WalletCreationData {
                wallet_address: WALLET_ADDRESS.to_string(),
                fee: DEPLOYMENT_FEE,
            })),
            creation_result: Mutex::new(Ok(TransactionHash::new(format!("0x{}", "cd".repeat(32))))),
            confirmation: Mutex::new(Ok(true)),
            balance: Mutex::new(Ok(0)),
            observers: Mutex::new(Vec::new()),
            creation_requests: Mutex::new(Vec::new()),
            removed_accounts: Mutex::new(Vec::new()),
            executions: AtomicUsize::new(0),
            confirmations_awaited: AtomicUsize::new(0),
            execution_gate: Mutex::new(None),
            execution_started: Notify::new(),
        }
    }

    pub fn set_creation_data(&self, result: Result<WalletCreationData, WalletError>) {
        *self.creation_data.lock().unwrap() = result;
    }

    pub fn set_creation_result(&self, result: Result<TransactionHash, WalletError>) {
        *self.creation_result.lock().unwrap() = result;
    }

    pub fn set_confirmation(&self, result: Result<bool, WalletError>) {
        *self.confirmation.lock().unwrap() = result;
    }

    pub fn set_balance(&self, result: Result<TokenInt, WalletError>) {
        *self.balance.lock().unwrap() = result;
    }

    pub fn hold_execution(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.execution_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn confirmations_awaited(&self) -> usize {
        self.confirmations_awaited.load(Ordering::SeqCst)
    }

    pub fn creation_requests(&self) -> Vec<(Vec<Address>, usize)> {
        self.creation_requests.lock().unwrap().clone()
    }

    pub fn removed_accounts(&self) -> Vec<Address> {
        self.removed_accounts.lock().unwrap().clone()
    }

    pub fn observed_address(&self) -> Option<Address> {
        self.observers.lock().unwrap().last().map(|registered| registered.address.clone())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    /// Whether the observation registered `index`-th is still active
    pub fn is_observation_active(&self, index: usize) -> bool {
        self.observers.lock().unwrap()[index].active.load(Ordering::SeqCst)
    }

    /// Deliver a balance update to the most recent observer
    pub async fn push_balance(&self, balance: TokenInt) -> BalanceObserverResponse {
        let index = self.observer_count().checked_sub(1).expect("no balance observer registered");
        self.push_balance_to(index, balance).await
    }

    /// Deliver a balance update to the `index`-th registered observer, even
    /// after its observation was cancelled, as a late callback would
    pub async fn push_balance_to(&self, index: usize, balance: TokenInt) -> BalanceObserverResponse {
        let (address, observer) = {
            let observers = self.observers.lock().unwrap();
            let registered = &observers[index];
            (registered.address.clone(), registered.observer.clone())
        };
        observer.did_update_balance(&address, balance).await
    }
}

#[async_trait]
impl BlockchainDomainService for ScriptedBlockchain {
    async fn generate_externally_owned_account(&self) -> Result<Address, WalletError> {
        let index = self.generated_keys.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("0x{:040x}", index))
    }

    async fn remove_externally_owned_account(&self, address: &str) -> Result<(), WalletError> {
        self.removed_accounts.lock().unwrap().push(address.to_string());
        Ok(())
    }

    async fn request_wallet_creation_data(
        &self,
        owners: &[Address],
        confirmation_count: usize,
    ) -> Result<WalletCreationData, WalletError> {
        self.creation_requests
            .lock()
            .unwrap()
            .push((owners.to_vec(), confirmation_count));
        self.creation_data.lock().unwrap().clone()
    }

    async fn execute_wallet_creation_transaction(&self, _address: &str) -> Result<TransactionHash, WalletError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.execution_started.notify_one();
        let gate = self.execution_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        tokio::task::yield_now().await;
        self.creation_result.lock().unwrap().clone()
    }

    async fn wait_for_pending_transaction(&self, _hash: &TransactionHash) -> Result<bool, WalletError> {
        self.confirmations_awaited.fetch_add(1, Ordering::SeqCst);
        self.confirmation.lock().unwrap().clone()
    }

    async fn observe_balance(
        &self,
        address: &str,
        observer: Arc<dyn BalanceObserver>,
    ) -> Result<Box<dyn BalanceObservation>, WalletError> {
        let active = Arc::new(AtomicBool::new(true));
        self.observers.lock().unwrap().push(RegisteredObserver {
            address: address.to_string(),
            observer,
            active: active.clone(),
        });
        Ok(Box::new(ScriptedObservation { active }))
    }

    async fn balance(&self, _address: &str) -> Result<TokenInt, WalletError> {
        self.balance.lock().unwrap().clone()
    }
}

/// Wallet repository that remembers every persisted status
#[derive(Default)]
pub struct RecordingWalletRepository {
    inner: InMemoryWalletRepository,
    statuses: Mutex<Vec<WalletStatus>>,
}

impl RecordingWalletRepository {
    pub fn statuses(&self) -> Vec<WalletStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletRepository for RecordingWalletRepository {
    fn next_id(&self) -> WalletId {
        self.inner.next_id()
    }

    async fn save(&self, wallet: &Wallet) -> Result<(), WalletError> {
        self.inner.save(wallet).await?;
        self.statuses.lock().unwrap().push(wallet.status());
        Ok(())
    }

    async fn find_by_id(&self, id: &WalletId) -> Result<Option<Wallet>, WalletError> {
        self.inner.find_by_id(id).await
    }
}

pub struct Harness {
    pub service: WalletApplicationService,
    pub blockchain: Arc<ScriptedBlockchain>,
    pub wallets: Arc<RecordingWalletRepository>,
}

pub fn harness() -> Harness {
    let blockchain = Arc::new(ScriptedBlockchain::new());
    let wallets = Arc::new(RecordingWalletRepository::default());
    let context = DomainContext::new(
        wallets.clone(),
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryPortfolioRepository::new()),
        blockchain.clone(),
    );
    Harness {
        service: WalletApplicationService::new(context, DeploymentConfig::default()),
        blockchain,
        wallets,
    }
}

/// A selected wallet with all three owners, ready to deploy
pub async fn ready_harness() -> Harness {
    let harness = harness();
    harness.service.create_new_draft_wallet().await.expect("draft wallet");
    harness
        .service
        .add_owner(EXTENSION, OwnerType::BrowserExtension)
        .await
        .expect("extension owner");
    harness
        .service
        .add_owner(PAPER, OwnerType::PaperWallet)
        .await
        .expect("paper wallet owner");
    harness
}
