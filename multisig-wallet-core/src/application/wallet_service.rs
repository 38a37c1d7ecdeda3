//! Wallet deployment orchestration
//!
//! `WalletApplicationService` drives the selected wallet from a local draft to
//! a deployed multisig contract:
//!
//! 1. `start_deployment` moves the wallet to `DeploymentStarted`, asks the
//!    blockchain for the contract address and funding fee, records both and
//!    starts observing the address balance.
//! 2. Balance updates are written to the deployment account. Once the account
//!    is funded the creation transaction is submitted, the wallet is marked as
//!    accepted by the blockchain, and the service waits for confirmation.
//! 3. On confirmation the temporary paper wallet key is removed and the wallet
//!    becomes ready to use. Any failure marks the deployment failed.
//!
//! The service holds no lock. Every resumption point re-reads the effective
//! wallet state and bails out when the pipeline has moved on, which makes
//! late and duplicate callbacks harmless.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::context::DomainContext;
use crate::application::status_updates::StatusUpdates;
use crate::application::wallet_state::WalletState;
use crate::domain::entities::{Account, Owner, OwnerType, Portfolio, Wallet, WalletStatus};
use crate::domain::services::{
    BalanceObservation, BalanceObserver, BalanceObserverResponse, WalletCreationData,
};
use crate::infrastructure::config::DeploymentConfig;
use crate::shared::error::WalletError;
use crate::shared::types::{AccountId, Address, TokenInt, WalletId};
use crate::shared::utils::validate_ethereum_address;

#[derive(Clone)]
pub struct WalletApplicationService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    context: DomainContext,
    config: DeploymentConfig,
    status_updates: StatusUpdates,
    observation: Mutex<ActiveObservation>,
}

/// Balance observation of the current deployment attempt. Observers of older
/// attempts compare their number against `attempt` and stand down.
#[derive(Default)]
struct ActiveObservation {
    attempt: u64,
    handle: Option<Box<dyn BalanceObservation>>,
}

fn log_failure(operation: &str, entity: impl fmt::Display, error: WalletError) -> WalletError {
    error!("Failed to {} ({}): {}", operation, entity, error);
    error
}

impl WalletApplicationService {
    pub fn new(context: DomainContext, config: DeploymentConfig) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                context,
                config,
                status_updates: StatusUpdates::new(),
                observation: Mutex::new(ActiveObservation::default()),
            }),
        }
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.inner.config
    }

    fn context(&self) -> &DomainContext {
        &self.inner.context
    }

    fn deployment_token(&self) -> &str {
        &self.inner.config.deployment_token
    }

    // Wallet state

    /// Effective state of the selected wallet, recomputed on every call
    pub async fn selected_wallet_state(&self) -> WalletState {
        match self.compute_selected_wallet_state().await {
            Ok(state) => state,
            Err(WalletError::SelectedWalletNotFound) => WalletState::None,
            Err(error) => {
                error!("Failed to compute selected wallet state: {}", error);
                WalletState::None
            }
        }
    }

    async fn compute_selected_wallet_state(&self) -> Result<WalletState, WalletError> {
        let wallet = self.find_selected_wallet().await?;
        if wallet.status() != WalletStatus::AddressKnown {
            return Ok(WalletState::derive(wallet.status(), 0, 0));
        }
        let account = self.find_account(wallet.id(), self.deployment_token()).await?;
        Ok(WalletState::derive(
            wallet.status(),
            account.balance(),
            account.minimum_deployment_transaction_amount(),
        ))
    }

    pub async fn has_ready_to_use_wallet(&self) -> bool {
        self.selected_wallet_state().await == WalletState::ReadyToUse
    }

    pub async fn selected_wallet_address(&self) -> Option<Address> {
        match self.find_selected_wallet().await {
            Ok(wallet) => wallet.address().cloned(),
            Err(error) => {
                error!("Error getting selected wallet: {}", error);
                None
            }
        }
    }

    pub async fn minimum_deployment_amount(&self) -> Option<TokenInt> {
        let wallet = self.find_selected_wallet().await.ok()?;
        self.find_account(wallet.id(), self.deployment_token())
            .await
            .ok()
            .map(|account| account.minimum_deployment_transaction_amount())
    }

    // Wallet

    /// Create a draft wallet owned by a fresh key of this device, together
    /// with its deployment account, and select it.
    pub async fn create_new_draft_wallet(&self) -> Result<(), WalletError> {
        self.notify_wallet_state_changes_after(async {
            let context = self.context();
            let mut portfolio = self.fetch_or_create_portfolio().await?;
            let address = context
                .blockchain_service
                .generate_externally_owned_account()
                .await
                .map_err(|e| log_failure("generate device key", "blockchain", e))?;
            let wallet = Wallet::new(
                context.wallet_repository.next_id(),
                Owner::new(address),
                OwnerType::ThisDevice,
            );
            let account = Account::new(AccountId::new(self.deployment_token(), wallet.id().clone()), 0, 0);
            portfolio.add_wallet(wallet.id().clone())?;

            context
                .wallet_repository
                .save(&wallet)
                .await
                .map_err(|e| log_failure("save wallet", wallet.id(), e))?;
            context
                .portfolio_repository
                .save(&portfolio)
                .await
                .map_err(|e| log_failure("save portfolio", portfolio.id(), e))?;
            context
                .account_repository
                .save(&account)
                .await
                .map_err(|e| log_failure("save account", account.id(), e))?;

            info!("Created draft wallet {}", wallet.id());
            Ok(())
        })
        .await
    }

    async fn fetch_or_create_portfolio(&self) -> Result<Portfolio, WalletError> {
        let repository = &self.context().portfolio_repository;
        match repository
            .portfolio()
            .await
            .map_err(|e| log_failure("fetch portfolio", "portfolio", e))?
        {
            Some(portfolio) => Ok(portfolio),
            None => Ok(Portfolio::new(repository.next_id())),
        }
    }

    /// Start deploying the selected wallet.
    ///
    /// Once the wallet has entered `DeploymentStarted`, any failure aborts the
    /// deployment before the error is returned.
    pub async fn start_deployment(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet("start deployment", Wallet::start_deployment)
            .await?;

        if let Err(error) = self.prepare_deployment().await {
            error!("Deployment preparation failed: {}", error);
            if let Err(abort_error) = self.abort_deployment().await {
                error!("Failed to abort deployment: {}", abort_error);
            }
            return Err(error);
        }
        Ok(())
    }

    async fn prepare_deployment(&self) -> Result<(), WalletError> {
        let data = self.request_wallet_creation().await?;
        let state = self.selected_wallet_state().await;
        if state != WalletState::DeploymentStarted {
            warn!(
                "Wallet left deployment ({:?}) while requesting creation data for {}",
                state, data.wallet_address
            );
            return Ok(());
        }
        self.assign_blockchain_address(data.wallet_address).await?;
        let token = self.deployment_token().to_string();
        self.update_minimum_funding(&token, data.fee).await?;
        self.start_observing_wallet_balance().await
    }

    async fn request_wallet_creation(&self) -> Result<WalletCreationData, WalletError> {
        let wallet = self.find_selected_wallet().await?;
        let owners: Vec<Address> = OwnerType::ALL
            .iter()
            .filter_map(|kind| wallet.owner(*kind).map(|owner| owner.address.clone()))
            .collect();
        if owners.len() != OwnerType::ALL.len() {
            return Err(WalletError::OneOrMoreOwnersAreMissing);
        }
        let confirmation_count = self.inner.config.required_confirmation_count;
        self.context()
            .blockchain_service
            .request_wallet_creation_data(&owners, confirmation_count)
            .await
            .map_err(|e| log_failure("request wallet creation data", wallet.id(), e))
    }

    async fn assign_blockchain_address(&self, address: Address) -> Result<(), WalletError> {
        self.mutate_selected_wallet("assign blockchain address", move |wallet| {
            wallet.change_blockchain_address(address)
        })
        .await
    }

    async fn start_observing_wallet_balance(&self) -> Result<(), WalletError> {
        let wallet = self.find_selected_wallet().await?;
        let address = wallet.address().cloned().ok_or(WalletError::MissingWalletAddress)?;
        let attempt = self.begin_observation_attempt();
        let observer = Arc::new(DeploymentBalanceObserver::new(self.clone(), attempt));
        let handle = self
            .context()
            .blockchain_service
            .observe_balance(&address, observer)
            .await
            .map_err(|e| log_failure("observe balance", &address, e))?;
        self.keep_observation(attempt, handle);
        info!("Observing balance of {} for wallet {} (attempt {})", address, wallet.id(), attempt);
        Ok(())
    }

    fn lock_observation(&self) -> MutexGuard<'_, ActiveObservation> {
        self.inner
            .observation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Invalidate the previous attempt and cancel its observation
    fn begin_observation_attempt(&self) -> u64 {
        let (attempt, previous) = {
            let mut observation = self.lock_observation();
            observation.attempt += 1;
            (observation.attempt, observation.handle.take())
        };
        if let Some(previous) = previous {
            debug!("Cancelling balance observation of attempt {}", attempt - 1);
            previous.cancel();
        }
        attempt
    }

    fn keep_observation(&self, attempt: u64, handle: Box<dyn BalanceObservation>) {
        let stale = {
            let mut observation = self.lock_observation();
            if observation.attempt == attempt {
                observation.handle = Some(handle);
                None
            } else {
                Some(handle)
            }
        };
        if let Some(stale) = stale {
            warn!("Deployment attempt {} ended while registering its observer", attempt);
            stale.cancel();
        }
    }

    fn end_observation(&self) {
        let handle = {
            let mut observation = self.lock_observation();
            observation.attempt += 1;
            observation.handle.take()
        };
        if let Some(handle) = handle {
            handle.cancel();
        }
    }

    fn is_current_attempt(&self, attempt: u64) -> bool {
        self.lock_observation().attempt == attempt
    }

    async fn did_update_balance(
        &self,
        address: &str,
        new_balance: TokenInt,
        attempt: u64,
        creation_claimed: &AtomicBool,
    ) -> BalanceObserverResponse {
        let state = self.selected_wallet_state().await;
        if !state.is_awaiting_funds() {
            debug!("Ignoring balance update of {}: wallet is {:?}", address, state);
            return BalanceObserverResponse::StopObserving;
        }
        match self.selected_wallet_address().await {
            Some(current) if current.eq_ignore_ascii_case(address) => {}
            current => {
                warn!("Ignoring balance update of {}: wallet address is {:?}", address, current);
                return BalanceObserverResponse::StopObserving;
            }
        }

        match self.handle_balance_update(new_balance, attempt, creation_claimed).await {
            Ok(response) => response,
            Err(error) => {
                error!("Failed to update {} account balance: {}", self.deployment_token(), error);
                self.mark_deployment_failed_logged().await;
                BalanceObserverResponse::StopObserving
            }
        }
    }

    async fn handle_balance_update(
        &self,
        new_balance: TokenInt,
        attempt: u64,
        creation_claimed: &AtomicBool,
    ) -> Result<BalanceObserverResponse, WalletError> {
        let token = self.deployment_token().to_string();
        self.update_account(&token, new_balance).await?;
        if self.selected_wallet_state().await != WalletState::AccountFunded {
            return Ok(BalanceObserverResponse::ContinueObserving);
        }
        if !self.is_current_attempt(attempt) {
            warn!("Deployment attempt {} was superseded while updating its balance", attempt);
            return Ok(BalanceObserverResponse::StopObserving);
        }
        if creation_claimed.swap(true, Ordering::SeqCst) {
            debug!("Wallet creation already submitted by a concurrent balance update");
            return Ok(BalanceObserverResponse::StopObserving);
        }
        self.create_wallet_in_blockchain().await?;
        Ok(BalanceObserverResponse::StopObserving)
    }

    async fn create_wallet_in_blockchain(&self) -> Result<(), WalletError> {
        let wallet = self.find_selected_wallet().await?;
        let address = wallet.address().cloned().ok_or(WalletError::MissingWalletAddress)?;
        let service = &self.context().blockchain_service;

        info!("Submitting creation transaction of wallet {} at {}", wallet.id(), address);
        let hash = service
            .execute_wallet_creation_transaction(&address)
            .await
            .map_err(|e| log_failure("execute wallet creation transaction", &address, e))?;

        let state = self.selected_wallet_state().await;
        if state != WalletState::AccountFunded {
            warn!("Wallet became {:?} while submitting {}; not tracking it", state, hash);
            return Ok(());
        }
        self.mark_deployment_accepted_by_blockchain().await?;

        let success = service
            .wait_for_pending_transaction(&hash)
            .await
            .map_err(|e| log_failure("wait for pending transaction", &hash, e))?;

        let state = self.selected_wallet_state().await;
        if state != WalletState::DeploymentAcceptedByBlockchain {
            warn!("Wallet became {:?} while waiting for {}; ignoring result", state, hash);
            return Ok(());
        }
        self.did_finish_deployment(success).await;
        Ok(())
    }

    async fn did_finish_deployment(&self, success: bool) {
        if !success {
            error!("Wallet creation transaction failed in the blockchain");
            self.mark_deployment_failed_logged().await;
            return;
        }
        let finished: Result<(), WalletError> = async {
            self.remove_paper_wallet().await?;
            self.mark_deployment_success().await?;
            self.finish_deployment().await
        }
        .await;
        match finished {
            Ok(()) => info!("Wallet deployment finished"),
            Err(error) => {
                error!("Failed to save success deployment state: {}", error);
                self.mark_deployment_failed_logged().await;
            }
        }
    }

    async fn remove_paper_wallet(&self) -> Result<(), WalletError> {
        let paper_wallet = self
            .owner_address(OwnerType::PaperWallet)
            .await
            .ok_or(WalletError::OneOrMoreOwnersAreMissing)?;
        self.context()
            .blockchain_service
            .remove_externally_owned_account(&paper_wallet)
            .await
            .map_err(|e| log_failure("remove paper wallet key", &paper_wallet, e))
    }

    /// Fetch the selected wallet's balance and store it in its deployment account
    pub async fn refresh_balance(&self) -> Result<(), WalletError> {
        let wallet = self.find_selected_wallet().await?;
        let address = wallet.address().cloned().ok_or(WalletError::MissingWalletAddress)?;
        let balance = self
            .context()
            .blockchain_service
            .balance(&address)
            .await
            .map_err(|e| log_failure("fetch balance", &address, e))?;
        let token = self.deployment_token().to_string();
        self.update_account(&token, balance).await
    }

    pub async fn mark_deployment_accepted_by_blockchain(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet(
            "mark deployment accepted by blockchain",
            Wallet::mark_deployment_accepted_by_blockchain,
        )
        .await
    }

    pub async fn mark_deployment_failed(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet("mark deployment failed", Wallet::mark_deployment_failed)
            .await
    }

    async fn mark_deployment_failed_logged(&self) {
        if let Err(error) = self.mark_deployment_failed().await {
            error!("Failed to mark deployment failed: {}", error);
        }
    }

    pub async fn mark_deployment_success(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet("mark deployment success", Wallet::mark_deployment_success)
            .await
    }

    /// Reset the wallet to `ReadyToDeploy` and stop observing its balance.
    /// Callbacks of the aborted attempt become no-ops.
    pub async fn abort_deployment(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet("abort deployment", Wallet::abort_deployment)
            .await?;
        self.end_observation();
        Ok(())
    }

    pub async fn finish_deployment(&self) -> Result<(), WalletError> {
        self.mutate_selected_wallet("finish deployment", Wallet::finish_deployment)
            .await
    }

    async fn mutate_selected_wallet<F>(&self, operation: &'static str, mutation: F) -> Result<(), WalletError>
    where
        F: FnOnce(&mut Wallet) -> Result<(), WalletError> + Send,
    {
        self.notify_wallet_state_changes_after(async move {
            let mut wallet = self.find_selected_wallet().await?;
            mutation(&mut wallet)?;
            self.context()
                .wallet_repository
                .save(&wallet)
                .await
                .map_err(|e| log_failure(operation, wallet.id(), e))?;
            debug!("Wallet {}: {} -> {:?}", wallet.id(), operation, wallet.status());
            Ok(())
        })
        .await
    }

    async fn find_selected_wallet(&self) -> Result<Wallet, WalletError> {
        let context = self.context();
        let portfolio = context
            .portfolio_repository
            .portfolio()
            .await
            .map_err(|e| log_failure("fetch portfolio", "portfolio", e))?;
        let wallet_id = portfolio
            .as_ref()
            .and_then(|portfolio| portfolio.selected_wallet().cloned())
            .ok_or(WalletError::SelectedWalletNotFound)?;
        context
            .wallet_repository
            .find_by_id(&wallet_id)
            .await
            .map_err(|e| log_failure("fetch wallet", &wallet_id, e))?
            .ok_or(WalletError::SelectedWalletNotFound)
    }

    async fn notify_wallet_state_changes_after<T, F>(&self, operation: F) -> Result<T, WalletError>
    where
        F: Future<Output = Result<T, WalletError>>,
    {
        let start_state = self.selected_wallet_state().await;
        let result = operation.await;
        let end_state = self.selected_wallet_state().await;
        if start_state != end_state {
            info!("Wallet state changed: {:?} -> {:?}", start_state, end_state);
            self.inner.status_updates.notify();
        }
        result
    }

    // Owners

    pub async fn is_owner_exists(&self, kind: OwnerType) -> bool {
        match self.find_selected_wallet().await {
            Ok(wallet) => wallet.owner(kind).is_some(),
            Err(error) => {
                error!("Failed to check if owner exists ({:?}): {}", kind, error);
                false
            }
        }
    }

    /// Add or replace the owner of `kind`. A draft wallet that thereby gets
    /// all of its owners becomes ready to deploy.
    pub async fn add_owner(&self, address: &str, kind: OwnerType) -> Result<(), WalletError> {
        validate_ethereum_address(address)?;
        let owner = Owner::new(address);
        self.mutate_selected_wallet("add owner", move |wallet| {
            if wallet.owner(kind).is_some() {
                wallet.replace_owner(owner, kind)?;
            } else {
                wallet.add_owner(owner, kind)?;
            }
            if wallet.status() == WalletStatus::NewDraft && wallet.has_all_owners() {
                wallet.mark_ready_to_deploy()?;
            }
            Ok(())
        })
        .await
    }

    pub async fn owner_address(&self, kind: OwnerType) -> Option<Address> {
        match self.find_selected_wallet().await {
            Ok(wallet) => wallet.owner(kind).map(|owner| owner.address.clone()),
            Err(error) => {
                error!("Failed to fetch owner's address ({:?}): {}", kind, error);
                None
            }
        }
    }

    // Accounts

    pub async fn account_balance(&self, token: &str) -> Option<TokenInt> {
        let wallet = self.find_selected_wallet().await.ok()?;
        self.find_account(wallet.id(), token)
            .await
            .ok()
            .map(|account| account.balance())
    }

    /// Record a newly observed balance. Only allowed while the wallet is in
    /// one of the deployment-related states.
    pub async fn update_account(&self, token: &str, new_balance: TokenInt) -> Result<(), WalletError> {
        self.assert_can_change_account().await?;
        self.mutate_account(token, move |account| account.update(new_balance))
            .await
    }

    async fn update_minimum_funding(&self, token: &str, amount: TokenInt) -> Result<(), WalletError> {
        self.assert_can_change_account().await?;
        self.mutate_account(token, move |account| account.update_minimum_transaction_amount(amount))
            .await
    }

    async fn assert_can_change_account(&self) -> Result<(), WalletError> {
        let state = self.selected_wallet_state().await;
        if state.allows_account_update() {
            Ok(())
        } else {
            error!("Account cannot change while wallet is {:?}", state);
            Err(WalletError::InvalidWalletState)
        }
    }

    async fn mutate_account<F>(&self, token: &str, mutation: F) -> Result<(), WalletError>
    where
        F: FnOnce(&mut Account) + Send,
    {
        self.notify_wallet_state_changes_after(async move {
            let wallet = self.find_selected_wallet().await?;
            let mut account = self.find_account(wallet.id(), token).await?;
            mutation(&mut account);
            self.context()
                .account_repository
                .save(&account)
                .await
                .map_err(|e| log_failure("save account", account.id(), e))
        })
        .await
    }

    async fn find_account(&self, wallet_id: &WalletId, token: &str) -> Result<Account, WalletError> {
        let id = AccountId::new(token, wallet_id.clone());
        self.context()
            .account_repository
            .find(&id)
            .await
            .map_err(|e| log_failure("find account", &id, e))?
            .ok_or_else(|| {
                error!("Account {} not found for wallet {}", token, wallet_id);
                WalletError::AccountNotFound
            })
    }

    // Wallet status update subscribing

    pub fn subscribe<F>(&self, handler: F) -> String
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.status_updates.subscribe(handler)
    }

    pub fn unsubscribe(&self, subscription: &str) {
        self.inner.status_updates.unsubscribe(subscription);
    }
}

/// Balance observer registered for one deployment attempt. After it has
/// answered `StopObserving`, or once its attempt is superseded, it ignores
/// every later update.
struct DeploymentBalanceObserver {
    service: WalletApplicationService,
    attempt: u64,
    stopped: AtomicBool,
}

impl DeploymentBalanceObserver {
    fn new(service: WalletApplicationService, attempt: u64) -> Self {
        Self {
            service,
            attempt,
            stopped: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BalanceObserver for DeploymentBalanceObserver {
    async fn did_update_balance(&self, address: &str, new_balance: TokenInt) -> BalanceObserverResponse {
        if self.stopped.load(Ordering::SeqCst) {
            debug!("Balance update of {} after observation stopped", address);
            return BalanceObserverResponse::StopObserving;
        }
        if !self.service.is_current_attempt(self.attempt) {
            debug!("Balance update of {} for superseded attempt {}", address, self.attempt);
            self.stopped.store(true, Ordering::SeqCst);
            return BalanceObserverResponse::StopObserving;
        }
        let response = self
            .service
            .did_update_balance(address, new_balance, self.attempt, &self.stopped)
            .await;
        if response == BalanceObserverResponse::StopObserving {
            self.stopped.store(true, Ordering::SeqCst);
        }
        response
    }
}
