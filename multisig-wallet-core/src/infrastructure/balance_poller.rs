//! Polling balance observation
//!
//! Blockchain backends usually offer a plain "get balance" call. `BalancePoller`
//! turns such a source into the push-style `BalanceObserver` protocol by
//! polling it on a fixed interval from a background task.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::services::{BalanceObservation, BalanceObserver, BalanceObserverResponse};
use crate::infrastructure::config::DeploymentConfig;
use crate::shared::error::WalletError;
use crate::shared::types::{Address, TokenInt};

/// Pull-based balance lookup
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, address: &str) -> Result<TokenInt, WalletError>;
}

pub struct BalancePoller {
    source: Arc<dyn BalanceSource>,
    interval: Duration,
}

impl BalancePoller {
    pub fn new(source: Arc<dyn BalanceSource>, interval: Duration) -> Self {
        Self { source, interval }
    }

    pub fn from_config(source: Arc<dyn BalanceSource>, config: &DeploymentConfig) -> Self {
        Self::new(source, config.balance_poll_interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `address` until `observer` answers `StopObserving` or the
    /// subscription is cancelled. The first poll happens immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe(&self, address: impl Into<Address>, observer: Arc<dyn BalanceObserver>) -> BalanceSubscription {
        let address = address.into();
        let source = self.source.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Polling balance of {} every {:?}", address, period);

            loop {
                ticker.tick().await;
                let balance = match source.fetch_balance(&address).await {
                    Ok(balance) => balance,
                    Err(e) => {
                        warn!("Failed to fetch balance of {}: {}", address, e);
                        continue;
                    }
                };
                debug!("Balance of {} is {}", address, balance);
                if observer.did_update_balance(&address, balance).await == BalanceObserverResponse::StopObserving {
                    info!("Stopped polling balance of {}", address);
                    break;
                }
            }
        });

        BalanceSubscription { handle }
    }
}

/// Handle to a running balance poll
pub struct BalanceSubscription {
    handle: JoinHandle<()>,
}

impl BalanceSubscription {
    /// Wait until polling ends. A cancelled poll ends normally; a poll whose
    /// observer panicked is reported as an internal error.
    pub async fn finished(self) -> Result<(), WalletError> {
        match self.handle.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl BalanceObservation for BalanceSubscription {
    fn cancel(&self) {
        self.handle.abort();
    }

    fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}
