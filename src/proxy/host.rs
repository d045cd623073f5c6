//! Serialized execution host
//!
//! `ProxyHost` gives a proxy the execution guarantees the ledger relies on:
//! every call runs under one lock held for the whole read-check-write, so no
//! caller ever observes a debit without its matching credit. Events are
//! published to subscribers while the lock is still held, which keeps the
//! broadcast order identical to the commit order.

use crate::config::DeploymentParams;
use crate::core::Address;
use crate::proxy::deployment::{Proxy, ProxyError, UpgradeRecord};
use crate::proxy::logic::{LedgerCall, LogicRegistry};
use crate::token::{LedgerEvent, TokenStorage};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

/// Maximum number of events buffered per subscriber
const BROADCAST_CAPACITY: usize = 100;

/// Thread-safe host for one proxy
#[derive(Debug)]
pub struct ProxyHost {
    proxy: Mutex<Proxy>,
    registry: LogicRegistry,
    sender: broadcast::Sender<LedgerEvent>,
}

impl ProxyHost {
    /// Host an existing (deployed or loaded) proxy
    pub fn new(proxy: Proxy, registry: LogicRegistry) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            proxy: Mutex::new(proxy),
            registry,
            sender,
        }
    }

    /// Deploy a fresh proxy and host it
    pub fn deploy(
        registry: LogicRegistry,
        admin: Address,
        params: &DeploymentParams,
        nonce: u64,
    ) -> Result<Self, ProxyError> {
        let (proxy, _) = Proxy::deploy(&registry, admin, params, nonce)?;
        Ok(Self::new(proxy, registry))
    }

    /// Run one call atomically on behalf of `caller`
    pub fn execute(
        &self,
        caller: Address,
        call: LedgerCall,
    ) -> Result<Vec<LedgerEvent>, ProxyError> {
        let mut proxy = self.lock();
        let events = proxy.call(&self.registry, caller, call)?;
        for event in &events {
            // No subscribers is not an error
            let _ = self.sender.send(event.clone());
        }
        Ok(events)
    }

    pub fn prepare_upgrade(&self, version: &str) -> Result<String, ProxyError> {
        self.lock().prepare_upgrade(&self.registry, version)
    }

    pub fn upgrade(&self, caller: Address, version: &str) -> Result<UpgradeRecord, ProxyError> {
        self.lock().upgrade(&self.registry, caller, version)
    }

    /// Subscribe to events committed from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Read the storage under the lock
    pub fn with_storage<R>(&self, read: impl FnOnce(&TokenStorage) -> R) -> R {
        read(self.lock().storage())
    }

    pub fn address(&self) -> Address {
        self.lock().address()
    }

    /// Consistent copy of the proxy, e.g. for persistence
    pub fn snapshot(&self) -> Proxy {
        self.lock().clone()
    }

    pub fn into_proxy(self) -> Proxy {
        self.proxy
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &LogicRegistry {
        &self.registry
    }

    // Calls commit all-or-nothing, so state behind a poisoned lock is consistent.
    fn lock(&self) -> MutexGuard<'_, Proxy> {
        self.proxy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
