//! Upgradeable token deployment
//!
//! A `Proxy` pins the token's storage to one stable address and forwards every
//! call to whichever logic version is active. Upgrading swaps the logic id and
//! leaves storage untouched; the storage's own init flag keeps the initializer
//! from running twice, whichever logic the call is routed to.

use crate::config::DeploymentParams;
use crate::core::{Address, ADDRESS_LENGTH};
use crate::crypto::sha256;
use crate::proxy::logic::{LedgerCall, LedgerLogic, LogicRegistry};
use crate::token::{LedgerEvent, TokenError, TokenStorage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Number of events kept in the proxy's log
pub const EVENT_LOG_LIMIT: usize = 100;

/// Proxy errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Unknown logic implementation: {0}")]
    UnknownImplementation(String),
    #[error("Logic {version} supports storage layout {supported}, storage is at layout {actual}")]
    IncompatibleLayout {
        version: String,
        supported: u32,
        actual: u32,
    },
    #[error("Unauthorized: {0} is not the proxy admin")]
    Unauthorized(Address),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// One logic switch in the proxy's history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    pub from: String,
    pub to: String,
    pub by: Address,
    pub at: DateTime<Utc>,
}

/// Stable-address host of one token's storage
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proxy {
    address: Address,
    admin: Address,
    implementation: String,
    storage: TokenStorage,
    upgrades: Vec<UpgradeRecord>,
    #[serde(default)]
    events: Vec<LedgerEvent>,
    deployed_at: DateTime<Utc>,
}

impl Proxy {
    /// Deploy a proxy in front of `params.logic_version` and run the initializer
    ///
    /// The admin is both the proxy admin and the account credited with the
    /// initial supply. `nonce` distinguishes successive deployments by the
    /// same admin.
    pub fn deploy(
        registry: &LogicRegistry,
        admin: Address,
        params: &DeploymentParams,
        nonce: u64,
    ) -> Result<(Self, Vec<LedgerEvent>), ProxyError> {
        let storage = TokenStorage::new();
        let logic = resolve(registry, &params.logic_version, &storage)?;

        let mut proxy = Self {
            address: derive_address(&admin, &params.logic_version, nonce),
            admin,
            implementation: params.logic_version.clone(),
            storage,
            upgrades: Vec::new(),
            events: Vec::new(),
            deployed_at: Utc::now(),
        };

        let call = LedgerCall::Initialize {
            initial_supply: params.initial_supply,
            name: params.token_name.clone(),
            symbol: params.token_symbol.clone(),
        };
        let events = logic.execute(proxy.address, &mut proxy.storage, admin, call)?;
        proxy.record_events(&events);

        log::info!(
            "Deployed {} ({}) behind proxy {} using {}",
            proxy.storage.name(),
            proxy.storage.symbol(),
            proxy.address,
            proxy.implementation
        );

        Ok((proxy, events))
    }

    /// Route a call to the active logic on behalf of `caller`
    pub fn call(
        &mut self,
        registry: &LogicRegistry,
        caller: Address,
        call: LedgerCall,
    ) -> Result<Vec<LedgerEvent>, ProxyError> {
        let logic = resolve(registry, &self.implementation, &self.storage)?;
        let method = call.method();

        let events = logic
            .execute(self.address, &mut self.storage, caller, call)
            .map_err(|e| {
                log::debug!("{} from {} rejected: {}", method, caller, e);
                e
            })?;
        self.record_events(&events);

        Ok(events)
    }

    /// Check that `version` could replace the active logic, without switching
    pub fn prepare_upgrade(
        &self,
        registry: &LogicRegistry,
        version: &str,
    ) -> Result<String, ProxyError> {
        let logic = resolve(registry, version, &self.storage)?;
        Ok(logic.version().to_string())
    }

    /// Switch the active logic; only the proxy admin may do this
    pub fn upgrade(
        &mut self,
        registry: &LogicRegistry,
        caller: Address,
        version: &str,
    ) -> Result<UpgradeRecord, ProxyError> {
        if caller != self.admin {
            return Err(ProxyError::Unauthorized(caller));
        }
        let version = self.prepare_upgrade(registry, version)?;

        let record = UpgradeRecord {
            from: std::mem::replace(&mut self.implementation, version.clone()),
            to: version,
            by: caller,
            at: Utc::now(),
        };
        self.upgrades.push(record.clone());

        log::info!(
            "Proxy {} upgraded from {} to {}",
            self.address,
            record.from,
            record.to
        );

        Ok(record)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Active logic version id
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn storage(&self) -> &TokenStorage {
        &self.storage
    }

    pub fn upgrades(&self) -> &[UpgradeRecord] {
        &self.upgrades
    }

    /// Most recent events, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn deployed_at(&self) -> DateTime<Utc> {
        self.deployed_at
    }

    fn record_events(&mut self, events: &[LedgerEvent]) {
        self.events.extend_from_slice(events);
        if self.events.len() > EVENT_LOG_LIMIT {
            let excess = self.events.len() - EVENT_LOG_LIMIT;
            self.events.drain(..excess);
        }
    }
}

/// Look up a logic version and check it understands the storage layout
fn resolve(
    registry: &LogicRegistry,
    version: &str,
    storage: &TokenStorage,
) -> Result<Arc<dyn LedgerLogic>, ProxyError> {
    let logic = registry
        .get(version)
        .ok_or_else(|| ProxyError::UnknownImplementation(version.to_string()))?;

    if logic.supported_layout() < storage.layout_version() {
        return Err(ProxyError::IncompatibleLayout {
            version: version.to_string(),
            supported: logic.supported_layout(),
            actual: storage.layout_version(),
        });
    }

    Ok(logic)
}

/// Proxy address: first 20 bytes of sha256("admin:version:nonce")
fn derive_address(admin: &Address, version: &str, nonce: u64) -> Address {
    let input = format!("{}:{}:{}", admin, version, nonce);
    let hash = sha256(input.as_bytes());
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes.copy_from_slice(&hash[..ADDRESS_LENGTH]);
    Address::new(bytes)
}
