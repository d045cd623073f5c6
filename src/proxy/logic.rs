//! Replaceable ledger logic
//!
//! A proxy never runs ledger code itself. It looks up the active logic version
//! in a `LogicRegistry` and hands it the persistent storage, the caller, and
//! the call. Logic implementations hold no state of their own.

use crate::core::{Address, Amount};
use crate::token::{Ledger, LedgerEvent, TokenError, TokenStorage, STORAGE_LAYOUT_VERSION};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Version id of the first ledger logic
pub const ARVOL_V1: &str = "arvol-v1";

/// A call routed through the proxy; the caller is supplied separately
#[derive(Clone, Debug, PartialEq)]
pub enum LedgerCall {
    Initialize {
        initial_supply: Amount,
        name: String,
        symbol: String,
    },
    Transfer {
        to: Address,
        amount: Amount,
    },
    Approve {
        spender: Address,
        amount: Amount,
    },
    TransferFrom {
        owner: Address,
        to: Address,
        amount: Amount,
    },
}

impl LedgerCall {
    /// Entry point name, as the router sees it
    pub fn method(&self) -> &'static str {
        match self {
            LedgerCall::Initialize { .. } => "initialize",
            LedgerCall::Transfer { .. } => "transfer",
            LedgerCall::Approve { .. } => "approve",
            LedgerCall::TransferFrom { .. } => "transferFrom",
        }
    }
}

/// Stateless ledger logic operating on a storage handle
pub trait LedgerLogic: Send + Sync {
    /// Unique version id, e.g. `arvol-v1`
    fn version(&self) -> &str;

    /// Newest storage layout this logic can read and write
    fn supported_layout(&self) -> u32;

    /// Run one call against `storage` on behalf of `caller`
    fn execute(
        &self,
        token: Address,
        storage: &mut TokenStorage,
        caller: Address,
        call: LedgerCall,
    ) -> Result<Vec<LedgerEvent>, TokenError>;
}

/// The ERC-20 ledger logic
#[derive(Debug, Clone, Copy, Default)]
pub struct ArvolLogic;

impl LedgerLogic for ArvolLogic {
    fn version(&self) -> &str {
        ARVOL_V1
    }

    fn supported_layout(&self) -> u32 {
        STORAGE_LAYOUT_VERSION
    }

    fn execute(
        &self,
        token: Address,
        storage: &mut TokenStorage,
        caller: Address,
        call: LedgerCall,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        let mut ledger = Ledger::new(token, storage);
        match call {
            LedgerCall::Initialize {
                initial_supply,
                name,
                symbol,
            } => ledger.initialize(caller, initial_supply, name, symbol),
            LedgerCall::Transfer { to, amount } => ledger.transfer(caller, to, amount),
            LedgerCall::Approve { spender, amount } => ledger.approve(caller, spender, amount),
            LedgerCall::TransferFrom { owner, to, amount } => {
                ledger.transfer_from(caller, owner, to, amount)
            }
        }
    }
}

/// Available logic versions, by id
#[derive(Clone, Default)]
pub struct LogicRegistry {
    logics: HashMap<String, Arc<dyn LedgerLogic>>,
}

impl LogicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            logics: HashMap::new(),
        }
    }

    /// Registry with every logic version shipped in this crate
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ArvolLogic));
        registry
    }

    /// Add a logic version, replacing any previous one with the same id
    pub fn register(&mut self, logic: Arc<dyn LedgerLogic>) {
        let version = logic.version().to_string();
        if self.logics.insert(version.clone(), logic).is_some() {
            log::warn!("Logic {} re-registered", version);
        }
    }

    pub fn get(&self, version: &str) -> Option<Arc<dyn LedgerLogic>> {
        self.logics.get(version).cloned()
    }

    pub fn contains(&self, version: &str) -> bool {
        self.logics.contains_key(version)
    }

    /// Registered version ids, sorted
    pub fn versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.logics.keys().cloned().collect();
        versions.sort();
        versions
    }
}

impl fmt::Debug for LogicRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicRegistry")
            .field("versions", &self.versions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::U256;

    #[test]
    fn test_default_registry() {
        let registry = LogicRegistry::with_defaults();
        assert!(registry.contains(ARVOL_V1));
        assert_eq!(registry.versions(), vec![ARVOL_V1.to_string()]);

        let logic = registry.get(ARVOL_V1).unwrap();
        assert_eq!(logic.version(), ARVOL_V1);
        assert_eq!(logic.supported_layout(), STORAGE_LAYOUT_VERSION);
        assert!(registry.get("arvol-v9").is_none());
    }

    #[test]
    fn test_arvol_logic_dispatch() {
        let token = Address::new([0xee; 20]);
        let admin = Address::new([1; 20]);
        let user = Address::new([2; 20]);
        let mut storage = TokenStorage::new();

        ArvolLogic
            .execute(
                token,
                &mut storage,
                admin,
                LedgerCall::Initialize {
                    initial_supply: U256::from(100u64),
                    name: "Arvol".to_string(),
                    symbol: "ARV".to_string(),
                },
            )
            .unwrap();
        ArvolLogic
            .execute(
                token,
                &mut storage,
                admin,
                LedgerCall::Approve {
                    spender: user,
                    amount: U256::from(30u64),
                },
            )
            .unwrap();
        let events = ArvolLogic
            .execute(
                token,
                &mut storage,
                user,
                LedgerCall::TransferFrom {
                    owner: admin,
                    to: user,
                    amount: U256::from(30u64),
                },
            )
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(storage.balance_of(&user), U256::from(30u64));
        assert!(storage.allowance(&admin, &user).is_zero());
    }

    #[test]
    fn test_call_method_names() {
        let call = LedgerCall::TransferFrom {
            owner: Address::ZERO,
            to: Address::ZERO,
            amount: U256::zero(),
        };
        assert_eq!(call.method(), "transferFrom");
    }
}
