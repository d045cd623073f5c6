//! Persistent token storage layout
//!
//! `TokenStorage` is the data that outlives every logic upgrade. The layout is
//! append-only: fields are never reordered or removed, and any field added
//! after layout 1 must carry `#[serde(default)]` so older snapshots still load.
//! Logic operates on this struct through `token::Ledger`; the read accessors
//! below are pure lookups and never fail.

use crate::core::{Address, Amount, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout revision written by this build
pub const STORAGE_LAYOUT_VERSION: u32 = 1;

/// Balances, allowances, supply and metadata of a single token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenStorage {
    /// Layout revision of this snapshot
    pub(crate) layout_version: u32,
    /// Set exactly once by `initialize`
    pub(crate) initialized: bool,
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) decimals: u8,
    pub(crate) total_supply: Amount,
    /// Balances: address -> amount
    pub(crate) balances: BTreeMap<Address, Amount>,
    /// Allowances: owner -> (spender -> amount)
    pub(crate) allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
}

impl Default for TokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorage {
    /// Allocate empty, uninitialized storage
    pub fn new() -> Self {
        Self {
            layout_version: STORAGE_LAYOUT_VERSION,
            initialized: false,
            name: String::new(),
            symbol: String::new(),
            decimals: 0,
            total_supply: U256::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn layout_version(&self) -> u32 {
        self.layout_version
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of an account (zero if never seen)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Amount `spender` may still draw from `owner` (zero if never approved)
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    /// Accounts holding a non-zero balance, in address order
    pub fn holders(&self) -> Vec<(Address, Amount)> {
        self.balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(address, balance)| (*address, *balance))
            .collect()
    }

    /// Number of accounts holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    /// Recompute the sum of all balances and compare it with the total supply
    ///
    /// Returns the computed sum on success, `None` if the sum overflows or
    /// differs from `total_supply`.
    pub fn check_conservation(&self) -> Option<Amount> {
        let sum = self
            .balances
            .values()
            .try_fold(U256::zero(), |acc, balance| acc.checked_add(*balance))?;
        (sum == self.total_supply).then_some(sum)
    }

    /// Absent key means zero, so emptied balances are removed
    pub(crate) fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn test_new_storage_is_empty() {
        let storage = TokenStorage::new();

        assert!(!storage.is_initialized());
        assert_eq!(storage.layout_version(), STORAGE_LAYOUT_VERSION);
        assert_eq!(storage.name(), "");
        assert_eq!(storage.symbol(), "");
        assert_eq!(storage.decimals(), 0);
        assert!(storage.total_supply().is_zero());
        assert!(storage.balance_of(&account(1)).is_zero());
        assert!(storage.allowance(&account(1), &account(2)).is_zero());
        assert_eq!(storage.holder_count(), 0);
    }

    #[test]
    fn test_holders_skip_zero_balances() {
        let mut storage = TokenStorage::new();
        storage.set_balance(account(1), U256::from(10u64));
        storage.set_balance(account(2), U256::zero());
        storage.set_balance(account(3), U256::from(5u64));

        assert_eq!(storage.balances.len(), 2);
        assert_eq!(storage.holder_count(), 2);
        assert_eq!(
            storage.holders(),
            vec![
                (account(1), U256::from(10u64)),
                (account(3), U256::from(5u64))
            ]
        );
    }

    #[test]
    fn test_zero_balance_clears_entry() {
        let mut storage = TokenStorage::new();
        storage.set_balance(account(1), U256::from(10u64));
        storage.set_balance(account(1), U256::zero());

        assert!(storage.balances.is_empty());
        assert!(storage.balance_of(&account(1)).is_zero());
    }

    #[test]
    fn test_check_conservation() {
        let mut storage = TokenStorage::new();
        storage.total_supply = U256::from(15u64);
        storage.set_balance(account(1), U256::from(10u64));
        assert_eq!(storage.check_conservation(), None);

        storage.set_balance(account(2), U256::from(5u64));
        assert_eq!(storage.check_conservation(), Some(U256::from(15u64)));

        storage.set_balance(account(3), U256::MAX);
        assert_eq!(storage.check_conservation(), None);
    }

    #[test]
    fn test_allowance_per_pair() {
        let mut storage = TokenStorage::new();
        storage.set_allowance(account(1), account(2), U256::from(7u64));

        assert_eq!(storage.allowance(&account(1), &account(2)), U256::from(7u64));
        assert!(storage.allowance(&account(2), &account(1)).is_zero());
        assert!(storage.allowance(&account(1), &account(3)).is_zero());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut storage = TokenStorage::new();
        storage.initialized = true;
        storage.name = "Arvol".to_string();
        storage.symbol = "ARV".to_string();
        storage.decimals = 18;
        storage.total_supply = U256::from(100u64);
        storage.set_balance(account(1), U256::from(100u64));
        storage.set_allowance(account(1), account(2), U256::from(3u64));

        let json = serde_json::to_string_pretty(&storage).unwrap();
        let restored: TokenStorage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, storage);
    }
}
