//! ERC-20 style ledger logic
//!
//! `Ledger` is a stateless view over a `TokenStorage` handle: it validates a
//! call against the current state, computes every new value with checked
//! arithmetic, and only then writes. A rejected call leaves storage untouched.
//!
//! The caller identity is always an explicit parameter supplied by the host.

use crate::core::{Address, Amount, DECIMALS};
use crate::token::events::LedgerEvent;
use crate::token::storage::TokenStorage;
use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Ledger already initialized")]
    AlreadyInitialized,
    #[error("Ledger not initialized")]
    NotInitialized,
    #[error("{operation} from the zero address")]
    InvalidSender { operation: &'static str },
    #[error("transfer to the zero address")]
    InvalidRecipient,
    #[error("approve to the zero address")]
    InvalidSpender,
    #[error("transfer amount exceeds balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },
    #[error("transfer amount exceeds allowance: have {have}, need {need}")]
    AllowanceExceeded { have: Amount, need: Amount },
    #[error("balance overflow")]
    Overflow,
}

/// New balances for a validated movement, not yet written
struct BalanceMove {
    from: Address,
    from_balance: Amount,
    to: Address,
    to_balance: Amount,
}

/// Ledger operations bound to one token's storage
pub struct Ledger<'s> {
    token: Address,
    storage: &'s mut TokenStorage,
}

impl<'s> Ledger<'s> {
    /// Bind the logic to a storage handle; `token` is the address events report
    pub fn new(token: Address, storage: &'s mut TokenStorage) -> Self {
        Self { token, storage }
    }

    /// Read access to the underlying storage
    pub fn storage(&self) -> &TokenStorage {
        &*self.storage
    }

    /// One-time setup: metadata, supply, and the admin's initial balance
    ///
    /// Fails with `AlreadyInitialized` on every call after the first, without
    /// touching state.
    pub fn initialize(
        &mut self,
        caller: Address,
        initial_supply: Amount,
        name: String,
        symbol: String,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        if self.storage.initialized {
            return Err(TokenError::AlreadyInitialized);
        }
        if caller.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        self.storage.decimals = DECIMALS;
        self.storage.name = name;
        self.storage.symbol = symbol;
        self.storage.total_supply = initial_supply;
        self.storage.set_balance(caller, initial_supply);
        self.storage.initialized = true;

        log::info!(
            "Ledger initialized: {} ({}) supply {} credited to {}",
            self.storage.name,
            self.storage.symbol,
            initial_supply,
            caller
        );

        Ok(vec![LedgerEvent::transfer(
            self.token,
            Address::ZERO,
            caller,
            initial_supply,
        )])
    }

    /// Move `amount` from the caller to `to`
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        self.ensure_active()?;
        if caller.is_zero() {
            return Err(TokenError::InvalidSender {
                operation: "transfer",
            });
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        let movement = self.plan_move(caller, to, amount)?;
        self.apply_move(movement);

        log::debug!("Transfer {} -> {}: {}", caller, to, amount);
        Ok(vec![LedgerEvent::transfer(self.token, caller, to, amount)])
    }

    /// Set the caller's allowance for `spender` to exactly `amount`
    ///
    /// Overwrites any previous allowance; approvals never accumulate.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        self.ensure_active()?;
        if caller.is_zero() {
            return Err(TokenError::InvalidSender {
                operation: "approve",
            });
        }
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender);
        }

        self.storage.set_allowance(caller, spender, amount);

        log::debug!("Approval {} -> {}: {}", caller, spender, amount);
        Ok(vec![LedgerEvent::approval(self.token, caller, spender, amount)])
    }

    /// Move `amount` from `owner` to `to`, drawing on the caller's allowance
    ///
    /// Emits the transfer followed by an approval carrying the reduced
    /// allowance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        self.ensure_active()?;
        if caller.is_zero() {
            return Err(TokenError::InvalidSender {
                operation: "approve",
            });
        }
        if owner.is_zero() {
            return Err(TokenError::InvalidSender {
                operation: "transfer",
            });
        }
        if to.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }

        let allowed = self.storage.allowance(&owner, &caller);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(TokenError::AllowanceExceeded {
                have: allowed,
                need: amount,
            })?;
        let movement = self.plan_move(owner, to, amount)?;

        self.apply_move(movement);
        self.storage.set_allowance(owner, caller, remaining);

        log::debug!(
            "TransferFrom {} -> {} by {}: {} (allowance left {})",
            owner,
            to,
            caller,
            amount,
            remaining
        );
        Ok(vec![
            LedgerEvent::transfer(self.token, owner, to, amount),
            LedgerEvent::approval(self.token, owner, caller, remaining),
        ])
    }

    fn ensure_active(&self) -> Result<(), TokenError> {
        if self.storage.initialized {
            Ok(())
        } else {
            Err(TokenError::NotInitialized)
        }
    }

    fn plan_move(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<BalanceMove, TokenError> {
        let have = self.storage.balance_of(&from);
        let debited = have
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance { have, need: amount })?;

        if from == to {
            return Ok(BalanceMove {
                from,
                from_balance: have,
                to,
                to_balance: have,
            });
        }

        let credited = self
            .storage
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        Ok(BalanceMove {
            from,
            from_balance: debited,
            to,
            to_balance: credited,
        })
    }

    fn apply_move(&mut self, movement: BalanceMove) {
        self.storage.set_balance(movement.from, movement.from_balance);
        self.storage.set_balance(movement.to, movement.to_balance);
    }
}
