//! ERC-20 style fungible token ledger
//!
//! The ledger is split into a persistent storage layout and stateless logic
//! operating on a handle to it, so the logic can be replaced while the
//! storage stays put:
//! - `TokenStorage`: balances, allowances, supply, metadata, init flag
//! - `Ledger`: initialize / transfer / approve / transfer_from
//! - `LedgerEvent`: Transfer and Approval notifications
//!
//! # Example
//!
//! ```rust
//! use arvol::core::{Address, U256};
//! use arvol::token::{Ledger, TokenStorage};
//!
//! let token = Address::random();
//! let admin = Address::random();
//! let user = Address::random();
//!
//! let mut storage = TokenStorage::new();
//! let mut ledger = Ledger::new(token, &mut storage);
//! ledger
//!     .initialize(admin, U256::from(1_000u64), "Arvol".to_string(), "ARV".to_string())
//!     .unwrap();
//! ledger.transfer(admin, user, U256::from(250u64)).unwrap();
//!
//! assert_eq!(storage.balance_of(&user), U256::from(250u64));
//! assert_eq!(storage.total_supply(), U256::from(1_000u64));
//! ```

pub mod events;
pub mod ledger;
pub mod storage;

pub use events::{ApprovalEvent, LedgerEvent, TransferEvent};
pub use ledger::{Ledger, TokenError};
pub use storage::{TokenStorage, STORAGE_LAYOUT_VERSION};
