//! Arvol: an upgradeable fungible token ledger in Rust
//!
//! This crate provides:
//! - An ERC-20 style ledger (balances, allowances, transfer, approve,
//!   delegated transfer) over unsigned 256-bit amounts
//! - Transfer and Approval events, broadcast in commit order
//! - Upgrade-in-place deployment: a proxy with a stable address keeps the
//!   token storage while the ledger logic behind it can be replaced
//! - JSON persistence with backups and a supply check on load
//!
//! # Example
//!
//! ```rust
//! use arvol::config::DeploymentParams;
//! use arvol::core::{Address, U256};
//! use arvol::proxy::{LedgerCall, LogicRegistry, ProxyHost};
//!
//! let admin = Address::new([0xad; 20]);
//! let user = Address::new([0x01; 20]);
//! let params = DeploymentParams {
//!     initial_supply: U256::from(1_000u64),
//!     ..Default::default()
//! };
//!
//! // Deploy and initialize in one step
//! let host = ProxyHost::deploy(LogicRegistry::with_defaults(), admin, &params, 0).unwrap();
//!
//! host.execute(admin, LedgerCall::Transfer { to: user, amount: U256::from(250u64) })
//!     .unwrap();
//! assert_eq!(host.with_storage(|s| s.balance_of(&user)), U256::from(250u64));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod proxy;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use config::{ConfigError, DeploymentParams};
pub use core::{Address, Amount, U256};
pub use proxy::{LedgerCall, LedgerLogic, LogicRegistry, Proxy, ProxyError, ProxyHost};
pub use storage::{Storage, StorageConfig, StorageError};
pub use token::{Ledger, LedgerEvent, TokenError, TokenStorage};
