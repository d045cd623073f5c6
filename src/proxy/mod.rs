//! Upgrade-in-place hosting
//!
//! The token's storage lives behind a proxy with a stable address; the logic
//! that operates on it can be replaced without moving or rewriting storage.
//! - `LedgerLogic` / `LogicRegistry`: replaceable, stateless logic versions
//! - `Proxy`: deploy, prepare_upgrade, upgrade, call routing
//! - `ProxyHost`: serialized execution and event subscription

pub mod deployment;
pub mod host;
pub mod logic;

pub use deployment::{Proxy, ProxyError, UpgradeRecord, EVENT_LOG_LIMIT};
pub use host::ProxyHost;
pub use logic::{ArvolLogic, LedgerCall, LedgerLogic, LogicRegistry, ARVOL_V1};
