//! Ledger notifications
//!
//! `Transfer` and `Approval` are the only outbound interface of the ledger.
//! Each successful operation returns its events in emission order.

use crate::core::{Address, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transfer event (emitted when tokens move, including the initial mint)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

/// Approval event (emitted when an allowance is set or drawn down)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

/// Any notification emitted by the ledger
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

impl LedgerEvent {
    pub fn transfer(token: Address, from: Address, to: Address, amount: Amount) -> Self {
        LedgerEvent::Transfer(TransferEvent {
            token,
            from,
            to,
            amount,
            timestamp: Utc::now(),
        })
    }

    pub fn approval(token: Address, owner: Address, spender: Address, amount: Amount) -> Self {
        LedgerEvent::Approval(ApprovalEvent {
            token,
            owner,
            spender,
            amount,
            timestamp: Utc::now(),
        })
    }

    /// Event name as observers see it
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer(_) => "Transfer",
            LedgerEvent::Approval(_) => "Approval",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::Transfer(event) => event.timestamp,
            LedgerEvent::Approval(event) => event.timestamp,
        }
    }
}
