//! Metacoin Core
//!
//! Deterministic account-balance ledger behind the Metacoin token.
//!
//! # Architecture
//!
//! - **Ledger**: balance mapping plus the single transfer operation
//! - **Contract**: three call shapes (`transfer1`, `transfer2`, `transfer3`) routed to one transfer
//! - **Single Writer**: one actor task serializes every call from shared handles
//! - **Events**: every applied transfer yields a `TransferEvent`, logged and broadcast
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == genesis supply for all time
//! - Non-negativity: balances are unsigned; underflow is an error, never a wrap
//! - All-or-nothing: a rejected transfer leaves the ledger untouched

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod ledger;
pub mod contract;
pub mod error;
pub mod actor;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    parse_balance, Address, Balance, NestedTransferData, TransferData, TransferEvent,
};
pub use ledger::Ledger;
pub use contract::{Metacoin, TransferCall, TransferRequest};
pub use actor::{spawn_ledger_actor, LedgerHandle};
pub use config::Config;
pub use metrics::Metrics;
