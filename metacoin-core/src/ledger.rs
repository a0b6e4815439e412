//! Account-balance ledger
//!
//! Holds the balance of every account and applies transfers. All mutation
//! after genesis goes through [`Ledger::transfer`].
//!
//! # Example
//!
//! ```
//! use metacoin_core::{Address, Balance, Ledger};
//!
//! let owner: Address = "0x5409ed021d9299bf6814279a6a1411a7e866a631".parse().unwrap();
//! let mut ledger = Ledger::create(owner, Balance::from(10000u32));
//!
//! let event = ledger.transfer(owner, Address::ZERO, Balance::from(5000u32)).unwrap();
//! assert_eq!(event.amount, Balance::from(5000u32));
//! assert_eq!(ledger.balance_of(&Address::ZERO), Balance::from(5000u32));
//! ```

use crate::{
    types::{Address, Balance, TransferEvent},
    Error, Result,
};
use num_traits::{CheckedSub, Zero};
use std::collections::HashMap;

/// Main ledger state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Account balances. Absent accounts hold zero.
    balances: HashMap<Address, Balance>,

    /// Account credited at genesis
    owner: Address,

    /// Supply created at genesis
    total_supply: Balance,

    /// Append-only log of applied transfers (if enabled)
    events: Option<Vec<TransferEvent>>,
}

impl Ledger {
    /// Genesis: credit the whole supply to `owner`
    pub fn create(owner: Address, initial_supply: Balance) -> Self {
        let mut balances = HashMap::new();
        balances.insert(owner, initial_supply.clone());

        tracing::info!(%owner, supply = %initial_supply, "Ledger created");

        Self {
            balances,
            owner,
            total_supply: initial_supply,
            events: Some(Vec::new()),
        }
    }

    /// Stop keeping transfer events after they are returned
    pub fn without_event_log(mut self) -> Self {
        self.events = None;
        self
    }

    /// Balance of an account, zero if never credited
    pub fn balance_of(&self, account: &Address) -> Balance {
        self.balances.get(account).cloned().unwrap_or_default()
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Either both the debit and the credit are applied, or nothing is.
    /// `from` is trusted as the authenticated caller.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Balance) -> Result<TransferEvent> {
        let sender_balance = self.balance_of(&from);

        let Some(debited) = sender_balance.checked_sub(&amount) else {
            tracing::warn!(
                %from,
                %to,
                balance = %sender_balance,
                requested = %amount,
                "Transfer rejected"
            );
            return Err(Error::InsufficientBalance {
                account: from,
                balance: sender_balance,
                requested: amount,
            });
        };

        // Zero and self transfers leave every balance (and every entry) as is
        if from != to && !amount.is_zero() {
            let credited = self.balance_of(&to) + &amount;
            self.balances.insert(from, debited);
            self.balances.insert(to, credited);
        }

        let event = TransferEvent::new(from, to, amount);
        if let Some(events) = self.events.as_mut() {
            events.push(event.clone());
        }

        tracing::debug!(%from, %to, amount = %event.amount, "Transfer applied");
        Ok(event)
    }

    /// Account credited at genesis
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Supply created at genesis
    pub fn total_supply(&self) -> &Balance {
        &self.total_supply
    }

    /// Sum of all balances
    pub fn circulating_supply(&self) -> Balance {
        self.balances.values().sum()
    }

    /// Number of accounts with an entry in the mapping
    pub fn accounts(&self) -> usize {
        self.balances.len()
    }

    /// Logged transfers in application order (empty if the log is disabled)
    pub fn events(&self) -> &[TransferEvent] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Whether the event log is kept
    pub fn event_log_enabled(&self) -> bool {
        self.events.is_some()
    }

    /// Check supply conservation
    ///
    /// The sum of all balances must equal the genesis supply at all times.
    pub fn check_conservation(&self) -> bool {
        self.circulating_supply() == self.total_supply
    }
}
