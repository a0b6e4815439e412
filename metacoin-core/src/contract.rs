//! Metacoin contract wrapper
//!
//! The contract exposes one transfer under three call shapes:
//!
//! | Method      | Parameters                                   |
//! |-------------|----------------------------------------------|
//! | `transfer1` | `TransferData { to, amount }`                |
//! | `transfer2` | `TransferData { to, amount }`, `callback`    |
//! | `transfer3` | `NestedTransferData { transferData, callback }` |
//!
//! Each shape is normalized by [`TransferCall::into_parts`] and handed to
//! [`Ledger::transfer`]; the callback tag never reaches the ledger.

use crate::{
    types::{Address, Balance, NestedTransferData, TransferData, TransferEvent},
    Ledger, Result,
};
use serde::{Deserialize, Serialize};

/// One transfer call in any of its supported shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TransferCall {
    /// `transfer1(data)`
    #[serde(rename = "transfer1")]
    Plain(TransferData),

    /// `transfer2(data, callback)`
    #[serde(rename = "transfer2")]
    WithCallback {
        /// Destination and amount
        data: TransferData,
        /// Side-channel tag
        callback: u8,
    },

    /// `transfer3({transferData, callback})`
    #[serde(rename = "transfer3")]
    Bundled(NestedTransferData),
}

impl TransferCall {
    /// Method name as exposed by the contract
    pub fn method(&self) -> &'static str {
        match self {
            TransferCall::Plain(_) => "transfer1",
            TransferCall::WithCallback { .. } => "transfer2",
            TransferCall::Bundled(_) => "transfer3",
        }
    }

    /// Callback tag, if the shape carries one
    pub fn callback(&self) -> Option<u8> {
        match self {
            TransferCall::Plain(_) => None,
            TransferCall::WithCallback { callback, .. } => Some(*callback),
            TransferCall::Bundled(nested) => Some(nested.callback),
        }
    }

    /// Normalize to `(to, amount)`
    pub fn into_parts(self) -> (Address, Balance) {
        let data = match self {
            TransferCall::Plain(data) => data,
            TransferCall::WithCallback { data, .. } => data,
            TransferCall::Bundled(nested) => nested.transfer_data,
        };
        (data.to, data.amount)
    }
}

/// A call submitted on behalf of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Authenticated caller, debited by the transfer
    pub from: Address,

    /// The call itself
    pub call: TransferCall,
}

/// Deployed Metacoin instance
#[derive(Debug, Clone)]
pub struct Metacoin {
    ledger: Ledger,
}

impl Metacoin {
    /// Deploy: the deployer receives the whole supply
    pub fn deploy(owner: Address, initial_supply: Balance) -> Self {
        Self::from_ledger(Ledger::create(owner, initial_supply))
    }

    /// Wrap an existing ledger
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// `balances(account)` getter
    pub fn balances(&self, account: &Address) -> Balance {
        self.ledger.balance_of(account)
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// `transfer1(data)`
    pub fn transfer1(&mut self, caller: Address, data: TransferData) -> Result<TransferEvent> {
        self.call(caller, TransferCall::Plain(data))
    }

    /// `transfer2(data, callback)`
    pub fn transfer2(
        &mut self,
        caller: Address,
        data: TransferData,
        callback: u8,
    ) -> Result<TransferEvent> {
        self.call(caller, TransferCall::WithCallback { data, callback })
    }

    /// `transfer3({transferData, callback})`
    pub fn transfer3(&mut self, caller: Address, nested: NestedTransferData) -> Result<TransferEvent> {
        self.call(caller, TransferCall::Bundled(nested))
    }

    /// Dispatch any call shape to the ledger
    pub fn call(&mut self, caller: Address, call: TransferCall) -> Result<TransferEvent> {
        let method = call.method();
        let callback = call.callback();
        let (to, amount) = call.into_parts();

        tracing::trace!(method, ?callback, %caller, %to, "Dispatching transfer");
        self.ledger.transfer(caller, to, amount)
    }

    /// Dispatch a submitted request
    pub fn submit(&mut self, request: TransferRequest) -> Result<TransferEvent> {
        self.call(request.from, request.call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const INITIAL_BALANCE: u32 = 10000;

    fn owner() -> Address {
        "0x5409ed021d9299bf6814279a6a1411a7e866a631".parse().unwrap()
    }

    fn half() -> TransferData {
        TransferData::new(Address::ZERO, INITIAL_BALANCE / 2)
    }

    fn deploy() -> Metacoin {
        Metacoin::deploy(owner(), Balance::from(INITIAL_BALANCE))
    }

    #[test]
    fn test_constructor_credits_creator() {
        let metacoin = deploy();
        assert_eq!(metacoin.balances(&owner()), Balance::from(INITIAL_BALANCE));
    }

    #[test]
    fn test_into_parts_ignores_callback() {
        let plain = TransferCall::Plain(half());
        let with_callback = TransferCall::WithCallback { data: half(), callback: 59 };
        let bundled = TransferCall::Bundled(NestedTransferData { transfer_data: half(), callback: 59 });

        assert_eq!(plain.callback(), None);
        assert_eq!(with_callback.callback(), Some(59));
        assert_eq!(bundled.callback(), Some(59));

        let expected = (Address::ZERO, Balance::from(5000u32));
        assert_eq!(plain.into_parts(), expected);
        assert_eq!(with_callback.into_parts(), expected);
        assert_eq!(bundled.into_parts(), expected);
    }

    #[test]
    fn test_three_entry_points_identical() {
        let mut a = deploy();
        let mut b = deploy();
        let mut c = deploy();

        let e1 = a.transfer1(owner(), half()).unwrap();
        let e2 = b.transfer2(owner(), half(), 59).unwrap();
        let e3 = c
            .transfer3(owner(), NestedTransferData { transfer_data: half(), callback: 59 })
            .unwrap();

        assert_eq!(e1, e2);
        assert_eq!(e2, e3);
        assert_eq!(a.ledger(), b.ledger());
        assert_eq!(b.ledger(), c.ledger());
        assert_eq!(a.balances(&Address::ZERO), Balance::from(5000u32));
    }

    #[test]
    fn test_entry_point_propagates_insufficient_balance() {
        let mut metacoin = deploy();
        let result = metacoin.transfer2(
            owner(),
            TransferData::new(Address::ZERO, INITIAL_BALANCE + 1),
            59,
        );
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(metacoin.balances(&owner()), Balance::from(INITIAL_BALANCE));
    }

    #[test]
    fn test_request_json_shapes() {
        let zero = "0x0000000000000000000000000000000000000000";
        let from = "0x5409ed021d9299bf6814279a6a1411a7e866a631";

        let json1 = format!(
            r#"{{"from":"{from}","call":{{"method":"transfer1","params":{{"to":"{zero}","amount":"5000"}}}}}}"#
        );
        let json2 = format!(
            r#"{{"from":"{from}","call":{{"method":"transfer2","params":{{"data":{{"to":"{zero}","amount":5000}},"callback":59}}}}}}"#
        );
        let json3 = format!(
            r#"{{"from":"{from}","call":{{"method":"transfer3","params":{{"transferData":{{"to":"{zero}","amount":"5000"}},"callback":59}}}}}}"#
        );

        let r1: TransferRequest = serde_json::from_str(&json1).unwrap();
        let r2: TransferRequest = serde_json::from_str(&json2).unwrap();
        let r3: TransferRequest = serde_json::from_str(&json3).unwrap();

        assert_eq!(r1.call.method(), "transfer1");
        assert_eq!(r2.call.method(), "transfer2");
        assert_eq!(r3.call.method(), "transfer3");

        let mut events = Vec::new();
        for request in [r1, r2, r3] {
            let mut metacoin = deploy();
            events.push(metacoin.submit(request).unwrap());
        }
        assert!(events.iter().all(|e| e == &events[0]));
        assert_eq!(events[0].from, owner());
    }
}
