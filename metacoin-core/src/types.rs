//! Core types for the ledger
//!
//! All types are designed for:
//! - Exact arithmetic (arbitrary-precision unsigned balances)
//! - Stable JSON shapes (addresses as `0x` hex, balances as decimal strings)

use crate::{Error, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Token balance. Unsigned, so it can never go below zero.
pub type Balance = BigUint;

/// Parse a base-10 balance from user input
pub fn parse_balance(s: &str) -> Result<Balance> {
    if s.starts_with('-') {
        return Err(Error::InvalidAmount(format!("negative amount {}", s)));
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!("not a base-10 integer: {:?}", s)));
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| Error::InvalidAmount(format!("not a base-10 integer: {:?}", s)))
}

/// Account identifier (20-byte address)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(Error::InvalidAddress(format!(
                "expected 40 hex digits, got {} in {:?}",
                digits.len(),
                s
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{:?}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for [`Balance`]: written as a decimal string, read from a
/// string or a non-negative integer.
pub mod balance_serde {
    use super::{parse_balance, Balance};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    /// Serialize as a base-10 string
    pub fn serialize<S: Serializer>(value: &Balance, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Deserialize from a base-10 string or an unsigned integer
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
        deserializer.deserialize_any(BalanceVisitor)
    }

    struct BalanceVisitor;

    impl<'de> Visitor<'de> for BalanceVisitor {
        type Value = Balance;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Balance, E> {
            Ok(Balance::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Balance, E> {
            u64::try_from(v)
                .map(Balance::from)
                .map_err(|_| E::custom(format!("negative amount {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Balance, E> {
            parse_balance(v).map_err(E::custom)
        }
    }
}

/// Record of one applied transfer
///
/// Field order and serialized names follow the decoded `Transfer` log:
/// `from`, `to`, `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Debited account
    pub from: Address,

    /// Credited account
    pub to: Address,

    /// Amount moved
    #[serde(rename = "value", with = "balance_serde")]
    pub amount: Balance,
}

impl TransferEvent {
    /// Create new event
    pub fn new(from: Address, to: Address, amount: Balance) -> Self {
        Self { from, to, amount }
    }
}

/// Destination and amount of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferData {
    /// Credited account
    pub to: Address,

    /// Amount to move
    #[serde(with = "balance_serde")]
    pub amount: Balance,
}

impl TransferData {
    /// Create new transfer data
    pub fn new(to: Address, amount: impl Into<Balance>) -> Self {
        Self {
            to,
            amount: amount.into(),
        }
    }
}

/// Transfer data bundled with a callback tag in one parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTransferData {
    /// Destination and amount
    pub transfer_data: TransferData,

    /// Opaque tag carried alongside the call
    pub callback: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x5409ed021d9299bf6814279a6a1411a7e866a631";

    #[test]
    fn test_address_roundtrip_display() {
        let address: Address = OWNER.parse().unwrap();
        assert_eq!(address.to_string(), OWNER);
        assert_eq!(address.as_bytes()[0], 0x54);
    }

    #[test]
    fn test_address_zero() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(zero, Address::ZERO);
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!("0x1234".parse::<Address>(), Err(Error::InvalidAddress(_))));
        assert!(matches!(
            "0xzz09ed021d9299bf6814279a6a1411a7e866a631".parse::<Address>(),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_balance() {
        assert_eq!(parse_balance("10000").unwrap(), Balance::from(10000u32));
        assert_eq!(
            parse_balance("340282366920938463463374607431768211456").unwrap(),
            Balance::from(u128::MAX) + 1u32
        );
        assert!(matches!(parse_balance("-1"), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_balance(""), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_balance("1_000"), Err(Error::InvalidAmount(_))));
        assert!(matches!(parse_balance("+5"), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_transfer_event_json_shape() {
        let owner: Address = OWNER.parse().unwrap();
        let event = TransferEvent::new(owner, Address::ZERO, Balance::from(5000u32));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"from":"{}","to":"0x0000000000000000000000000000000000000000","value":"5000"}}"#,
                OWNER
            )
        );
    }

    #[test]
    fn test_nested_transfer_data_accepts_integer_amount() {
        let json = r#"{"transferData":{"to":"0x0000000000000000000000000000000000000000","amount":5000},"callback":59}"#;
        let nested: NestedTransferData = serde_json::from_str(json).unwrap();
        assert_eq!(nested.callback, 59);
        assert_eq!(nested.transfer_data, TransferData::new(Address::ZERO, 5000u32));
    }

    #[test]
    fn test_negative_integer_amount_rejected() {
        let json = r#"{"to":"0x0000000000000000000000000000000000000000","amount":-1}"#;
        assert!(serde_json::from_str::<TransferData>(json).is_err());
    }
}
