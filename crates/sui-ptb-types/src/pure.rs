//! Pure-value inference from free-form literals.
//!
//! Builder inputs are typed by the caller as plain JSON (`5`, `"0xabc"`, `true`).
//! Before such a literal can become a transaction input it needs a Move type and a
//! BCS encoding. [`PureValue::infer`] picks the type the same way for every
//! consumer, so a literal encoded by the ledger path and rendered by the code
//! emitter always agree.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::address::{address_bytes, is_hex_address};

/// Scalar Move types a literal can be inferred as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PureType {
    Bool,
    U64,
    Address,
    String,
}

impl PureType {
    /// Move spelling of the type.
    pub fn as_move_type(&self) -> &'static str {
        match self {
            PureType::Bool => "bool",
            PureType::U64 => "u64",
            PureType::Address => "address",
            PureType::String => "0x1::string::String",
        }
    }

    /// Name used by the TypeScript SDK's `tx.pure.<name>(...)` helpers.
    pub fn sdk_name(&self) -> &'static str {
        match self {
            PureType::Bool => "bool",
            PureType::U64 => "u64",
            PureType::Address => "address",
            PureType::String => "string",
        }
    }
}

impl fmt::Display for PureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_move_type())
    }
}

/// A literal with an inferred Move type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureValue {
    Bool(bool),
    U64(u64),
    Address(String),
    String(String),
    /// Homogeneous vector of scalars.
    Vector { element: PureType, items: Vec<PureValue> },
    /// A literal with no pure encoding (null, negative or fractional numbers, maps,
    /// mixed arrays). Kept so callers can report it instead of guessing.
    Unsupported(Value),
}

impl PureValue {
    /// Infer the type of a generic Move-call argument literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use sui_ptb_types::PureValue;
    ///
    /// assert_eq!(PureValue::infer(&json!(7)), PureValue::U64(7));
    /// assert_eq!(PureValue::infer(&json!("0x2")), PureValue::Address("0x2".into()));
    /// assert_eq!(PureValue::infer(&json!("hello")), PureValue::String("hello".into()));
    /// ```
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(b) => PureValue::Bool(*b),
            Value::Number(n) => match n.as_u64() {
                Some(v) => PureValue::U64(v),
                None => PureValue::Unsupported(value.clone()),
            },
            Value::String(s) if is_hex_address(s) => PureValue::Address(s.clone()),
            Value::String(s) => PureValue::String(s.clone()),
            Value::Array(items) => Self::infer_vector(value, items),
            Value::Null | Value::Object(_) => PureValue::Unsupported(value.clone()),
        }
    }

    /// Infer a coin amount: numbers and decimal strings become `u64`.
    ///
    /// Coin balances are `u64` on chain, so anything outside that range (negative,
    /// fractional or too large) is unsupported.
    pub fn amount(value: &Value) -> Self {
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) => PureValue::U64(v),
            None => PureValue::Unsupported(value.clone()),
        }
    }

    /// Infer a transfer recipient; only address literals are accepted.
    pub fn recipient(value: &Value) -> Self {
        match value {
            Value::String(s) if is_hex_address(s) => PureValue::Address(s.clone()),
            _ => PureValue::Unsupported(value.clone()),
        }
    }

    fn infer_vector(original: &Value, items: &[Value]) -> Self {
        let inferred: Vec<PureValue> = items.iter().map(PureValue::infer).collect();
        let element = match inferred.first().and_then(PureValue::scalar_type) {
            Some(element) => element,
            None => return PureValue::Unsupported(original.clone()),
        };
        if inferred.iter().all(|v| v.scalar_type() == Some(element)) {
            PureValue::Vector {
                element,
                items: inferred,
            }
        } else {
            PureValue::Unsupported(original.clone())
        }
    }

    /// Scalar type of this value, `None` for vectors and unsupported literals.
    pub fn scalar_type(&self) -> Option<PureType> {
        match self {
            PureValue::Bool(_) => Some(PureType::Bool),
            PureValue::U64(_) => Some(PureType::U64),
            PureValue::Address(_) => Some(PureType::Address),
            PureValue::String(_) => Some(PureType::String),
            PureValue::Vector { .. } | PureValue::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, PureValue::Unsupported(_))
    }

    /// Move type of the value (`vector<u64>`, `address`, ...).
    pub fn move_type(&self) -> Option<String> {
        match self {
            PureValue::Vector { element, .. } => Some(format!("vector<{}>", element)),
            PureValue::Unsupported(_) => None,
            other => other.scalar_type().map(|t| t.as_move_type().to_string()),
        }
    }

    /// BCS-encode the value as a pure transaction input.
    pub fn to_bcs(&self) -> Result<Vec<u8>> {
        match self {
            PureValue::Bool(b) => Ok(bcs::to_bytes(b)?),
            PureValue::U64(v) => Ok(bcs::to_bytes(v)?),
            PureValue::Address(addr) => Ok(address_bytes(addr)?.to_vec()),
            PureValue::String(s) => Ok(bcs::to_bytes(s)?),
            PureValue::Vector { element, items } => encode_vector(*element, items),
            PureValue::Unsupported(value) => Err(anyhow!(
                "Literal {} has no pure encoding; use a bool, unsigned integer, address or string",
                value
            )),
        }
    }
}

/// BCS bytes of a homogeneous vector, encoded as a typed `Vec<T>`.
fn encode_vector(element: PureType, items: &[PureValue]) -> Result<Vec<u8>> {
    let bytes = match element {
        PureType::Bool => {
            let values = typed_items(items, |item| match item {
                PureValue::Bool(b) => Some(*b),
                _ => None,
            })?;
            bcs::to_bytes(&values)?
        }
        PureType::U64 => {
            let values = typed_items(items, |item| match item {
                PureValue::U64(v) => Some(*v),
                _ => None,
            })?;
            bcs::to_bytes(&values)?
        }
        PureType::String => {
            let values = typed_items(items, |item| match item {
                PureValue::String(s) => Some(s.as_str()),
                _ => None,
            })?;
            bcs::to_bytes(&values)?
        }
        PureType::Address => {
            let literals = typed_items(items, |item| match item {
                PureValue::Address(addr) => Some(addr.as_str()),
                _ => None,
            })?;
            let addresses = literals
                .into_iter()
                .map(address_bytes)
                .collect::<Result<Vec<[u8; 32]>>>()?;
            bcs::to_bytes(&addresses)?
        }
    };
    Ok(bytes)
}

fn typed_items<'a, T>(
    items: &'a [PureValue],
    pick: impl Fn(&'a PureValue) -> Option<T>,
) -> Result<Vec<T>> {
    items
        .iter()
        .map(|item| pick(item).ok_or_else(|| anyhow!("Mixed vector item {:?}", item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_scalars() {
        assert_eq!(PureValue::infer(&json!(true)), PureValue::Bool(true));
        assert_eq!(PureValue::infer(&json!(0)), PureValue::U64(0));
        assert_eq!(
            PureValue::infer(&json!("123")),
            PureValue::String("123".into())
        );
        assert!(!PureValue::infer(&json!(-5)).is_supported());
        assert!(!PureValue::infer(&json!(1.5)).is_supported());
        assert!(!PureValue::infer(&json!(null)).is_supported());
        assert!(!PureValue::infer(&json!({"a": 1})).is_supported());
    }

    #[test]
    fn test_infer_vectors() {
        let v = PureValue::infer(&json!([1, 2, 3]));
        assert_eq!(v.move_type().as_deref(), Some("vector<u64>"));

        assert!(!PureValue::infer(&json!([1, "a"])).is_supported());
        assert!(!PureValue::infer(&json!([])).is_supported());
        assert!(!PureValue::infer(&json!([[1]])).is_supported());
    }

    #[test]
    fn test_amount_coercion() {
        let million = PureValue::amount(&json!(1_000_000));
        assert_eq!(million, PureValue::U64(1_000_000));
        assert_eq!(PureValue::amount(&json!(" 42 ")), PureValue::U64(42));
        assert_eq!(
            PureValue::amount(&json!(u64::MAX.to_string())),
            PureValue::U64(u64::MAX)
        );
        assert!(!PureValue::amount(&json!("18446744073709551616")).is_supported());
        assert!(!PureValue::amount(&json!(-5)).is_supported());
        assert!(!PureValue::amount(&json!("-5")).is_supported());
        assert!(!PureValue::amount(&json!(true)).is_supported());
    }

    #[test]
    fn test_recipient_requires_address() {
        assert_eq!(
            PureValue::recipient(&json!("0xabc")),
            PureValue::Address("0xabc".into())
        );
        assert!(!PureValue::recipient(&json!("alice")).is_supported());
        assert!(!PureValue::recipient(&json!(5)).is_supported());
    }

    #[test]
    fn test_bcs_encoding() {
        let one = PureValue::U64(1).to_bcs().unwrap();
        assert_eq!(one, vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(PureValue::Bool(true).to_bcs().unwrap(), vec![1]);
        assert_eq!(
            PureValue::String("hi".into()).to_bcs().unwrap(),
            vec![2, b'h', b'i']
        );
        assert_eq!(PureValue::Address("0x2".into()).to_bcs().unwrap().len(), 32);

        let vector = PureValue::infer(&json!([true, false]));
        assert_eq!(vector.to_bcs().unwrap(), vec![2, 1, 0]);

        let strings = PureValue::infer(&json!(["a", "bc"]));
        assert_eq!(strings.to_bcs().unwrap(), vec![2, 1, b'a', 2, b'b', b'c']);

        let addresses = PureValue::infer(&json!(["0x1", "0x2"])).to_bcs().unwrap();
        assert_eq!(addresses.len(), 1 + 2 * 32);
        assert_eq!(addresses[0], 2);
        assert_eq!(addresses[32], 1);
        assert_eq!(addresses[64], 2);

        assert!(PureValue::Unsupported(json!(null)).to_bcs().is_err());
    }
}
