//! Hex quantities and block tags
//!
//! Chain-native numbers (block numbers, max-inclusion bounds) travel as
//! `0x`-prefixed hex without leading zeros. A state block that is missing or
//! negative is sent as the `latest` tag.

use serde::{de, Deserialize, Deserializer, Serializer};
use thiserror::Error;

/// Tag sent in place of a block number when none was requested.
pub const LATEST: &str = "latest";

/// Canonical hex encoding of `value` (`0x0` for zero).
pub fn encode_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

/// A string that is not a `0x`-prefixed hex quantity fitting in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("missing 0x prefix in quantity {0:?}")]
    MissingPrefix(String),
    #[error("invalid hex quantity {0:?}")]
    InvalidDigits(String),
    #[error("quantity {0:?} overflows u64")]
    Overflow(String),
}

/// Parse a `0x`-prefixed hex quantity. Only hex digits may follow the prefix.
pub fn decode_quantity(text: &str) -> Result<u64, QuantityError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| QuantityError::MissingPrefix(text.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidDigits(text.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| QuantityError::Overflow(text.to_string()))
}

/// Block argument for simulation state: `latest` when `block` is `None` or
/// negative, the hex quantity otherwise.
pub fn block_number_arg(block: Option<i64>) -> String {
    match block {
        Some(n) if n >= 0 => encode_quantity(n as u64),
        _ => LATEST.to_string(),
    }
}

/// Serde `with` helper for required `u64` hex quantities.
pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_quantity(*value))
}

/// Serde `with` helper for required `u64` hex quantities.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let text = String::deserialize(deserializer)?;
    decode_quantity(&text).map_err(de::Error::custom)
}

/// Serde helpers for `Option<u64>` hex quantities.
pub mod opt {
    use super::{decode_quantity, encode_quantity};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&encode_quantity(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| decode_quantity(&text).map_err(de::Error::custom))
            .transpose()
    }
}
