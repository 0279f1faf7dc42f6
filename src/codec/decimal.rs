//! Decimal-string integers
//!
//! The relay reports monetary and gas totals as arbitrary-precision integers
//! wrapped in a JSON string (`"1280749594841588639"`). These are NOT the hex
//! quantities used for block numbers; see [`super::quantity`] for those.

use num_bigint::BigInt;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A token that is not a quoted decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number string {0}")]
pub struct FormatError(pub String);

/// Arbitrary-precision integer that travels as a quoted decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecimalInt(pub BigInt);

impl DecimalInt {
    /// Encode as a JSON string token, including the quotes.
    pub fn to_json_token(&self) -> String {
        format!("\"{}\"", encode_decimal(&self.0))
    }

    /// Decode a raw JSON token. The token must be wrapped in double quotes;
    /// an empty quoted string decodes to zero.
    pub fn from_json_token(input: &[u8]) -> Result<Self, FormatError> {
        let raw = String::from_utf8_lossy(input);
        if input.len() < 2 || input[0] != b'"' || input[input.len() - 1] != b'"' {
            return Err(FormatError(raw.into_owned()));
        }
        let inner = &raw[1..raw.len() - 1];
        if inner.is_empty() {
            return Ok(Self::default());
        }
        decode_decimal(inner).map(Self)
    }

    pub fn into_inner(self) -> BigInt {
        self.0
    }
}

impl From<BigInt> for DecimalInt {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<DecimalInt> for BigInt {
    fn from(value: DecimalInt) -> Self {
        value.0
    }
}

impl fmt::Display for DecimalInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decimal text of `value`: no leading zeros, `-` for negatives, `0` for zero.
pub fn encode_decimal(value: &BigInt) -> String {
    value.to_str_radix(10)
}

/// Parse unquoted decimal text. Accepts an optional sign followed by at least
/// one ASCII digit and nothing else.
pub fn decode_decimal(text: &str) -> Result<BigInt, FormatError> {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError(format!("{:?}", text)));
    }
    BigInt::parse_bytes(text.as_bytes(), 10).ok_or_else(|| FormatError(format!("{:?}", text)))
}

impl Serialize for DecimalInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_decimal(&self.0))
    }
}

impl<'de> Deserialize<'de> for DecimalInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl de::Visitor<'_> for DecimalVisitor {
            type Value = DecimalInt;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal integer wrapped in a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DecimalInt, E> {
                if v.is_empty() {
                    return Ok(DecimalInt::default());
                }
                decode_decimal(v).map(DecimalInt).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<DecimalInt, E> {
                Err(E::custom(FormatError(v.to_string())))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<DecimalInt, E> {
                Err(E::custom(FormatError(v.to_string())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<DecimalInt, E> {
                Err(E::custom(FormatError(v.to_string())))
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}

/// Serde helpers for `Option<BigInt>` fields that use the decimal-string
/// encoding. A missing or `null` field decodes to `None`.
pub mod opt {
    use super::DecimalInt;
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<BigInt>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.clone().map(DecimalInt).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigInt>, D::Error> {
        Ok(Option::<DecimalInt>::deserialize(deserializer)?.map(DecimalInt::into_inner))
    }
}
