//! Wire encodings for relay values
//!
//! Two integer encodings coexist on the relay API and must never be mixed:
//! - [`quantity`]: `0x` hex for block numbers and other chain quantities
//! - [`decimal`]: quoted decimal strings for monetary and gas totals
//!
//! Byte blobs, hashes and addresses use alloy's own `0x` hex serde.

use serde::{Deserialize, Deserializer};

pub mod decimal;
pub mod quantity;

pub use decimal::{decode_decimal, encode_decimal, DecimalInt, FormatError};
pub use quantity::{block_number_arg, decode_quantity, encode_quantity, QuantityError, LATEST};

/// `deserialize_with` helper: an explicit `null` leaves the field at its
/// default, the same as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
