//! Relay methods
//!
//! One [`RelayCall`](crate::rpc::RelayCall) per relay JSON-RPC method.
//! Bind a call to a destination with `returns` and execute it with
//! [`RelayClient::call`](crate::RelayClient::call) or
//! [`RelayClient::batch`](crate::RelayClient::batch).

mod call_bundle;
mod private_tx;
mod send_bundle;
mod stats;

pub use call_bundle::{CallBundle, CallBundleResponse, CallBundleResult, TxOutcome};
pub use private_tx::{CancelPrivateTransaction, SendPrivateTransaction};
pub use send_bundle::{SendBundle, SendBundleResponse};
pub use stats::{
    BuilderTimestamp, BundleStats, BundleStatsResponse, BundleStatsV2, BundleStatsV2Response,
    UserStats, UserStatsResponse, UserStatsV2, UserStatsV2Response,
};

use crate::{Error, Result};
use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::Bytes;

/// Encode the transactions of a bundle. Signed transactions take precedence
/// over raw ones when both are given.
pub(crate) fn encode_transactions(
    method: &str,
    transactions: &[TxEnvelope],
    raw_transactions: &[Bytes],
) -> Result<Vec<Bytes>> {
    let encoded: Vec<Bytes> = if transactions.is_empty() {
        raw_transactions.to_vec()
    } else {
        transactions
            .iter()
            .map(|tx| Bytes::from(tx.encoded_2718()))
            .collect()
    };

    if encoded.is_empty() {
        return Err(Error::Encoding(format!(
            "{}: bundle contains no transactions",
            method
        )));
    }
    Ok(encoded)
}

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}
