//! `eth_sendPrivateTransaction` and `eth_cancelPrivateTransaction`

use crate::codec::quantity;
use crate::rpc::{single_param, RelayCall};
use crate::{Error, Result};
use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Bytes, B256};
use serde::Serialize;
use serde_json::Value;

/// Send a single transaction to the relay instead of the public mempool.
#[derive(Debug, Clone, Default)]
pub struct SendPrivateTransaction {
    /// Signed transaction. Takes precedence over `raw_transaction`.
    pub transaction: Option<TxEnvelope>,
    pub raw_transaction: Bytes,
    /// Last block the relay should try to include the transaction in
    pub max_block_number: Option<u64>,
    /// Share the transaction with all builders for faster inclusion
    pub fast: bool,
}

impl SendPrivateTransaction {
    /// Send an already encoded signed transaction
    pub fn raw(raw_transaction: Bytes) -> Self {
        Self {
            raw_transaction,
            ..Default::default()
        }
    }

    /// Send a signed transaction
    pub fn signed(transaction: TxEnvelope) -> Self {
        Self {
            transaction: Some(transaction),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendPrivateTransactionParams {
    tx: Bytes,
    #[serde(with = "quantity::opt", skip_serializing_if = "Option::is_none")]
    max_block_number: Option<u64>,
    preferences: Preferences,
}

#[derive(Serialize)]
struct Preferences {
    fast: bool,
}

impl RelayCall for SendPrivateTransaction {
    const METHOD: &'static str = "eth_sendPrivateTransaction";
    type Response = B256;
    type Output = B256;

    fn params(&self) -> Result<Vec<Value>> {
        let tx = match &self.transaction {
            Some(tx) => Bytes::from(tx.encoded_2718()),
            None => self.raw_transaction.clone(),
        };
        if tx.is_empty() {
            return Err(Error::Encoding(format!(
                "{}: no transaction given",
                Self::METHOD
            )));
        }

        let params = SendPrivateTransactionParams {
            tx,
            max_block_number: self.max_block_number,
            preferences: Preferences { fast: self.fast },
        };
        single_param(Self::METHOD, &params)
    }

    fn decode(response: B256) -> Result<B256> {
        Ok(response)
    }
}

/// Stop the relay from including a previously sent private transaction.
///
/// Resolves to `true` once the relay confirms the cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPrivateTransaction {
    pub tx_hash: B256,
}

impl CancelPrivateTransaction {
    pub fn new(tx_hash: B256) -> Self {
        Self { tx_hash }
    }
}

impl RelayCall for CancelPrivateTransaction {
    const METHOD: &'static str = "eth_cancelPrivateTransaction";
    type Response = bool;
    type Output = bool;

    fn params(&self) -> Result<Vec<Value>> {
        single_param(Self::METHOD, self)
    }

    fn decode(response: bool) -> Result<bool> {
        Ok(response)
    }
}
