//! `eth_sendBundle`

use super::{encode_transactions, is_zero};
use crate::codec::quantity;
use crate::rpc::{single_param, RelayCall};
use crate::Result;
use alloy::consensus::TxEnvelope;
use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Submit a bundle for inclusion in a target block.
///
/// Validity timestamps are plain unix seconds and are left out of the request
/// when zero.
#[derive(Debug, Clone, Default)]
pub struct SendBundle {
    /// Signed transactions. Takes precedence over `raw_transactions`.
    pub transactions: Vec<TxEnvelope>,
    /// Already encoded signed transactions
    pub raw_transactions: Vec<Bytes>,
    /// Block the bundle is valid for
    pub block_number: u64,
    /// Minimum unix timestamp the bundle is valid for
    pub min_timestamp: u64,
    /// Maximum unix timestamp the bundle is valid for
    pub max_timestamp: u64,
    /// Hashes of bundle transactions that are allowed to revert
    pub reverting_tx_hashes: Vec<B256>,
    /// Token that lets a later submission replace or cancel this bundle
    pub replacement_uuid: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendBundleParams<'a> {
    txs: Vec<Bytes>,
    #[serde(with = "quantity")]
    block_number: u64,
    #[serde(skip_serializing_if = "is_zero")]
    min_timestamp: u64,
    #[serde(skip_serializing_if = "is_zero")]
    max_timestamp: u64,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    reverting_tx_hashes: &'a [B256],
    #[serde(skip_serializing_if = "Option::is_none")]
    replacement_uuid: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBundleResponse {
    #[serde(default)]
    pub bundle_hash: B256,
}

impl RelayCall for SendBundle {
    const METHOD: &'static str = "eth_sendBundle";
    type Response = SendBundleResponse;
    type Output = B256;

    fn params(&self) -> Result<Vec<Value>> {
        let params = SendBundleParams {
            txs: encode_transactions(Self::METHOD, &self.transactions, &self.raw_transactions)?,
            block_number: self.block_number,
            min_timestamp: self.min_timestamp,
            max_timestamp: self.max_timestamp,
            reverting_tx_hashes: &self.reverting_tx_hashes,
            replacement_uuid: self.replacement_uuid,
        };
        single_param(Self::METHOD, &params)
    }

    fn decode(response: SendBundleResponse) -> Result<B256> {
        Ok(response.bundle_hash)
    }
}
