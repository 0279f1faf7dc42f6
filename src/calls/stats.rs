//! Relay statistics: `flashbots_getBundleStats[V2]` and
//! `flashbots_getUserStats[V2]`
//!
//! The relay only answers for block numbers within a few blocks of the chain
//! tip. Payment and gas totals use the decimal-string encoding; everything
//! else is plain JSON. Fields the relay leaves out keep their default.

use crate::codec::{decimal, encode_quantity, null_as_default, quantity};
use crate::rpc::{single_param, RelayCall};
use crate::Result;
use alloy::primitives::B256;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleStatsParams {
    bundle_hash: B256,
    #[serde(with = "quantity")]
    block_number: u64,
}

fn bundle_stats_params(method: &str, bundle_hash: B256, block_number: u64) -> Result<Vec<Value>> {
    single_param(
        method,
        &BundleStatsParams {
            bundle_hash,
            block_number,
        },
    )
}

/// Legacy bundle stats. Prefer [`BundleStatsV2`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleStats {
    pub bundle_hash: B256,
    pub block_number: u64,
}

impl BundleStats {
    pub fn new(bundle_hash: B256, block_number: u64) -> Self {
        Self {
            bundle_hash,
            block_number,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleStatsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub is_simulated: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_sent_to_miners: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_high_priority: bool,
    pub simulated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub sent_to_miners_at: Option<DateTime<Utc>>,
}

impl RelayCall for BundleStats {
    const METHOD: &'static str = "flashbots_getBundleStats";
    type Response = BundleStatsResponse;
    type Output = BundleStatsResponse;

    fn params(&self) -> Result<Vec<Value>> {
        bundle_stats_params(Self::METHOD, self.bundle_hash, self.block_number)
    }

    fn decode(response: BundleStatsResponse) -> Result<BundleStatsResponse> {
        Ok(response)
    }
}

/// Bundle stats including which builders considered and sealed the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleStatsV2 {
    pub bundle_hash: B256,
    pub block_number: u64,
}

impl BundleStatsV2 {
    pub fn new(bundle_hash: B256, block_number: u64) -> Self {
        Self {
            bundle_hash,
            block_number,
        }
    }
}

/// A builder and the time it acted on a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderTimestamp {
    /// BLS public key of the builder
    pub pubkey: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleStatsV2Response {
    #[serde(deserialize_with = "null_as_default")]
    pub is_high_priority: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_simulated: bool,
    pub simulated_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub considered_by_builders_at: Vec<BuilderTimestamp>,
    #[serde(deserialize_with = "null_as_default")]
    pub sealed_by_builders_at: Vec<BuilderTimestamp>,
}

impl RelayCall for BundleStatsV2 {
    const METHOD: &'static str = "flashbots_getBundleStatsV2";
    type Response = BundleStatsV2Response;
    type Output = BundleStatsV2Response;

    fn params(&self) -> Result<Vec<Value>> {
        bundle_stats_params(Self::METHOD, self.bundle_hash, self.block_number)
    }

    fn decode(response: BundleStatsV2Response) -> Result<BundleStatsV2Response> {
        Ok(response)
    }
}

/// Legacy searcher stats. Prefer [`UserStatsV2`].
///
/// The block number is sent as a bare hex string rather than an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub block_number: u64,
}

impl UserStats {
    pub fn new(block_number: u64) -> Self {
        Self { block_number }
    }
}

/// Searcher reputation and totals, as reported with snake_case keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatsResponse {
    /// Whether the searcher qualifies for the high priority queue
    #[serde(deserialize_with = "null_as_default")]
    pub is_high_priority: bool,
    #[serde(with = "decimal::opt")]
    pub all_time_miner_payments: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub all_time_gas_simulated: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub last_7d_miner_payments: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub last_7d_gas_simulated: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub last_1d_miner_payments: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub last_1d_gas_simulated: Option<BigInt>,
}

impl RelayCall for UserStats {
    const METHOD: &'static str = "flashbots_getUserStats";
    type Response = UserStatsResponse;
    type Output = UserStatsResponse;

    fn params(&self) -> Result<Vec<Value>> {
        Ok(vec![Value::String(encode_quantity(self.block_number))])
    }

    fn decode(response: UserStatsResponse) -> Result<UserStatsResponse> {
        Ok(response)
    }
}

/// Searcher stats with validator payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsV2 {
    #[serde(with = "quantity")]
    pub block_number: u64,
}

impl UserStatsV2 {
    pub fn new(block_number: u64) -> Self {
        Self { block_number }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStatsV2Response {
    #[serde(deserialize_with = "null_as_default")]
    pub is_high_priority: bool,
    #[serde(with = "decimal::opt")]
    pub all_time_validator_payments: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub all_time_gas_simulated: Option<BigInt>,
    #[serde(rename = "last7dValidatorPayments", with = "decimal::opt")]
    pub last_7d_validator_payments: Option<BigInt>,
    #[serde(rename = "last7dGasSimulated", with = "decimal::opt")]
    pub last_7d_gas_simulated: Option<BigInt>,
    #[serde(rename = "last1dValidatorPayments", with = "decimal::opt")]
    pub last_1d_validator_payments: Option<BigInt>,
    #[serde(rename = "last1dGasSimulated", with = "decimal::opt")]
    pub last_1d_gas_simulated: Option<BigInt>,
}

impl RelayCall for UserStatsV2 {
    const METHOD: &'static str = "flashbots_getUserStatsV2";
    type Response = UserStatsV2Response;
    type Output = UserStatsV2Response;

    fn params(&self) -> Result<Vec<Value>> {
        single_param(Self::METHOD, self)
    }

    fn decode(response: UserStatsV2Response) -> Result<UserStatsV2Response> {
        Ok(response)
    }
}
