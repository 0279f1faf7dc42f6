//! `eth_callBundle`

use super::encode_transactions;
use crate::codec::{block_number_arg, decimal, null_as_default, quantity};
use crate::rpc::{single_param, RelayCall};
use crate::Result;
use alloy::consensus::TxEnvelope;
use alloy::primitives::{Address, Bytes, B256};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Simulate a bundle on top of a given state block.
#[derive(Debug, Clone, Default)]
pub struct CallBundle {
    /// Signed transactions. Takes precedence over `raw_transactions`.
    pub transactions: Vec<TxEnvelope>,
    pub raw_transactions: Vec<Bytes>,
    /// Block the bundle would be valid for
    pub block_number: u64,
    /// State to simulate on top of. `None` or negative means `latest`.
    pub state_block_number: Option<i64>,
    /// Timestamp of the simulated block
    pub timestamp: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CallBundleParams {
    txs: Vec<Bytes>,
    #[serde(with = "quantity")]
    block_number: u64,
    state_block_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
}

/// Aggregate simulation result. Totals the relay leaves out stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallBundleResponse {
    #[serde(with = "decimal::opt")]
    pub bundle_gas_price: Option<BigInt>,
    #[serde(deserialize_with = "null_as_default")]
    pub bundle_hash: B256,
    #[serde(with = "decimal::opt")]
    pub coinbase_diff: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub eth_sent_to_coinbase: Option<BigInt>,
    #[serde(with = "decimal::opt")]
    pub gas_fees: Option<BigInt>,
    #[serde(deserialize_with = "null_as_default")]
    pub state_block_number: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_gas_used: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<CallBundleResult>,
}

/// How a simulated transaction ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxOutcome {
    #[default]
    Success,
    /// Execution error reported by the relay
    Error(String),
    /// Revert reason
    Revert(String),
}

/// Simulation result of one bundle transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireCallBundleResult", into = "WireCallBundleResult")]
pub struct CallBundleResult {
    pub coinbase_diff: Option<BigInt>,
    pub eth_sent_to_coinbase: Option<BigInt>,
    pub from_address: Address,
    pub gas_fees: Option<BigInt>,
    pub gas_price: Option<BigInt>,
    pub gas_used: u64,
    pub to_address: Option<Address>,
    pub tx_hash: B256,
    /// Return data
    pub value: Bytes,
    pub outcome: TxOutcome,
}

impl CallBundleResult {
    pub fn is_success(&self) -> bool {
        self.outcome == TxOutcome::Success
    }
}

/// Result as it appears on the wire, with `error` and `revert` as two
/// independent fields. A reverted transaction usually carries both: a generic
/// `error` and the reason in `revert`.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireCallBundleResult {
    #[serde(with = "decimal::opt", skip_serializing_if = "Option::is_none")]
    coinbase_diff: Option<BigInt>,
    #[serde(with = "decimal::opt", skip_serializing_if = "Option::is_none")]
    eth_sent_to_coinbase: Option<BigInt>,
    #[serde(deserialize_with = "null_as_default")]
    from_address: Address,
    #[serde(with = "decimal::opt", skip_serializing_if = "Option::is_none")]
    gas_fees: Option<BigInt>,
    #[serde(with = "decimal::opt", skip_serializing_if = "Option::is_none")]
    gas_price: Option<BigInt>,
    #[serde(deserialize_with = "null_as_default")]
    gas_used: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_address: Option<Address>,
    #[serde(deserialize_with = "null_as_default")]
    tx_hash: B256,
    #[serde(deserialize_with = "null_as_default")]
    value: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    revert: Option<String>,
}

impl From<WireCallBundleResult> for CallBundleResult {
    fn from(wire: WireCallBundleResult) -> Self {
        // a revert reason is more specific than the error that accompanies it
        let outcome = match (wire.error, wire.revert) {
            (_, Some(reason)) => TxOutcome::Revert(reason),
            (Some(error), None) => TxOutcome::Error(error),
            (None, None) => TxOutcome::Success,
        };

        Self {
            coinbase_diff: wire.coinbase_diff,
            eth_sent_to_coinbase: wire.eth_sent_to_coinbase,
            from_address: wire.from_address,
            gas_fees: wire.gas_fees,
            gas_price: wire.gas_price,
            gas_used: wire.gas_used,
            to_address: wire.to_address,
            tx_hash: wire.tx_hash,
            value: wire.value,
            outcome,
        }
    }
}

impl From<CallBundleResult> for WireCallBundleResult {
    fn from(result: CallBundleResult) -> Self {
        let (error, revert) = match result.outcome {
            TxOutcome::Success => (None, None),
            TxOutcome::Error(error) => (Some(error), None),
            TxOutcome::Revert(reason) => (None, Some(reason)),
        };
        Self {
            coinbase_diff: result.coinbase_diff,
            eth_sent_to_coinbase: result.eth_sent_to_coinbase,
            from_address: result.from_address,
            gas_fees: result.gas_fees,
            gas_price: result.gas_price,
            gas_used: result.gas_used,
            to_address: result.to_address,
            tx_hash: result.tx_hash,
            value: result.value,
            error,
            revert,
        }
    }
}

impl RelayCall for CallBundle {
    const METHOD: &'static str = "eth_callBundle";
    type Response = CallBundleResponse;
    type Output = CallBundleResponse;

    fn params(&self) -> Result<Vec<Value>> {
        let params = CallBundleParams {
            txs: encode_transactions(Self::METHOD, &self.transactions, &self.raw_transactions)?,
            block_number: self.block_number,
            state_block_number: block_number_arg(self.state_block_number),
            timestamp: self.timestamp,
        };
        single_param(Self::METHOD, &params)
    }

    fn decode(response: CallBundleResponse) -> Result<CallBundleResponse> {
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::fixtures::legacy_tx;
    use crate::test_utils::MockTransport;
    use crate::{Error, RelayClient};
    use alloy::eips::eip2718::Encodable2718;
    use alloy::primitives::{address, b256, bytes};
    use serde_json::json;
    use std::sync::Arc;

    const RESPONSE: &str = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "bundleGasPrice": "476190476193",
            "bundleHash": "0x73b1e258c7a42fd0230b2fd05529c5d4b6fcb66c227783f8bece8aeacdd1db2e",
            "coinbaseDiff": "20000000000126000",
            "ethSentToCoinbase": "20000000000000000",
            "gasFees": "126000",
            "stateBlockNumber": 5221585,
            "totalGasUsed": 42000,
            "results": [
                {
                    "coinbaseDiff": "10000000000063000",
                    "ethSentToCoinbase": "10000000000000000",
                    "fromAddress": "0x02A727155aeF8609c9f7F2179b2a1f560B39F5A0",
                    "gasFees": "63000",
                    "gasPrice": "476190476193",
                    "gasUsed": 21000,
                    "toAddress": "0x73625f59CAdc5009Cb458B751b3E7b6b48C06f2C",
                    "txHash": "0x669b4704a7d993a946cdd6e2f95233f308ce0c4649d2e04944e8299efcaa098a",
                    "value": "0x"
                },
                {
                    "coinbaseDiff": "10000000000063000",
                    "ethSentToCoinbase": "10000000000000000",
                    "fromAddress": "0x02A727155aeF8609c9f7F2179b2a1f560B39F5A0",
                    "gasFees": "63000",
                    "gasPrice": "476190476193",
                    "gasUsed": 21000,
                    "toAddress": "0x73625f59CAdc5009Cb458B751b3E7b6b48C06f2C",
                    "txHash": "0xa839ee83465657cac01adc1d50d96c1b586ed498120a84a64749c0034b4f19fa",
                    "value": "0x",
                    "revert": "execution reverted: not enough balance"
                }
            ]
        }
    }"#;

    fn client(mock: &MockTransport) -> RelayClient {
        RelayClient::new(
            "https://relay.example".parse().unwrap(),
            Arc::new(mock.clone()),
        )
    }

    fn int(text: &str) -> Option<BigInt> {
        Some(text.parse().unwrap())
    }

    #[tokio::test]
    async fn test_call_bundle() {
        let mock = MockTransport::new();
        mock.push_body(RESPONSE);

        let response = client(&mock)
            .request(CallBundle {
                raw_transactions: vec![bytes!("00"), bytes!("01")],
                block_number: 0xb63dcd,
                timestamp: Some(1_615_920_932),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            mock.sent_json()["params"],
            json!([{
                "txs": ["0x00", "0x01"],
                "blockNumber": "0xb63dcd",
                "stateBlockNumber": "latest",
                "timestamp": 1_615_920_932u64
            }])
        );

        assert_eq!(response.bundle_gas_price, int("476190476193"));
        assert_eq!(
            response.bundle_hash,
            b256!("73b1e258c7a42fd0230b2fd05529c5d4b6fcb66c227783f8bece8aeacdd1db2e")
        );
        assert_eq!(response.coinbase_diff, int("20000000000126000"));
        assert_eq!(response.eth_sent_to_coinbase, int("20000000000000000"));
        assert_eq!(response.gas_fees, int("126000"));
        assert_eq!(response.state_block_number, 5_221_585);
        assert_eq!(response.total_gas_used, 42_000);
        assert_eq!(response.results.len(), 2);

        let first = &response.results[0];
        assert_eq!(
            first.from_address,
            address!("02A727155aeF8609c9f7F2179b2a1f560B39F5A0")
        );
        assert_eq!(
            first.to_address,
            Some(address!("73625f59CAdc5009Cb458B751b3E7b6b48C06f2C"))
        );
        assert_eq!(first.gas_used, 21_000);
        assert_eq!(first.gas_price, int("476190476193"));
        assert!(first.value.is_empty());
        assert!(first.is_success());

        assert_eq!(
            response.results[1].outcome,
            TxOutcome::Revert("execution reverted: not enough balance".to_string())
        );
    }

    #[test]
    fn test_state_block_and_signed_transactions() {
        let tx = legacy_tx(3);
        let call = CallBundle {
            transactions: vec![tx.clone()],
            raw_transactions: vec![bytes!("ff")],
            block_number: 10,
            state_block_number: Some(9),
            timestamp: None,
        };

        let params = call.params().unwrap();

        assert_eq!(
            params,
            vec![json!({
                "txs": [Bytes::from(tx.encoded_2718())],
                "blockNumber": "0xa",
                "stateBlockNumber": "0x9"
            })]
        );
    }

    #[test]
    fn test_negative_state_block_is_latest() {
        let call = CallBundle {
            raw_transactions: vec![bytes!("00")],
            block_number: 1,
            state_block_number: Some(-1),
            ..Default::default()
        };
        assert_eq!(call.params().unwrap()[0]["stateBlockNumber"], "latest");
    }

    #[test]
    fn test_error_outcome() {
        let result: CallBundleResult =
            serde_json::from_value(json!({"error": "out of gas", "gasUsed": 50000})).unwrap();

        assert_eq!(result.outcome, TxOutcome::Error("out of gas".to_string()));
        assert_eq!(result.gas_used, 50_000);
        assert_eq!(result.coinbase_diff, None);
        assert_eq!(result.to_address, None);
    }

    #[test]
    fn test_revert_with_generic_error_keeps_reason() {
        let response: CallBundleResponse = serde_json::from_value(json!({
            "results": [{
                "gasUsed": 21000,
                "error": "execution reverted",
                "revert": "not enough balance"
            }]
        }))
        .unwrap();

        let result = &response.results[0];
        assert_eq!(
            result.outcome,
            TxOutcome::Revert("not enough balance".to_string())
        );
        assert_eq!(result.gas_used, 21_000);
        assert!(!result.is_success());

        let wire = serde_json::to_value(result).unwrap();
        assert_eq!(wire["revert"], "not enough balance");
        assert!(wire.get("error").is_none());
    }

    #[test]
    fn test_null_fields_stay_default() {
        let result: CallBundleResult = serde_json::from_value(json!({
            "value": null,
            "toAddress": null,
            "fromAddress": null,
            "txHash": null,
            "gasUsed": null,
            "coinbaseDiff": null,
            "error": null
        }))
        .unwrap();
        assert_eq!(result, CallBundleResult::default());

        let response: CallBundleResponse = serde_json::from_value(json!({
            "bundleHash": null,
            "stateBlockNumber": null,
            "totalGasUsed": null,
            "results": null
        }))
        .unwrap();
        assert_eq!(response, CallBundleResponse::default());
    }

    #[tokio::test]
    async fn test_bad_decimal_fails_whole_response() {
        let mock = MockTransport::new();
        mock.push_body(
            r#"{"jsonrpc":"2.0","id":1,"result":{"bundleGasPrice":"0x10","results":[]}}"#,
        );

        let mut response = CallBundleResponse::default();
        let err = client(&mock)
            .call(
                &mut CallBundle {
                    raw_transactions: vec![bytes!("00")],
                    block_number: 1,
                    ..Default::default()
                }
                .returns(&mut response),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode { method: "eth_callBundle", .. }));
        assert_eq!(response, CallBundleResponse::default());
    }
}
