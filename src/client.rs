//! Relay client
//!
//! Serializes calls into JSON-RPC bodies, posts them through the configured
//! [`HttpTransport`] and hands each response element back to its caller.

use crate::auth::{AuthTransport, RequestSigner};
use crate::config::{AuthMode, RelayConfig};
use crate::error::BatchErrors;
use crate::rpc::{BatchElem, Caller, JsonRpcRequest, JsonRpcResponse, RelayCall};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::{Error, Result};
use serde::de;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Connection to a relay endpoint.
///
/// Cheap to clone; clones share the underlying transport. The client keeps no
/// state between calls.
#[derive(Clone)]
pub struct RelayClient {
    endpoint: Url,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RelayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl RelayClient {
    /// Client over an arbitrary transport
    pub fn new(endpoint: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Client that signs every request
    ///
    /// # Arguments
    /// * `endpoint` - Relay URL
    /// * `signer` - Signing key. With `None` every call fails with
    ///   [`Error::Authentication`]; use [`RelayClient::dial_unauthenticated`]
    ///   to send unsigned requests on purpose.
    pub fn dial(endpoint: &str, signer: Option<RequestSigner>) -> Result<Self> {
        let transport = AuthTransport::new(signer, ReqwestTransport::new()?);
        Ok(Self::new(parse_endpoint(endpoint)?, Arc::new(transport)))
    }

    /// Client that sends requests unsigned
    pub fn dial_unauthenticated(endpoint: &str) -> Result<Self> {
        Ok(Self::new(
            parse_endpoint(endpoint)?,
            Arc::new(ReqwestTransport::new()?),
        ))
    }

    /// Client built from a [`RelayConfig`], honoring its auth mode and timeout
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let http = ReqwestTransport::with_timeout(config.timeout())?;

        let transport: Arc<dyn HttpTransport> = match config.auth {
            AuthMode::Required => {
                let signer = config.signer()?;
                match &signer {
                    Some(signer) => {
                        tracing::info!(signer = %signer.address(), "Signing relay requests")
                    }
                    None => tracing::warn!(
                        "No signing key configured; relay calls will fail until one is set"
                    ),
                }
                Arc::new(AuthTransport::new(signer, http))
            }
            AuthMode::Disabled => {
                if config.has_signing_key() {
                    tracing::warn!("Signing key ignored because authentication is disabled");
                }
                Arc::new(http)
            }
        };

        Ok(Self::new(endpoint, transport))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute one call.
    ///
    /// The request is sent as a single JSON-RPC object and a relay error is
    /// returned as is.
    pub async fn call(&self, caller: &mut dyn Caller) -> Result<()> {
        let mut elem = caller.create_request()?;
        let method = elem.method;
        let body = serde_json::to_vec(&JsonRpcRequest::new(1, method, &elem.params))?;

        tracing::debug!(method, id = 1, "Relay call");
        let raw = self.send(body).await?;

        let response: JsonRpcResponse =
            serde_json::from_slice(&raw).map_err(|source| Error::Decode { method, source })?;
        elem.result = response.result;
        elem.error = response.error;
        caller.handle_response(elem)
    }

    /// Execute several calls in one round trip.
    ///
    /// Requests carry ids `1..=n` in order and responses are matched by id, so
    /// the relay may answer in any order. Every element is handled even if an
    /// earlier one failed; failures come back together as [`Error::Batch`],
    /// keyed by position. A failure to encode any request aborts the batch
    /// before anything is sent.
    pub async fn batch(&self, callers: &mut [&mut dyn Caller]) -> Result<()> {
        if callers.is_empty() {
            return Ok(());
        }

        let elems = callers
            .iter_mut()
            .map(|caller| caller.create_request())
            .collect::<Result<Vec<BatchElem>>>()?;

        let requests: Vec<JsonRpcRequest<'_>> = elems
            .iter()
            .enumerate()
            .map(|(i, elem)| JsonRpcRequest::new(batch_id(i), elem.method, &elem.params))
            .collect();
        let body = serde_json::to_vec(&requests)?;

        tracing::debug!(calls = elems.len(), "Relay batch call");
        let raw = self.send(body).await?;

        let mut responses = decode_batch(&raw, elems[0].method)?;
        let mut errors = Vec::new();

        for (i, (caller, mut elem)) in callers.iter_mut().zip(elems).enumerate() {
            let id = batch_id(i);
            let Some(response) = responses.remove(&id) else {
                tracing::debug!(method = elem.method, id, "Missing batch response");
                errors.push((
                    i,
                    Error::MissingResponse {
                        method: elem.method,
                        id,
                    },
                ));
                continue;
            };

            elem.result = response.result;
            elem.error = response.error;
            if let Err(err) = caller.handle_response(elem) {
                errors.push((i, err));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Batch(BatchErrors(errors)))
        }
    }

    /// Execute `call` and return its output
    pub async fn request<C>(&self, call: C) -> Result<C::Output>
    where
        C: RelayCall,
        C::Output: Default,
    {
        let mut output = C::Output::default();
        self.call(&mut call.returns(&mut output)).await?;
        Ok(output)
    }

    async fn send(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        let request = HttpRequest::post_json(self.endpoint.clone(), body);
        let response = self.transport.round_trip(request).await?;

        if !response.status.is_success() {
            return Err(Error::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response.body)
    }
}

fn batch_id(index: usize) -> u64 {
    index as u64 + 1
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("Invalid relay endpoint {:?}: {}", endpoint, e)))
}

/// Index a batch response by id. A single error object in place of the array
/// means the relay rejected the whole batch.
fn decode_batch(raw: &[u8], method: &'static str) -> Result<HashMap<u64, JsonRpcResponse>> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|source| Error::Decode { method, source })?;

    if !value.is_array() {
        let response: JsonRpcResponse =
            serde_json::from_value(value).map_err(|source| Error::Decode { method, source })?;
        return match response.error {
            Some(err) => Err(Error::Relay(err)),
            None => Err(Error::Decode {
                method,
                source: de::Error::invalid_type(
                    de::Unexpected::Map,
                    &"an array of batch responses",
                ),
            }),
        };
    }

    let responses: Vec<JsonRpcResponse> =
        serde_json::from_value(value).map_err(|source| Error::Decode { method, source })?;
    Ok(responses
        .into_iter()
        .filter_map(|response| response.id().map(|id| (id, response)))
        .collect())
}
