//! Typed relay calls over JSON-RPC batches
//!
//! Every relay method is a [`RelayCall`]: it knows its method name, how to
//! encode its parameters and how to turn the decoded wire response into the
//! value the caller asked for. [`RelayCall::returns`] binds a call to a
//! destination and yields a [`Caller`], which the batch executor drives in
//! three steps:
//!
//! 1. [`Caller::create_request`] encodes a [`BatchElem`]
//! 2. the executor sends it and fills `result` or `error`
//! 3. [`Caller::handle_response`] decodes the element into the destination
//!
//! The wire response is decoded into its own value first and only written to
//! the destination once decoding fully succeeded.

mod jsonrpc;

pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse, RpcError, JSONRPC_VERSION};

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Wire descriptor of one call in a batch.
///
/// `result` and `error` start empty and are filled by the executor.
#[derive(Debug, Clone)]
pub struct BatchElem {
    pub method: &'static str,
    pub params: Vec<Value>,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

impl BatchElem {
    pub fn new(method: &'static str, params: Vec<Value>) -> Self {
        Self {
            method,
            params,
            result: None,
            error: None,
        }
    }
}

/// A call bound to its destination, ready to be executed once.
pub trait Caller: Send {
    /// Encode the request. Fails if the parameters cannot be encoded.
    fn create_request(&mut self) -> Result<BatchElem>;

    /// Consume the executed element. A relay error is returned unchanged;
    /// otherwise the result is decoded into the destination.
    fn handle_response(&mut self, elem: BatchElem) -> Result<()>;
}

/// A relay method with typed parameters and result.
pub trait RelayCall: Send + Sized {
    /// JSON-RPC method name
    const METHOD: &'static str;

    /// Shape of the `result` member on the wire
    type Response: DeserializeOwned;

    /// Value handed to the caller
    type Output: Send;

    /// Encoded positional parameters
    fn params(&self) -> Result<Vec<Value>>;

    /// Convert the decoded wire response into the caller's value
    fn decode(response: Self::Response) -> Result<Self::Output>;

    /// Bind this call to `dest`
    fn returns(self, dest: &mut Self::Output) -> Returns<'_, Self> {
        Returns::new(self, dest)
    }
}

/// Lifecycle of a [`Returns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Unbuilt,
    RequestCreated,
    ResponseHandled,
}

/// A [`RelayCall`] bound to the place its output is written.
pub struct Returns<'a, C: RelayCall> {
    call: C,
    dest: &'a mut C::Output,
    state: CallState,
}

impl<'a, C: RelayCall> Returns<'a, C> {
    pub fn new(call: C, dest: &'a mut C::Output) -> Self {
        Self {
            call,
            dest,
            state: CallState::Unbuilt,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }
}

impl<C: RelayCall> Caller for Returns<'_, C> {
    fn create_request(&mut self) -> Result<BatchElem> {
        if self.state != CallState::Unbuilt {
            return Err(Error::CallState("request already created"));
        }
        let params = self.call.params()?;
        self.state = CallState::RequestCreated;
        Ok(BatchElem::new(C::METHOD, params))
    }

    fn handle_response(&mut self, elem: BatchElem) -> Result<()> {
        match self.state {
            CallState::Unbuilt => return Err(Error::CallState("request not created yet")),
            CallState::ResponseHandled => return Err(Error::CallState("response already handled")),
            CallState::RequestCreated => self.state = CallState::ResponseHandled,
        }

        if let Some(err) = elem.error {
            return Err(Error::Relay(err));
        }

        let raw = elem.result.unwrap_or(Value::Null);
        let response: C::Response =
            serde_json::from_value(raw).map_err(|source| Error::Decode {
                method: C::METHOD,
                source,
            })?;
        *self.dest = C::decode(response)?;
        Ok(())
    }
}

/// Encode a single parameter object.
pub(crate) fn single_param<T: Serialize>(method: &str, value: &T) -> Result<Vec<Value>> {
    let value = serde_json::to_value(value)
        .map_err(|e| Error::Encoding(format!("{} params: {}", method, e)))?;
    Ok(vec![value])
}
