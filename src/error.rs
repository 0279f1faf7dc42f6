//! Error types for the relay client

use crate::rpc::RpcError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Failed to decode {method} response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The relay answered with a JSON-RPC error object. Displays the relay's
    /// message unchanged.
    #[error("{0}")]
    Relay(RpcError),

    #[error("No response for {method} (id {id})")]
    MissingResponse { method: &'static str, id: u64 },

    #[error("{0}")]
    Batch(BatchErrors),

    #[error("Call used out of order: {0}")]
    CallState(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The relay error object, if the relay rejected the call.
    pub fn as_relay_error(&self) -> Option<&RpcError> {
        match self {
            Error::Relay(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of individual elements of a batch call, keyed by the position of
/// the element in the batch.
#[derive(Debug, Default)]
pub struct BatchErrors(pub Vec<(usize, Error)>);

impl BatchErrors {
    /// The error of the element at `index`, if that element failed.
    pub fn get(&self, index: usize) -> Option<&Error> {
        self.0.iter().find(|(i, _)| *i == index).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} batch call(s) failed", self.0.len())?;
        for (index, err) in &self.0 {
            write!(f, "; call[{}]: {}", index, err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchErrors {}
