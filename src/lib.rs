//! Flashbots relay client
//!
//! Typed access to the relay's private JSON-RPC API:
//! - Submit and simulate bundles
//! - Send and cancel private transactions
//! - Query bundle and searcher statistics
//!
//! # Security Model
//!
//! - Every request body is signed and the signature sent as
//!   `X-Flashbots-Signature`
//! - Signing is either enforced for every request or switched off explicitly;
//!   a missing key never silently downgrades to unsigned requests
//! - The signing key stays inside [`RequestSigner`] and is never logged
//!
//! # Example
//!
//! ```no_run
//! use flashbots_relay::calls::UserStatsV2;
//! use flashbots_relay::{RelayClient, RelayConfig};
//!
//! # async fn run() -> flashbots_relay::Result<()> {
//! let client = RelayClient::from_config(&RelayConfig::from_env()?)?;
//! let stats = client.request(UserStatsV2::new(17_000_000)).await?;
//! println!("high priority: {}", stats.is_high_priority);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod calls;
pub mod client;
pub mod codec;
pub mod config;
pub mod rpc;
pub mod transport;

mod error;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use auth::{AuthTransport, RequestSigner, SIGNATURE_HEADER};
pub use client::RelayClient;
pub use config::{AuthMode, RelayConfig, DEFAULT_RELAY_URL};
pub use error::{BatchErrors, Error, Result};
pub use rpc::{Caller, RelayCall, RpcError};
pub use transport::{HttpTransport, ReqwestTransport};
