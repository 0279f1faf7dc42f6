//! Request authentication
//!
//! The relay identifies searchers by a signature over each request body.
//! [`RequestSigner`] produces that signature and [`AuthTransport`] attaches
//! it to outgoing requests.

mod interceptor;
mod signer;

pub use interceptor::{AuthTransport, SIGNATURE_HEADER};
pub use signer::RequestSigner;
