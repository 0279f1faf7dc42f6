//! Signature header interceptor
//!
//! Wraps an [`HttpTransport`] and adds `X-Flashbots-Signature` to every
//! request that carries a body. Signing is all-or-nothing: without a key the
//! interceptor refuses to forward anything.

use super::RequestSigner;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// Header carrying `<address>:<signature>`
pub const SIGNATURE_HEADER: &str = "X-Flashbots-Signature";

/// Transport that signs request bodies before forwarding them.
#[derive(Debug, Clone)]
pub struct AuthTransport<T> {
    signer: Option<RequestSigner>,
    next: T,
}

impl<T: HttpTransport> AuthTransport<T> {
    /// Wrap `next`
    ///
    /// # Arguments
    /// * `signer` - Key used to sign bodies. `None` makes every request fail
    ///   with [`Error::Authentication`]; build the client without this
    ///   interceptor to send unsigned requests instead.
    /// * `next` - Transport the signed request is forwarded to
    pub fn new(signer: Option<RequestSigner>, next: T) -> Self {
        Self { signer, next }
    }

    /// The configured signer, if any
    pub fn signer(&self) -> Option<&RequestSigner> {
        self.signer.as_ref()
    }

    /// Sign the body in place. The same bytes that were signed are put back
    /// into the request, so the forwarded body matches the signature.
    fn sign_request(&self, request: &mut HttpRequest) -> Result<()> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| Error::Authentication("no signing key configured".to_string()))?;

        let Some(body) = request.body.take() else {
            return Ok(());
        };

        let signature = signer.sign(&body)?;
        let value = HeaderValue::from_str(&signature)
            .map_err(|e| Error::Signing(format!("Invalid signature header: {}", e)))?;
        request
            .headers
            .insert(HeaderName::from_static("x-flashbots-signature"), value);

        tracing::trace!(
            signer = %signer.address(),
            body_len = body.len(),
            "Signed relay request"
        );

        request.body = Some(body);
        Ok(())
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for AuthTransport<T> {
    async fn round_trip(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        self.sign_request(&mut request)?;
        self.next.round_trip(request).await
    }
}
