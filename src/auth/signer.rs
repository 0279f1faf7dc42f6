//! Request signer
//!
//! SECURITY: the only place the relay signing key lives.
//! - Held in alloy's PrivateKeySigner
//! - Never serialized, never logged
//! - `Debug` prints the address only

use crate::{Error, Result};
use alloy::hex;
use alloy::primitives::{eip191_hash_message, keccak256, Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

/// Signs relay request bodies.
///
/// The signature identifies the searcher to the relay; it does not need to be
/// the key that signs the bundled transactions.
#[derive(Clone)]
pub struct RequestSigner {
    signer: PrivateKeySigner,
    address: Address,
}

impl RequestSigner {
    /// Create a signer from a hex-encoded private key (with or without `0x`)
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Signing(format!("Invalid private key: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Wrap an existing alloy signer
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    /// Create a signer with a fresh random key
    ///
    /// The relay tracks reputation per signing address, so a random key is
    /// only useful for one-off requests.
    pub fn random() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// The address the relay will attribute requests to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a request body
    ///
    /// Returns `<checksummed address>:<0x signature>`, the value of the
    /// signature header. The signature covers the EIP-191 personal message
    /// hash of the `0x`-hex keccak256 digest of `body`, and ends with the
    /// recovery id as `0x00`/`0x01`.
    pub fn sign(&self, body: &[u8]) -> Result<String> {
        let digest = keccak256(body);
        let hash = eip191_hash_message(hex::encode_prefixed(digest));
        let signature = self.sign_hash(&hash)?;
        Ok(format!(
            "{}:{}",
            self.address.to_checksum(None),
            hex::encode_prefixed(signature)
        ))
    }

    fn sign_hash(&self, hash: &B256) -> Result<[u8; 65]> {
        let signature = self
            .signer
            .sign_hash_sync(hash)
            .map_err(|e| Error::Signing(format!("Signing failed: {}", e)))?;

        let mut raw = [0u8; 65];
        raw[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        raw[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
        raw[64] = signature.v() as u8;
        Ok(raw)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
