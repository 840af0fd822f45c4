//! Strong type definitions for the Rights Kernel.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte mint identity, the unforgeable half of a [`Label`](crate::Label).
///
/// Derived as Blake3 over the mint's alleged name and a fresh random nonce,
/// so two mints never share an identity even when they share a name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MintId(pub [u8; 32]);

impl MintId {
    /// Derive a new, never-before-seen mint identity for `alleged_name`.
    pub fn generate(alleged_name: &str) -> Self {
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::derive(alleged_name, &nonce)
    }

    /// Deterministic derivation from a name and nonce.
    pub fn derive(alleged_name: &str, nonce: &[u8; 32]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"rights-kernel-mint-v0:");
        hasher.update(alleged_name.as_bytes());
        hasher.update(b":");
        hasher.update(nonce);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a MintId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for MintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MintId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for MintId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
