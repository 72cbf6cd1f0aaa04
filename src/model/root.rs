//! 32-byte chunk type: leaf contents and Merkle roots

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes in a chunk
pub const CHUNK_SIZE: usize = 32;

/// A 32-byte value: the content of a leaf, or the digest of a subtree
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Root([u8; CHUNK_SIZE]);

impl Root {
    /// The all-zero chunk
    pub const ZERO: Root = Root([0u8; CHUNK_SIZE]);

    /// Create a root from raw bytes
    pub fn from_bytes(bytes: [u8; CHUNK_SIZE]) -> Self {
        Root(bytes)
    }

    /// Right-pad up to 32 bytes with zeros
    pub fn from_padded(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > CHUNK_SIZE {
            return Err(Error::TypeMismatch(format!(
                "{} bytes do not fit in a {}-byte chunk",
                bytes.len(),
                CHUNK_SIZE
            )));
        }
        let mut arr = [0u8; CHUNK_SIZE];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Root(arr))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; CHUNK_SIZE] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        if bytes.len() != CHUNK_SIZE {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; CHUNK_SIZE];
        arr.copy_from_slice(&bytes);
        Ok(Root(arr))
    }

    /// Get a short prefix for display (first 8 hex chars)
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }

    /// Check if every byte is zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; CHUNK_SIZE]
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Root({})", self.short())
    }
}

impl Default for Root {
    fn default() -> Self {
        Root::ZERO
    }
}

impl AsRef<[u8]> for Root {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; CHUNK_SIZE]> for Root {
    fn from(bytes: [u8; CHUNK_SIZE]) -> Self {
        Root(bytes)
    }
}
