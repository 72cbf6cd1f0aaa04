//! Pair hashing used to merkleize trees
//!
//! The tree is parametric over [`MerkleHasher`]: anything that combines two
//! 32-byte chunks into one. BLAKE3 and SHA-256 backends are provided, and any
//! `Fn(&Root, &Root) -> Root` closure works as well.

use crate::model::Root;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Combines two sibling chunks into their parent's chunk
///
/// Implementations must be deterministic; the tree assumes collision
/// resistance but does not check it.
pub trait MerkleHasher: Send + Sync {
    /// Hash `left || right`
    fn hash_pair(&self, left: &Root, right: &Root) -> Root;

    /// Get the algorithm name/identifier
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> MerkleHasher for F
where
    F: Fn(&Root, &Root) -> Root + Send + Sync,
{
    fn hash_pair(&self, left: &Root, right: &Root) -> Root {
        self(left, right)
    }
}

/// BLAKE3 over the 64-byte concatenation
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn hash_pair(&self, left: &Root, right: &Root) -> Root {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Root::from_bytes(*hasher.finalize().as_bytes())
    }

    fn name(&self) -> &str {
        "blake3"
    }
}

/// SHA-256 over the 64-byte concatenation
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn hash_pair(&self, left: &Root, right: &Root) -> Root {
        let mut hasher = Sha256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Root::from_bytes(out)
    }

    fn name(&self) -> &str {
        "sha256"
    }
}

/// Selectable hash backend, as written in configuration files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// Instantiate the backend
    pub fn hasher(&self) -> Box<dyn MerkleHasher> {
        match self {
            HashAlgorithm::Blake3 => Box::new(Blake3Hasher),
            HashAlgorithm::Sha256 => Box::new(Sha256Hasher),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Blake3 => write!(f, "blake3"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}
