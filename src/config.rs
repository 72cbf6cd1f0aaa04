//! Tree configuration
//!
//! Stored as JSON, e.g.:
//! ```json
//! { "hash": "sha256", "prewarm_depth": 40 }
//! ```

use crate::hash::{HashAlgorithm, MerkleHasher};
use crate::model::MAX_DEPTH;
use crate::tree::prewarm;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Hash backend and zero-cache settings for an application's trees
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Pair hash used for Merkle roots
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Zero subtrees up to this depth are built by `apply`
    #[serde(default)]
    pub prewarm_depth: u32,
}

impl TreeConfig {
    /// Load config from a JSON file, falling back to defaults if it is missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        debug!(path = %path.display(), hash = %config.hash, "loaded tree config");
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.prewarm_depth > MAX_DEPTH {
            return Err(Error::Config(format!(
                "prewarm_depth {} exceeds maximum {}",
                self.prewarm_depth, MAX_DEPTH
            )));
        }
        Ok(())
    }

    pub fn hasher(&self) -> Box<dyn MerkleHasher> {
        self.hash.hasher()
    }

    /// Prewarm the zero-subtree cache
    pub fn apply(&self) -> Result<()> {
        self.validate()?;
        prewarm(self.prewarm_depth)?;
        debug!(depth = self.prewarm_depth, "prewarmed zero subtree cache");
        Ok(())
    }
}
