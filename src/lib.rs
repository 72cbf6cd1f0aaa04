//! # merkle_views
//!
//! Typed views over a persistent, content-addressed binary Merkle tree.
//!
//! The same data is both serialized to bytes and merkleized to a 32-byte
//! root. Values live in an immutable tree; a view wraps a tree node and
//! rewrites only the path from a changed leaf to the root, so unchanged
//! subtrees are never copied or re-hashed.
//!
//! ## Core Concepts
//!
//! - **Tree**: immutable nodes addressed by generalized index, with cached
//!   all-zero subtrees
//! - **Type descriptors**: stateless schema values (scalars, vectors)
//! - **Views**: a descriptor bound to a node, hooked to the view that owns it
//! - **Packing**: small scalars share 32-byte chunks
//!
//! ## Example
//!
//! ```ignore
//! use merkle_views::{BasicType, Blake3Hasher, VectorType};
//! use std::sync::Arc;
//!
//! let vtype = VectorType::new(Arc::new(BasicType::Uint64), 512)?;
//! let mut data = vtype.default_view(None)?;
//! let before = data.hash_tree_root(&Blake3Hasher);
//! data.set_basic(1, 123u64)?;
//! assert_ne!(before, data.hash_tree_root(&Blake3Hasher));
//! ```

pub mod config;
pub mod hash;
pub mod model;
pub mod stream;
pub mod tree;
pub mod view;

mod error;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use hash::{Blake3Hasher, HashAlgorithm, MerkleHasher, Sha256Hasher};
pub use model::{get_depth, to_gindex, GeneralizedIndex, Root};
pub use stream::{ByteSink, ByteSource};
pub use tree::{Link, TreeNode};
pub use view::{
    downcast_view, BasicType, BasicValue, Hook, TypeDescriptor, TypeRef, VectorType, VectorView,
    View,
};
