//! Core value types: chunks/roots and generalized indices

mod gindex;
mod root;

pub use gindex::{get_depth, to_gindex, GeneralizedIndex, MAX_DEPTH};
pub use root::{Root, CHUNK_SIZE};
