//! Fixed-width scalars and their packing into 32-byte chunks
//!
//! Scalars whose width divides 32 are packed side by side: an 8-byte integer
//! has a pack factor of 4, so a collection of them needs a quarter of the
//! leaves. Encoding is little-endian.

use super::{Hook, TypeDescriptor, TypeRef, View};
use crate::model::{Root, CHUNK_SIZE};
use crate::tree::{zero_node, TreeNode};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Scalar kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    Bool,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Uint256,
}

impl BasicType {
    /// Encoded width in bytes
    pub fn byte_length(&self) -> usize {
        match self {
            BasicType::Bool | BasicType::Uint8 => 1,
            BasicType::Uint16 => 2,
            BasicType::Uint32 => 4,
            BasicType::Uint64 => 8,
            BasicType::Uint128 => 16,
            BasicType::Uint256 => 32,
        }
    }

    /// How many values share one chunk
    pub fn pack_factor(&self) -> usize {
        CHUNK_SIZE / self.byte_length()
    }

    pub fn default_value(&self) -> BasicValue {
        match self {
            BasicType::Bool => BasicValue::Bool(false),
            BasicType::Uint8 => BasicValue::Uint8(0),
            BasicType::Uint16 => BasicValue::Uint16(0),
            BasicType::Uint32 => BasicValue::Uint32(0),
            BasicType::Uint64 => BasicValue::Uint64(0),
            BasicType::Uint128 => BasicValue::Uint128(0),
            BasicType::Uint256 => BasicValue::Uint256([0u8; 32]),
        }
    }

    /// Decode exactly `byte_length()` little-endian bytes
    pub fn decode(&self, bytes: &[u8]) -> Result<BasicValue> {
        let width = self.byte_length();
        if bytes.len() != width {
            return Err(Error::TypeMismatch(format!(
                "{} needs {} bytes, got {}",
                self,
                width,
                bytes.len()
            )));
        }

        // Lengths were checked above, so the array conversions cannot fail
        let value = match self {
            BasicType::Bool => match bytes[0] {
                0 => BasicValue::Bool(false),
                1 => BasicValue::Bool(true),
                other => {
                    return Err(Error::TypeMismatch(format!(
                        "invalid bool byte {:#04x}",
                        other
                    )))
                }
            },
            BasicType::Uint8 => BasicValue::Uint8(bytes[0]),
            BasicType::Uint16 => BasicValue::Uint16(u16::from_le_bytes(fixed(bytes))),
            BasicType::Uint32 => BasicValue::Uint32(u32::from_le_bytes(fixed(bytes))),
            BasicType::Uint64 => BasicValue::Uint64(u64::from_le_bytes(fixed(bytes))),
            BasicType::Uint128 => BasicValue::Uint128(u128::from_le_bytes(fixed(bytes))),
            BasicType::Uint256 => BasicValue::Uint256(fixed(bytes)),
        };
        Ok(value)
    }

    /// Decode the value at sub-index `index` of a packed chunk
    pub fn basic_view_from_backing(&self, node: &TreeNode, index: usize) -> Result<BasicValue> {
        let chunk = node.as_leaf().ok_or_else(|| {
            Error::TypeMismatch(format!("cannot read {} from a composite node", self))
        })?;
        self.check_sub_index(index)?;
        let width = self.byte_length();
        self.decode(&chunk.as_bytes()[index * width..(index + 1) * width])
    }

    /// Pack values into chunk leaves, `pack_factor()` per chunk
    ///
    /// Every chunk starts out zeroed, so an incomplete final chunk is
    /// zero-padded.
    pub fn pack_views(&self, values: &[BasicValue]) -> Result<Vec<TreeNode>> {
        let per_chunk = self.pack_factor();
        let mut out = Vec::with_capacity(values.len().div_ceil(per_chunk));
        let mut chunk = zero_node(0);

        for (i, value) in values.iter().enumerate() {
            if value.basic_type() != *self {
                return Err(Error::TypeMismatch(format!(
                    "cannot pack {} into {} chunks",
                    value.basic_type(),
                    self
                )));
            }
            chunk = value.backing_from_base(&chunk, i % per_chunk)?;
            if (i + 1) % per_chunk == 0 {
                out.push(chunk);
                chunk = zero_node(0);
            }
        }
        if values.len() % per_chunk != 0 {
            out.push(chunk);
        }
        Ok(out)
    }

    /// Convert a value of another scalar kind, if it fits
    pub fn coerce(&self, value: BasicValue) -> Result<BasicValue> {
        if value.basic_type() == *self {
            return Ok(value);
        }
        let wide = value.chunk();
        let width = self.byte_length();
        if wide.as_bytes()[width..].iter().any(|b| *b != 0) {
            return Err(Error::TypeMismatch(format!(
                "{} does not fit in {}",
                value, self
            )));
        }
        self.decode(&wide.as_bytes()[..width])
    }

    fn check_sub_index(&self, index: usize) -> Result<()> {
        if index >= self.pack_factor() {
            return Err(Error::OutOfRange(format!(
                "sub-index {} exceeds pack factor {} of {}",
                index,
                self.pack_factor(),
                self
            )));
        }
        Ok(())
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BasicType::Bool => "bool",
            BasicType::Uint8 => "uint8",
            BasicType::Uint16 => "uint16",
            BasicType::Uint32 => "uint32",
            BasicType::Uint64 => "uint64",
            BasicType::Uint128 => "uint128",
            BasicType::Uint256 => "uint256",
        };
        write!(f, "{}", name)
    }
}

impl TypeDescriptor for BasicType {
    fn name(&self) -> String {
        self.to_string()
    }

    fn default_node(&self) -> TreeNode {
        zero_node(0)
    }

    /// Scalars are not hooked: their value, not a tree, is authoritative
    fn view_from_backing(&self, node: TreeNode, _hook: Option<Hook>) -> Result<Box<dyn View>> {
        Ok(Box::new(self.basic_view_from_backing(&node, 0)?))
    }

    fn is_fixed_byte_length(&self) -> bool {
        true
    }

    fn type_byte_length(&self) -> Result<usize> {
        Ok(self.byte_length())
    }

    fn min_byte_length(&self) -> usize {
        self.byte_length()
    }

    fn max_byte_length(&self) -> usize {
        self.byte_length()
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Box<dyn View>> {
        Ok(Box::new(self.decode(bytes)?))
    }

    fn as_basic(&self) -> Option<BasicType> {
        Some(*self)
    }
}

/// A scalar value; the view of a basic type
///
/// The value is authoritative. Its backing is derived on demand and cannot
/// be replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasicValue {
    Bool(bool),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uint128(u128),
    /// Little-endian bytes
    Uint256([u8; 32]),
}

impl BasicValue {
    pub fn basic_type(&self) -> BasicType {
        match self {
            BasicValue::Bool(_) => BasicType::Bool,
            BasicValue::Uint8(_) => BasicType::Uint8,
            BasicValue::Uint16(_) => BasicType::Uint16,
            BasicValue::Uint32(_) => BasicType::Uint32,
            BasicValue::Uint64(_) => BasicType::Uint64,
            BasicValue::Uint128(_) => BasicType::Uint128,
            BasicValue::Uint256(_) => BasicType::Uint256,
        }
    }

    /// Little-endian encoding, `byte_length()` bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BasicValue::Bool(v) => vec![u8::from(*v)],
            BasicValue::Uint8(v) => vec![*v],
            BasicValue::Uint16(v) => v.to_le_bytes().to_vec(),
            BasicValue::Uint32(v) => v.to_le_bytes().to_vec(),
            BasicValue::Uint64(v) => v.to_le_bytes().to_vec(),
            BasicValue::Uint128(v) => v.to_le_bytes().to_vec(),
            BasicValue::Uint256(v) => v.to_vec(),
        }
    }

    /// Encoding right-padded to a full chunk
    fn chunk(&self) -> Root {
        let bytes = self.encode();
        let mut out = [0u8; CHUNK_SIZE];
        out[..bytes.len()].copy_from_slice(&bytes);
        Root::from_bytes(out)
    }

    /// Copy of `base` with this value written at sub-index `index`
    pub fn backing_from_base(&self, base: &TreeNode, index: usize) -> Result<TreeNode> {
        let basic_type = self.basic_type();
        let chunk = base.as_leaf().ok_or_else(|| {
            Error::TypeMismatch(format!("cannot pack {} into a composite node", basic_type))
        })?;
        basic_type.check_sub_index(index)?;

        let width = basic_type.byte_length();
        let mut bytes = *chunk.as_bytes();
        bytes[index * width..(index + 1) * width].copy_from_slice(&self.encode());
        Ok(TreeNode::leaf(Root::from_bytes(bytes)))
    }

    /// Numeric value, if it fits in a `u64`
    pub fn as_u64(&self) -> Option<u64> {
        let wide = self.chunk();
        if wide.as_bytes()[8..].iter().any(|b| *b != 0) {
            return None;
        }
        Some(u64::from_le_bytes(fixed(&wide.as_bytes()[..8])))
    }
}

impl fmt::Display for BasicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasicValue::Bool(v) => write!(f, "{}", v),
            BasicValue::Uint8(v) => write!(f, "{}", v),
            BasicValue::Uint16(v) => write!(f, "{}", v),
            BasicValue::Uint32(v) => write!(f, "{}", v),
            BasicValue::Uint64(v) => write!(f, "{}", v),
            BasicValue::Uint128(v) => write!(f, "{}", v),
            BasicValue::Uint256(v) => {
                let mut be = *v;
                be.reverse();
                write!(f, "0x{}", hex::encode(be))
            }
        }
    }
}

impl View for BasicValue {
    fn type_def(&self) -> TypeRef {
        Arc::new(self.basic_type())
    }

    fn get_backing(&self) -> TreeNode {
        TreeNode::leaf(self.chunk())
    }

    fn set_backing(&mut self, _node: TreeNode) -> Result<()> {
        Err(Error::ImmutableViolation(self.basic_type().to_string()))
    }

    fn value_byte_length(&self) -> Result<usize> {
        Ok(self.basic_type().byte_length())
    }

    fn as_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.encode())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for BasicValue {
                fn from(v: $ty) -> Self {
                    BasicValue::$variant(v)
                }
            }
        )+
    };
}

impl_from_scalar!(
    bool => Bool,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    u128 => Uint128,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_factors() {
        assert_eq!(BasicType::Bool.pack_factor(), 32);
        assert_eq!(BasicType::Uint16.pack_factor(), 16);
        assert_eq!(BasicType::Uint64.pack_factor(), 4);
        assert_eq!(BasicType::Uint256.pack_factor(), 1);
    }

    #[test]
    fn test_backing_is_padded_encoding() {
        let v = BasicValue::Uint64(0x0102_0304_0506_0708);
        let leaf = v.get_backing();
        let chunk = leaf.as_leaf().unwrap();
        assert_eq!(&chunk.as_bytes()[..8], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert!(chunk.as_bytes()[8..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_set_backing_is_rejected() {
        let mut v = BasicValue::Uint32(5);
        assert!(matches!(
            v.set_backing(zero_node(0)),
            Err(Error::ImmutableViolation(_))
        ));
        assert_eq!(v, BasicValue::Uint32(5));
    }

    #[test]
    fn test_view_from_composite_node_fails() {
        assert!(matches!(
            BasicType::Uint64.view_from_backing(zero_node(1), None),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_backing_from_base_writes_one_slot() {
        let base = TreeNode::leaf(Root::from_bytes([0xff; 32]));
        let packed = BasicValue::Uint64(0).backing_from_base(&base, 2).unwrap();
        let bytes = packed.as_leaf().unwrap().as_bytes();
        assert!(bytes[..16].iter().all(|b| *b == 0xff));
        assert!(bytes[16..24].iter().all(|b| *b == 0));
        assert!(bytes[24..].iter().all(|b| *b == 0xff));

        assert!(matches!(
            BasicValue::Uint64(0).backing_from_base(&base, 4),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_pack_views_groups_and_pads() {
        let values: Vec<BasicValue> = (1..=6u64).map(BasicValue::from).collect();
        let chunks = BasicType::Uint64.pack_views(&values).unwrap();
        assert_eq!(chunks.len(), 2);

        for (i, value) in values.iter().enumerate() {
            let read = BasicType::Uint64
                .basic_view_from_backing(&chunks[i / 4], i % 4)
                .unwrap();
            assert_eq!(&read, value);
        }
        // Last chunk holds 5 and 6, then zeros rather than leftovers of the first chunk
        assert_eq!(
            BasicType::Uint64.basic_view_from_backing(&chunks[1], 2).unwrap(),
            BasicValue::Uint64(0)
        );
        assert_eq!(
            BasicType::Uint64.basic_view_from_backing(&chunks[1], 3).unwrap(),
            BasicValue::Uint64(0)
        );
    }

    #[test]
    fn test_pack_views_rejects_mixed_types() {
        let values = vec![BasicValue::Uint64(1), BasicValue::Uint32(2)];
        assert!(matches!(
            BasicType::Uint64.pack_views(&values),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(BasicType::Bool.decode(&[1]).unwrap(), BasicValue::Bool(true));
        assert!(matches!(
            BasicType::Bool.decode(&[2]),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            BasicType::Uint16.decode(&[1, 2, 3]),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            BasicType::Uint64.coerce(BasicValue::Uint8(200)).unwrap(),
            BasicValue::Uint64(200)
        );
        assert_eq!(
            BasicType::Uint8.coerce(BasicValue::Uint64(255)).unwrap(),
            BasicValue::Uint8(255)
        );
        assert!(BasicType::Uint8.coerce(BasicValue::Uint64(256)).is_err());
        assert_eq!(
            BasicType::Bool.coerce(BasicValue::Uint16(1)).unwrap(),
            BasicValue::Bool(true)
        );
        assert!(BasicType::Bool.coerce(BasicValue::Uint16(2)).is_err());
        assert_eq!(BasicValue::Uint128(u128::MAX).as_u64(), None);
        assert_eq!(BasicValue::Bool(true).as_u64(), Some(1));
    }

    #[test]
    fn test_uint256_display_is_big_endian() {
        let mut le = [0u8; 32];
        le[0] = 0x01;
        let shown = BasicValue::Uint256(le).to_string();
        assert!(shown.ends_with("01"));
        assert!(shown.starts_with("0x00"));
    }
}
