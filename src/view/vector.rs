//! Fixed-length homogeneous collections

use super::backed::BackedCell;
use super::basic::{BasicType, BasicValue};
use super::{downcast_view, Hook, TypeDescriptor, TypeRef, View};
use crate::hash::MerkleHasher;
use crate::model::{get_depth, to_gindex, GeneralizedIndex, Root, MAX_DEPTH};
use crate::tree::{fill_repeat, subtree_fill_to_length, zero_node, TreeNode};
use crate::{Error, Result};
use std::any::Any;
use std::sync::Arc;

/// Descriptor of a vector: `length` elements of one element type
///
/// Unpacked vectors give each element its own bottom-level node. Packed
/// vectors require a basic element type and store `pack_factor` elements per
/// chunk.
#[derive(Clone, Debug)]
pub struct VectorType {
    element: TypeRef,
    length: usize,
    /// Element kind when packed
    packed: Option<BasicType>,
}

impl VectorType {
    /// One element per bottom-level node
    pub fn new(element: TypeRef, length: usize) -> Result<Self> {
        Self::build(element, length, None)
    }

    /// Basic elements packed into shared chunks
    pub fn packed(element: TypeRef, length: usize) -> Result<Self> {
        let basic = element.as_basic().ok_or_else(|| {
            Error::TypeMismatch(format!(
                "cannot pack non-basic element type {}",
                element.name()
            ))
        })?;
        Self::build(element, length, Some(basic))
    }

    fn build(element: TypeRef, length: usize, packed: Option<BasicType>) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidType("vector length must be at least 1".into()));
        }
        let vector = VectorType {
            element,
            length,
            packed,
        };
        if get_depth(vector.chunk_count() as u64) > MAX_DEPTH {
            return Err(Error::InvalidType(format!(
                "vector of {} elements is deeper than {}",
                length, MAX_DEPTH
            )));
        }
        Ok(vector)
    }

    pub fn element_type(&self) -> &TypeRef {
        &self.element
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_packed(&self) -> bool {
        self.packed.is_some()
    }

    /// Number of bottom-level nodes holding elements
    pub fn chunk_count(&self) -> usize {
        match self.packed {
            Some(basic) => self.length.div_ceil(basic.pack_factor()),
            None => self.length,
        }
    }

    pub fn depth(&self) -> u32 {
        get_depth(self.chunk_count() as u64)
    }

    /// Typed counterpart of `view_from_backing`
    pub fn view(&self, node: TreeNode, hook: Option<Hook>) -> Result<VectorView> {
        self.check_shape(&node)?;
        Ok(VectorView {
            vtype: self.clone(),
            cell: BackedCell::new(self.name(), node, hook),
        })
    }

    fn check_shape(&self, node: &TreeNode) -> Result<()> {
        if self.depth() > 0 && node.is_leaf() {
            return Err(Error::TypeMismatch(format!(
                "{} needs a subtree of depth {}, got a leaf",
                self.name(),
                self.depth()
            )));
        }
        Ok(())
    }

    pub fn default_view(&self, hook: Option<Hook>) -> Result<VectorView> {
        self.view(self.default_node(), hook)
    }

    /// Typed counterpart of `from_bytes`
    pub fn decode(&self, bytes: &[u8]) -> Result<VectorView> {
        let element_length = self.element.type_byte_length()?;
        if element_length == 0 {
            return Err(Error::InvalidType(format!(
                "{} has zero-length elements",
                self.name()
            )));
        }
        let expected = self.type_byte_length()?;
        if bytes.len() != expected {
            return Err(Error::TypeMismatch(format!(
                "{} needs {} bytes, got {}",
                self.name(),
                expected,
                bytes.len()
            )));
        }

        let node = match self.packed {
            Some(basic) => {
                let values = bytes
                    .chunks(element_length)
                    .map(|chunk| basic.decode(chunk))
                    .collect::<Result<Vec<_>>>()?;
                let chunks = basic.pack_views(&values)?;
                subtree_fill_to_length(&chunks, self.depth(), self.chunk_count() as u64)?
            }
            None => {
                let nodes = bytes
                    .chunks(element_length)
                    .map(|chunk| Ok(self.element.from_bytes(chunk)?.get_backing()))
                    .collect::<Result<Vec<_>>>()?;
                subtree_fill_to_length(&nodes, self.depth(), self.length as u64)?
            }
        };
        self.view(node, None)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.length {
            return Err(Error::OutOfRange(format!(
                "index {} out of range for {}",
                index,
                self.name()
            )));
        }
        Ok(())
    }

    /// Bottom-level node holding element `index`
    fn chunk_gindex(&self, index: usize) -> Result<GeneralizedIndex> {
        let position = match self.packed {
            Some(basic) => index / basic.pack_factor(),
            None => index,
        };
        to_gindex(position as u64, self.depth())
    }
}

impl TypeDescriptor for VectorType {
    fn name(&self) -> String {
        match self.packed {
            Some(_) => format!("PackedVector[{}, {}]", self.element.name(), self.length),
            None => format!("Vector[{}, {}]", self.element.name(), self.length),
        }
    }

    fn default_node(&self) -> TreeNode {
        match self.packed {
            // Basic defaults are zero, so every chunk is the zero chunk
            Some(_) => zero_node(self.depth()),
            None => fill_repeat(&self.element.default_node(), self.depth(), self.length as u64),
        }
    }

    fn view_from_backing(&self, node: TreeNode, hook: Option<Hook>) -> Result<Box<dyn View>> {
        Ok(Box::new(self.view(node, hook)?))
    }

    fn is_fixed_byte_length(&self) -> bool {
        self.element.is_fixed_byte_length()
    }

    fn type_byte_length(&self) -> Result<usize> {
        let element_length = self.element.type_byte_length()?;
        element_length.checked_mul(self.length).ok_or_else(|| {
            Error::InvalidType(format!("byte length of {} overflows", self.name()))
        })
    }

    fn min_byte_length(&self) -> usize {
        self.element.min_byte_length().saturating_mul(self.length)
    }

    fn max_byte_length(&self) -> usize {
        self.element.max_byte_length().saturating_mul(self.length)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Box<dyn View>> {
        Ok(Box::new(self.decode(bytes)?))
    }
}

/// A vector bound to its current tree
#[derive(Debug)]
pub struct VectorView {
    vtype: VectorType,
    cell: BackedCell,
}

impl VectorView {
    pub fn vector_type(&self) -> &VectorType {
        &self.vtype
    }

    pub fn len(&self) -> usize {
        self.vtype.length
    }

    pub fn is_empty(&self) -> bool {
        self.vtype.length == 0
    }

    /// View of element `index`
    ///
    /// Composite elements come back hooked to this vector: mutating them
    /// rewrites this vector's backing (and, through its own hook, its owners).
    pub fn get(&self, index: usize) -> Result<Box<dyn View>> {
        self.vtype.check_index(index)?;
        let gindex = self.vtype.chunk_gindex(index)?;
        let node = self.cell.get_backing().getter(gindex)?;

        match self.vtype.packed {
            Some(basic) => Ok(Box::new(
                basic.basic_view_from_backing(&node, index % basic.pack_factor())?,
            )),
            None => self
                .vtype
                .element
                .view_from_backing(node, Some(self.cell.child_hook(gindex))),
        }
    }

    /// Replace element `index` with `view`
    pub fn set(&mut self, index: usize, view: &dyn View) -> Result<()> {
        self.vtype.check_index(index)?;
        let element_name = self.vtype.element.name();
        let view_name = view.type_def().name();
        if view_name != element_name {
            return Err(Error::TypeMismatch(format!(
                "cannot store {} in {}",
                view_name,
                self.vtype.name()
            )));
        }

        let gindex = self.vtype.chunk_gindex(index)?;
        let replacement = match self.vtype.packed {
            Some(basic) => {
                let value = view.as_any().downcast_ref::<BasicValue>().ok_or_else(|| {
                    Error::TypeMismatch(format!("{} is not a basic value", view_name))
                })?;
                let chunk = self.cell.get_backing().getter(gindex)?;
                value.backing_from_base(&chunk, index % basic.pack_factor())?
            }
            None => view.get_backing(),
        };
        self.cell.rewrite(gindex, replacement)
    }

    /// Element `index` as a scalar
    pub fn get_basic(&self, index: usize) -> Result<BasicValue> {
        downcast_view(self.get(index)?)
    }

    /// Element `index` as a nested vector, hooked to this one
    pub fn get_vector(&self, index: usize) -> Result<VectorView> {
        downcast_view(self.get(index)?)
    }

    /// Store a scalar, converting it to the element type first
    pub fn set_basic(&mut self, index: usize, value: impl Into<BasicValue>) -> Result<()> {
        let basic = self.vtype.element.as_basic().ok_or_else(|| {
            Error::TypeMismatch(format!("{} does not hold scalars", self.vtype.name()))
        })?;
        let value = basic.coerce(value.into())?;
        self.set(index, &value)
    }

    /// Every element, for vectors of scalars
    pub fn values(&self) -> Result<Vec<BasicValue>> {
        (0..self.len()).map(|i| self.get_basic(i)).collect()
    }

    pub fn hash_tree_root<H: MerkleHasher + ?Sized>(&self, hasher: &H) -> Root {
        self.cell.get_backing().merkle_root(hasher)
    }
}

impl View for VectorView {
    fn type_def(&self) -> TypeRef {
        Arc::new(self.vtype.clone())
    }

    fn get_backing(&self) -> TreeNode {
        self.cell.get_backing()
    }

    fn set_backing(&mut self, node: TreeNode) -> Result<()> {
        self.vtype.check_shape(&node)?;
        self.cell.set_backing(node)
    }

    fn value_byte_length(&self) -> Result<usize> {
        if self.vtype.is_fixed_byte_length() {
            return self.vtype.type_byte_length();
        }
        (0..self.len()).try_fold(0usize, |total, i| {
            Ok(total + self.get(i)?.value_byte_length()?)
        })
    }

    fn as_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.vtype.min_byte_length());
        for i in 0..self.len() {
            out.extend(self.get(i)?.as_bytes()?);
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
