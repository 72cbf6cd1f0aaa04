//! Type descriptors and the views bound to tree nodes
//!
//! A [`TypeDescriptor`] is stateless schema data: it knows how to build a
//! default tree, how long the encoding is, and how to wrap an existing node.
//! A [`View`] is the stateful side: a descriptor plus the node it currently
//! wraps, and possibly a [`Hook`] back into the view that owns it.

mod backed;
mod basic;
mod hook;
mod vector;

pub use backed::BackedCell;
pub use basic::{BasicType, BasicValue};
pub use hook::Hook;
pub use vector::{VectorType, VectorView};

use crate::stream::{ByteSink, ByteSource};
use crate::tree::TreeNode;
use crate::{Error, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a type descriptor
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// Stateless description of a value's shape
///
/// Implementations can be added by host applications for their own schema
/// kinds; the shipped kinds are [`BasicType`] and [`VectorType`].
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Canonical name, e.g. `uint64` or `Vector[uint64, 4]`
    ///
    /// Two descriptors with the same name describe the same tree layout.
    fn name(&self) -> String;

    /// Tree of the default value
    fn default_node(&self) -> TreeNode;

    /// Wrap `node`, reporting future changes through `hook`
    fn view_from_backing(&self, node: TreeNode, hook: Option<Hook>) -> Result<Box<dyn View>>;

    /// View of the default value
    fn default(&self, hook: Option<Hook>) -> Result<Box<dyn View>> {
        self.view_from_backing(self.default_node(), hook)
    }

    fn is_fixed_byte_length(&self) -> bool;

    /// Exact encoded length; only meaningful for fixed-length types
    fn type_byte_length(&self) -> Result<usize> {
        Err(Error::NotApplicable(format!(
            "{} is not fixed-length",
            self.name()
        )))
    }

    fn min_byte_length(&self) -> usize;

    fn max_byte_length(&self) -> usize;

    /// Decode a complete encoding
    fn from_bytes(&self, bytes: &[u8]) -> Result<Box<dyn View>>;

    /// Decode from a stream, reading no more than `scope` bytes
    ///
    /// The default handles fixed-length types: the scope is checked before
    /// anything is read, and exactly `type_byte_length()` bytes are consumed
    /// once they decode. Any failure leaves the stream where it was.
    fn deserialize(&self, stream: &mut dyn ByteSource, scope: usize) -> Result<Box<dyn View>> {
        let required = self.type_byte_length()?;
        if required > scope {
            return Err(Error::InsufficientScope { scope, required });
        }
        let view = self.from_bytes(stream.peek(required)?)?;
        stream.advance(required)?;
        Ok(view)
    }

    /// Scalar kind, if values of this type can be packed into chunks
    fn as_basic(&self) -> Option<BasicType> {
        None
    }
}

/// A value bound to (or, for scalars, derivable as) a tree node
pub trait View: Any + fmt::Debug + Send {
    fn type_def(&self) -> TypeRef;

    /// Current tree of this value
    fn get_backing(&self) -> TreeNode;

    /// Replace the tree of this value, notifying the owner if hooked
    fn set_backing(&mut self, node: TreeNode) -> Result<()>;

    fn value_byte_length(&self) -> Result<usize>;

    /// Serialized form
    fn as_bytes(&self) -> Result<Vec<u8>>;

    /// Write the serialized form, returning the number of bytes written
    fn serialize(&self, sink: &mut dyn ByteSink) -> Result<usize> {
        let out = self.as_bytes()?;
        sink.write(&out)
    }

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Recover the concrete view type behind a boxed view
pub fn downcast_view<V: View>(view: Box<dyn View>) -> Result<V> {
    let name = view.type_def().name();
    view.into_any()
        .downcast::<V>()
        .map(|v| *v)
        .map_err(|_| Error::TypeMismatch(format!("unexpected view kind for {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Root;

    /// A variable-length kind, the way a host schema would add one
    #[derive(Debug)]
    struct OpaqueBlob;

    impl TypeDescriptor for OpaqueBlob {
        fn name(&self) -> String {
            "Blob".to_string()
        }

        fn default_node(&self) -> TreeNode {
            TreeNode::leaf(Root::ZERO)
        }

        fn view_from_backing(&self, _node: TreeNode, _hook: Option<Hook>) -> Result<Box<dyn View>> {
            Err(Error::NotApplicable("blob views are not modelled".into()))
        }

        fn is_fixed_byte_length(&self) -> bool {
            false
        }

        fn min_byte_length(&self) -> usize {
            0
        }

        fn max_byte_length(&self) -> usize {
            1024
        }

        fn from_bytes(&self, _bytes: &[u8]) -> Result<Box<dyn View>> {
            Err(Error::NotApplicable("blob views are not modelled".into()))
        }
    }

    #[test]
    fn test_variable_length_type_has_no_type_byte_length() {
        assert!(matches!(
            OpaqueBlob.type_byte_length(),
            Err(Error::NotApplicable(_))
        ));
        let data = [0u8; 8];
        let mut source: &[u8] = &data;
        assert!(matches!(
            OpaqueBlob.deserialize(&mut source, 8),
            Err(Error::NotApplicable(_))
        ));
        assert_eq!(source.len(), 8);
    }

    #[test]
    fn test_downcast_view() {
        let view: Box<dyn View> = Box::new(BasicValue::Uint16(7));
        let value: BasicValue = downcast_view(view).unwrap();
        assert_eq!(value, BasicValue::Uint16(7));

        let view: Box<dyn View> = Box::new(BasicValue::Uint16(7));
        assert!(matches!(
            downcast_view::<VectorView>(view),
            Err(Error::TypeMismatch(_))
        ));
    }
}
