//! Coercion helpers - normalize anything node-shaped.
//!
//! Two helpers, total over the [`NodeRef`] union except for selectors that
//! match nothing, which surface as [`MountError::SelectorNotFound`]. The
//! materializer uses these for children and parent wiring; they are public
//! because application code wants the same shorthand.

use crate::descriptor::{NodeRef, TreeDescriptor};
use crate::element::{ElementNode, MountError};
use crate::host::{self, NodeId};
use crate::registry::Registry;

/// Coerce to an [`ElementNode`].
///
/// A live node is wrapped by adoption (no new node is created); a descriptor
/// is materialized; a selector is resolved against the live tree and wrapped;
/// an element passes through unchanged.
pub fn as_element(
    value: impl Into<NodeRef>,
    registry: &Registry,
) -> Result<ElementNode, MountError> {
    match value.into() {
        NodeRef::Element(element) => Ok(element),
        NodeRef::Node(node) => adopt(node, registry),
        NodeRef::Selector(selector) => {
            let found = host::query_selector(&selector);
            adopt(found.ok_or(MountError::SelectorNotFound(selector))?, registry)
        }
        NodeRef::Desc(descriptor) => ElementNode::mount(*descriptor, registry),
    }
}

/// Coerce to a live [`NodeId`]. Same cases as [`as_element`], returning the
/// underlying node instead of a wrapper.
pub fn as_node(value: impl Into<NodeRef>, registry: &Registry) -> Result<NodeId, MountError> {
    match value.into() {
        NodeRef::Element(element) => Ok(element.node()),
        NodeRef::Node(node) => Ok(node),
        NodeRef::Selector(selector) => {
            let found = host::query_selector(&selector);
            found.ok_or(MountError::SelectorNotFound(selector))
        }
        NodeRef::Desc(descriptor) => Ok(ElementNode::mount(*descriptor, registry)?.node()),
    }
}

fn adopt(node: NodeId, registry: &Registry) -> Result<ElementNode, MountError> {
    ElementNode::mount(
        TreeDescriptor {
            node: Some(node),
            ..Default::default()
        },
        registry,
    )
}
