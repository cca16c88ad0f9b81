//! Tree descriptors - the declarative input contract.
//!
//! A [`TreeDescriptor`] is plain data describing a desired node: its kind,
//! content, attributes, style, children, attachment target, and an optional
//! reference name. Descriptors are authored as struct literals and handed to
//! [`ElementNode::mount`](crate::ElementNode::mount) (or
//! [`Registry::mount`](crate::Registry::mount)), which materializes them into
//! live nodes.
//!
//! # Example
//!
//! ```
//! use sprig::{reactive, Kind, TreeDescriptor};
//!
//! let message = reactive("hello".to_string());
//!
//! let desc = TreeDescriptor {
//!     kind: Some(Kind::tag("section")),
//!     text: Some(message.clone().into()),
//!     attributes: Some(vec![("class".into(), "banner".into())]),
//!     ..Default::default()
//! };
//! # let _ = desc;
//! ```

use std::rc::Rc;

use crate::element::ElementNode;
use crate::host::NodeId;
use crate::reactive::{Reactive, TextSource};
use crate::registry::Registry;

/// Tag used when a descriptor has no `kind`.
pub const CONTAINER_TAG: &str = "div";

// =============================================================================
// Prop Values
// =============================================================================

/// A content or attribute value: a literal string, or a reactive cell that
/// re-renders the owning element when it changes.
#[derive(Clone)]
pub enum PropValue {
    /// Literal value (not reactive).
    Static(String),
    /// Reactive cell; read at render time, subscribed on the first render.
    Cell(Rc<dyn TextSource>),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Static(value)
    }
}

impl<T> From<Reactive<T>> for PropValue
where
    T: Clone + PartialEq + std::fmt::Display + 'static,
{
    fn from(cell: Reactive<T>) -> Self {
        PropValue::Cell(Rc::new(cell))
    }
}

// =============================================================================
// Kind and Producers
// =============================================================================

/// Producer function: receives the working descriptor and an [`OnInit`] hook,
/// and returns what the element should be built from.
pub type Producer = Rc<dyn Fn(&mut TreeDescriptor, &mut OnInit) -> Produced>;

/// How the live node for a descriptor is obtained.
#[derive(Clone)]
pub enum Kind {
    /// Create a node of this tag.
    Tag(String),
    /// Compute a delegated or extended descriptor (the composition mechanism
    /// for reusable components).
    Producer(Producer),
}

impl Kind {
    /// A tag kind.
    pub fn tag(tag: impl Into<String>) -> Self {
        Kind::Tag(tag.into())
    }

    /// Wrap a producer function.
    pub fn producer(f: impl Fn(&mut TreeDescriptor, &mut OnInit) -> Produced + 'static) -> Self {
        Kind::Producer(Rc::new(f))
    }
}

impl From<&str> for Kind {
    fn from(tag: &str) -> Self {
        Kind::Tag(tag.to_string())
    }
}

/// Producer return value, resolved by an explicit match during construction.
pub enum Produced {
    /// Adopt this live node directly.
    Node(NodeId),
    /// Materialize this descriptor through the normal constructor path and
    /// adopt the resulting node. The call site's own fields render onto that
    /// node afterwards, so they win on overlap.
    Child(TreeDescriptor),
    /// Overlay the present fields onto the working descriptor (these win on
    /// overlap); a tag-valued `kind` after the merge creates the node.
    Delegate(TreeDescriptor),
}

impl From<ElementNode> for Produced {
    fn from(element: ElementNode) -> Self {
        Produced::Node(element.node())
    }
}

/// Deferred initializer: runs once the owning node and its subtree are fully
/// attached and rendered, with the tree's [`Registry`] so named siblings
/// resolve.
pub type InitFn = Box<dyn FnOnce(&Registry)>;

/// Registration hook handed to producers.
///
/// At most one initializer is kept; registering again replaces the earlier
/// one.
#[derive(Default)]
pub struct OnInit {
    callback: Option<InitFn>,
}

impl OnInit {
    /// Register the deferred initializer.
    pub fn register(&mut self, callback: impl FnOnce(&Registry) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub(crate) fn take(&mut self) -> Option<InitFn> {
        self.callback.take()
    }
}

// =============================================================================
// Node References
// =============================================================================

/// Anything describable as a node: a live node, a descriptor to materialize,
/// an already-materialized element, or a selector string resolved against the
/// live tree.
#[derive(Clone)]
pub enum NodeRef {
    /// An existing live node, passed through as-is.
    Node(NodeId),
    /// A descriptor, materialized recursively.
    Desc(Box<TreeDescriptor>),
    /// An element, used as-is.
    Element(ElementNode),
    /// A selector resolved with [`query_selector`](crate::host::query_selector).
    Selector(String),
}

impl From<NodeId> for NodeRef {
    fn from(node: NodeId) -> Self {
        NodeRef::Node(node)
    }
}

impl From<TreeDescriptor> for NodeRef {
    fn from(descriptor: TreeDescriptor) -> Self {
        NodeRef::Desc(Box::new(descriptor))
    }
}

impl From<ElementNode> for NodeRef {
    fn from(element: ElementNode) -> Self {
        NodeRef::Element(element)
    }
}

impl From<&str> for NodeRef {
    fn from(selector: &str) -> Self {
        NodeRef::Selector(selector.to_string())
    }
}

impl From<String> for NodeRef {
    fn from(selector: String) -> Self {
        NodeRef::Selector(selector)
    }
}

// =============================================================================
// Tree Descriptor
// =============================================================================

/// Declarative description of a desired node.
///
/// All fields are optional; absent fields are simply skipped during
/// materialization and rendering.
#[derive(Clone, Default)]
pub struct TreeDescriptor {
    /// Node kind: a tag name, or a producer function. Absent means the
    /// generic container tag.
    pub kind: Option<Kind>,
    /// Raw markup content.
    pub markup: Option<PropValue>,
    /// Plain text content, independent of `markup`.
    pub text: Option<PropValue>,
    /// Children, appended in order.
    pub children: Vec<NodeRef>,
    /// Pre-built live node to adopt; always wins over a created node.
    pub node: Option<NodeId>,
    /// Where to attach the node once built.
    pub parent: Option<NodeRef>,
    /// Attribute entries, applied in order. `Some(vec![])` still clears
    /// existing attributes on render; `None` leaves the node's attributes
    /// and style untouched.
    pub attributes: Option<Vec<(String, PropValue)>>,
    /// Name to register the element under in the tree's registry.
    pub ref_name: Option<String>,
    /// Style properties, applied together with the attributes.
    pub style: Vec<(String, String)>,
}

impl TreeDescriptor {
    /// Overlay `other`'s present fields onto `self`; `other` wins on overlap.
    pub(crate) fn overlay(&mut self, other: TreeDescriptor) {
        if other.kind.is_some() {
            self.kind = other.kind;
        }
        if other.markup.is_some() {
            self.markup = other.markup;
        }
        if other.text.is_some() {
            self.text = other.text;
        }
        if !other.children.is_empty() {
            self.children = other.children;
        }
        if other.node.is_some() {
            self.node = other.node;
        }
        if other.parent.is_some() {
            self.parent = other.parent;
        }
        if other.attributes.is_some() {
            self.attributes = other.attributes;
        }
        if other.ref_name.is_some() {
            self.ref_name = other.ref_name;
        }
        if !other.style.is_empty() {
            self.style = other.style;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
