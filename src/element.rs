//! Element nodes - materializer and renderer.
//!
//! An [`ElementNode`] wraps one live host node together with the
//! [`TreeDescriptor`] that produced it. Construction materializes the
//! descriptor (kind resolution, children, parent attachment, name
//! registration) and performs the first render; the render operation
//! re-applies descriptor-derived content, attributes, and style onto the live
//! node, resolving reactive cells and subscribing itself to each of them on
//! the first run so later cell writes re-render exactly once per write.
//!
//! # Example
//!
//! ```
//! use sprig::{mount, reactive, Kind, TreeDescriptor};
//!
//! let label = reactive("ready".to_string());
//!
//! let (status, _registry) = mount(TreeDescriptor {
//!     kind: Some(Kind::tag("p")),
//!     text: Some(label.clone().into()),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! label.set("done".to_string());
//! assert_eq!(status.text(), "done");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::coerce::as_node;
use crate::descriptor::{CONTAINER_TAG, Kind, OnInit, Produced, PropValue, TreeDescriptor};
use crate::host::{self, Event, NodeId};
use crate::reactive::Subscription;
use crate::registry::Registry;

/// Error raised while materializing a descriptor.
#[derive(Debug, Error)]
pub enum MountError {
    /// A selector string matched no node in the live tree.
    #[error("selector `{0}` matched no node in the live tree")]
    SelectorNotFound(String),
}

struct ElementInner {
    node: NodeId,
    data: RefCell<TreeDescriptor>,
    /// Render-acquired cell subscriptions, released by `unmount`.
    subscriptions: RefCell<Vec<Subscription>>,
}

/// A live element: one host node plus the descriptor that produced it.
///
/// Handles are cheap to clone and share the same element. The descriptor
/// stays mutable after construction; every mutator here renders internally,
/// which keeps the live node consistent with the descriptor.
#[derive(Clone)]
pub struct ElementNode {
    inner: Rc<ElementInner>,
}

impl ElementNode {
    /// Materialize a descriptor into a live element.
    ///
    /// Side effects happen in a fixed order: kind resolution, explicit node
    /// override, children (in input order), parent attachment, name
    /// registration, first render, deferred initializer.
    pub fn mount(descriptor: TreeDescriptor, registry: &Registry) -> Result<Self, MountError> {
        let mut data = descriptor;
        let mut node: Option<NodeId> = None;
        let mut deferred = None;

        // 1. KIND RESOLUTION
        match data.kind.clone() {
            None => {}
            Some(Kind::Tag(tag)) => node = Some(host::create_node(&tag)),
            Some(Kind::Producer(producer)) => {
                let mut on_init = OnInit::default();
                let produced = producer(&mut data, &mut on_init);
                deferred = on_init.take();
                match produced {
                    Produced::Node(adopted) => node = Some(adopted),
                    Produced::Child(child) => {
                        node = Some(ElementNode::mount(child, registry)?.node());
                    }
                    Produced::Delegate(extension) => data.overlay(extension),
                }
                // A tag-valued kind after the merge still creates the node.
                if node.is_none() {
                    if let Some(Kind::Tag(tag)) = &data.kind {
                        node = Some(host::create_node(tag));
                    }
                }
            }
        }

        // 2. EXPLICIT NODE OVERRIDE
        if let Some(existing) = data.node {
            node = Some(existing);
        }
        let node = node.unwrap_or_else(|| host::create_node(CONTAINER_TAG));

        // 3. CHILDREN, in input order
        for child in &data.children {
            host::append_child(node, as_node(child.clone(), registry)?);
        }

        // 4. PARENT ATTACHMENT
        if let Some(parent) = &data.parent {
            host::append_child(as_node(parent.clone(), registry)?, node);
        }

        let element = ElementNode {
            inner: Rc::new(ElementInner {
                node,
                data: RefCell::new(data),
                subscriptions: RefCell::new(Vec::new()),
            }),
        };

        // 5. REGISTRATION
        let ref_name = element.inner.data.borrow().ref_name.clone();
        if let Some(name) = ref_name {
            registry.insert(name, element.clone());
        }

        // 6. FIRST RENDER - registers this element on its reactive cells
        element.render_pass(true);

        // 7. DEFERRED INITIALIZER - the subtree is attached and rendered, so
        //    named siblings resolve through the registry
        if let Some(init) = deferred {
            init(registry);
        }

        tracing::debug!(node = ?element.inner.node, "mounted element");
        Ok(element)
    }

    /// The live node this element owns.
    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Re-apply descriptor-derived content, attributes, and style onto the
    /// live node.
    ///
    /// Idempotent under unchanged descriptor state and cell values.
    pub fn render(&self) {
        self.render_pass(false);
    }

    fn render_pass(&self, first_run: bool) {
        let data = self.inner.data.borrow();

        if let Some(markup) = &data.markup {
            let value = self.resolve(markup, first_run);
            host::set_markup(self.inner.node, &value);
        }
        if let Some(text) = &data.text {
            let value = self.resolve(text, first_run);
            host::set_text(self.inner.node, &value);
        }

        if let Some(attributes) = &data.attributes {
            // Full clear, then re-apply: there is no per-key dependency
            // tracking, so every attribute is rewritten on any change.
            for name in host::attribute_names(self.inner.node) {
                host::remove_attribute(self.inner.node, &name);
            }
            for (property, value) in &data.style {
                host::set_style(self.inner.node, property, value);
            }
            for (name, value) in attributes {
                let value = self.resolve(value, first_run);
                host::set_attribute(self.inner.node, name, &value);
            }
        }
    }

    /// Resolve a prop value; on the first run, subscribe a re-render callback
    /// bound to this element so one cell write triggers one render.
    fn resolve(&self, value: &PropValue, first_run: bool) -> String {
        match value {
            PropValue::Static(value) => value.clone(),
            PropValue::Cell(cell) => {
                if first_run {
                    let element = self.clone();
                    let subscription = cell.subscribe_text(Box::new(move || element.render()));
                    self.inner.subscriptions.borrow_mut().push(subscription);
                }
                cell.current_text()
            }
        }
    }

    // =========================================================================
    // Content Accessors
    // =========================================================================

    /// Rendered markup content, read from the live node.
    pub fn markup(&self) -> String {
        host::markup(self.inner.node)
    }

    /// Replace the markup content and render.
    ///
    /// Renders without the first-run flag: a cell assigned here is read but
    /// not subscribed.
    pub fn set_markup(&self, value: impl Into<PropValue>) {
        self.inner.data.borrow_mut().markup = Some(value.into());
        self.render();
    }

    /// Rendered text content, read from the live node.
    pub fn text(&self) -> String {
        host::text(self.inner.node)
    }

    /// Replace the text content and render.
    ///
    /// Renders without the first-run flag: a cell assigned here is read but
    /// not subscribed.
    pub fn set_text(&self, value: impl Into<PropValue>) {
        self.inner.data.borrow_mut().text = Some(value.into());
        self.render();
    }

    /// Upsert one attribute entry and render. Chainable.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<PropValue>) -> &Self {
        let name = name.into();
        let value = value.into();
        {
            let mut data = self.inner.data.borrow_mut();
            let attributes = data.attributes.get_or_insert_with(Vec::new);
            match attributes.iter_mut().find(|(existing, _)| *existing == name) {
                Some(entry) => entry.1 = value,
                None => attributes.push((name, value)),
            }
        }
        self.render();
        self
    }

    /// Edit the descriptor directly, then render.
    pub fn edit(&self, f: impl FnOnce(&mut TreeDescriptor)) {
        {
            let mut data = self.inner.data.borrow_mut();
            f(&mut data);
        }
        self.render();
    }

    // =========================================================================
    // Events and Teardown
    // =========================================================================

    /// Register an event listener on the live node. Chainable.
    pub fn add_event(&self, kind: &str, handler: impl Fn(&Event) + 'static) -> &Self {
        host::add_event_listener(self.inner.node, kind, Rc::new(handler));
        self
    }

    /// Release every reactive subscription acquired by renders.
    ///
    /// Later cell writes no longer touch this element. Removing the node from
    /// the host tree remains the caller's concern.
    pub fn unmount(&self) {
        for subscription in self.inner.subscriptions.borrow_mut().drain(..) {
            subscription.dispose();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
