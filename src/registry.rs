//! Named element registry - per-tree reference lookup.
//!
//! Every tree gets its own registry instead of one process-wide table, so
//! multiple independent trees can coexist and be torn down deterministically.
//! Elements carrying a `ref_name` register themselves during construction; a
//! name collision overwrites the earlier entry. Deferred initializers receive
//! the registry, which is how a component reaches named siblings after the
//! whole subtree is attached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::descriptor::TreeDescriptor;
use crate::element::{ElementNode, MountError};

/// Name to element mapping for one tree.
///
/// Cheap to clone; clones share the same map.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Rc<RefCell<HashMap<String, ElementNode>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a descriptor against this registry.
    pub fn mount(&self, descriptor: TreeDescriptor) -> Result<ElementNode, MountError> {
        ElementNode::mount(descriptor, self)
    }

    /// Look up an element by reference name.
    pub fn get(&self, name: &str) -> Option<ElementNode> {
        self.entries.borrow().get(name).cloned()
    }

    /// Register an element under a name, overwriting any earlier entry.
    pub fn insert(&self, name: impl Into<String>, element: ElementNode) {
        let name = name.into();
        if self
            .entries
            .borrow_mut()
            .insert(name.clone(), element)
            .is_some()
        {
            tracing::debug!(name = %name, "registry entry overwritten");
        }
    }

    /// Remove an entry, returning it.
    pub fn remove(&self, name: &str) -> Option<ElementNode> {
        self.entries.borrow_mut().remove(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True when no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Materialize a descriptor against a fresh registry, returning the tree root
/// alongside its registry.
pub fn mount(descriptor: TreeDescriptor) -> Result<(ElementNode, Registry), MountError> {
    let registry = Registry::new();
    let root = registry.mount(descriptor)?;
    Ok((root, registry))
}
