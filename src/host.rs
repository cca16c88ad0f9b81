//! Host visual tree - the platform boundary.
//!
//! The materializer treats the platform's retained visual tree as a black box
//! with a handful of primitive operations: create a node, mutate attributes
//! and style, set content, append children, query by selector, listen for
//! events. This module is that boundary, backed by a thread-local node arena
//! (one live tree per thread).
//!
//! The arena always owns a root node with tag `body`, so selector strings
//! like `"body"` resolve without any setup.
//!
//! Selector grammar is deliberately small: `tag`, `#id` (matches the `id`
//! attribute) and `.class` (matches one entry of the whitespace-separated
//! `class` attribute). Queries scan in node-creation order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// Types
// =============================================================================

/// Handle to a live node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Event delivered to listeners registered with [`add_event_listener`].
#[derive(Debug, Clone)]
pub struct Event {
    /// Event kind, e.g. `"click"`.
    pub kind: String,
    /// Node the event was dispatched on.
    pub target: NodeId,
}

/// Event listener callback (Rc for shared ownership in closures).
pub type EventListener = Rc<dyn Fn(&Event)>;

#[derive(Default)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    markup: String,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    listeners: HashMap<String, Vec<EventListener>>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }
}

// =============================================================================
// Arena
// =============================================================================

thread_local! {
    /// All live nodes, in creation order. Index 0 is the root.
    static NODES: RefCell<Vec<NodeData>> = RefCell::new(vec![NodeData::new("body")]);
}

fn with_node<R>(node: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> R {
    NODES.with(|nodes| f(&mut nodes.borrow_mut()[node.0]))
}

/// Root node of the tree (tag `body`).
pub fn root() -> NodeId {
    NodeId(0)
}

/// Create a detached node of the given tag.
pub fn create_node(tag: &str) -> NodeId {
    NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(NodeData::new(tag));
        tracing::trace!(node = id.0, tag, "created node");
        id
    })
}

/// Number of live nodes, root included.
pub fn node_count() -> usize {
    NODES.with(|nodes| nodes.borrow().len())
}

/// Drop every node and start over with a fresh root (for testing).
pub fn reset() {
    NODES.with(|nodes| {
        *nodes.borrow_mut() = vec![NodeData::new("body")];
    });
}

// =============================================================================
// Node Properties
// =============================================================================

/// Tag the node was created with.
pub fn tag(node: NodeId) -> String {
    with_node(node, |data| data.tag.clone())
}

/// Set an attribute, preserving first-set order on overwrite.
pub fn set_attribute(node: NodeId, name: &str, value: &str) {
    with_node(node, |data| {
        match data
            .attributes
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == name)
        {
            Some(entry) => entry.1 = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    });
}

/// Remove an attribute if present.
pub fn remove_attribute(node: NodeId, name: &str) {
    with_node(node, |data| {
        data.attributes.retain(|(existing, _)| existing.as_str() != name);
    });
}

/// Current value of an attribute.
pub fn attribute(node: NodeId, name: &str) -> Option<String> {
    with_node(node, |data| {
        data.attributes
            .iter()
            .find(|(existing, _)| existing.as_str() == name)
            .map(|(_, value)| value.clone())
    })
}

/// Names of every attribute currently present, in set order.
pub fn attribute_names(node: NodeId) -> Vec<String> {
    with_node(node, |data| {
        data.attributes.iter().map(|(name, _)| name.clone()).collect()
    })
}

/// Set one style property.
pub fn set_style(node: NodeId, property: &str, value: &str) {
    with_node(node, |data| {
        match data
            .style
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == property)
        {
            Some(entry) => entry.1 = value.to_string(),
            None => data.style.push((property.to_string(), value.to_string())),
        }
    });
}

/// Current value of a style property.
pub fn style(node: NodeId, property: &str) -> Option<String> {
    with_node(node, |data| {
        data.style
            .iter()
            .find(|(existing, _)| existing.as_str() == property)
            .map(|(_, value)| value.clone())
    })
}

/// Assign raw markup content.
pub fn set_markup(node: NodeId, markup: &str) {
    with_node(node, |data| data.markup = markup.to_string());
}

/// Current markup content.
pub fn markup(node: NodeId) -> String {
    with_node(node, |data| data.markup.clone())
}

/// Assign plain text content.
pub fn set_text(node: NodeId, text: &str) {
    with_node(node, |data| data.text = text.to_string());
}

/// Current text content.
pub fn text(node: NodeId) -> String {
    with_node(node, |data| data.text.clone())
}

// =============================================================================
// Tree Structure
// =============================================================================

/// Append `child` as the last child of `parent`.
///
/// A child that already sits under another parent is moved, not duplicated.
pub fn append_child(parent: NodeId, child: NodeId) {
    NODES.with(|nodes| {
        let mut nodes = nodes.borrow_mut();
        if let Some(old_parent) = nodes[child.0].parent {
            nodes[old_parent.0].children.retain(|&existing| existing != child);
        }
        nodes[parent.0].children.push(child);
        nodes[child.0].parent = Some(parent);
    });
}

/// Children of a node, in append order.
pub fn children(node: NodeId) -> Vec<NodeId> {
    with_node(node, |data| data.children.clone())
}

/// Parent of a node, if attached.
pub fn parent(node: NodeId) -> Option<NodeId> {
    with_node(node, |data| data.parent)
}

// =============================================================================
// Queries
// =============================================================================

/// First node matching the selector, in creation order.
pub fn query_selector(selector: &str) -> Option<NodeId> {
    NODES.with(|nodes| {
        nodes
            .borrow()
            .iter()
            .position(|data| matches_selector(data, selector))
            .map(NodeId)
    })
}

fn matches_selector(data: &NodeData, selector: &str) -> bool {
    if let Some(id) = selector.strip_prefix('#') {
        data.attributes
            .iter()
            .any(|(name, value)| name == "id" && value == id)
    } else if let Some(class) = selector.strip_prefix('.') {
        data.attributes.iter().any(|(name, value)| {
            name == "class" && value.split_whitespace().any(|entry| entry == class)
        })
    } else {
        data.tag == selector
    }
}

// =============================================================================
// Events
// =============================================================================

/// Register an event listener on a node.
pub fn add_event_listener(node: NodeId, kind: &str, listener: EventListener) {
    with_node(node, |data| {
        data.listeners
            .entry(kind.to_string())
            .or_default()
            .push(listener);
    });
}

/// Invoke the node's listeners for `kind` synchronously, in registration
/// order.
pub fn dispatch(node: NodeId, kind: &str) {
    // Snapshot first: listeners commonly write cells, which re-renders
    // elements and mutates the arena.
    let listeners: Vec<EventListener> = with_node(node, |data| {
        data.listeners.get(kind).cloned().unwrap_or_default()
    });
    let event = Event {
        kind: kind.to_string(),
        target: node,
    };
    for listener in &listeners {
        listener(&event);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_root_exists() {
        reset();
        assert_eq!(tag(root()), "body");
        assert_eq!(node_count(), 1);
    }

    #[test]
    fn test_create_and_append() {
        reset();

        let a = create_node("div");
        let b = create_node("span");
        let c = create_node("span");

        append_child(root(), a);
        append_child(a, b);
        append_child(a, c);

        assert_eq!(children(root()), vec![a]);
        assert_eq!(children(a), vec![b, c]);
        assert_eq!(parent(b), Some(a));
    }

    #[test]
    fn test_append_moves_between_parents() {
        reset();

        let a = create_node("div");
        let b = create_node("div");
        let child = create_node("span");

        append_child(a, child);
        append_child(b, child);

        assert!(children(a).is_empty());
        assert_eq!(children(b), vec![child]);
        assert_eq!(parent(child), Some(b));
    }

    #[test]
    fn test_attributes_preserve_order() {
        reset();

        let node = create_node("div");
        set_attribute(node, "a", "1");
        set_attribute(node, "b", "2");
        set_attribute(node, "a", "3");

        assert_eq!(attribute_names(node), vec!["a", "b"]);
        assert_eq!(attribute(node, "a"), Some("3".to_string()));

        remove_attribute(node, "a");
        assert_eq!(attribute_names(node), vec!["b"]);
        assert_eq!(attribute(node, "a"), None);
    }

    #[test]
    fn test_query_selector_grammar() {
        reset();

        let section = create_node("section");
        let tagged = create_node("div");
        set_attribute(tagged, "id", "app");
        let classed = create_node("div");
        set_attribute(classed, "class", "card wide");

        assert_eq!(query_selector("section"), Some(section));
        assert_eq!(query_selector("#app"), Some(tagged));
        assert_eq!(query_selector(".wide"), Some(classed));
        assert_eq!(query_selector("body"), Some(root()));
        assert_eq!(query_selector("#missing"), None);
    }

    #[test]
    fn test_query_selector_creation_order() {
        reset();

        let first = create_node("p");
        let _second = create_node("p");

        assert_eq!(query_selector("p"), Some(first));
    }

    #[test]
    fn test_dispatch_invokes_listeners_in_order() {
        reset();

        let node = create_node("button");
        let hits = Rc::new(Cell::new(0));

        for expected in [1, 2] {
            let hits_clone = hits.clone();
            add_event_listener(
                node,
                "click",
                Rc::new(move |event: &Event| {
                    assert_eq!(event.kind, "click");
                    hits_clone.set(hits_clone.get() + 1);
                    assert_eq!(hits_clone.get(), expected);
                }),
            );
        }

        dispatch(node, "click");
        assert_eq!(hits.get(), 2);

        dispatch(node, "keydown"); // no listeners, no effect
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_dispatch_listener_may_mutate_tree() {
        reset();

        let node = create_node("button");
        add_event_listener(
            node,
            "click",
            Rc::new(move |event: &Event| {
                let extra = create_node("div");
                append_child(event.target, extra);
            }),
        );

        dispatch(node, "click");
        assert_eq!(children(node).len(), 1);
    }

    #[test]
    fn test_content_fields_are_independent() {
        reset();

        let node = create_node("div");
        set_markup(node, "<b>hi</b>");
        set_text(node, "hi");

        assert_eq!(markup(node), "<b>hi</b>");
        assert_eq!(text(node), "hi");
    }

    #[test]
    fn test_reset() {
        reset();
        create_node("div");
        assert_eq!(node_count(), 2);

        reset();
        assert_eq!(node_count(), 1);
        assert_eq!(query_selector("div"), None);
    }
}
