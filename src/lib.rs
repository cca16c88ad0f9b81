//! # sprig
//!
//! Declarative element trees over a retained visual tree, driven by reactive
//! value cells.
//!
//! Describe a tree as plain data with [`TreeDescriptor`], materialize it with
//! [`Registry::mount`] (or the free [`mount`], which returns the root
//! alongside a fresh registry), and bind any content or attribute to a
//! [`Reactive`] cell. Writing the cell re-renders the elements that read it,
//! synchronously.
//!
//! ```
//! use sprig::{mount, reactive, Kind, TreeDescriptor};
//!
//! let count = reactive(0);
//!
//! let (heading, _registry) = mount(TreeDescriptor {
//!     kind: Some(Kind::tag("h1")),
//!     text: Some(count.clone().into()),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! assert_eq!(heading.text(), "0");
//! count.set(3);
//! assert_eq!(heading.text(), "3");
//! ```
//!
//! Reusable components are producer functions: a descriptor whose `kind` is a
//! [`Kind::Producer`] computes a delegated or extended descriptor, and may
//! register one deferred initializer that runs after the subtree is attached
//! and rendered (the place to wire event handlers to named siblings).
//!
//! ## Modules
//!
//! - [`reactive`] - the value cell and change subscription
//! - [`descriptor`] - the declarative data shapes
//! - [`element`] - materializer and renderer
//! - [`registry`] - per-tree named references
//! - [`coerce`] - normalize anything node-shaped
//! - [`host`] - the visual-tree platform boundary

pub mod coerce;
pub mod descriptor;
pub mod element;
pub mod host;
pub mod reactive;
pub mod registry;

// Re-export commonly used items
pub use coerce::{as_element, as_node};
pub use descriptor::{
    CONTAINER_TAG, InitFn, Kind, NodeRef, OnInit, Produced, Producer, PropValue, TreeDescriptor,
};
pub use element::{ElementNode, MountError};
pub use host::{Event, EventListener, NodeId};
pub use reactive::{Reactive, Subscription, TextSource, on_change, reactive};
pub use registry::{Registry, mount};
