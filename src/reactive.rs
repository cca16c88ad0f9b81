//! Reactive value cell - the change-notification primitive.
//!
//! A [`Reactive`] is a mutable boxed value with a subscriber list. Writing a
//! value notifies every subscriber synchronously, in registration order;
//! writing a value equal to the current one is a no-op and fires nothing.
//!
//! Cells are cheap to clone. Clones share the same underlying value and
//! subscriber list, so a cell can be captured by event handlers and bound
//! into descriptors at the same time.
//!
//! # Example
//!
//! ```
//! use sprig::reactive;
//!
//! let count = reactive(0);
//!
//! let seen = count.clone();
//! let _sub = count.subscribe(move || println!("count is now {}", seen.get()));
//!
//! count.set(1); // notifies
//! count.set(1); // equal value, nothing fires
//! count.update(|c| *c += 1);
//! assert_eq!(count.get(), 2);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Subscriber List
// =============================================================================

struct Subscribers {
    next_id: usize,
    entries: Vec<(usize, Rc<dyn Fn()>)>,
}

impl Subscribers {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

// =============================================================================
// Reactive Cell
// =============================================================================

/// A mutable value that notifies subscribers when it changes.
///
/// Subscribers are invoked in registration order and receive no arguments:
/// each callback captures whatever bound state it needs. The same callback
/// can be registered twice and will then run twice per change.
#[derive(Clone)]
pub struct Reactive<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl<T: Clone + PartialEq + 'static> Reactive<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(initial)),
            subscribers: Rc::new(RefCell::new(Subscribers::new())),
        }
    }

    /// Current value (cloned out). No side effect.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `new_value` and notify subscribers.
    ///
    /// A value equal to the current one (structural `PartialEq`) is a no-op.
    pub fn set(&self, new_value: T) {
        {
            if *self.value.borrow() == new_value {
                return;
            }
        }
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Mutate the value through a closure, with the same equality guard as
    /// [`set`](Self::set).
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let changed = {
            let mut value = self.value.borrow_mut();
            let before = value.clone();
            f(&mut value);
            *value != before
        };
        if changed {
            self.notify();
        }
    }

    /// Register a change callback.
    ///
    /// Callbacks accumulate: nothing deduplicates them and nothing removes
    /// them implicitly. The returned [`Subscription`] is the only way to
    /// detach; dropping it without calling [`Subscription::dispose`] leaves
    /// the callback in place.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, Rc::new(callback)));
        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    fn notify(&self) {
        // Snapshot first: a callback may subscribe or dispose re-entrantly.
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

/// Cells compare by identity: two handles are equal only when they share the
/// same underlying value. A cell stored inside another cell is therefore an
/// opaque value and is never unwrapped.
impl<T> PartialEq for Reactive<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reactive({:?})", self.value.borrow())
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Disposer token returned by [`Reactive::subscribe`].
pub struct Subscription {
    id: usize,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl Subscription {
    /// Remove the callback from the cell's subscriber list.
    ///
    /// A no-op when the cell is already gone.
    pub fn dispose(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// Text View
// =============================================================================

/// Object-safe view of a cell whose value renders as text.
///
/// Implemented for every [`Reactive`] with a `Display` value, so a descriptor
/// can bind a cell of any displayable type (a counter, a label, a flag) to
/// text, markup, or an attribute.
pub trait TextSource {
    /// Format the current value.
    fn current_text(&self) -> String;

    /// Register a change callback, with [`Reactive::subscribe`] semantics.
    fn subscribe_text(&self, callback: Box<dyn Fn()>) -> Subscription;
}

impl<T> TextSource for Reactive<T>
where
    T: Clone + PartialEq + fmt::Display + 'static,
{
    fn current_text(&self) -> String {
        self.get().to_string()
    }

    fn subscribe_text(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.subscribe(callback)
    }
}

// =============================================================================
// Factories
// =============================================================================

/// Create a new reactive cell.
pub fn reactive<T: Clone + PartialEq + 'static>(initial: T) -> Reactive<T> {
    Reactive::new(initial)
}

/// Run `callback` whenever `cell` changes.
pub fn on_change<T: Clone + PartialEq + 'static>(
    cell: &Reactive<T>,
    callback: impl Fn() + 'static,
) -> Subscription {
    cell.subscribe(callback)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_set() {
        let count = reactive(0);
        assert_eq!(count.get(), 0);

        count.set(5);
        assert_eq!(count.get(), 5);

        count.update(|c| *c += 10);
        assert_eq!(count.get(), 15);
    }

    #[test]
    fn test_equal_value_is_suppressed() {
        let count = reactive(0);
        let fired = Rc::new(Cell::new(0));

        let fired_clone = fired.clone();
        let _sub = count.subscribe(move || {
            fired_clone.set(fired_clone.get() + 1);
        });

        count.set(1);
        assert_eq!(fired.get(), 1);

        count.set(1); // same value, must not fire
        assert_eq!(fired.get(), 1);

        count.set(2);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_update_equal_result_is_suppressed() {
        let count = reactive(3);
        let fired = Rc::new(Cell::new(0));

        let fired_clone = fired.clone();
        let _sub = count.subscribe(move || {
            fired_clone.set(fired_clone.get() + 1);
        });

        count.update(|c| *c = 3);
        assert_eq!(fired.get(), 0);

        count.update(|c| *c += 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_notification_order() {
        let cell = reactive(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in 1..=3 {
            let order_clone = order.clone();
            let _sub = cell.subscribe(move || {
                order_clone.borrow_mut().push(tag);
            });
        }

        cell.set(1);
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_subscribe_never_deduplicates() {
        let cell = reactive(0);
        let fired = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let fired_clone = fired.clone();
            let _sub = cell.subscribe(move || {
                fired_clone.set(fired_clone.get() + 1);
            });
        }

        cell.set(1);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_dispose_stops_notifications() {
        let cell = reactive(0);
        let fired = Rc::new(Cell::new(0));

        let fired_clone = fired.clone();
        let sub = cell.subscribe(move || {
            fired_clone.set(fired_clone.get() + 1);
        });

        cell.set(1);
        assert_eq!(fired.get(), 1);

        sub.dispose();
        cell.set(2);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let a = reactive(String::from("x"));
        let b = a.clone();

        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
        assert_eq!(a, b);
        assert_ne!(a, reactive(String::from("y")));
    }

    #[test]
    fn test_nested_cell_stays_opaque() {
        let inner = reactive(1);
        let outer = reactive(inner.clone());

        // The outer cell hands back the inner cell itself, not its value.
        assert_eq!(outer.get().get(), 1);

        // Re-setting the same cell (identity-equal) must not fire.
        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        let _sub = outer.subscribe(move || {
            fired_clone.set(fired_clone.get() + 1);
        });
        outer.set(inner);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_on_change() {
        let cell = reactive(0);
        let fired = Rc::new(Cell::new(0));

        let fired_clone = fired.clone();
        let _sub = on_change(&cell, move || {
            fired_clone.set(fired_clone.get() + 1);
        });

        cell.set(7);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_text_source() {
        let count = reactive(0);
        let source: &dyn TextSource = &count;

        assert_eq!(source.current_text(), "0");
        count.set(42);
        assert_eq!(source.current_text(), "42");
    }
}
