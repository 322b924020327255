#![forbid(unsafe_code)]

//! Change subscribers with RAII unsubscription.
//!
//! A [`Subscribers`] registry holds `(watch set, callback)` entries. Each
//! [`Subscription`] guard removes its entry when dropped. The registry hands
//! out the callbacks due for a `(prev, next)` pair as an owned list, so the
//! caller can release its borrows before invoking them.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 3. A guard that outlives its registry drops silently.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use formsync_core::{State, WatchSet, evaluate};

/// Change callback: `(previous, current)`.
pub type ChangeCallback = Rc<dyn Fn(&State, &State)>;

struct Entry {
    id: u64,
    watch: Option<WatchSet>,
    callback: ChangeCallback,
}

type EntryList = RefCell<Vec<Entry>>;

/// Registry of change subscribers.
#[derive(Clone, Default)]
pub struct Subscribers {
    entries: Rc<EntryList>,
    next_id: Rc<Cell<u64>>,
}

impl Subscribers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback gated by an optional watch set.
    pub fn subscribe(
        &self,
        watch: Option<WatchSet>,
        callback: impl Fn(&State, &State) + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let callback: ChangeCallback = Rc::new(callback);
        self.entries.borrow_mut().push(Entry {
            id,
            watch,
            callback,
        });
        Subscription {
            entries: Rc::downgrade(&self.entries),
            id,
        }
    }

    /// Callbacks whose watch set admits the `(prev, next)` pair, in
    /// registration order.
    #[must_use]
    pub fn due(&self, prev: &State, next: &State) -> Vec<ChangeCallback> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| evaluate(prev, next, entry.watch.as_ref()).should_notify())
            .map(|entry| Rc::clone(&entry.callback))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.len())
            .finish()
    }
}

/// Guard that unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    entries: Weak<EntryList>,
    id: u64,
}

impl Subscription {
    /// Whether the registry still holds this subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.entries
            .upgrade()
            .is_some_and(|entries| entries.borrow().iter().any(|e| e.id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.borrow_mut().retain(|entry| entry.id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
