#![forbid(unsafe_code)]

//! Listener bookkeeping for bound controls.
//!
//! A [`BindingScope`] records every `(control, event, listener)` triple it
//! attaches. Teardown detaches exactly those listener references, the same
//! `Rc` that was attached, never a freshly built closure.
//!
//! # Usage
//!
//! ```ignore
//! let mut scope = BindingScope::new();
//! scope.bind(&control, ControlEvent::Change, &listener);
//! assert_eq!(scope.binding_count(), 1);
//!
//! scope.clear(); // listener removed from `control`
//! ```
//!
//! # Invariants
//!
//! 1. Bindings are released in reverse registration order.
//! 2. After `clear()` or drop, no listener from this scope remains attached.
//! 3. `clear()` is idempotent and leaves the scope reusable.
//! 4. Binding count is always accurate.

use std::fmt;

use formsync_core::{Control, ControlEvent, Listener};

struct ListenerBinding<C: Control> {
    control: C,
    event: ControlEvent,
    listener: Listener,
}

/// Collects listener attachments for one synchronizer.
pub struct BindingScope<C: Control> {
    bindings: Vec<ListenerBinding<C>>,
}

impl<C: Control> BindingScope<C> {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Attach `listener` to `control` for `event` and remember the triple.
    pub fn bind(&mut self, control: &C, event: ControlEvent, listener: &Listener) -> &mut Self
    where
        C: Clone,
    {
        control.add_listener(event, listener);
        self.bindings.push(ListenerBinding {
            control: control.clone(),
            event,
            listener: listener.clone(),
        });
        self
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Detach every listener, newest first.
    pub fn clear(&mut self) {
        while let Some(binding) = self.bindings.pop() {
            binding
                .control
                .remove_listener(binding.event, &binding.listener);
        }
    }
}

impl<C: Control> Default for BindingScope<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Control> Drop for BindingScope<C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<C: Control> fmt::Debug for BindingScope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.bindings.len())
            .finish()
    }
}
