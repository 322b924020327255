#![forbid(unsafe_code)]

//! Change-callback recorder.

use std::cell::RefCell;
use std::rc::Rc;

use formsync_core::State;

/// Records every `(prev, next)` pair passed to its callbacks.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    entries: Rc<RefCell<Vec<(State, State)>>>,
}

impl ChangeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends to this log.
    pub fn callback(&self) -> impl Fn(&State, &State) + 'static {
        let entries = Rc::clone(&self.entries);
        move |prev: &State, next: &State| entries.borrow_mut().push((prev.clone(), next.clone()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Most recent pair.
    #[must_use]
    pub fn last(&self) -> Option<(State, State)> {
        self.entries.borrow().last().cloned()
    }

    /// Every recorded pair, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<(State, State)> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
