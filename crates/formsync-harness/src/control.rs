#![forbid(unsafe_code)]

//! In-memory control handle.
//!
//! [`FakeControl`] behaves like a DOM input for formsync's purposes:
//! clones share one underlying control, programmatic writes do not fire
//! events, and listeners are deduplicated per `(event, listener)` pair.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use formsync_core::{Control, ControlEvent, InputType, Listener};

struct ControlCell {
    name: String,
    input_type: InputType,
    checked: Cell<bool>,
    value: RefCell<String>,
    listeners: RefCell<Vec<(ControlEvent, Listener)>>,
    echo: Cell<bool>,
}

/// A shared, in-memory control.
#[derive(Clone)]
pub struct FakeControl {
    cell: Rc<ControlCell>,
}

impl FakeControl {
    /// A control of any type.
    #[must_use]
    pub fn new(name: &str, input_type: InputType, value: &str, checked: bool) -> Self {
        Self {
            cell: Rc::new(ControlCell {
                name: name.to_owned(),
                input_type,
                checked: Cell::new(checked),
                value: RefCell::new(value.to_owned()),
                listeners: RefCell::new(Vec::new()),
                echo: Cell::new(false),
            }),
        }
    }

    #[must_use]
    pub fn text(name: &str, value: &str) -> Self {
        Self::new(name, InputType::Text, value, false)
    }

    #[must_use]
    pub fn textarea(name: &str, value: &str) -> Self {
        Self::new(name, InputType::TextArea, value, false)
    }

    #[must_use]
    pub fn select(name: &str, value: &str) -> Self {
        Self::new(name, InputType::Select, value, false)
    }

    #[must_use]
    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self::new(name, InputType::Checkbox, value, checked)
    }

    #[must_use]
    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self::new(name, InputType::Radio, value, checked)
    }

    /// Make programmatic writes fire [`ControlEvent::Change`], like toolkits
    /// that do not distinguish code from user edits.
    #[must_use]
    pub fn echoing(self) -> Self {
        self.cell.echo.set(true);
        self
    }

    /// Dispatch `event` to every listener registered for it, in
    /// registration order. Listeners may add or remove listeners.
    pub fn fire(&self, event: ControlEvent) {
        let due: Vec<Listener> = self
            .cell
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, l)| l.clone())
            .collect();
        tracing::trace!(
            name = %self.cell.name,
            event = event.as_str(),
            listeners = due.len(),
            "fake control event"
        );
        for listener in due {
            listener.call(event);
        }
    }

    /// Total listeners attached, across both events.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.cell.listeners.borrow().len()
    }

    /// Listeners attached for one event.
    #[must_use]
    pub fn listener_count_for(&self, event: ControlEvent) -> usize {
        self.cell
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _)| *e == event)
            .count()
    }

    /// Whether two handles refer to the same control.
    #[must_use]
    pub fn same(&self, other: &FakeControl) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Control for FakeControl {
    fn name(&self) -> String {
        self.cell.name.clone()
    }

    fn input_type(&self) -> InputType {
        self.cell.input_type.clone()
    }

    fn checked(&self) -> bool {
        self.cell.checked.get()
    }

    fn value(&self) -> String {
        self.cell.value.borrow().clone()
    }

    fn set_checked(&self, checked: bool) {
        self.cell.checked.set(checked);
        if self.cell.echo.get() {
            self.fire(ControlEvent::Change);
        }
    }

    fn set_value(&self, value: &str) {
        *self.cell.value.borrow_mut() = value.to_owned();
        if self.cell.echo.get() {
            self.fire(ControlEvent::Change);
        }
    }

    fn add_listener(&self, event: ControlEvent, listener: &Listener) {
        let mut listeners = self.cell.listeners.borrow_mut();
        if !listeners
            .iter()
            .any(|(e, l)| *e == event && l.same(listener))
        {
            listeners.push((event, listener.clone()));
        }
    }

    fn remove_listener(&self, event: ControlEvent, listener: &Listener) {
        let mut listeners = self.cell.listeners.borrow_mut();
        if let Some(pos) = listeners
            .iter()
            .position(|(e, l)| *e == event && l.same(listener))
        {
            listeners.remove(pos);
        }
    }
}

impl fmt::Debug for FakeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeControl")
            .field("name", &self.cell.name)
            .field("type", &self.cell.input_type)
            .field("checked", &self.cell.checked.get())
            .field("value", &*self.cell.value.borrow())
            .field("listeners", &self.cell.listeners.borrow().len())
            .field("echo", &self.cell.echo.get())
            .finish()
    }
}
