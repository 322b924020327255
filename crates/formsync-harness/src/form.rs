#![forbid(unsafe_code)]

//! In-memory container and user-interaction simulation.
//!
//! [`FakeForm`] is a [`ControlSource`] over a list of [`FakeControl`]s. Its
//! interaction helpers mimic what a browser does for one user action:
//!
//! | Action | Control change | Events |
//! |--------|----------------|--------|
//! | [`click`](FakeForm::click) checkbox | toggle `checked` | input, change |
//! | [`click`](FakeForm::click) radio | check it, uncheck its group | input, change |
//! | [`type_text`](FakeForm::type_text) | append one char at a time | input per char, then change |
//! | [`replace_text`](FakeForm::replace_text) | overwrite value | input, change |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use formsync_core::{Control, ControlEvent, ControlKind, ControlSource};

use crate::control::FakeControl;

/// A container of fake controls. Clones share the same container.
#[derive(Clone, Default)]
pub struct FakeForm {
    controls: Rc<RefCell<Vec<FakeControl>>>,
}

impl FakeForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(self, control: FakeControl) -> Self {
        self.push(control);
        self
    }

    /// Append a control, returning a handle to it.
    pub fn push(&self, control: FakeControl) -> FakeControl {
        self.controls.borrow_mut().push(control.clone());
        control
    }

    /// Remove a control from the container. Returns whether it was present.
    pub fn remove(&self, control: &FakeControl) -> bool {
        let mut controls = self.controls.borrow_mut();
        match controls.iter().position(|c| c.same(control)) {
            Some(pos) => {
                controls.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.borrow().is_empty()
    }

    /// First control with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<FakeControl> {
        self.controls
            .borrow()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    /// Control with the given name and value (radio and list members).
    #[must_use]
    pub fn find_member(&self, name: &str, value: &str) -> Option<FakeControl> {
        self.controls
            .borrow()
            .iter()
            .find(|c| c.name() == name && c.value() == value)
            .cloned()
    }

    /// Click a checkbox or radio.
    ///
    /// Checking a radio unchecks every other radio of the same name in this
    /// form. Clicking an already-checked radio, or a plain control, does
    /// nothing.
    pub fn click(&self, control: &FakeControl) {
        match control.kind() {
            ControlKind::Checkbox | ControlKind::MultiCheckbox => {
                control.set_checked(!control.checked());
            }
            ControlKind::Radio => {
                if control.checked() {
                    return;
                }
                let name = control.name();
                for other in self.controls.borrow().iter() {
                    if other.kind() == ControlKind::Radio && other.name() == name {
                        other.set_checked(false);
                    }
                }
                control.set_checked(true);
            }
            ControlKind::Plain => return,
        }
        control.fire(ControlEvent::Input);
        control.fire(ControlEvent::Change);
    }

    /// Type `text` at the end of the control's value, one character per
    /// input event, then commit.
    pub fn type_text(&self, control: &FakeControl, text: &str) {
        let mut value = control.value();
        for ch in text.chars() {
            value.push(ch);
            control.set_value(&value);
            control.fire(ControlEvent::Input);
        }
        control.fire(ControlEvent::Change);
    }

    /// Overwrite the control's value in one edit, then commit.
    pub fn replace_text(&self, control: &FakeControl, text: &str) {
        control.set_value(text);
        control.fire(ControlEvent::Input);
        control.fire(ControlEvent::Change);
    }
}

impl ControlSource for FakeForm {
    type Control = FakeControl;

    fn controls(&self) -> Vec<FakeControl> {
        self.controls.borrow().clone()
    }
}

impl fmt::Debug for FakeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.controls.borrow().iter()).finish()
    }
}
