#![forbid(unsafe_code)]

//! Control traits: the narrow interface formsync needs from a UI toolkit.
//!
//! A [`Control`] is a handle to one interactive input owned by someone else
//! (a DOM element, a widget, a test double). formsync only reads and writes
//! its observable fields and attaches [`Listener`]s for the two interaction
//! events in [`ControlEvent`].
//!
//! A [`ControlSource`] is whatever can enumerate the controls inside a
//! container. Locating controls is the source's business; formsync queries it
//! once when binding.
//!
//! # Invariants
//!
//! 1. Handles are cheap to clone and refer to the same underlying control,
//!    hence the `&self` setters.
//! 2. `remove_listener` removes only a listener for which
//!    [`Listener::same`] holds with the argument; removing an unknown
//!    listener is a no-op.
//! 3. Programmatic `set_checked` / `set_value` should not fire events.
//!    Implementations that do are tolerated: the runtime ignores events that
//!    arrive while it is applying state.

use std::fmt;
use std::rc::Rc;

/// Suffix that turns a checkbox into a multi-value checkbox list.
pub const LIST_SUFFIX: &str = "[]";

/// Whether a field name denotes a checkbox list.
#[must_use]
pub fn is_list_name(name: &str) -> bool {
    name.ends_with(LIST_SUFFIX)
}

/// The control's type discriminator, as reported by the toolkit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Checkbox,
    Radio,
    Select,
    TextArea,
    /// Any other input type (`"email"`, `"number"`, `"date"`, ...).
    Other(String),
}

impl InputType {
    /// Parse an HTML-style type string. Matching is ASCII case-insensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "" | "text" => Self::Text,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select" | "select-one" | "select-multiple" => Self::Select,
            "textarea" => Self::TextArea,
            _ => Self::Other(lower),
        }
    }

    /// The type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::TextArea => "textarea",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a control's value maps onto the field map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Value string, overwritten unconditionally.
    Plain,
    /// A single boolean checkbox.
    Checkbox,
    /// One member of a radio group.
    Radio,
    /// One member of a checkbox list (name ends in `[]`).
    MultiCheckbox,
}

impl ControlKind {
    /// Classify a control from its type and name.
    #[must_use]
    pub fn classify(input_type: &InputType, name: &str) -> Self {
        match input_type {
            InputType::Checkbox if is_list_name(name) => Self::MultiCheckbox,
            InputType::Checkbox => Self::Checkbox,
            InputType::Radio => Self::Radio,
            _ => Self::Plain,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::MultiCheckbox => "multi-checkbox",
        }
    }
}

/// The two interaction events a control reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ControlEvent {
    /// The value changed while editing (every keystroke).
    Input,
    /// The value was committed (blur, toggle, selection).
    Change,
}

impl ControlEvent {
    /// Both events, in binding order.
    pub const ALL: [ControlEvent; 2] = [ControlEvent::Input, ControlEvent::Change];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event callback attached to a control.
///
/// Listeners compare by identity: two clones of one `Listener` are the same
/// listener, two listeners built from identical closures are not. Keep the
/// clone handed to [`Control::add_listener`] to remove it later.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<dyn Fn(ControlEvent)>,
}

impl Listener {
    /// Wrap a callback.
    pub fn new(callback: impl Fn(ControlEvent) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the callback.
    pub fn call(&self, event: ControlEvent) {
        (self.callback)(event);
    }

    /// Identity comparison.
    #[must_use]
    pub fn same(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("refs", &Rc::strong_count(&self.callback))
            .finish()
    }
}

/// A handle to one interactive input.
pub trait Control {
    /// Field name (state key). May be empty.
    fn name(&self) -> String;

    /// Type discriminator.
    fn input_type(&self) -> InputType;

    /// Checked flag (meaningful for checkboxes and radios).
    fn checked(&self) -> bool;

    /// Value string.
    fn value(&self) -> String;

    fn set_checked(&self, checked: bool);

    fn set_value(&self, value: &str);

    /// Attach `listener` for `event`.
    fn add_listener(&self, event: ControlEvent, listener: &Listener);

    /// Detach a listener previously attached for `event`.
    fn remove_listener(&self, event: ControlEvent, listener: &Listener);

    /// The control's kind, derived from its type and name.
    fn kind(&self) -> ControlKind {
        ControlKind::classify(&self.input_type(), &self.name())
    }
}

/// Enumerates the controls inside a container.
pub trait ControlSource {
    type Control: Control;

    /// Every plain, choice and list control currently in the container, in
    /// document order.
    fn controls(&self) -> Vec<Self::Control>;
}

impl<S: ControlSource + ?Sized> ControlSource for &S {
    type Control = S::Control;

    fn controls(&self) -> Vec<Self::Control> {
        (**self).controls()
    }
}

impl<C: Control + Clone> ControlSource for [C] {
    type Control = C;

    fn controls(&self) -> Vec<C> {
        self.to_vec()
    }
}

impl<C: Control + Clone> ControlSource for Vec<C> {
    type Control = C;

    fn controls(&self) -> Vec<C> {
        self.clone()
    }
}
