#![forbid(unsafe_code)]

//! Extraction and application: the per-kind value codec.
//!
//! [`extract`] reads a control into its canonical [`FieldValue`];
//! [`apply`] writes a canonical value back onto a control. Both dispatch on
//! [`ControlKind`] exhaustively, so adding a kind is a compile error until
//! both directions handle it.
//!
//! # Radio groups
//!
//! A radio group is every radio control sharing a name. Under
//! [`RadioResolution::Group`] the group's value is the value of its checked
//! member (or `""`), computed from all members at once, so the result does
//! not depend on which member raised the event or on document order.
//! [`RadioResolution::ControlOrder`] keeps the per-control rule: a checked
//! radio writes its value, an unchecked one writes `""`, and the last
//! processed member wins.
//!
//! # Invariants
//!
//! 1. Extracting a checkbox list member never introduces a duplicate and
//!    preserves first-seen order of the remaining members.
//! 2. `apply` is a no-op for a field the state does not define.
//! 3. For plain, checkbox and checkbox-list controls, `extract` after `apply`
//!    reproduces the applied value (modulo coercion, see [`crate::value`]).

use crate::control::{Control, ControlKind};
use crate::value::{FieldValue, State};

/// How a radio group's value is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RadioResolution {
    /// Scan the whole group for its checked member.
    #[default]
    Group,
    /// Each member writes its own value or `""`; the last one processed wins.
    ControlOrder,
}

/// Canonical value of one control.
///
/// `current` is the value already stored under the control's name; only
/// checkbox lists read it. Radios use the per-control rule here; see
/// [`radio_group_value`] for the group rule.
pub fn extract<C: Control + ?Sized>(
    kind: ControlKind,
    control: &C,
    current: Option<&FieldValue>,
) -> FieldValue {
    match kind {
        ControlKind::MultiCheckbox => {
            let mut items = current.map(FieldValue::to_list).unwrap_or_default();
            let value = control.value();
            if control.checked() {
                if !items.contains(&value) {
                    items.push(value);
                }
            } else {
                items.retain(|item| *item != value);
            }
            FieldValue::List(items)
        }
        ControlKind::Checkbox => FieldValue::Flag(control.checked()),
        ControlKind::Radio => {
            if control.checked() {
                FieldValue::Text(control.value())
            } else {
                FieldValue::empty_text()
            }
        }
        ControlKind::Plain => FieldValue::Text(control.value()),
    }
}

/// Value of a radio group: the first checked member's value, or `""`.
pub fn radio_group_value<'a, C, I>(members: I) -> FieldValue
where
    C: Control + 'a,
    I: IntoIterator<Item = &'a C>,
{
    members
        .into_iter()
        .find(|member| member.checked())
        .map_or_else(FieldValue::empty_text, |member| {
            FieldValue::Text(member.value())
        })
}

/// Extract `control` into `state` under its own name.
///
/// `group` supplies the radio group members when `resolution` is
/// [`RadioResolution::Group`]; it is ignored for every other kind.
pub fn extract_into<'a, C, I>(
    state: &mut State,
    control: &C,
    resolution: RadioResolution,
    group: I,
) where
    C: Control + 'a,
    I: IntoIterator<Item = &'a C>,
{
    let name = control.name();
    let kind = control.kind();
    let value = match (kind, resolution) {
        (ControlKind::Radio, RadioResolution::Group) => radio_group_value(group),
        _ => extract(kind, control, state.get(&name)),
    };
    state.insert(name, value);
}

/// Write `value` onto a control of the given kind.
pub fn apply_value<C: Control + ?Sized>(kind: ControlKind, control: &C, value: &FieldValue) {
    #[cfg(feature = "tracing")]
    if !shape_matches(kind, value) {
        tracing::trace!(
            kind = kind.as_str(),
            shape = value.shape(),
            "coercing field value onto control"
        );
    }

    match kind {
        ControlKind::MultiCheckbox => control.set_checked(value.list_contains(&control.value())),
        ControlKind::Checkbox => control.set_checked(value.is_truthy()),
        ControlKind::Radio => control.set_checked(value.as_text() == control.value()),
        ControlKind::Plain => control.set_value(&value.as_text()),
    }
}

/// Reflect `state` onto one control. Controls whose field is undefined are
/// left untouched. Returns whether the control was written.
pub fn apply<C: Control + ?Sized>(state: &State, control: &C) -> bool {
    let name = control.name();
    match state.get(&name) {
        Some(value) => {
            apply_value(ControlKind::classify(&control.input_type(), &name), control, value);
            true
        }
        None => false,
    }
}

#[cfg(feature = "tracing")]
fn shape_matches(kind: ControlKind, value: &FieldValue) -> bool {
    matches!(
        (kind, value),
        (ControlKind::MultiCheckbox, FieldValue::List(_))
            | (ControlKind::Checkbox, FieldValue::Flag(_))
            | (ControlKind::Radio | ControlKind::Plain, FieldValue::Text(_))
    )
}
