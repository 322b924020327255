#![forbid(unsafe_code)]

//! Proptest strategies for random forms and user sessions.
//!
//! Generated forms keep names and member values unique where formsync's
//! guarantees depend on it: every text field and single checkbox has its own
//! name, radio members carry distinct values inside their group, and each
//! `tags[]` member carries a distinct value.

use proptest::prelude::*;

use crate::control::FakeControl;
use crate::form::FakeForm;

/// Shape of one generated control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlSpec {
    Text(String),
    Checkbox(bool),
    /// Radio in group `group % 2`.
    Radio { group: u8, checked: bool },
    /// Member of the `tags[]` list.
    Tag(bool),
}

/// One user action against control `index % form.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Click(usize),
    Type(usize, String),
    Replace(usize, String),
}

pub fn arb_control() -> impl Strategy<Value = ControlSpec> {
    prop_oneof![
        "[a-z]{0,4}".prop_map(ControlSpec::Text),
        any::<bool>().prop_map(ControlSpec::Checkbox),
        (0u8..2, any::<bool>()).prop_map(|(group, checked)| ControlSpec::Radio { group, checked }),
        any::<bool>().prop_map(ControlSpec::Tag),
    ]
}

pub fn arb_form() -> impl Strategy<Value = Vec<ControlSpec>> {
    proptest::collection::vec(arb_control(), 1..12)
}

pub fn arb_action() -> impl Strategy<Value = UserAction> {
    prop_oneof![
        any::<usize>().prop_map(UserAction::Click),
        (any::<usize>(), "[a-z]{1,3}").prop_map(|(i, s)| UserAction::Type(i, s)),
        (any::<usize>(), "[a-z]{0,3}").prop_map(|(i, s)| UserAction::Replace(i, s)),
    ]
}

pub fn arb_session(max_actions: usize) -> impl Strategy<Value = Vec<UserAction>> {
    proptest::collection::vec(arb_action(), 0..max_actions)
}

/// Build a form from specs, in spec order.
///
/// Names are derived from positions: `text{i}`, `flag{i}`, `group{g}` with
/// value `r{i}`, `tags[]` with value `t{i}`. At most one radio per group
/// starts checked (the last checked spec wins).
#[must_use]
pub fn build_form(specs: &[ControlSpec]) -> FakeForm {
    let form = FakeForm::new();
    for control in spec_controls(specs) {
        form.push(control);
    }
    form
}

/// Build the same controls as [`build_form`], in reverse document order.
#[must_use]
pub fn build_form_reversed(specs: &[ControlSpec]) -> FakeForm {
    let form = FakeForm::new();
    for control in spec_controls(specs).into_iter().rev() {
        form.push(control);
    }
    form
}

/// Run one action against `form`.
pub fn perform(form: &FakeForm, action: &UserAction) {
    use formsync_core::ControlSource;

    let controls = form.controls();
    if controls.is_empty() {
        return;
    }
    match action {
        UserAction::Click(i) => form.click(&controls[i % controls.len()]),
        UserAction::Type(i, s) => form.type_text(&controls[i % controls.len()], s),
        UserAction::Replace(i, s) => form.replace_text(&controls[i % controls.len()], s),
    }
}

fn spec_control(i: usize, spec: &ControlSpec) -> FakeControl {
    match spec {
        ControlSpec::Text(value) => FakeControl::text(&format!("text{i}"), value),
        ControlSpec::Checkbox(checked) => FakeControl::checkbox(&format!("flag{i}"), "on", *checked),
        ControlSpec::Radio { group, checked } => {
            FakeControl::radio(&format!("group{}", group % 2), &format!("r{i}"), *checked)
        }
        ControlSpec::Tag(checked) => FakeControl::checkbox("tags[]", &format!("t{i}"), *checked),
    }
}

fn spec_controls(specs: &[ControlSpec]) -> Vec<FakeControl> {
    let controls: Vec<FakeControl> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| spec_control(i, spec))
        .collect();
    normalize_radios(&controls);
    controls
}

/// Leave at most one checked radio per group: the last one in `controls`.
fn normalize_radios(controls: &[FakeControl]) {
    use formsync_core::{Control, ControlKind};

    for (i, control) in controls.iter().enumerate() {
        if control.kind() != ControlKind::Radio || !control.checked() {
            continue;
        }
        let name = control.name();
        let later_checked = controls[i + 1..]
            .iter()
            .any(|c| c.kind() == ControlKind::Radio && c.name() == name && c.checked());
        if later_checked {
            control.set_checked(false);
        }
    }
}
