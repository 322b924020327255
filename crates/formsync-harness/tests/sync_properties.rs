#![forbid(unsafe_code)]

//! Integration tests: observable behavior of `StateSynchronizer` against the
//! in-memory form.
//!
//! # Covered Behaviors
//!
//! | Behavior | Test |
//! |----------|------|
//! | Watch-set gating | `watch_set_gates_notification` |
//! | No-op suppression | `unchanged_checkbox_never_notifies` |
//! | Checkbox list accumulation | `tag_list_accumulates_and_removes` |
//! | External merge silence | `set_state_never_notifies` |
//! | Radio exclusivity | `radio_group_takes_checked_member` |
//! | Subscribe/name scenario | `subscribe_scenario` |
//!
//! Run: `cargo test -p formsync-harness --test sync_properties`

use formsync::prelude::*;
use formsync_harness::{ChangeLog, FakeControl, FakeForm};

// ============================================================================
// Fixtures
// ============================================================================

fn contact_form() -> FakeForm {
    FakeForm::new()
        .with(FakeControl::text("name", ""))
        .with(FakeControl::text("email", ""))
}

fn tag_form() -> FakeForm {
    FakeForm::new()
        .with(FakeControl::checkbox("tags[]", "a", false))
        .with(FakeControl::checkbox("tags[]", "b", false))
        .with(FakeControl::checkbox("tags[]", "c", false))
}

fn plan_form() -> FakeForm {
    FakeForm::new()
        .with(FakeControl::radio("plan", "basic", true))
        .with(FakeControl::radio("plan", "pro", false))
        .with(FakeControl::radio("plan", "enterprise", false))
}

fn tags(sync: &StateSynchronizer<FakeControl>) -> Option<FieldValue> {
    sync.field("tags[]")
}

// ============================================================================
// Notification gating
// ============================================================================

#[test]
fn watch_set_gates_notification() {
    let form = contact_form();
    let log = ChangeLog::new();
    let _sync = StateSynchronizer::new(&form, log.callback(), Some(WatchSet::new(["email"])));

    form.type_text(&form.find("name").unwrap(), "Al");
    assert!(log.is_empty(), "name is not watched");

    form.type_text(&form.find("email").unwrap(), "a");
    assert_eq!(log.len(), 1);
    let (prev, next) = log.last().unwrap();
    assert_eq!(prev.get("email"), Some(&FieldValue::from("")));
    assert_eq!(next.get("email"), Some(&FieldValue::from("a")));
    // The unwatched change is visible in both snapshots.
    assert_eq!(prev.get("name"), Some(&FieldValue::from("Al")));
}

#[test]
fn every_keystroke_notifies_without_watch_set() {
    let form = contact_form();
    let log = ChangeLog::new();
    let _sync = StateSynchronizer::new(&form, log.callback(), None);

    form.type_text(&form.find("name").unwrap(), "Al");
    // Two input events change state; the commit event does not.
    assert_eq!(log.len(), 2);
    for (prev, next) in log.entries() {
        assert_ne!(prev, next);
    }
}

#[test]
fn unchanged_checkbox_never_notifies() {
    let form = FakeForm::new().with(FakeControl::checkbox("subscribe", "on", true));
    let log = ChangeLog::new();
    let _sync = StateSynchronizer::new(&form, log.callback(), None);

    let subscribe = form.find("subscribe").unwrap();
    subscribe.set_checked(true);
    subscribe.fire(ControlEvent::Input);
    subscribe.fire(ControlEvent::Change);
    assert!(log.is_empty());
}

#[test]
fn snapshots_are_not_aliased() {
    let form = contact_form();
    let log = ChangeLog::new();
    let sync = StateSynchronizer::new(&form, log.callback(), None);
    let before = sync.state();

    form.replace_text(&form.find("name").unwrap(), "Bo");
    assert_eq!(before.get("name"), Some(&FieldValue::from("")));
    assert_eq!(sync.field("name"), Some(FieldValue::from("Bo")));
}

// ============================================================================
// Checkbox lists
// ============================================================================

#[test]
fn tag_list_accumulates_and_removes() {
    let form = tag_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    assert_eq!(tags(&sync), Some(FieldValue::List(Vec::new())));

    for value in ["a", "b", "c"] {
        form.click(&form.find_member("tags[]", value).unwrap());
    }
    assert_eq!(tags(&sync), Some(FieldValue::from(["a", "b", "c"])));

    form.click(&form.find_member("tags[]", "b").unwrap());
    assert_eq!(tags(&sync), Some(FieldValue::from(["a", "c"])));

    form.click(&form.find_member("tags[]", "b").unwrap());
    assert_eq!(tags(&sync), Some(FieldValue::from(["a", "c", "b"])));
}

#[test]
fn tag_list_initial_state_collects_checked_members() {
    let form = FakeForm::new()
        .with(FakeControl::checkbox("tags[]", "a", true))
        .with(FakeControl::checkbox("tags[]", "b", false))
        .with(FakeControl::checkbox("tags[]", "c", true));
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    assert_eq!(tags(&sync), Some(FieldValue::from(["a", "c"])));
}

#[test]
fn tag_list_applies_membership() {
    let form = tag_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    sync.set_state(State::new().with("tags[]", ["c", "a"]));

    assert!(form.find_member("tags[]", "a").unwrap().checked());
    assert!(!form.find_member("tags[]", "b").unwrap().checked());
    assert!(form.find_member("tags[]", "c").unwrap().checked());
}

#[test]
fn tag_list_notifies_on_membership_change() {
    let form = tag_form();
    let log = ChangeLog::new();
    let _sync = StateSynchronizer::new(&form, log.callback(), Some(WatchSet::new(["tags[]"])));

    form.click(&form.find_member("tags[]", "a").unwrap());
    assert_eq!(log.len(), 1);
    let (prev, next) = log.last().unwrap();
    assert_eq!(prev.get("tags[]"), Some(&FieldValue::List(Vec::new())));
    assert_eq!(next.get("tags[]"), Some(&FieldValue::from(["a"])));
}

// ============================================================================
// Radios
// ============================================================================

#[test]
fn radio_group_takes_checked_member() {
    let form = plan_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    assert_eq!(sync.field("plan"), Some(FieldValue::from("basic")));

    form.click(&form.find_member("plan", "pro").unwrap());
    assert_eq!(sync.field("plan"), Some(FieldValue::from("pro")));
}

#[test]
fn radio_group_ignores_unchecked_member_events() {
    let form = plan_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    form.click(&form.find_member("plan", "pro").unwrap());

    // A stray event from an unchecked member must not blank the group.
    form.find_member("plan", "enterprise")
        .unwrap()
        .fire(ControlEvent::Change);
    assert_eq!(sync.field("plan"), Some(FieldValue::from("pro")));
}

#[test]
fn control_order_resolution_is_last_writer_wins() {
    let form = plan_form();
    let sync = StateSynchronizer::with_config(
        &form,
        SyncConfig::new().radio(RadioResolution::ControlOrder),
    );
    // "basic" is checked but processed before two unchecked members.
    assert_eq!(sync.field("plan"), Some(FieldValue::from("")));

    form.click(&form.find_member("plan", "pro").unwrap());
    assert_eq!(sync.field("plan"), Some(FieldValue::from("pro")));
}

#[test]
fn radio_apply_checks_matching_member() {
    let form = plan_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    sync.set_state(State::new().with("plan", "enterprise"));

    assert!(!form.find_member("plan", "basic").unwrap().checked());
    assert!(!form.find_member("plan", "pro").unwrap().checked());
    assert!(form.find_member("plan", "enterprise").unwrap().checked());
}

// ============================================================================
// External merge
// ============================================================================

#[test]
fn set_state_never_notifies() {
    let form = contact_form();
    let log = ChangeLog::new();
    let watched = ChangeLog::new();
    let sync = StateSynchronizer::new(&form, log.callback(), None);
    let _sub = sync.subscribe(Some(WatchSet::new(["x", "name"])), watched.callback());

    sync.set_state(State::new().with("x", "1").with("name", "Al"));
    assert!(log.is_empty());
    assert!(watched.is_empty());
    assert_eq!(form.find("name").unwrap().value(), "Al");
}

#[test]
fn set_state_keeps_unspecified_fields() {
    let form = contact_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    form.replace_text(&form.find("email").unwrap(), "a@b");

    sync.set_state(State::new().with("name", "Al"));
    assert_eq!(sync.field("email"), Some(FieldValue::from("a@b")));
    assert_eq!(form.find("email").unwrap().value(), "a@b");
}

#[test]
fn set_state_coerces_mismatched_shapes() {
    let form = FakeForm::new()
        .with(FakeControl::checkbox("subscribe", "on", false))
        .with(FakeControl::text("count", ""));
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());

    sync.set_state(State::new().with("subscribe", "yes").with("count", true));
    assert!(form.find("subscribe").unwrap().checked());
    assert_eq!(form.find("count").unwrap().value(), "true");
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn controls_added_later_are_not_tracked() {
    let form = contact_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    let late = form.push(FakeControl::text("late", "x"));

    form.type_text(&late, "y");
    assert_eq!(sync.field("late"), None);
    assert_eq!(late.listener_count(), 0);

    sync.set_state(State::new().with("late", "z"));
    assert_eq!(late.value(), "xy");
}

#[test]
fn removed_controls_leave_stale_fields() {
    let form = tag_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    let a = form.find_member("tags[]", "a").unwrap();
    form.click(&a);
    form.remove(&a);

    // The synchronizer still holds the control; state is a journal.
    assert_eq!(sync.field("tags[]"), Some(FieldValue::from(["a"])));
}

#[test]
fn destroy_then_drop_leaves_no_listeners() {
    let form = plan_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    sync.destroy();
    drop(sync);
    for control in form.controls() {
        assert_eq!(control.listener_count(), 0);
    }
}

#[test]
fn teardown_spares_foreign_listeners() {
    let form = contact_form();
    let name = form.find("name").unwrap();
    let foreign = Listener::new(|_| {});
    name.add_listener(ControlEvent::Change, &foreign);
    {
        let _sync = StateSynchronizer::new(&form, |_, _| panic!("notified after drop"), None);
        assert_eq!(name.listener_count(), 3);
    }
    form.replace_text(&name, "after");
    assert_eq!(name.listener_count(), 1);
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn subscribe_scenario() {
    let form = FakeForm::new()
        .with(FakeControl::checkbox("subscribe", "on", false))
        .with(FakeControl::text("name", ""));
    let log = ChangeLog::new();
    let sync = StateSynchronizer::new(&form, log.callback(), Some(WatchSet::new(["subscribe"])));

    assert_eq!(
        *sync.state(),
        State::new().with("subscribe", false).with("name", "")
    );

    form.click(&form.find("subscribe").unwrap());
    assert_eq!(log.len(), 1);
    let (prev, next) = log.last().unwrap();
    assert_eq!(prev, State::new().with("subscribe", false).with("name", ""));
    assert_eq!(next, State::new().with("subscribe", true).with("name", ""));

    form.type_text(&form.find("name").unwrap(), "Al");
    assert_eq!(log.len(), 1);
    assert_eq!(
        *sync.state(),
        State::new().with("subscribe", true).with("name", "Al")
    );
}

#[test]
fn mixed_form_initial_state() {
    let form = FakeForm::new()
        .with(FakeControl::text("name", "Al"))
        .with(FakeControl::textarea("bio", "hi"))
        .with(FakeControl::select("country", "nz"))
        .with(FakeControl::new("age", InputType::parse("number"), "30", false))
        .with(FakeControl::checkbox("subscribe", "on", true))
        .with(FakeControl::radio("plan", "basic", false))
        .with(FakeControl::checkbox("tags[]", "x", true));
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());

    let expected = State::new()
        .with("name", "Al")
        .with("bio", "hi")
        .with("country", "nz")
        .with("age", "30")
        .with("subscribe", true)
        .with("plan", "")
        .with("tags[]", ["x"]);
    assert_eq!(*sync.state(), expected);
}
