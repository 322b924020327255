#![forbid(unsafe_code)]

//! Policy files and state snapshots through the public facade.
//!
//! Run: `cargo test -p formsync-harness --test config_and_snapshots`

use formsync::prelude::*;
use formsync::SyncError;
use formsync_harness::{ChangeLog, FakeControl, FakeForm};

fn signup_form() -> FakeForm {
    FakeForm::new()
        .with(FakeControl::text("email", "al@example.com"))
        .with(FakeControl::checkbox("subscribe", "on", false))
        .with(FakeControl::radio("plan", "basic", true))
        .with(FakeControl::radio("plan", "pro", false))
        .with(FakeControl::checkbox("tags[]", "rust", true))
        .with(FakeControl::checkbox("tags[]", "web", false))
}

#[test]
fn toml_policy_drives_binding() {
    let config = SyncConfig::from_toml_str(
        r#"
        watch = ["subscribe"]
        events = "change-only"
        "#,
    )
    .unwrap();
    let form = signup_form();
    let log = ChangeLog::new();
    let sync = SyncBuilder::new()
        .config(config)
        .on_state_update(log.callback())
        .bind(&form);

    let email = form.find("email").unwrap();
    assert_eq!(email.listener_count(), 1);

    // Input events are not bound.
    email.set_value("bo@example.com");
    email.fire(ControlEvent::Input);
    assert_eq!(sync.field("email"), Some(FieldValue::from("al@example.com")));

    form.click(&form.find("subscribe").unwrap());
    assert_eq!(log.len(), 1);
    // The commit on `email` is picked up but does not notify.
    email.fire(ControlEvent::Change);
    assert_eq!(sync.field("email"), Some(FieldValue::from("bo@example.com")));
    assert_eq!(log.len(), 1);
}

#[test]
fn json_policy_rejects_unnamed_controls() {
    let config = SyncConfig::from_json_str(r#"{"unnamed": "reject"}"#).unwrap();
    let form = signup_form();
    form.push(FakeControl::text("", "orphan"));

    let err = SyncBuilder::new().config(config).try_bind(&form).unwrap_err();
    assert_eq!(err, SyncError::UnnamedControl { position: 6 });
    assert!(err.to_string().contains('6'));
}

#[test]
fn malformed_policy_is_a_config_error() {
    assert!(matches!(
        SyncConfig::from_toml_str("events = \"sometimes\""),
        Err(SyncError::Config(_))
    ));
    assert!(matches!(
        SyncConfig::from_json_str("{\"watch\": 3}"),
        Err(SyncError::Config(_))
    ));
}

#[test]
fn snapshot_restores_into_fresh_form() {
    let form = signup_form();
    let sync = StateSynchronizer::with_config(&form, SyncConfig::new());
    form.click(&form.find_member("plan", "pro").unwrap());
    form.click(&form.find_member("tags[]", "web").unwrap());
    form.replace_text(&form.find("email").unwrap(), "cy@example.com");

    let json = sync.state().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["plan"], "pro");
    assert_eq!(value["subscribe"], false);
    assert_eq!(value["tags[]"], serde_json::json!(["rust", "web"]));

    let restored = State::from_json(&json).unwrap();
    let other = signup_form();
    let log = ChangeLog::new();
    let sync2 = StateSynchronizer::new(&other, log.callback(), None);
    sync2.set_state(restored);

    assert!(log.is_empty());
    assert!(other.find_member("plan", "pro").unwrap().checked());
    assert!(!other.find_member("plan", "basic").unwrap().checked());
    assert!(other.find_member("tags[]", "web").unwrap().checked());
    assert_eq!(other.find("email").unwrap().value(), "cy@example.com");
    assert_eq!(*sync2.state(), *sync.state());
}

#[test]
fn corrupt_snapshot_is_a_snapshot_error() {
    assert!(matches!(
        State::from_json("{\"name\": 3}"),
        Err(SyncError::Snapshot(_))
    ));
    assert!(matches!(State::from_json("["), Err(SyncError::Snapshot(_))));
}
