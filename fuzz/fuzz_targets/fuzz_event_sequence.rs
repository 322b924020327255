#![no_main]

//! Random forms driven by random event sequences.
//!
//! Checks that callbacks only see real changes, `tags[]` never holds
//! duplicates, `set_state` stays silent, and teardown detaches everything.

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use formsync_harness::{FakeControl, FakeForm};
use formsync_runtime::{
    Control, ControlEvent, ControlSource, EventBinding, FieldValue, RadioResolution, State,
    SyncBuilder, SyncConfig, WatchSet,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Shape {
    Text(u8),
    Checkbox(u8, bool),
    Radio(u8, u8, bool),
    Tag(u8, bool),
}

#[derive(Arbitrary, Debug)]
enum Op {
    Click(u8),
    Type(u8, char),
    Fire(u8, bool),
    SetText(u8, String),
    SetFlag(u8, bool),
    SetList(Vec<u8>),
    Resync,
}

#[derive(Arbitrary, Debug)]
struct Input {
    shapes: Vec<Shape>,
    ops: Vec<Op>,
    change_only: bool,
    control_order: bool,
    watch: Option<u8>,
}

fn build(shapes: &[Shape]) -> FakeForm {
    let form = FakeForm::new();
    for shape in shapes.iter().take(32) {
        let control = match shape {
            Shape::Text(n) => FakeControl::text(&format!("f{}", n % 8), ""),
            Shape::Checkbox(n, on) => FakeControl::checkbox(&format!("f{}", n % 8), "on", *on),
            Shape::Radio(n, v, on) => {
                FakeControl::radio(&format!("f{}", n % 8), &format!("v{}", v % 4), *on)
            }
            Shape::Tag(v, on) => FakeControl::checkbox("tags[]", &format!("v{}", v % 4), *on),
        };
        form.push(control);
    }
    form
}

fuzz_target!(|input: Input| {
    let form = build(&input.shapes);
    let controls = form.controls();
    if controls.is_empty() {
        return;
    }
    let pick = |i: u8| &controls[usize::from(i) % controls.len()];

    let mut config = SyncConfig::new()
        .events(if input.change_only {
            EventBinding::ChangeOnly
        } else {
            EventBinding::InputAndChange
        })
        .radio(if input.control_order {
            RadioResolution::ControlOrder
        } else {
            RadioResolution::Group
        });
    if let Some(n) = input.watch {
        config = config.watch_set(Some(WatchSet::new([format!("f{}", n % 8)])));
    }

    let calls = Rc::new(Cell::new(0usize));
    let c = Rc::clone(&calls);
    let sync = SyncBuilder::new()
        .config(config)
        .on_state_update(move |prev, next| {
            assert_ne!(prev, next);
            c.set(c.get() + 1);
        })
        .bind(&form);

    for op in input.ops.iter().take(256) {
        match op {
            Op::Click(i) => form.click(pick(*i)),
            Op::Type(i, ch) => form.type_text(pick(*i), &ch.to_string()),
            Op::Fire(i, change) => pick(*i).fire(if *change {
                ControlEvent::Change
            } else {
                ControlEvent::Input
            }),
            Op::SetText(i, text) => {
                let before = calls.get();
                sync.set_state(State::new().with(pick(*i).name(), text.as_str()));
                assert_eq!(calls.get(), before);
            }
            Op::SetFlag(i, on) => {
                let before = calls.get();
                sync.set_state(State::new().with(pick(*i).name(), *on));
                assert_eq!(calls.get(), before);
            }
            Op::SetList(items) => {
                let mut items: Vec<String> =
                    items.iter().take(8).map(|v| format!("v{}", v % 4)).collect();
                items.sort();
                items.dedup();
                let before = calls.get();
                sync.set_state(State::new().with("tags[]", items));
                assert_eq!(calls.get(), before);
            }
            Op::Resync => sync.resync(),
        }

        if let Some(FieldValue::List(items)) = sync.field("tags[]") {
            let mut sorted = items.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), items.len());
        }
    }

    sync.destroy();
    for control in &controls {
        assert_eq!(control.listener_count(), 0);
    }
});
