#![forbid(unsafe_code)]

//! Runtime for formsync: binds a [`StateSynchronizer`] to the controls of a
//! container and keeps both sides in sync.
//!
//! - [`synchronizer`]: the synchronizer and its builder.
//! - [`binding`]: listener bookkeeping with identity-exact teardown.
//! - [`subscribers`]: additional watch-set gated change subscribers.
//! - [`config`]: policy knobs, loadable from TOML/JSON with the
//!   `policy-config` feature.
//!
//! # Invariants
//!
//! 1. Execution is single-threaded; nothing here is `Send`.
//! 2. Every operation runs to completion before the triggering event
//!    handler returns.
//! 3. State is copy-on-write: a snapshot never observes later mutations.

pub mod binding;
pub mod config;
pub mod subscribers;
pub mod synchronizer;

pub use binding::BindingScope;
pub use config::{EventBinding, SyncConfig, UnnamedControls};
pub use subscribers::{ChangeCallback, Subscribers, Subscription};
pub use synchronizer::{StateSynchronizer, SyncBuilder};

pub use formsync_core::{
    Control, ControlEvent, ControlKind, ControlSource, FieldValue, InputType, Listener,
    RadioResolution, State, SyncError, WatchSet,
};
