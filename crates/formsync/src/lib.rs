#![forbid(unsafe_code)]

//! formsync keeps a field map and the input controls of a container in sync,
//! in both directions, and tells you when a field you care about changes.
//!
//! ```ignore
//! use formsync::prelude::*;
//!
//! let sync = StateSynchronizer::new(
//!     &form,
//!     |prev, next| println!("subscribe: {:?} -> {:?}", prev.get("subscribe"), next.get("subscribe")),
//!     Some(WatchSet::new(["subscribe"])),
//! );
//!
//! sync.set_state(State::new().with("name", "Al"));
//! ```

pub use formsync_core::{
    Control, ControlEvent, ControlKind, ControlSource, FieldValue, InputType, Listener,
    RadioResolution, State, SyncError, Verdict, WatchSet,
};
pub use formsync_runtime::{
    BindingScope, EventBinding, StateSynchronizer, Subscription, SyncBuilder, SyncConfig,
    UnnamedControls,
};

/// Everything needed to bind a form.
pub mod prelude {
    pub use formsync_core::{
        Control, ControlEvent, ControlSource, FieldValue, InputType, Listener, State, WatchSet,
    };
    pub use formsync_runtime::{
        EventBinding, RadioResolution, StateSynchronizer, Subscription, SyncBuilder, SyncConfig,
        UnnamedControls,
    };
}
