#![forbid(unsafe_code)]

//! Core data model for formsync.
//!
//! - [`value`]: canonical [`FieldValue`]s and the [`State`] field map.
//! - [`control`]: the [`Control`] / [`ControlSource`] traits a UI toolkit
//!   implements, plus [`ControlKind`] classification.
//! - [`codec`]: extraction (control → value) and application
//!   (value → control), dispatched per kind.
//! - [`diff`]: snapshot comparison and [`WatchSet`] gating.
//!
//! Everything here is pure and single-threaded; the binding lifecycle lives
//! in `formsync-runtime`.

pub mod codec;
pub mod control;
pub mod diff;
pub mod error;
pub mod value;

pub use codec::{RadioResolution, apply, apply_value, extract, extract_into, radio_group_value};
pub use control::{
    Control, ControlEvent, ControlKind, ControlSource, InputType, LIST_SUFFIX, Listener,
    is_list_name,
};
pub use diff::{Verdict, WatchSet, changed_fields, evaluate};
pub use error::SyncError;
pub use value::{FieldValue, State};
