#![forbid(unsafe_code)]

//! Test harness for formsync.
//!
//! - [`FakeControl`] / [`FakeForm`]: an in-memory control source with
//!   browser-like click and typing simulation.
//! - [`ChangeLog`]: records change-callback invocations.
//! - [`strategies`]: proptest strategies for random forms and sessions.
//!
//! This crate depends only on `formsync-core`, so it can serve as a
//! dev-dependency of every other formsync crate.

pub mod control;
pub mod form;
pub mod recorder;
pub mod strategies;

pub use control::FakeControl;
pub use form::FakeForm;
pub use recorder::ChangeLog;
