#![forbid(unsafe_code)]

//! Synchronizer policy.
//!
//! [`SyncConfig`] collects the knobs that change observable behavior:
//!
//! | Knob | Default | Effect |
//! |------|---------|--------|
//! | `watch` | none | Fields whose change fires the primary callback |
//! | `events` | `input-and-change` | Which control events trigger an update |
//! | `radio` | `group` | How a radio group's value is derived |
//! | `unnamed` | `skip` | What to do with controls that have no name |
//!
//! With the `policy-config` feature the same policy can be loaded from TOML
//! or JSON:
//!
//! ```toml
//! watch = ["subscribe", "email"]
//! events = "change-only"
//! radio = "group"
//! unnamed = "reject"
//! ```

use formsync_core::{ControlEvent, RadioResolution, WatchSet};

#[cfg(feature = "policy-config")]
use formsync_core::SyncError;
#[cfg(feature = "policy-config")]
use std::path::Path;

/// Which interaction events a bound control listens to.
///
/// Binding both events means one logical edit can run the update twice. The
/// second run is silent when the first already captured the value; bind only
/// [`ControlEvent::Change`] to rule out double notification entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum EventBinding {
    /// Update on every edit and on commit.
    #[default]
    InputAndChange,
    /// Update on commit only.
    ChangeOnly,
    /// Update on every edit only.
    InputOnly,
}

impl EventBinding {
    /// The events to attach listeners for.
    #[must_use]
    pub const fn events(self) -> &'static [ControlEvent] {
        match self {
            Self::InputAndChange => &ControlEvent::ALL,
            Self::ChangeOnly => &[ControlEvent::Change],
            Self::InputOnly => &[ControlEvent::Input],
        }
    }
}

/// Policy for controls whose name is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum UnnamedControls {
    /// Leave them unbound and log a warning.
    #[default]
    Skip,
    /// Bind them; their value lands under the empty key.
    Keep,
    /// Fail construction.
    Reject,
}

/// Synchronizer configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields, rename_all = "kebab-case")
)]
pub struct SyncConfig {
    /// Fields whose change fires the primary callback. `None` watches all.
    pub watch: Option<WatchSet>,
    pub events: EventBinding,
    pub radio: RadioResolution,
    pub unnamed: UnnamedControls,
}

impl SyncConfig {
    /// Default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch the given fields.
    #[must_use]
    pub fn watch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.watch = Some(WatchSet::new(fields));
        self
    }

    /// Use an existing watch set (or none).
    #[must_use]
    pub fn watch_set(mut self, watch: Option<WatchSet>) -> Self {
        self.watch = watch;
        self
    }

    #[must_use]
    pub fn events(mut self, events: EventBinding) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn radio(mut self, radio: RadioResolution) -> Self {
        self.radio = radio;
        self
    }

    #[must_use]
    pub fn unnamed(mut self, unnamed: UnnamedControls) -> Self {
        self.unnamed = unnamed;
        self
    }

    /// Parse a TOML policy document.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(src: &str) -> Result<Self, SyncError> {
        toml::from_str(src).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Parse a JSON policy document.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(src: &str) -> Result<Self, SyncError> {
        serde_json::from_str(src).map_err(|e| SyncError::Config(e.to_string()))
    }

    /// Load a policy file, choosing the format by extension
    /// (`.toml` or `.json`).
    #[cfg(feature = "policy-config")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&src),
            Some("json") => Self::from_json_str(&src),
            other => Err(SyncError::Config(format!(
                "unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}
