#![forbid(unsafe_code)]

//! Snapshot diffing and watch-set gating.
//!
//! A mutation produces a `(previous, next)` pair of states. [`evaluate`]
//! decides whether that pair is worth reporting to a listener:
//!
//! 1. Equal states are never reported ([`Verdict::Unchanged`]).
//! 2. With a [`WatchSet`], the pair is reported only if some watched field
//!    differs; a field present on one side only counts as different
//!    ([`Verdict::Unwatched`] otherwise).
//! 3. Without a watch set every real change is reported.
//!
//! State equality is value equality over an ordered map, which is the same
//! relation as comparing canonical serializations.

use std::collections::BTreeSet;

use crate::value::State;

/// Field names whose changes are of interest to a listener.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct WatchSet {
    fields: Vec<String>,
}

impl WatchSet {
    /// Build a watch set. Duplicate names are dropped, first occurrence kept.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !out.contains(&field) {
                out.push(field);
            }
        }
        Self { fields: out }
    }

    /// Watched names, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any watched field differs between `prev` and `next`.
    #[must_use]
    pub fn any_changed(&self, prev: &State, next: &State) -> bool {
        self.fields
            .iter()
            .any(|field| prev.get(field) != next.get(field))
    }
}

impl From<Vec<String>> for WatchSet {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<WatchSet> for Vec<String> {
    fn from(watch: WatchSet) -> Self {
        watch.fields
    }
}

impl<S: Into<String>> FromIterator<S> for WatchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Outcome of comparing two snapshots for one listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Report the change.
    Notify,
    /// The snapshots are equal.
    Unchanged,
    /// Something changed, but nothing the watch set names.
    Unwatched,
}

impl Verdict {
    #[must_use]
    pub const fn should_notify(self) -> bool {
        matches!(self, Self::Notify)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notify => "notify",
            Self::Unchanged => "unchanged",
            Self::Unwatched => "unwatched",
        }
    }
}

/// Decide whether a `(prev, next)` pair should be reported.
#[must_use]
pub fn evaluate(prev: &State, next: &State, watch: Option<&WatchSet>) -> Verdict {
    if prev == next {
        return Verdict::Unchanged;
    }
    match watch {
        Some(watch) if !watch.any_changed(prev, next) => Verdict::Unwatched,
        _ => Verdict::Notify,
    }
}

/// Names of the fields whose values differ, in key order.
#[must_use]
pub fn changed_fields<'a>(prev: &'a State, next: &'a State) -> Vec<&'a str> {
    let names: BTreeSet<&str> = prev.names().chain(next.names()).collect();
    names
        .into_iter()
        .filter(|name| prev.get(name) != next.get(name))
        .collect()
}
