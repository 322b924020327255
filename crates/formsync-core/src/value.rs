#![forbid(unsafe_code)]

//! Canonical field values and the field map they live in.
//!
//! Every control in a form reduces to one of three canonical shapes:
//!
//! | Control | Canonical value |
//! |---------|-----------------|
//! | text, select, textarea, radio group | [`FieldValue::Text`] |
//! | single checkbox | [`FieldValue::Flag`] |
//! | checkbox list (`name[]`) | [`FieldValue::List`] |
//!
//! A [`State`] maps field names to those values. It is a plain value type;
//! the runtime keeps it behind an `Rc` and replaces it wholesale on every
//! mutation, so a snapshot taken before a change never observes the change.
//!
//! # Coercions
//!
//! Values written through an external merge are not type-checked against the
//! controls that will display them. When a control reads a value of the
//! "wrong" shape the following rules apply:
//!
//! | Read as | `Text(s)` | `Flag(b)` | `List(v)` |
//! |---------|-----------|-----------|-----------|
//! | text | `s` | `"true"` / `"false"` | comma-joined |
//! | flag | `!s.is_empty()` | `b` | `!v.is_empty()` |
//! | list | `[s]` (empty if `s` empty) | `[]` | `v` |

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A canonical state value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    /// Plain text (text inputs, selects, textareas, radio groups).
    Text(String),
    /// A single checkbox.
    Flag(bool),
    /// Checked values of a checkbox list, first-seen order, no duplicates.
    List(Vec<String>),
}

impl FieldValue {
    /// The empty text value.
    #[must_use]
    pub const fn empty_text() -> Self {
        Self::Text(String::new())
    }

    /// Read this value as text.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Flag(true) => Cow::Borrowed("true"),
            Self::Flag(false) => Cow::Borrowed("false"),
            Self::List(items) => Cow::Owned(items.join(",")),
        }
    }

    /// Read this value as a checkbox state.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Flag(b) => *b,
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Read this value as a checkbox list.
    #[must_use]
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::Text(s) if s.is_empty() => Vec::new(),
            Self::Text(s) => vec![s.clone()],
            Self::Flag(_) => Vec::new(),
            Self::List(items) => items.clone(),
        }
    }

    /// Whether `value` is a member of this value read as a list.
    #[must_use]
    pub fn list_contains(&self, value: &str) -> bool {
        match self {
            Self::Text(s) => !s.is_empty() && s == value,
            Self::Flag(_) => false,
            Self::List(items) => items.iter().any(|item| item == value),
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::List(_) => "list",
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty_text()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for FieldValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// The field map: field name to canonical value.
///
/// Keys are kept ordered so that equality, `Debug` output and serialized
/// snapshots are canonical regardless of the order controls were processed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct State {
    fields: BTreeMap<String, FieldValue>,
}

impl State {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether a field is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate field names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Shallow merge: a new state holding every field of `self`, overwritten
    /// by every field of `partial`.
    #[must_use]
    pub fn merged(&self, partial: &State) -> State {
        let mut next = self.clone();
        for (name, value) in &partial.fields {
            next.fields.insert(name.clone(), value.clone());
        }
        next
    }

    /// Serialize to the canonical JSON snapshot.
    #[cfg(feature = "state-persistence")]
    pub fn to_json(&self) -> Result<String, crate::SyncError> {
        serde_json::to_string(self).map_err(|e| crate::SyncError::Snapshot(e.to_string()))
    }

    /// Restore from a JSON snapshot produced by [`State::to_json`].
    #[cfg(feature = "state-persistence")]
    pub fn from_json(json: &str) -> Result<Self, crate::SyncError> {
        serde_json::from_str(json).map_err(|e| crate::SyncError::Snapshot(e.to_string()))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> Extend<(K, V)> for State {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.fields.insert(k.into(), v.into());
        }
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_coercions() {
        assert_eq!(FieldValue::from("a").as_text(), "a");
        assert_eq!(FieldValue::Flag(true).as_text(), "true");
        assert_eq!(FieldValue::from(["a", "b"]).as_text(), "a,b");
    }

    #[test]
    fn truthiness() {
        assert!(!FieldValue::empty_text().is_truthy());
        assert!(FieldValue::from("x").is_truthy());
        assert!(!FieldValue::List(Vec::new()).is_truthy());
        assert!(FieldValue::from(["x"]).is_truthy());
    }

    #[test]
    fn list_coercions() {
        assert!(FieldValue::empty_text().to_list().is_empty());
        assert_eq!(FieldValue::from("x").to_list(), vec!["x".to_string()]);
        assert!(FieldValue::Flag(true).to_list().is_empty());
        assert!(FieldValue::from("x").list_contains("x"));
        assert!(!FieldValue::from("xy").list_contains("x"));
        assert!(!FieldValue::empty_text().list_contains(""));
    }

    #[test]
    fn merged_partial_wins_and_keeps_rest() {
        let current = State::new().with("a", "1").with("b", true);
        let partial = State::new().with("b", false).with("c", "3");
        let next = current.merged(&partial);

        assert_eq!(next.get("a"), Some(&FieldValue::from("1")));
        assert_eq!(next.get("b"), Some(&FieldValue::Flag(false)));
        assert_eq!(next.get("c"), Some(&FieldValue::from("3")));
        // The source is untouched.
        assert_eq!(current.get("b"), Some(&FieldValue::Flag(true)));
        assert!(!current.contains("c"));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = State::new().with("x", "1").with("y", "2");
        let b = State::new().with("y", "2").with("x", "1");
        assert_eq!(a, b);
    }

    #[test]
    fn from_iterator_and_extend() {
        let mut state: State = [("a", "1"), ("b", "2")].into_iter().collect();
        state.extend([("c", FieldValue::Flag(true))]);
        assert_eq!(state.len(), 3);
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(FieldValue::from("hi").to_string(), "\"hi\"");
        assert_eq!(FieldValue::Flag(false).to_string(), "false");
        assert_eq!(FieldValue::from(["a"]).to_string(), "[\"a\"]");
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn json_snapshot_shape() {
        let state = State::new()
            .with("name", "Al")
            .with("subscribe", true)
            .with("tags[]", ["a", "c"]);
        let json = state.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"name":"Al","subscribe":true,"tags[]":["a","c"]}"#
        );
        assert_eq!(State::from_json(&json).unwrap(), state);
    }
}
