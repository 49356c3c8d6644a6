//! Field-keyed collection of validation failure messages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from field name to the messages reported for it.
///
/// Fields keep the order in which their first message was added, and
/// messages keep insertion order within a field. A field is only present
/// while it has at least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag {
    messages: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Append several messages to `field`. An empty list leaves the bag untouched.
    pub fn extend_field(&mut self, field: impl Into<String>, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.messages
            .entry(field.into())
            .or_default()
            .extend(messages);
    }

    /// Merge every entry of `other` into this bag, preserving order.
    pub fn merge(&mut self, other: ErrorBag) {
        for (field, messages) in other.messages {
            self.extend_field(field, messages);
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    /// Messages recorded for `field`, empty if it passed.
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Every message across all fields, in field order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.messages.values().flatten().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Total number of messages across all fields.
    pub fn count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// One-line description: the first message, plus how many others follow.
    pub fn summary(&self) -> String {
        let Some(first) = self.all().next() else {
            return "The given data was valid.".to_string();
        };
        match self.count() - 1 {
            0 => first.to_string(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl IntoIterator for ErrorBag {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ErrorBag::new();
        for (field, message) in iter {
            bag.add(field, message);
        }
        bag
    }
}
