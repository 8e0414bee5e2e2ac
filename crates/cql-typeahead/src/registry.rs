//! Field descriptors supplied by the caller.
//!
//! The core ships no built-in fields: whoever embeds the engine registers
//! the fields its backend understands, each with a value kind and a way to
//! resolve value suggestions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cancel::CancelToken;

/// What kind of value a field takes. Drives value-suggestion dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free-form text, resolved from the field's [`ValueSource`].
    Text,
    /// An ISO or relative date, suggested from a fixed relative ladder.
    Date,
}

/// One proposed completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Human-readable label shown in the suggestion list.
    pub label: String,
    /// The text inserted when the suggestion is accepted.
    pub value: String,
    /// Optional longer description.
    pub description: Option<String>,
}

impl SuggestionItem {
    /// Creates an item whose label and value differ.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    /// Creates an item whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            description: None,
        }
    }
}

/// A failure from value resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The resolution was cancelled. Never surfaced to `suggest` callers;
    /// a cancelled resolution settles as "no suggestions".
    #[error("suggestion resolution was cancelled")]
    Cancelled,
    /// A caller-supplied resolver failed. Propagates unchanged.
    #[error("{0}")]
    Failed(String),
}

/// A caller-supplied value lookup: given the partial value typed so far and
/// a cancellation token, produce candidate items.
pub type ValueResolver =
    Box<dyn Fn(&str, &CancelToken) -> Result<Vec<SuggestionItem>, ResolveError> + Send + Sync>;

/// Where a text field's value suggestions come from.
pub enum ValueSource {
    /// A fixed list, filtered against the partial value.
    Static(Vec<SuggestionItem>),
    /// An injected lookup function (typically backed by a remote search).
    Dynamic(ValueResolver),
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(items) => f.debug_tuple("Static").field(&items.len()).finish(),
            Self::Dynamic(_) => f.debug_tuple("Dynamic").finish(),
        }
    }
}

/// A field the query language knows about.
#[derive(Debug)]
pub struct FieldSpec {
    /// The field id as written in queries (`tag` in `+tag:news`).
    pub id: String,
    /// Display label for the suggestion list.
    pub label: String,
    /// Short description of what the field matches.
    pub description: String,
    /// What kind of value the field takes.
    pub kind: FieldKind,
    /// Value suggestion source. Ignored for `Date` fields.
    pub source: ValueSource,
}

/// An ordered collection of field specs. Registration order breaks ranking
/// ties, so it is preserved.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    /// Specs in registration order.
    fields: Vec<FieldSpec>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Adds a field.
    pub fn register(&mut self, spec: FieldSpec) {
        self.fields.push(spec);
    }

    /// Iterates specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Looks up a field by exact id.
    pub fn get(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
