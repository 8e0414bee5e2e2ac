//! The suggestion resolver.
//!
//! Walks a parsed query's chips in source order and produces ranked,
//! anchored suggestion groups for each. At most one resolution is in flight
//! per [`Typeahead`] instance: starting a new one cancels the previous
//! token, and a cancelled resolution settles with whatever was gathered so
//! far rather than erroring.

use std::sync::Mutex;

use cql_query::{Field, Query};
use serde::{Deserialize, Serialize};

use crate::{
    cancel::CancelToken,
    registry::{FieldKind, FieldRegistry, FieldSpec, ResolveError, SuggestionItem, ValueSource},
};

/// The fixed ladder of relative-date value suggestions, offered for `Date`
/// fields regardless of what has been typed.
const DATE_LADDER: [(&str, &str); 5] = [
    ("1 day ago", "-1d"),
    ("3 days ago", "-3d"),
    ("1 week ago", "-1w"),
    ("2 weeks ago", "-2w"),
    ("1 month ago", "-30d"),
];

/// Whether a group completes a field key or a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionPosition {
    /// Completing the field name.
    Key,
    /// Completing the field value.
    Value,
}

/// A set of suggestions anchored to a span of the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionGroup {
    /// Character offset of the first character the suggestions replace.
    pub start: usize,
    /// Character offset of the last character (inclusive). Equal to `start`
    /// for a zero-width anchor (an empty value position).
    pub end: usize,
    /// What the group completes.
    pub position: SuggestionPosition,
    /// Text to insert after an accepted suggestion when accepting at the
    /// trailing edge of the query: `:` after a key, a space after a value.
    pub suffix: &'static str,
    /// Ranked candidate completions.
    pub items: Vec<SuggestionItem>,
}

/// Context-sensitive suggestion resolver over a field registry.
pub struct Typeahead {
    /// The caller-supplied fields.
    registry: FieldRegistry,
    /// The single in-flight resolution slot.
    current: Mutex<Option<CancelToken>>,
}

impl Typeahead {
    /// Creates a resolver over the given registry.
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            current: Mutex::new(None),
        }
    }

    /// Cancels the in-flight resolution, if any.
    pub fn cancel(&self) {
        if let Ok(slot) = self.current.lock()
            && let Some(token) = slot.as_ref()
        {
            token.cancel();
        }
    }

    /// Produces suggestion groups for every chip in the query, in source
    /// order: a key group per chip, plus a value group when the key matches
    /// a registered field.
    ///
    /// Starting a new call cancels the previous one. A cancelled call
    /// settles with the groups gathered so far; only a failure from a
    /// caller-supplied resolver is an error.
    pub fn suggest(&self, query: &Query) -> Result<Vec<SuggestionGroup>, ResolveError> {
        let token = self.begin();

        let mut groups = Vec::new();
        for field in query.fields() {
            if token.is_cancelled() {
                return Ok(groups);
            }

            groups.push(self.key_group(field));

            if let Some(spec) = self.registry.get(field.name()) {
                groups.push(self.value_group(field, spec, &token)?);
            }
        }
        Ok(groups)
    }

    /// Installs a fresh token in the in-flight slot, cancelling the
    /// previous one.
    fn begin(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Ok(mut slot) = self.current.lock() {
            if let Some(previous) = slot.replace(token.clone()) {
                previous.cancel();
            }
        }
        token
    }

    /// Builds the key-completion group for a chip.
    fn key_group(&self, field: &Field) -> SuggestionGroup {
        let partial = field.name();
        let mut ranked: Vec<(usize, usize, SuggestionItem)> = Vec::new();
        for (order, spec) in self.registry.iter().enumerate() {
            if let Some(rank) = match_rank(partial, &[&spec.id, &spec.label]) {
                let mut item = SuggestionItem::new(spec.label.clone(), spec.id.clone());
                item.description = Some(spec.description.clone());
                ranked.push((rank, order, item));
            }
        }
        ranked.sort_by_key(|(rank, order, _)| (*rank, *order));

        SuggestionGroup {
            start: field.key.start,
            end: field.key.end,
            position: SuggestionPosition::Key,
            suffix: ":",
            items: ranked.into_iter().map(|(_, _, item)| item).collect(),
        }
    }

    /// Builds the value-completion group for a chip whose key matched a
    /// registered field.
    fn value_group(
        &self,
        field: &Field,
        spec: &FieldSpec,
        token: &CancelToken,
    ) -> Result<SuggestionGroup, ResolveError> {
        let partial = field.value_text().unwrap_or("");

        let items = match spec.kind {
            FieldKind::Date => DATE_LADDER
                .iter()
                .map(|(label, value)| SuggestionItem::new(*label, *value))
                .collect(),
            FieldKind::Text => match &spec.source {
                ValueSource::Static(candidates) => filter_static(partial, candidates),
                ValueSource::Dynamic(resolve) => match resolve(partial, token) {
                    Ok(items) => items,
                    Err(ResolveError::Cancelled) => Vec::new(),
                    Err(other) => return Err(other),
                },
            },
        };

        let (start, end) = match &field.value {
            Some(value) => (value.start, value.end),
            // No value yet: anchor at the caret slot just after the colon.
            None => (field.key.end + 1, field.key.end + 1),
        };

        Ok(SuggestionGroup {
            start,
            end,
            position: SuggestionPosition::Value,
            suffix: " ",
            items,
        })
    }
}

/// Filters a static candidate list against the partial value, ranked like
/// key matches.
fn filter_static(partial: &str, candidates: &[SuggestionItem]) -> Vec<SuggestionItem> {
    let mut ranked: Vec<(usize, usize, SuggestionItem)> = Vec::new();
    for (order, item) in candidates.iter().enumerate() {
        if let Some(rank) = match_rank(partial, &[&item.value, &item.label]) {
            ranked.push((rank, order, item.clone()));
        }
    }
    ranked.sort_by_key(|(rank, order, _)| (*rank, *order));
    ranked.into_iter().map(|(_, _, item)| item).collect()
}

/// Case-insensitive substring match of `partial` against any candidate
/// string: rank 0 for a prefix match, 1 for an interior match, `None` for
/// no match.
fn match_rank(partial: &str, candidates: &[&str]) -> Option<usize> {
    let needle = partial.to_lowercase();
    let mut best: Option<usize> = None;
    for candidate in candidates {
        let haystack = candidate.to_lowercase();
        let rank = if haystack.starts_with(&needle) {
            Some(0)
        } else if haystack.contains(&needle) {
            Some(1)
        } else {
            None
        };
        best = match (best, rank) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use cql_query::{LexerSettings, parse};

    use super::*;

    fn query(input: &str) -> Query {
        parse(input, &LexerSettings::full()).ast.unwrap()
    }

    fn text_field(id: &str, label: &str, values: &[&str]) -> FieldSpec {
        FieldSpec {
            id: id.into(),
            label: label.into(),
            description: format!("search by {id}"),
            kind: FieldKind::Text,
            source: ValueSource::Static(values.iter().copied().map(SuggestionItem::plain).collect()),
        }
    }

    fn date_field(id: &str) -> FieldSpec {
        FieldSpec {
            id: id.into(),
            label: id.into(),
            description: String::new(),
            kind: FieldKind::Date,
            source: ValueSource::Static(vec![]),
        }
    }

    fn sample_registry() -> FieldRegistry {
        FieldRegistry::new()
            .with(text_field("tag", "Tag", &["news", "sport", "politics"]))
            .with(text_field("section", "Section", &["commentisfree"]))
            .with(date_field("from-date"))
    }

    #[test]
    fn no_chips_no_groups() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("plain text")).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn known_key_yields_key_and_value_groups() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+tag:")).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].position, SuggestionPosition::Key);
        assert_eq!(groups[1].position, SuggestionPosition::Value);
    }

    #[test]
    fn key_group_is_anchored_to_the_key_token() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+tag:")).unwrap();
        // "+tag:" spans characters 0..=4.
        assert_eq!(groups[0].start, 0);
        assert_eq!(groups[0].end, 4);
        assert_eq!(groups[0].suffix, ":");
    }

    #[test]
    fn empty_value_anchor_sits_after_the_colon() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+tag:")).unwrap();
        assert_eq!(groups[1].start, 5);
        assert_eq!(groups[1].end, 5);
        assert_eq!(groups[1].suffix, " ");
    }

    #[test]
    fn value_anchor_covers_the_value_token() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+tag:spo")).unwrap();
        assert_eq!(groups[1].start, 5);
        assert_eq!(groups[1].end, 7);
    }

    #[test]
    fn partial_key_filters_the_registry() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+se")).unwrap();
        assert_eq!(groups.len(), 1); // no exact field match, so no value group
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(ids, vec!["section"]);
    }

    #[test]
    fn key_matching_is_case_insensitive_over_id_and_label() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+TAG")).unwrap();
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(ids, vec!["tag"]);
    }

    #[test]
    fn prefix_matches_rank_before_interior_matches() {
        let registry = FieldRegistry::new()
            .with(text_field("late", "Late", &[]))
            .with(text_field("at", "At", &[]));
        let typeahead = Typeahead::new(registry);
        let groups = typeahead.suggest(&query("+at")).unwrap();
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.value.as_str()).collect();
        // "at" is a prefix of "at" but interior in "late".
        assert_eq!(ids, vec!["at", "late"]);
    }

    #[test]
    fn empty_partial_lists_all_fields_in_registry_order() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+")).unwrap();
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(ids, vec!["tag", "section", "from-date"]);
    }

    #[test]
    fn static_values_filter_against_partial() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+tag:po")).unwrap();
        let values: Vec<&str> = groups[1].items.iter().map(|i| i.value.as_str()).collect();
        // prefix match first, then interior ("sport" contains "po").
        assert_eq!(values, vec!["politics", "sport"]);
    }

    #[test]
    fn date_fields_get_the_ladder_regardless_of_text() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead.suggest(&query("+from-date:xyz")).unwrap();
        let values: Vec<&str> = groups[1].items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["-1d", "-3d", "-1w", "-2w", "-30d"]);
    }

    #[test]
    fn dynamic_resolver_receives_the_partial_value() {
        let seen = Arc::new(StdMutex::new(Vec::<String>::new()));
        let seen_inner = Arc::clone(&seen);
        let registry = FieldRegistry::new().with(FieldSpec {
            id: "tag".into(),
            label: "Tag".into(),
            description: String::new(),
            kind: FieldKind::Text,
            source: ValueSource::Dynamic(Box::new(move |partial, _token| {
                seen_inner.lock().unwrap().push(partial.to_string());
                Ok(vec![SuggestionItem::plain(format!("{partial}-match"))])
            })),
        });

        let typeahead = Typeahead::new(registry);
        let groups = typeahead.suggest(&query("+tag:new")).unwrap();
        assert_eq!(groups[1].items[0].value, "new-match");
        assert_eq!(seen.lock().unwrap().as_slice(), ["new"]);
    }

    #[test]
    fn cancelled_dynamic_resolution_settles_empty() {
        let registry = FieldRegistry::new().with(FieldSpec {
            id: "tag".into(),
            label: "Tag".into(),
            description: String::new(),
            kind: FieldKind::Text,
            source: ValueSource::Dynamic(Box::new(|_, token| {
                token.cancel();
                Err(ResolveError::Cancelled)
            })),
        });

        let typeahead = Typeahead::new(registry);
        let groups = typeahead.suggest(&query("+tag:x")).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[1].items.is_empty());
    }

    #[test]
    fn resolver_failure_propagates() {
        let registry = FieldRegistry::new().with(FieldSpec {
            id: "tag".into(),
            label: "Tag".into(),
            description: String::new(),
            kind: FieldKind::Text,
            source: ValueSource::Dynamic(Box::new(|_, _| {
                Err(ResolveError::Failed("backend unreachable".into()))
            })),
        });

        let typeahead = Typeahead::new(registry);
        let err = typeahead.suggest(&query("+tag:x")).unwrap_err();
        assert_eq!(err, ResolveError::Failed("backend unreachable".into()));
    }

    #[test]
    fn new_suggest_cancels_the_previous_token() {
        let tokens = Arc::new(StdMutex::new(Vec::<CancelToken>::new()));
        let tokens_inner = Arc::clone(&tokens);
        let registry = FieldRegistry::new().with(FieldSpec {
            id: "tag".into(),
            label: "Tag".into(),
            description: String::new(),
            kind: FieldKind::Text,
            source: ValueSource::Dynamic(Box::new(move |_, token| {
                tokens_inner.lock().unwrap().push(token.clone());
                Ok(vec![])
            })),
        });

        let typeahead = Typeahead::new(registry);
        let q = query("+tag:x");
        typeahead.suggest(&q).unwrap();
        typeahead.suggest(&q).unwrap();

        let tokens = tokens.lock().unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_cancelled());
        assert!(!tokens[1].is_cancelled());
    }

    #[test]
    fn explicit_cancel_stops_the_walk() {
        let typeahead = Typeahead::new(sample_registry());
        typeahead.suggest(&query("+tag:x")).unwrap();
        typeahead.cancel();
        // Cancelling only affects the in-flight slot; the next call gets a
        // fresh token and resolves normally.
        let groups = typeahead.suggest(&query("+tag:x")).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn groups_follow_source_order_across_chips() {
        let typeahead = Typeahead::new(sample_registry());
        let groups = typeahead
            .suggest(&query("+tag:news +section:commentisfree"))
            .unwrap();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].start, 0);
        assert!(groups[2].start > groups[0].start);
    }
}
