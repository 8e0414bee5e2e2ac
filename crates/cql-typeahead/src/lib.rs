//! Context-sensitive suggestions (typeahead) for CQL queries.
//!
//! Given a parsed query and a caller-supplied registry of field
//! descriptors, the resolver proposes field names for partially-typed chip
//! keys and field values for chip values, each group anchored to the token
//! span it would replace.
//!
//! # Example
//!
//! ```
//! use cql_query::{LexerSettings, parse};
//! use cql_typeahead::{
//!     FieldKind, FieldRegistry, FieldSpec, SuggestionItem, Typeahead, ValueSource,
//! };
//!
//! let registry = FieldRegistry::new().with(FieldSpec {
//!     id: "tag".into(),
//!     label: "Tag".into(),
//!     description: "filter by tag".into(),
//!     kind: FieldKind::Text,
//!     source: ValueSource::Static(vec![SuggestionItem::plain("news")]),
//! });
//!
//! let typeahead = Typeahead::new(registry);
//! let ast = parse("+tag:", &LexerSettings::full()).ast.unwrap();
//! let groups = typeahead.suggest(&ast).unwrap();
//! assert_eq!(groups.len(), 2);
//! ```

#![warn(missing_docs)]

mod cancel;
mod registry;
mod resolver;

pub use cancel::CancelToken;
pub use registry::{
    FieldKind, FieldRegistry, FieldSpec, ResolveError, SuggestionItem, ValueResolver, ValueSource,
};
pub use resolver::{SuggestionGroup, SuggestionPosition, Typeahead};
