//! The CQL structured-search engine.
//!
//! CQL is a small query language for search boxes that mix free text with
//! structured `field:value` chips:
//!
//! ```text
//! marina +section:commentisfree -tag:sport (a OR b)
//! ```
//!
//! This crate re-exports the whole engine surface:
//!
//! - [`parse`] — lexer and parser, producing tokens, an AST, and a
//!   positioned error when the input is malformed.
//! - [`normalize`] and [`to_backend_query`] — pure AST renderers: back to
//!   canonical CQL text, or to a flat `key=value&…` backend string.
//! - [`Typeahead`] — context-sensitive key and value suggestions over a
//!   caller-supplied [`FieldRegistry`], with single-in-flight
//!   cancellation.
//! - [`build_document`], [`build_mapping`], and [`diff`] — the structural
//!   document model an editing surface renders, the offset translation
//!   into it, and minimal-range diffing between two of them.
//!
//! # Example
//!
//! ```
//! use cql::{LexerSettings, parse, to_backend_query};
//!
//! let outcome = parse("marina +section:commentisfree", &LexerSettings::full());
//! let ast = outcome.ast.unwrap();
//! assert_eq!(
//!     to_backend_query(&ast).unwrap(),
//!     "q=marina&section=commentisfree"
//! );
//! ```

#![warn(missing_docs)]

pub use cql_compile::{CompileError, normalize, to_backend_query, to_backend_query_at};
pub use cql_document::{
    EditRange, Mapping, StructuralDocument, StructuralNode, build_document, build_mapping, diff,
};
pub use cql_query::{
    Binary, BinaryRight, Expr, ExprContent, Field, Group, LexError, LexerSettings, Operator,
    ParseError, ParseErrorKind, ParseOutcome, Polarity, Query, QueryError, ScanOutcome, StrNode,
    Token, TokenKind, parse, parse_tokens, scan,
};
pub use cql_typeahead::{
    CancelToken, FieldKind, FieldRegistry, FieldSpec, ResolveError, SuggestionGroup,
    SuggestionItem, SuggestionPosition, Typeahead, ValueResolver, ValueSource,
};
