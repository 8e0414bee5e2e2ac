//! AST-to-string renderers for CQL.
//!
//! Two independent, pure renderers over the same AST:
//!
//! - [`normalize`] — canonical CQL text, with quoting reapplied and
//!   operators written out.
//! - [`to_backend_query`] — a flat, form-urlencoded `key=value&…` string
//!   for search-backend consumption, with relative dates resolved.
//!
//! # Example
//!
//! ```
//! use cql_compile::to_backend_query;
//! use cql_query::{LexerSettings, parse};
//!
//! let ast = parse("marina +section:commentisfree", &LexerSettings::full())
//!     .ast
//!     .unwrap();
//! assert_eq!(
//!     to_backend_query(&ast).unwrap(),
//!     "q=marina&section=commentisfree"
//! );
//! ```

#![warn(missing_docs)]

mod backend;
mod dates;
mod error;
mod normalize;

pub use backend::{to_backend_query, to_backend_query_at};
pub use error::CompileError;
pub use normalize::normalize;
