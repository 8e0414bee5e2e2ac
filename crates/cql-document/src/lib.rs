//! Structural document model for CQL queries.
//!
//! The editing surface renders a query as a sequence of text runs and
//! chips rather than a flat string. This crate owns that shape: building
//! the node sequence from a token stream, translating character offsets
//! into structural positions, and diffing two documents down to the
//! smallest range an edit actually changed.
//!
//! # Example
//!
//! ```
//! use cql_document::{StructuralNode, build_document, build_mapping, diff};
//! use cql_query::{LexerSettings, scan};
//!
//! let tokens = scan("+tag:news", &LexerSettings::full()).tokens;
//! let document = build_document(&tokens);
//! assert!(matches!(document.nodes()[1], StructuralNode::Chip { .. }));
//!
//! let mapping = build_mapping(&tokens);
//! assert_eq!(mapping.map(0), 0);
//!
//! let next = build_document(&scan("+tag:new", &LexerSettings::full()).tokens);
//! assert!(diff(&document, &next).is_some());
//! ```

#![warn(missing_docs)]

mod build;
mod diff;
mod mapping;
mod node;

pub use build::build_document;
pub use diff::{EditRange, diff};
pub use mapping::{Mapping, build_mapping};
pub use node::{StructuralDocument, StructuralNode};
