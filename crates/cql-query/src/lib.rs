//! Lexer, parser, and AST for the CQL query language.
//!
//! CQL is a small structured-search language:
//!
//! - **Free text**: `marina` — bare words and `"quoted phrases"`
//! - **Boolean operators**: `a AND b`, `a OR b` (adjacency implies `OR`)
//! - **Groups**: `(a OR b) c`
//! - **Chips**: `+section:commentisfree`, `-tag:sport` — required or
//!   excluded `field:value` terms
//! - **Negation**: `-deprecated`
//!
//! # Example
//!
//! ```
//! use cql_query::{LexerSettings, parse};
//!
//! let outcome = parse("marina +section:commentisfree", &LexerSettings::full());
//! let ast = outcome.ast.unwrap();
//! assert_eq!(ast.fields()[0].name(), "section");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod token;

pub use ast::{Binary, BinaryRight, Expr, ExprContent, Field, Group, Operator, Query, StrNode};
pub use error::{LexError, ParseError, ParseErrorKind, QueryError};
pub use lexer::{LexerSettings, ScanOutcome, scan};
pub use parser::{ParseOutcome, parse, parse_tokens};
pub use token::{Polarity, Token, TokenKind};
