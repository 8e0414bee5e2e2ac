//! Query abstract syntax tree.
//!
//! The AST is rebuilt on every parse and read-only once constructed. Leaf
//! nodes keep the tokens they were built from so downstream consumers (the
//! typeahead resolver, the structural mapper) can anchor to source offsets.

use std::fmt;

use crate::token::{Polarity, Token};

/// The boolean operator linking two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Both sides must match.
    And,
    /// Either side may match. Also the implied operator between two
    /// adjacent expressions with nothing written between them.
    Or,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// The root of a parsed query. `content` is `None` only for empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The query body, absent for an empty (or whitespace-only) query.
    pub content: Option<Binary>,
}

/// A right-associative chain of expressions joined by operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    /// The leftmost expression of the chain.
    pub left: Expr,
    /// The rest of the chain, if any.
    pub right: Option<BinaryRight>,
}

/// The operator and remainder of a [`Binary`] chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRight {
    /// The linking operator. An implicit link (no keyword written) is `Or`.
    pub operator: Operator,
    /// The remainder of the chain.
    pub binary: Box<Binary>,
}

/// A single expression with its polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// What the expression contains.
    pub content: ExprContent,
    /// `Negative` when a leading `-` was consumed, `Positive` otherwise.
    pub polarity: Polarity,
}

/// The payload of an [`Expr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprContent {
    /// A bare or quoted search phrase.
    Str(StrNode),
    /// A parenthesised sub-expression.
    Group(Group),
    /// A `field:value` term.
    Field(Field),
}

/// A parenthesised sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The bracketed chain.
    pub content: Box<Binary>,
}

/// A free-text search phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrNode {
    /// The originating token, kept for offset anchoring.
    pub token: Token,
    /// The phrase content (unquoted, unescaped, trimmed).
    pub text: String,
}

/// A `field:value` term. A missing value is not a parse error: it means the
/// user is still typing, and the compiler/typeahead treat it as "awaiting a
/// value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The chip key token; its literal is the field name and its kind
    /// carries the polarity.
    pub key: Token,
    /// The chip value token, if one was written.
    pub value: Option<Token>,
}

impl Query {
    /// An empty query.
    pub fn empty() -> Self {
        Self { content: None }
    }

    /// Iterates over every [`Field`] in the query in source order.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        if let Some(binary) = &self.content {
            collect_fields(binary, &mut fields);
        }
        fields
    }
}

impl Field {
    /// The field name as typed so far.
    pub fn name(&self) -> &str {
        self.key.literal_str()
    }

    /// The chip polarity from the key token.
    pub fn polarity(&self) -> Polarity {
        self.key.chip_polarity().unwrap_or(Polarity::Positive)
    }

    /// The value text, if a value token is present.
    pub fn value_text(&self) -> Option<&str> {
        self.value.as_ref().map(Token::literal_str)
    }
}

/// Walks a binary chain depth-first, pushing fields in source order.
fn collect_fields<'a>(binary: &'a Binary, out: &mut Vec<&'a Field>) {
    match &binary.left.content {
        ExprContent::Field(field) => out.push(field),
        ExprContent::Group(group) => collect_fields(&group.content, out),
        ExprContent::Str(_) => {}
    }
    if let Some(right) = &binary.right {
        collect_fields(&right.binary, out);
    }
}
