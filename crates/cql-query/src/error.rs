//! Error types for query scanning and parsing.
//!
//! All errors are values carried through `Result` (or alongside a token
//! stream, for the non-fatal lex case) — nothing here is used for control
//! flow across module boundaries.

use thiserror::Error;

/// A lexical problem. Non-fatal: scanning always completes and the token
/// stream is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    /// Human-readable description.
    pub message: String,
    /// Character offset in the input where the problem starts.
    pub position: usize,
}

impl LexError {
    /// Creates a new lexical error at the given character offset.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The closed set of parser error shapes.
///
/// The wording of each variant is part of the parser's contract: the editing
/// surface shows these messages verbatim next to a caret marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A token that cannot start or continue an expression.
    #[error("unexpected '{lexeme}'")]
    UnexpectedToken {
        /// The offending token's raw text.
        lexeme: String,
    },

    /// A `)` with no matching `(`.
    #[error("unmatched ')'")]
    UnmatchedBracket,

    /// `()` with nothing inside.
    #[error("brackets must contain an expression")]
    EmptyGroup,

    /// A group that was never closed.
    #[error("missing ')' to close the group")]
    MissingClosingBracket,

    /// `AND`/`OR` with no right operand.
    #[error("'{operator}' needs an expression after it")]
    DanglingOperator {
        /// The operator keyword as written.
        operator: String,
    },

    /// `AND`/`OR` with no left operand.
    #[error("'{operator}' needs an expression before it")]
    LeadingOperator {
        /// The operator keyword as written.
        operator: String,
    },

    /// A `field:value` term inside brackets, where chips are not allowed.
    #[error("the field '{field}' cannot be used inside brackets")]
    FieldInGroup {
        /// The field name, so the message points at the right chip.
        field: String,
    },

    /// A `field:value` term directly after an explicit operator.
    #[error("the field '{field}' cannot follow '{operator}'")]
    FieldAfterOperator {
        /// The field name.
        field: String,
        /// The operator it followed.
        operator: String,
    },

    /// A `:` with no field key before it.
    #[error("a value needs a key before ':'")]
    ValueWithoutKey,

    /// Input ended where an expression was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

/// A parse error with the offending token's start offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// Which of the closed set of errors this is.
    pub kind: ParseErrorKind,
    /// Character offset of the offending token in the input.
    pub position: usize,
}

impl ParseError {
    /// Creates a new parse error at the given character offset.
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Formats the error under the query with a caret at the offset.
    pub fn format_with_context(&self, input: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self));
        result.push_str(&format!("  {input}\n"));
        result.push_str(&format!("  {}^", " ".repeat(self.position)));
        result
    }
}

/// Either kind of problem a combined scan-and-parse can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The lexer reported a problem (scanning still completed).
    #[error("{0}")]
    Lex(#[from] LexError),
    /// The parser rejected the token stream.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl QueryError {
    /// The character offset the problem points at.
    pub fn position(&self) -> usize {
        match self {
            Self::Lex(err) => err.position,
            Self::Parse(err) => err.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_carries_position() {
        let err = QueryError::from(LexError::new("unterminated quoted string", 7));
        assert_eq!(err.position(), 7);
        let err = QueryError::from(ParseError::new(ParseErrorKind::UnmatchedBracket, 2));
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn lex_error_display() {
        let err = LexError::new("unterminated quoted string", 4);
        assert_eq!(err.to_string(), "unterminated quoted string");
        assert_eq!(err.position, 4);
    }

    #[test]
    fn parse_error_messages_name_the_field() {
        let err = ParseError::new(
            ParseErrorKind::FieldInGroup {
                field: "tag".into(),
            },
            3,
        );
        assert_eq!(err.to_string(), "the field 'tag' cannot be used inside brackets");
    }

    #[test]
    fn context_formatting_points_at_offset() {
        let err = ParseError::new(ParseErrorKind::UnmatchedBracket, 5);
        let shown = err.format_with_context("abcde)");
        assert!(shown.contains("unmatched ')'"));
        assert!(shown.ends_with("     ^"));
    }
}
