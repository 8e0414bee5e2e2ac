//! Tokens produced by the query lexer.
//!
//! Offsets are character indices into the source string (not bytes), with
//! `end` inclusive. The token stream always covers the entire input: every
//! character belongs to exactly one token's lexeme, which is what lets the
//! structural mapper translate flat offsets without consulting the source.

use serde::{Deserialize, Serialize};

/// Whether a chip is required (`+`) or excluded (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// The term must match (`+field:value`).
    Positive,
    /// The term must not match (`-field:value`).
    Negative,
}

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// A run of free text: a bare word, a quoted phrase, or pure whitespace
    /// separating other tokens.
    Str,
    /// A required field key (`+name:`), literal holds the name.
    ChipKeyPositive,
    /// An excluded field key (`-name:`), literal holds the name.
    ChipKeyNegative,
    /// A field value immediately following a chip key's colon.
    ChipValue,
    /// A bare `+` that did not form a chip key.
    Plus,
    /// A bare `-` (negation prefix).
    Minus,
    /// `(` when group lexing is enabled.
    LeftBracket,
    /// `)` when group lexing is enabled.
    RightBracket,
    /// The `AND` keyword when operator lexing is enabled.
    And,
    /// The `OR` keyword when operator lexing is enabled.
    Or,
    /// End of input. Always the last token; zero-width.
    Eof,
}

/// A single token with its source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The raw source text covered by this token, whitespace included.
    pub lexeme: String,
    /// The semantic content: unquoted, unescaped, and trimmed of the
    /// whitespace the lexeme absorbed. `None` for punctuation and `Eof`.
    pub literal: Option<String>,
    /// Character index of the first character of the lexeme.
    pub start: usize,
    /// Character index of the last character of the lexeme (inclusive).
    /// For `Eof`, equal to `start`.
    pub end: usize,
}

impl Token {
    /// Creates a token. `end` is derived from the lexeme's character count.
    pub fn new(kind: TokenKind, lexeme: String, literal: Option<String>, start: usize) -> Self {
        let chars = lexeme.chars().count();
        let end = if chars == 0 { start } else { start + chars - 1 };
        Self {
            kind,
            lexeme,
            literal,
            start,
            end,
        }
    }

    /// Creates the zero-width end-of-input token at `position`.
    pub fn eof(position: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            literal: None,
            start: position,
            end: position,
        }
    }

    /// Returns the chip polarity if this token is a chip key.
    pub fn chip_polarity(&self) -> Option<Polarity> {
        match self.kind {
            TokenKind::ChipKeyPositive => Some(Polarity::Positive),
            TokenKind::ChipKeyNegative => Some(Polarity::Negative),
            _ => None,
        }
    }

    /// Returns true if this token is a chip key of either polarity.
    pub fn is_chip_key(&self) -> bool {
        self.chip_polarity().is_some()
    }

    /// Returns the literal content, or an empty string if absent.
    pub fn literal_str(&self) -> &str {
        self.literal.as_deref().unwrap_or("")
    }

    /// Returns true for a `Str` token whose literal is empty (pure
    /// whitespace). These exist so the caret has somewhere to sit; the
    /// parser skips them.
    pub fn is_whitespace_only(&self) -> bool {
        self.kind == TokenKind::Str && self.literal_str().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_inclusive() {
        let token = Token::new(TokenKind::Str, "word".into(), Some("word".into()), 3);
        assert_eq!(token.start, 3);
        assert_eq!(token.end, 6);
    }

    #[test]
    fn end_counts_chars_not_bytes() {
        let token = Token::new(TokenKind::Str, "héllo".into(), Some("héllo".into()), 0);
        assert_eq!(token.end, 4);
    }

    #[test]
    fn eof_is_zero_width() {
        let token = Token::eof(12);
        assert_eq!(token.start, 12);
        assert_eq!(token.end, 12);
        assert_eq!(token.kind, TokenKind::Eof);
    }

    #[test]
    fn chip_polarity() {
        let positive = Token::new(TokenKind::ChipKeyPositive, "+tag:".into(), Some("tag".into()), 0);
        let negative = Token::new(TokenKind::ChipKeyNegative, "-tag:".into(), Some("tag".into()), 0);
        assert_eq!(positive.chip_polarity(), Some(Polarity::Positive));
        assert_eq!(negative.chip_polarity(), Some(Polarity::Negative));
        assert!(positive.is_chip_key());

        let text = Token::new(TokenKind::Str, "tag".into(), Some("tag".into()), 0);
        assert_eq!(text.chip_polarity(), None);
    }

    #[test]
    fn whitespace_only_detection() {
        let spaces = Token::new(TokenKind::Str, "  ".into(), Some(String::new()), 0);
        assert!(spaces.is_whitespace_only());

        let word = Token::new(TokenKind::Str, "a ".into(), Some("a".into()), 0);
        assert!(!word.is_whitespace_only());
    }

    #[test]
    fn serializes_to_json() {
        let token = Token::new(TokenKind::Str, "word".into(), Some("word".into()), 0);
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"kind\":\"Str\""));
        assert!(json.contains("\"start\":0"));
    }
}
