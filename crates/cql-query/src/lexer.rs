//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. The scan
//! is a single left-to-right pass with no backtracking, and it never fails
//! hard: malformed input (an unterminated quote) is reported through
//! [`ScanOutcome::error`] while a best-effort token is still produced, so
//! callers can show a precise error without losing the token stream.
//!
//! Whitespace is a separator, but it is never dropped: a `Str` token absorbs
//! the whitespace run that follows it (and the run that precedes it when the
//! previous token was not free text), and a run with no text to attach to
//! becomes a whitespace-only `Str` token. Full coverage of the input is an
//! invariant the structural mapper relies on.

use std::collections::HashMap;

use crate::{
    error::LexError,
    token::{Token, TokenKind},
};

/// Controls which pieces of syntax the lexer treats as structural.
#[derive(Debug, Clone, Default)]
pub struct LexerSettings {
    /// Treat `(` and `)` as group brackets rather than literal characters.
    pub groups: bool,
    /// Treat `AND` and `OR` as keywords rather than literal words.
    pub operators: bool,
    /// Single reserved characters that expand to a field key, e.g. `#` → `tag`.
    pub shortcuts: HashMap<char, String>,
}

impl LexerSettings {
    /// Settings with groups and operators enabled and no shortcuts.
    pub fn full() -> Self {
        Self {
            groups: true,
            operators: true,
            shortcuts: HashMap::new(),
        }
    }
}

/// The result of scanning a query string.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// All tokens in source order, terminated by `Eof`.
    pub tokens: Vec<Token>,
    /// The first lexical problem encountered, if any. Non-fatal.
    pub error: Option<LexError>,
}

/// Tokenizes a query string.
struct Scanner<'a> {
    /// The input as characters, since token offsets are character indices.
    chars: Vec<char>,
    /// Lexer configuration.
    settings: &'a LexerSettings,
    /// Current character position.
    pos: usize,
    /// Tokens produced so far.
    tokens: Vec<Token>,
    /// First lexical error, if any.
    error: Option<LexError>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given input.
    fn new(input: &str, settings: &'a LexerSettings) -> Self {
        Self {
            chars: input.chars().collect(),
            settings,
            pos: 0,
            tokens: Vec::new(),
            error: None,
        }
    }

    /// Scans the entire input.
    fn scan(mut self) -> ScanOutcome {
        while self.pos < self.chars.len() {
            self.next_token();
        }
        self.tokens.push(Token::eof(self.chars.len()));
        ScanOutcome {
            tokens: self.tokens,
            error: self.error,
        }
    }

    /// Records a lexical error, keeping only the first.
    fn report(&mut self, message: impl Into<String>, position: usize) {
        if self.error.is_none() {
            self.error = Some(LexError::new(message, position));
        }
    }

    /// Returns the character at the current position.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Dispatches on the character at the current position.
    fn next_token(&mut self) {
        let start = self.pos;
        let ch = self.chars[self.pos];

        if ch.is_whitespace() {
            self.whitespace_run(start);
        } else if self.settings.groups && ch == '(' {
            self.pos += 1;
            self.push(TokenKind::LeftBracket, start, None);
        } else if self.settings.groups && ch == ')' {
            self.pos += 1;
            self.push(TokenKind::RightBracket, start, None);
        } else if ch == '+' || ch == '-' {
            self.sigil(start, ch);
        } else if ch == ':' {
            // A value with no key before it. Lexed anyway so the parser can
            // point at it.
            self.pos += 1;
            self.chip_value(start);
        } else if let Some(field) = self.settings.shortcuts.get(&ch).cloned() {
            self.pos += 1;
            self.push(TokenKind::ChipKeyPositive, start, Some(field));
            if self.peek().is_some_and(|c| self.starts_value(c)) {
                let value_start = self.pos;
                self.chip_value(value_start);
            }
        } else {
            self.text(start);
        }
    }

    /// Scans a whitespace run with nothing before it to attach to.
    ///
    /// If free text follows, the run becomes its leading whitespace;
    /// otherwise the run is its own whitespace-only `Str` token.
    fn whitespace_run(&mut self, start: usize) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        match self.peek() {
            Some(ch) if self.starts_text(ch) => self.text(start),
            _ => self.push_str(start, String::new()),
        }
    }

    /// Returns true if `ch` begins free text rather than structural syntax.
    fn starts_text(&self, ch: char) -> bool {
        if ch.is_whitespace() || ch == '+' || ch == '-' || ch == ':' {
            return false;
        }
        if self.settings.groups && (ch == '(' || ch == ')') {
            return false;
        }
        !self.settings.shortcuts.contains_key(&ch)
    }

    /// Returns true if `ch` terminates a bare word or value.
    fn ends_value(&self, ch: char) -> bool {
        ch.is_whitespace() || ch == '"' || (self.settings.groups && (ch == '(' || ch == ')'))
    }

    /// Returns true if `ch` can begin a chip value. A quote starts a quoted
    /// value here even though it ends a bare one.
    fn starts_value(&self, ch: char) -> bool {
        !ch.is_whitespace() && !(self.settings.groups && (ch == '(' || ch == ')'))
    }

    /// Scans free text starting at `start` (which may point at absorbed
    /// leading whitespace): a quoted phrase or a bare word, plus the
    /// trailing whitespace run.
    fn text(&mut self, start: usize) {
        let literal = if self.peek() == Some('"') {
            self.quoted(self.pos)
        } else {
            let word_start = self.pos;
            while self.peek().is_some_and(|c| !self.ends_value(c)) {
                self.pos += 1;
            }
            let word: String = self.chars[word_start..self.pos].iter().collect();

            if self.settings.operators && (word == "AND" || word == "OR") {
                // Keywords never absorb whitespace, and a run before one
                // stays a separate whitespace-only token.
                if word_start > start {
                    self.push_str_span(start, word_start, String::new());
                }
                let kind = if word == "AND" {
                    TokenKind::And
                } else {
                    TokenKind::Or
                };
                self.push(kind, word_start, None);
                return;
            }
            word
        };

        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.push_str(start, literal);
    }

    /// Scans a quoted phrase from the opening quote, returning the
    /// unescaped content. An unterminated quote is reported but the
    /// best-effort content is still returned.
    fn quoted(&mut self, quote_start: usize) -> String {
        self.pos += 1; // opening quote
        let mut content = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') if matches!(self.chars.get(self.pos + 1), Some('"' | ':' | '(' | ')')) => {
                    content.push(self.chars[self.pos + 1]);
                    self.pos += 2;
                }
                Some(ch) => {
                    content.push(ch);
                    self.pos += 1;
                }
                None => {
                    self.report("unterminated quoted string", quote_start);
                    break;
                }
            }
        }
        content
    }

    /// Scans a `+` or `-` sigil: a chip key when a name and colon follow, an
    /// incomplete chip key at end of input, otherwise a bare `Plus`/`Minus`.
    fn sigil(&mut self, start: usize, sigil: char) {
        let polarity_kind = if sigil == '+' {
            TokenKind::ChipKeyPositive
        } else {
            TokenKind::ChipKeyNegative
        };

        self.pos += 1;
        let name_start = self.pos;
        while self.peek().is_some_and(|c| c != ':' && !self.ends_value(c)) {
            self.pos += 1;
        }
        let name: String = self.chars[name_start..self.pos].iter().collect();

        if self.peek() == Some(':') {
            self.pos += 1; // colon
            self.push(polarity_kind, start, Some(name));
            if self.peek().is_some_and(|c| self.starts_value(c)) {
                let value_start = self.pos;
                self.chip_value(value_start);
            }
            return;
        }

        if name.is_empty() {
            if self.pos >= self.chars.len() {
                // Still typing the field name: keep an incomplete key so
                // typeahead has something to anchor to.
                self.push(polarity_kind, start, Some(String::new()));
            } else {
                let kind = if sigil == '+' {
                    TokenKind::Plus
                } else {
                    TokenKind::Minus
                };
                self.push(kind, start, None);
            }
            return;
        }

        if sigil == '+' {
            // `+name` with no colon yet is a chip key in progress.
            self.push(polarity_kind, start, Some(name));
        } else {
            // `-name` is negated free text; rewind and lex the word itself.
            self.pos = start + 1;
            self.push(TokenKind::Minus, start, None);
        }
    }

    /// Scans a chip value starting at `start` (just after a key's colon, a
    /// shortcut character, or a stray `:`).
    fn chip_value(&mut self, start: usize) {
        let literal = if self.peek() == Some('"') {
            self.quoted(self.pos)
        } else {
            let content_start = self.pos;
            while self.peek().is_some_and(|c| !self.ends_value(c)) {
                self.pos += 1;
            }
            self.chars[content_start..self.pos].iter().collect()
        };
        self.push(TokenKind::ChipValue, start, Some(literal));
    }

    /// Pushes a token whose lexeme spans `start..self.pos`.
    fn push(&mut self, kind: TokenKind, start: usize, literal: Option<String>) {
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        self.tokens.push(Token::new(kind, lexeme, literal, start));
    }

    /// Pushes a `Str` token spanning `start..self.pos`.
    fn push_str(&mut self, start: usize, literal: String) {
        self.push(TokenKind::Str, start, Some(literal));
    }

    /// Pushes a `Str` token spanning an explicit range.
    fn push_str_span(&mut self, start: usize, end: usize, literal: String) {
        let lexeme: String = self.chars[start..end].iter().collect();
        self.tokens
            .push(Token::new(TokenKind::Str, lexeme, Some(literal), start));
    }
}

/// Tokenizes a query string under the given settings.
pub fn scan(input: &str, settings: &LexerSettings) -> ScanOutcome {
    Scanner::new(input, settings).scan()
}
