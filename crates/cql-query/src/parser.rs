//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent with one
//! token of lookahead.
//!
//! # Grammar
//!
//! ```text
//! query  → binary? EOF
//! binary → expr ((AND | OR)? binary)?    // absent operator ⇒ implicit OR
//! expr   → "-"? (group | str | field)
//! group  → "(" binary ")"
//! field  → CHIP_KEY CHIP_VALUE?
//! ```
//!
//! Chips are rejected in two contexts — inside brackets and directly after
//! an explicit `AND`/`OR` — but the field is parsed first so the error can
//! name it. Whitespace-only `Str` tokens are trivia here: they exist for the
//! structural mapper, not for the grammar.

use crate::{
    ast::{Binary, BinaryRight, Expr, ExprContent, Field, Group, Operator, Query, StrNode},
    error::{ParseError, ParseErrorKind, QueryError},
    lexer::{LexerSettings, scan},
    token::{Polarity, Token, TokenKind},
};

/// Recursive descent parser over a token stream.
///
/// The cursor lives in this struct and nowhere else: parsing is a pure
/// function of the token list, and each call owns its own `Parser`.
struct Parser<'a> {
    /// Tokens with whitespace-only trivia filtered out.
    tokens: Vec<&'a Token>,
    /// Current position in `tokens`.
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given tokens, dropping trivia.
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens: tokens.iter().filter(|t| !t.is_whitespace_only()).collect(),
            pos: 0,
        }
    }

    /// Parses a complete query.
    fn parse(mut self) -> Result<Query, ParseError> {
        if self.peek().kind == TokenKind::Eof {
            return Ok(Query::empty());
        }

        let binary = self.binary(false, None)?;

        let trailing = self.peek();
        match trailing.kind {
            TokenKind::Eof => Ok(Query {
                content: Some(binary),
            }),
            TokenKind::RightBracket => Err(ParseError::new(
                ParseErrorKind::UnmatchedBracket,
                trailing.start,
            )),
            _ => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    lexeme: trailing.lexeme.clone(),
                },
                trailing.start,
            )),
        }
    }

    /// Parses a binary chain. `after_operator` names the explicit operator
    /// the first expression follows, if any; `in_group` is set for the whole
    /// bracketed extent.
    fn binary(
        &mut self,
        in_group: bool,
        after_operator: Option<&Token>,
    ) -> Result<Binary, ParseError> {
        let left = self.expr(in_group, after_operator)?;

        let next = self.peek();
        let right = match next.kind {
            TokenKind::And | TokenKind::Or => {
                let operator_token = self.advance().clone();
                let operator = if operator_token.kind == TokenKind::And {
                    Operator::And
                } else {
                    Operator::Or
                };
                if !self.can_start_expr() {
                    return Err(ParseError::new(
                        ParseErrorKind::DanglingOperator {
                            operator: operator_token.lexeme.clone(),
                        },
                        operator_token.start,
                    ));
                }
                let rest = self.binary(in_group, Some(&operator_token))?;
                Some(BinaryRight {
                    operator,
                    binary: Box::new(rest),
                })
            }
            _ if self.can_start_expr() => {
                let rest = self.binary(in_group, None)?;
                Some(BinaryRight {
                    operator: Operator::Or,
                    binary: Box::new(rest),
                })
            }
            _ => None,
        };

        Ok(Binary { left, right })
    }

    /// Parses one expression with an optional leading `-`.
    fn expr(
        &mut self,
        in_group: bool,
        after_operator: Option<&Token>,
    ) -> Result<Expr, ParseError> {
        let mut polarity = Polarity::Positive;
        if self.peek().kind == TokenKind::Minus {
            self.advance();
            polarity = Polarity::Negative;
        }

        let token = self.peek().clone();
        let content = match token.kind {
            TokenKind::Str => {
                self.advance();
                ExprContent::Str(StrNode {
                    text: token.literal_str().to_string(),
                    token,
                })
            }

            TokenKind::ChipKeyPositive | TokenKind::ChipKeyNegative => {
                let field = self.field()?;
                if in_group {
                    return Err(ParseError::new(
                        ParseErrorKind::FieldInGroup {
                            field: field.name().to_string(),
                        },
                        field.key.start,
                    ));
                }
                if let Some(operator) = after_operator {
                    return Err(ParseError::new(
                        ParseErrorKind::FieldAfterOperator {
                            field: field.name().to_string(),
                            operator: operator.lexeme.clone(),
                        },
                        field.key.start,
                    ));
                }
                ExprContent::Field(field)
            }

            TokenKind::LeftBracket => ExprContent::Group(self.group()?),

            TokenKind::ChipValue => {
                return Err(ParseError::new(
                    ParseErrorKind::ValueWithoutKey,
                    token.start,
                ));
            }

            TokenKind::RightBracket => {
                return Err(ParseError::new(
                    ParseErrorKind::UnmatchedBracket,
                    token.start,
                ));
            }

            TokenKind::And | TokenKind::Or => {
                return Err(ParseError::new(
                    ParseErrorKind::LeadingOperator {
                        operator: token.lexeme.clone(),
                    },
                    token.start,
                ));
            }

            TokenKind::Eof => {
                return Err(ParseError::new(ParseErrorKind::UnexpectedEnd, token.start));
            }

            TokenKind::Plus | TokenKind::Minus => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        lexeme: token.lexeme.clone(),
                    },
                    token.start,
                ));
            }
        };

        Ok(Expr { content, polarity })
    }

    /// Parses a chip key and its optional value.
    fn field(&mut self) -> Result<Field, ParseError> {
        let key = self.advance().clone();
        let value = if self.peek().kind == TokenKind::ChipValue {
            Some(self.advance().clone())
        } else {
            None
        };
        Ok(Field { key, value })
    }

    /// Parses a bracketed group, consuming both brackets.
    fn group(&mut self) -> Result<Group, ParseError> {
        let open = self.advance().clone();

        if self.peek().kind == TokenKind::RightBracket {
            return Err(ParseError::new(ParseErrorKind::EmptyGroup, open.start));
        }

        let content = self.binary(true, None)?;

        let close = self.peek();
        if close.kind != TokenKind::RightBracket {
            return Err(ParseError::new(
                ParseErrorKind::MissingClosingBracket,
                close.start,
            ));
        }
        self.advance();

        Ok(Group {
            content: Box::new(content),
        })
    }

    /// Returns true if the current token can begin an expression.
    fn can_start_expr(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Str
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::LeftBracket
                | TokenKind::ChipKeyPositive
                | TokenKind::ChipKeyNegative
                | TokenKind::ChipValue
        )
    }

    /// Returns the current token without consuming it. The `Eof` terminator
    /// guarantees there is always one.
    fn peek(&self) -> &Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> &Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }
}

/// Parses a token stream into a query AST.
pub fn parse_tokens(tokens: &[Token]) -> Result<Query, ParseError> {
    Parser::new(tokens).parse()
}

/// The combined result of scanning and parsing a query string.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The full token stream, trivia and `Eof` included.
    pub tokens: Vec<Token>,
    /// The AST, present when parsing succeeded.
    pub ast: Option<Query>,
    /// The first problem found, lexical problems taking precedence since
    /// they are the root cause.
    pub error: Option<QueryError>,
}

/// Scans and parses a query string in one step.
///
/// The token stream is always returned, even on error, so the editing
/// surface can keep rendering the valid prefix.
pub fn parse(input: &str, settings: &LexerSettings) -> ParseOutcome {
    let scanned = scan(input, settings);
    let parsed = parse_tokens(&scanned.tokens);

    let error = match (&scanned.error, &parsed) {
        (Some(lex), _) => Some(QueryError::from(lex.clone())),
        (None, Err(parse_error)) => Some(QueryError::from(parse_error.clone())),
        (None, Ok(_)) => None,
    };

    ParseOutcome {
        tokens: scanned.tokens,
        ast: parsed.ok(),
        error,
    }
}
