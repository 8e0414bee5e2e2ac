//! Character offsets to structural positions.
//!
//! Token offsets index into the flat source string; structural positions
//! index into the document built by [`build_document`]. The two disagree
//! wherever a chip's syntax is not document content: sigils, colons, and
//! value quotes exist only in the string, while node open/close slots
//! exist only in the document. The mapping records one adjustment step per
//! such site and composes them into a single monotonic function.
//!
//! [`build_document`]: crate::build_document

use cql_query::{Token, TokenKind};

/// One adjustment: at `pivot`, `delete` source characters are replaced by
/// `insert` structural positions.
#[derive(Debug, Clone, Copy)]
struct Step {
    /// Source character offset where the adjustment applies.
    pivot: usize,
    /// Source characters with no structural counterpart.
    delete: usize,
    /// Structural positions with no source counterpart.
    insert: usize,
}

/// A monotonic, piecewise map from source character offsets to structural
/// document positions.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// Adjustment steps in strictly increasing pivot order.
    steps: Vec<Step>,
}

impl Mapping {
    /// Maps a source character offset to a structural position.
    ///
    /// Offsets inside a deleted span (there is no structural position
    /// between a chip's sigil and its key) clamp forward to the position
    /// just after the span's replacement.
    pub fn map(&self, offset: usize) -> usize {
        let mut delta: isize = 0;
        for step in &self.steps {
            if offset >= step.pivot + step.delete {
                delta += step.insert as isize - step.delete as isize;
            } else if offset > step.pivot {
                let base = step.pivot as isize + delta;
                return usize::try_from(base).unwrap_or(0) + step.insert;
            } else {
                break;
            }
        }
        usize::try_from(offset as isize + delta).unwrap_or(0)
    }
}

/// Characters the lexer unescapes inside a quoted run.
fn escapable(ch: char) -> bool {
    matches!(ch, '"' | ':' | '(' | ')')
}

/// Builds the offset mapping for a token stream.
///
/// Per chip: the sigil is replaced by the chip-open and key-open slots,
/// the colon by key-close and value-open, and the end of the value grows
/// value-close and chip-close; value quote marks and escape backslashes
/// are dropped. A shortcut character is replaced by the whole key prefix
/// it expands to. Everything else maps one to one.
pub fn build_mapping(tokens: &[Token]) -> Mapping {
    let mut steps = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::ChipKeyPositive | TokenKind::ChipKeyNegative => {
                let has_value = tokens
                    .get(index + 1)
                    .is_some_and(|t| t.kind == TokenKind::ChipValue);
                if token.lexeme.starts_with(['+', '-']) {
                    // sigil -> chip open, key open
                    steps.push(Step { pivot: token.start, delete: 1, insert: 2 });
                    let has_colon =
                        token.lexeme.ends_with(':') && token.lexeme.chars().count() > 1;
                    if has_colon {
                        // colon -> key close, value open
                        steps.push(Step { pivot: token.end, delete: 1, insert: 2 });
                        if !has_value {
                            steps.push(Step { pivot: token.end + 1, delete: 0, insert: 2 });
                        }
                    } else {
                        // no colon yet: close the key and the empty value
                        steps.push(Step { pivot: token.end + 1, delete: 0, insert: 4 });
                    }
                } else {
                    // shortcut character -> chip open, key open, the key
                    // name itself, key close, value open
                    let key = token.literal_str().chars().count();
                    steps.push(Step { pivot: token.start, delete: 1, insert: 4 + key });
                    if !has_value {
                        steps.push(Step { pivot: token.end + 1, delete: 0, insert: 2 });
                    }
                }
            }
            TokenKind::ChipValue => {
                let follows_key = index > 0
                    && matches!(
                        tokens[index - 1].kind,
                        TokenKind::ChipKeyPositive | TokenKind::ChipKeyNegative
                    );
                if !follows_key {
                    // a stray value renders as plain text
                    continue;
                }
                let chars: Vec<char> = token.lexeme.chars().collect();
                if chars.first() == Some(&'"') {
                    steps.push(Step { pivot: token.start, delete: 1, insert: 0 });
                    let terminated = chars.len() > 1 && chars.last() == Some(&'"');
                    let interior_end = if terminated { chars.len() - 1 } else { chars.len() };
                    let mut at = 1;
                    while at < interior_end {
                        if chars[at] == '\\'
                            && at + 1 < interior_end
                            && escapable(chars[at + 1])
                        {
                            steps.push(Step { pivot: token.start + at, delete: 1, insert: 0 });
                            at += 2;
                        } else {
                            at += 1;
                        }
                    }
                    if terminated {
                        steps.push(Step { pivot: token.end, delete: 1, insert: 0 });
                    }
                }
                // end of value -> value close, chip close
                steps.push(Step { pivot: token.end + 1, delete: 0, insert: 2 });
            }
            _ => {}
        }
    }
    Mapping { steps }
}
