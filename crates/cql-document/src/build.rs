//! Token stream to structural document.

use cql_query::{Polarity, Token, TokenKind};

use crate::node::{StructuralDocument, StructuralNode};

/// Builds a structural document from a token stream.
///
/// A single reduce over the tokens: a chip key fuses with the chip value
/// immediately after it into one [`StructuralNode::Chip`], a lone key
/// becomes a chip with an empty value, and every other lexeme (words,
/// whitespace runs, operators, brackets, stray sigils) accumulates into
/// text nodes exactly as written in the source.
pub fn build_document(tokens: &[Token]) -> StructuralDocument {
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind {
            TokenKind::ChipKeyPositive | TokenKind::ChipKeyNegative => {
                nodes.push(StructuralNode::Text(std::mem::take(&mut text)));
                let value = match tokens.get(index + 1) {
                    Some(next) if next.kind == TokenKind::ChipValue => {
                        index += 1;
                        next.literal_str().to_string()
                    }
                    _ => String::new(),
                };
                let polarity = if token.kind == TokenKind::ChipKeyNegative {
                    Polarity::Negative
                } else {
                    Polarity::Positive
                };
                nodes.push(StructuralNode::Chip {
                    polarity,
                    key: token.literal_str().to_string(),
                    value,
                });
            }
            TokenKind::Eof => {}
            // A value with no key before it renders as plain text.
            _ => text.push_str(&token.lexeme),
        }
        index += 1;
    }
    nodes.push(StructuralNode::Text(text));
    StructuralDocument::new(nodes)
}

#[cfg(test)]
mod tests {
    use cql_query::{LexerSettings, scan};

    use super::*;

    fn document(input: &str) -> StructuralDocument {
        build_document(&scan(input, &LexerSettings::full()).tokens)
    }

    fn chip(polarity: Polarity, key: &str, value: &str) -> StructuralNode {
        StructuralNode::Chip {
            polarity,
            key: key.into(),
            value: value.into(),
        }
    }

    fn text(content: &str) -> StructuralNode {
        StructuralNode::Text(content.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(document("").nodes(), &[text("")]);
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(document("rust async").nodes(), &[text("rust async")]);
    }

    #[test]
    fn key_and_value_fuse_into_one_chip() {
        assert_eq!(
            document("+tag:news").nodes(),
            &[
                text(""),
                chip(Polarity::Positive, "tag", "news"),
                text(""),
            ]
        );
    }

    #[test]
    fn lone_key_becomes_chip_with_empty_value() {
        assert_eq!(
            document("+tag:").nodes(),
            &[text(""), chip(Polarity::Positive, "tag", ""), text("")]
        );
    }

    #[test]
    fn negative_chip_keeps_polarity() {
        assert_eq!(
            document("-tag:sport").nodes()[1],
            chip(Polarity::Negative, "tag", "sport")
        );
    }

    #[test]
    fn quoted_value_is_stored_unquoted() {
        assert_eq!(
            document("+title:\"a b\"").nodes()[1],
            chip(Polarity::Positive, "title", "a b")
        );
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        assert_eq!(
            document("marina +section:commentisfree").nodes(),
            &[
                text("marina "),
                chip(Polarity::Positive, "section", "commentisfree"),
                text(""),
            ]
        );
    }

    #[test]
    fn adjacent_chips_get_a_separator_from_the_whitespace_run() {
        assert_eq!(
            document("+a:1 +b:2").nodes(),
            &[
                text(""),
                chip(Polarity::Positive, "a", "1"),
                text(" "),
                chip(Polarity::Positive, "b", "2"),
                text(""),
            ]
        );
    }

    #[test]
    fn operators_and_brackets_stay_text() {
        assert_eq!(document("(a OR b)").nodes(), &[text("(a OR b)")]);
    }

    #[test]
    fn negated_word_stays_text() {
        assert_eq!(document("-deprecated").nodes(), &[text("-deprecated")]);
    }

    #[test]
    fn stray_value_renders_as_text() {
        assert_eq!(document(":foo").nodes(), &[text(":foo")]);
    }
}
