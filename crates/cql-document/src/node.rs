//! The structural document model.
//!
//! A query renders as an ordered sequence of nodes: runs of free text and
//! chips, where a chip holds a field key and value. The sequence always
//! begins and ends with a text node (possibly empty), and two adjacent
//! chips always have an empty text node between them, so a caret position
//! exists on either side of every chip.

use cql_query::Polarity;
use serde::{Deserialize, Serialize};

/// One node in a structural document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuralNode {
    /// A run of free text, whitespace included.
    Text(String),
    /// A `field:value` chip.
    Chip {
        /// Whether the chip includes or excludes matches.
        polarity: Polarity,
        /// The field name.
        key: String,
        /// The field value, unquoted. Empty while a value is being typed.
        value: String,
    },
}

impl StructuralNode {
    /// The number of structural positions the node occupies.
    ///
    /// Text occupies one position per character. A chip occupies one per
    /// key and value character plus six boundary slots: the chip, key, and
    /// value nodes each contribute an open and a close position.
    pub fn positions(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Chip { key, value, .. } => key.chars().count() + value.chars().count() + 6,
        }
    }
}

/// An ordered sequence of structural nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDocument {
    /// Nodes in source order.
    nodes: Vec<StructuralNode>,
}

impl StructuralDocument {
    /// Creates a document from a node sequence, inserting the empty text
    /// nodes the boundary invariant requires: one before a chip with no
    /// text in front of it, and one at the very end unless the sequence
    /// already finishes with text.
    pub fn new(nodes: Vec<StructuralNode>) -> Self {
        let mut normalized: Vec<StructuralNode> = Vec::with_capacity(nodes.len() + 2);
        for node in nodes {
            if matches!(node, StructuralNode::Chip { .. })
                && !matches!(normalized.last(), Some(StructuralNode::Text(_)))
            {
                normalized.push(StructuralNode::Text(String::new()));
            }
            normalized.push(node);
        }
        if !matches!(normalized.last(), Some(StructuralNode::Text(_))) {
            normalized.push(StructuralNode::Text(String::new()));
        }
        Self { nodes: normalized }
    }

    /// The nodes in source order.
    pub fn nodes(&self) -> &[StructuralNode] {
        &self.nodes
    }

    /// The total number of structural positions in the document.
    pub fn positions(&self) -> usize {
        self.nodes.iter().map(StructuralNode::positions).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chip(key: &str, value: &str) -> StructuralNode {
        StructuralNode::Chip {
            polarity: Polarity::Positive,
            key: key.into(),
            value: value.into(),
        }
    }

    #[test]
    fn empty_sequence_becomes_a_single_empty_text() {
        let document = StructuralDocument::new(vec![]);
        assert_eq!(document.nodes(), &[StructuralNode::Text(String::new())]);
        assert_eq!(document.positions(), 0);
    }

    #[test]
    fn boundary_text_is_inserted_around_chips() {
        let document = StructuralDocument::new(vec![chip("tag", "news")]);
        assert_eq!(document.nodes().len(), 3);
        assert!(matches!(document.nodes()[0], StructuralNode::Text(ref t) if t.is_empty()));
        assert!(matches!(document.nodes()[2], StructuralNode::Text(ref t) if t.is_empty()));
    }

    #[test]
    fn adjacent_chips_are_separated() {
        let document = StructuralDocument::new(vec![chip("a", "1"), chip("b", "2")]);
        assert!(matches!(document.nodes()[2], StructuralNode::Text(ref t) if t.is_empty()));
        assert_eq!(document.nodes().len(), 5);
    }

    #[test]
    fn chip_positions_count_boundary_slots() {
        assert_eq!(chip("tag", "news").positions(), 3 + 4 + 6);
        assert_eq!(chip("tag", "").positions(), 9);
        assert_eq!(StructuralNode::Text("a b".into()).positions(), 3);
    }

    #[test]
    fn positions_count_characters_not_bytes() {
        assert_eq!(StructuralNode::Text("héllo".into()).positions(), 5);
    }
}
