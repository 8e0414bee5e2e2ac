//! Minimal-range structural diffing.
//!
//! The editing surface replaces only the sub-range of its tree that a
//! keystroke actually changed, which is what keeps selection and cursor
//! state alive. The differ finds that range by flattening both documents
//! into atoms (one per structural position) and scanning from both ends
//! for the first divergence, so an edit inside one chip's value reports a
//! range inside that value rather than the whole chip.

use cql_query::Polarity;
use serde::{Deserialize, Serialize};

use crate::node::{StructuralDocument, StructuralNode};

/// One structural position. Boundary slots carry their own atom kinds so
/// a key edit never matches against a value edit at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    /// One character of a text node.
    TextChar(char),
    /// A chip's opening slot.
    ChipOpen(Polarity),
    /// A key's opening slot.
    KeyOpen,
    /// One character of a key.
    KeyChar(char),
    /// A key's closing slot.
    KeyClose,
    /// A value's opening slot.
    ValueOpen,
    /// One character of a value.
    ValueChar(char),
    /// A value's closing slot.
    ValueClose,
    /// A chip's closing slot.
    ChipClose,
}

/// Flattens a document into one atom per structural position.
fn flatten(document: &StructuralDocument) -> Vec<Atom> {
    let mut atoms = Vec::with_capacity(document.positions());
    for node in document.nodes() {
        match node {
            StructuralNode::Text(text) => {
                atoms.extend(text.chars().map(Atom::TextChar));
            }
            StructuralNode::Chip { polarity, key, value } => {
                atoms.push(Atom::ChipOpen(*polarity));
                atoms.push(Atom::KeyOpen);
                atoms.extend(key.chars().map(Atom::KeyChar));
                atoms.push(Atom::KeyClose);
                atoms.push(Atom::ValueOpen);
                atoms.extend(value.chars().map(Atom::ValueChar));
                atoms.push(Atom::ValueClose);
                atoms.push(Atom::ChipClose);
            }
        }
    }
    atoms
}

/// The smallest differing range between two documents, in structural
/// positions: `a[start..end_a]` differs from `b[start..end_b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRange {
    /// First position at which the documents diverge.
    pub start: usize,
    /// End of the differing range in the first document, exclusive.
    pub end_a: usize,
    /// End of the differing range in the second document, exclusive.
    pub end_b: usize,
}

/// Finds the smallest range within which two documents differ, or `None`
/// when they are structurally identical.
///
/// Scans from the front and the back simultaneously; the back scan stops
/// before crossing the front boundary, which pushes the reported end
/// forward when a single-character edit sits between repeated content.
pub fn diff(a: &StructuralDocument, b: &StructuralDocument) -> Option<EditRange> {
    let atoms_a = flatten(a);
    let atoms_b = flatten(b);
    let len_a = atoms_a.len();
    let len_b = atoms_b.len();

    let mut start = 0;
    while start < len_a && start < len_b && atoms_a[start] == atoms_b[start] {
        start += 1;
    }
    if start == len_a && start == len_b {
        return None;
    }

    let mut suffix = 0;
    while suffix < len_a - start
        && suffix < len_b - start
        && atoms_a[len_a - 1 - suffix] == atoms_b[len_b - 1 - suffix]
    {
        suffix += 1;
    }

    Some(EditRange {
        start,
        end_a: len_a - suffix,
        end_b: len_b - suffix,
    })
}
