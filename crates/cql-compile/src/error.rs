//! Error type for backend compilation.

use thiserror::Error;

/// A semantic problem found while compiling an AST to a backend query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A chip key was written but no value followed the colon.
    #[error("the field '{field}' needs a value after it")]
    MissingValue {
        /// The field name.
        field: String,
        /// Character offset of the chip key in the source.
        position: usize,
    },
}

impl CompileError {
    /// The character offset the problem points at.
    pub fn position(&self) -> usize {
        match self {
            Self::MissingValue { position, .. } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_names_the_field() {
        let err = CompileError::MissingValue {
            field: "tag".into(),
            position: 0,
        };
        assert_eq!(err.to_string(), "the field 'tag' needs a value after it");
        assert_eq!(err.position(), 0);
    }
}
