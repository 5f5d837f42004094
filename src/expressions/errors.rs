//! Expression tree error types

use crate::schema::DataType;
use thiserror::Error;

/// Result type for rehydration operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors raised while parsing or rehydrating an expression tree.
///
/// Both variants are fatal for the tree they occur in: a predicate whose
/// condition cannot be resolved cannot be evaluated, and an unrecognizable
/// node shape has no safe partial interpretation. Type-resolution failures
/// are deliberately not errors; they degrade to a best-effort guess.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// The condition name has no match in the resolved data type's table
    #[error("no condition named '{name}' is registered for data type '{data_type}'")]
    UnknownCondition {
        /// The unresolved condition name
        name: String,
        /// The data type whose table was searched
        data_type: DataType,
    },

    /// Input is neither a recognizable sub-tree nor a predicate shape
    #[error("malformed filtering tree: {0}")]
    MalformedTree(String),
}
