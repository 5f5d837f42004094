//! Filtering expression trees
//!
//! The expression tree is the serializable form of one filter: a recursive
//! AND/OR structure whose leaves are field/condition/value predicates.
//!
//! # Lifecycle
//!
//! 1. A tree is built programmatically or parsed from persisted plain data
//! 2. `recreate_tree` resolves every predicate's condition against the
//!    registries, coercing search values to their native types
//! 3. The executable tree is evaluated per row with `evaluate`

mod errors;
mod eval;
mod rehydrate;
mod tree;

pub use errors::{ExpressionError, ExpressionResult};
pub use eval::{evaluate, filter_rows};
pub use rehydrate::{
    parse_tree, recreate_tree, recreate_tree_from_fields, recreate_tree_from_json,
    recreate_tree_from_json_fields,
};
pub use tree::{ExpressionNode, FilteringExpression, FilteringExpressionsTree, FilteringLogic};
