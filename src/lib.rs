//! gridops - filtering-expression and sorting engine for data-grid rows
//!
//! A filter is a tree of boolean predicates over row fields. Trees serialize
//! to plain JSON-compatible data for persistence and are rehydrated back into
//! executable form against an optional entity/field schema. The sorting
//! engine orders the same rows using the columns' type metadata.

pub mod conditions;
pub mod expressions;
pub mod grouping;
pub mod schema;
pub mod sorting;
pub mod value;
