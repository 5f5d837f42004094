//! Row sorting
//!
//! A pluggable strategy interface with three concrete strategies. All
//! strategies share one comparator convention: nullish values compare less
//! than any defined value and equal to each other, and the whole comparator
//! is reversed for descending order, so nullish values sort first ascending
//! and last descending. Sorting is stable.

mod strategy;

pub use strategy::{
    compare_values, DefaultSortingStrategy, FormattedValuesSortingStrategy,
    GroupMemberCountSortingStrategy, SortingStrategy, ValueResolver,
};

use crate::schema::DataType;
use crate::value::{resolve_field_value, CellValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingDirection {
    Asc,
    Desc,
}

impl SortingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortingDirection::Asc => "asc",
            SortingDirection::Desc => "desc",
        }
    }
}

/// Persistable sort state for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingExpression {
    /// Field to sort by
    pub field_name: String,
    /// Sort direction
    pub direction: SortingDirection,
    /// Case-insensitive key comparison for textual keys
    #[serde(default)]
    pub ignore_case: bool,
}

impl SortingExpression {
    pub fn asc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            direction: SortingDirection::Asc,
            ignore_case: false,
        }
    }

    pub fn desc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            direction: SortingDirection::Desc,
            ignore_case: false,
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }
}

/// Display formatter supplied by column metadata.
pub type Formatter = Box<dyn Fn(&CellValue) -> CellValue + Send + Sync>;

/// Column metadata consumed by the sort engine.
///
/// The formatter is only honored by the formatted-values strategy; the
/// default strategy sorts raw resolved values.
pub struct ColumnMeta {
    /// Row field backing the column
    pub field: String,
    /// Column data type
    pub data_type: DataType,
    /// Optional display formatter
    pub formatter: Option<Formatter>,
    /// Column-level default for case-insensitive sorting
    pub sorting_ignore_case: bool,
}

impl ColumnMeta {
    pub fn new(field: impl Into<String>, data_type: DataType) -> Self {
        Self {
            field: field.into(),
            data_type,
            formatter: None,
            sorting_ignore_case: false,
        }
    }

    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&CellValue) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn with_sorting_ignore_case(mut self, ignore_case: bool) -> Self {
        self.sorting_ignore_case = ignore_case;
        self
    }

    /// True for date and date-time columns
    pub fn is_date(&self) -> bool {
        matches!(self.data_type, DataType::Date | DataType::DateTime)
    }

    /// True for time-of-day columns
    pub fn is_time(&self) -> bool {
        self.data_type == DataType::Time
    }
}

/// Sorts rows with the default strategy, resolving fields directly from the
/// row objects and taking date/time handling from the column metadata.
pub fn sort_rows(
    rows: &[Value],
    expression: &SortingExpression,
    column: Option<&ColumnMeta>,
) -> Vec<Value> {
    let is_date = column.map(ColumnMeta::is_date).unwrap_or(false);
    let is_time = column.map(ColumnMeta::is_time).unwrap_or(false);
    let ignore_case =
        expression.ignore_case || column.map(|c| c.sorting_ignore_case).unwrap_or(false);
    DefaultSortingStrategy::instance().sort(
        rows,
        &expression.field_name,
        expression.direction,
        ignore_case,
        &resolve_field_value,
        is_date,
        is_time,
        column,
    )
}
